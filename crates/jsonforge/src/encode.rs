//! JSON output: the byte buffer encoders write into, string escaping and the
//! ordered field walk shared by every record.
use alloc::vec::Vec;

use crate::{error::EncodeError, record::Record, value::Encode};

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Growable output buffer for encoded JSON.
///
/// Nested values are written into the same buffer as their parent, so a
/// record encode performs no intermediate allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeBuffer {
    bytes: Vec<u8>,
}

impl EncodeBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// The bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the buffer.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of bytes written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Empties the buffer, keeping its allocation.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Drops everything past `len`.
    pub fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    /// Appends one byte.
    #[inline]
    pub fn push(&mut self, b: u8) {
        self.bytes.push(b);
    }

    /// Appends raw bytes. The caller is responsible for their validity as
    /// JSON.
    #[inline]
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Appends `s` as a quoted, escaped JSON string.
    pub fn write_json_string(&mut self, s: &str) {
        write_escaped(&mut self.bytes, s.as_bytes());
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut Vec<u8> {
        &mut self.bytes
    }
}

/// Writes `s` wrapped in quotes.
///
/// Quotes, backslashes and control characters are escaped, as are U+2028 and
/// U+2029 so the output is also valid JavaScript. Other bytes pass through
/// unchanged.
pub(crate) fn write_escaped(dst: &mut Vec<u8>, s: &[u8]) {
    dst.reserve(s.len() + 2);
    dst.push(b'"');
    let mut start = 0;
    let mut i = 0;
    while i < s.len() {
        let b = s[i];
        let escape: Option<&[u8]> = match b {
            b'"' => Some(b"\\\""),
            b'\\' => Some(b"\\\\"),
            b'\n' => Some(b"\\n"),
            b'\r' => Some(b"\\r"),
            b'\t' => Some(b"\\t"),
            0x08 => Some(b"\\b"),
            0x0C => Some(b"\\f"),
            0x00..=0x1F => None,
            0xE2 if s.get(i + 1) == Some(&0x80) && matches!(s.get(i + 2), Some(0xA8 | 0xA9)) => {
                dst.extend_from_slice(&s[start..i]);
                dst.extend_from_slice(if s[i + 2] == 0xA8 {
                    b"\\u2028"
                } else {
                    b"\\u2029"
                });
                i += 3;
                start = i;
                continue;
            }
            _ => {
                i += 1;
                continue;
            }
        };
        dst.extend_from_slice(&s[start..i]);
        match escape {
            Some(seq) => dst.extend_from_slice(seq),
            None => dst.extend_from_slice(&[
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX[usize::from(b >> 4)],
                HEX[usize::from(b & 0xF)],
            ]),
        }
        i += 1;
        start = i;
    }
    dst.extend_from_slice(&s[start..]);
    dst.push(b'"');
}

/// Writes `record` as a JSON object: fields in declared order, omit-empty
/// fields elided together with their separator.
///
/// # Errors
///
/// The first error returned by a field encoder.
pub fn encode_record<R: Record + ?Sized>(
    record: &R,
    buf: &mut EncodeBuffer,
) -> Result<(), EncodeError> {
    buf.push(b'{');
    let mut first = true;
    for (index, field) in R::FIELDS.iter().enumerate() {
        if field.omit_empty && record.field_is_empty(index) {
            continue;
        }
        if !first {
            buf.push(b',');
        }
        first = false;
        buf.extend_from_slice(field.key);
        record.encode_field(index, buf)?;
    }
    buf.push(b'}');
    Ok(())
}

/// Encodes `value` into a fresh byte vector.
///
/// # Errors
///
/// [`EncodeError::UnsupportedFloat`] for NaN or infinite floats, or whatever
/// a custom encoder reports.
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    let mut buf = EncodeBuffer::with_capacity(128);
    value.encode(&mut buf)?;
    Ok(buf.into_bytes())
}

/// Appends the encoding of `value` to `buf`.
///
/// On error `buf` is restored to its previous length.
///
/// # Errors
///
/// As for [`encode`].
pub fn encode_into<T: Encode + ?Sized>(
    value: &T,
    buf: &mut EncodeBuffer,
) -> Result<(), EncodeError> {
    let mark = buf.len();
    let result = value.encode(buf);
    if result.is_err() {
        buf.truncate(mark);
    }
    result
}

/// Reusable encoder that keeps its buffer allocation between calls.
///
/// An `Encoder` has a single owner; share it across threads only behind
/// external synchronization.
///
/// ```rust
/// use jsonforge::Encoder;
///
/// let mut encoder = Encoder::new();
/// assert_eq!(encoder.encode(&vec![1u8, 2]).unwrap(), b"[1,2]");
/// assert_eq!(encoder.encode("hi").unwrap(), br#""hi""#);
/// ```
#[derive(Debug, Default)]
pub struct Encoder {
    buf: EncodeBuffer,
}

impl Encoder {
    /// Creates an encoder with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `value`, replacing the previous output.
    ///
    /// # Errors
    ///
    /// As for [`encode`].
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<&[u8], EncodeError> {
        self.buf.clear();
        value.encode(&mut self.buf)?;
        Ok(self.buf.as_bytes())
    }
}
