//! Byte reader: a cursor over a fully resident input buffer.
//!
//! The reader never copies the input. Quoted strings are sliced out with a
//! 256-entry byte class table: runs of ordinary bytes are copied in one
//! `extend_from_slice`, and only quotes, backslashes and control bytes leave
//! the fast path.
use alloc::vec::Vec;

use crate::{
    error::{ErrorKind, ReadError},
    escape::{self, UnicodeEscape},
};

/// Ends the fast string run: `"` or `\`.
const STOP: u8 = 0x01;
/// Raw control byte, never valid inside a JSON string.
const IJC: u8 = 0x02;
/// Insignificant whitespace between tokens.
const WS: u8 = 0x04;
/// Part of a multi-byte UTF-8 sequence; checked when the payload becomes a
/// `String`.
const NUC: u8 = 0x08;

static BYTE_CLASS: [u8; 256] = build_byte_class();

const fn build_byte_class() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 0x20 {
        table[i] = IJC;
        i += 1;
    }
    table[b'"' as usize] = STOP;
    table[b'\\' as usize] = STOP;
    table[b' ' as usize] = WS;
    table[b'\t' as usize] |= WS;
    table[b'\n' as usize] |= WS;
    table[b'\r' as usize] |= WS;
    table[0x0B] |= WS;
    table[0x0C] |= WS;
    let mut i = 0x80;
    while i < 256 {
        table[i] = NUC;
        i += 1;
    }
    table
}

#[inline]
fn class(b: u8) -> u8 {
    BYTE_CLASS[b as usize]
}

#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    class(b) & WS != 0
}

/// Cursor over an input buffer.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader positioned at the first byte of `input`.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Current cursor offset.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The whole underlying buffer.
    #[must_use]
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Reads one byte and advances.
    ///
    /// # Errors
    ///
    /// [`ReadError::Eof`] once the buffer is exhausted.
    #[inline]
    pub fn read_byte(&mut self) -> Result<u8, ReadError> {
        let b = *self.input.get(self.pos).ok_or(ReadError::Eof)?;
        self.pos += 1;
        Ok(b)
    }

    /// Rewinds by exactly one byte.
    ///
    /// # Panics
    ///
    /// At position 0. Callers only unread a byte they have just read.
    #[inline]
    pub fn unread_byte(&mut self) {
        assert!(self.pos > 0, "ByteReader::unread_byte: at beginning of input");
        self.pos -= 1;
    }

    /// Reads the first byte that is not insignificant whitespace.
    ///
    /// # Errors
    ///
    /// [`ReadError::Eof`] if only whitespace remains.
    #[inline]
    pub fn read_byte_skip_ws(&mut self) -> Result<u8, ReadError> {
        loop {
            let b = self.read_byte()?;
            if !is_whitespace(b) {
                return Ok(b);
            }
        }
    }

    /// Slices the body of a quoted string into `out`. The opening quote has
    /// already been consumed; the closing quote is consumed but not written.
    ///
    /// With `verbatim` set, escape sequences are validated and copied as they
    /// appear in the source; otherwise they are decoded. Returns whether any
    /// escape sequence was seen.
    ///
    /// # Errors
    ///
    /// `Io(Eof)` for an unterminated string, `InvalidJsonChar` for a raw
    /// control byte, `InvalidEscapedChar` / `InvalidHexChar` for malformed
    /// escapes.
    pub fn slice_quoted_string(
        &mut self,
        out: &mut Vec<u8>,
        verbatim: bool,
    ) -> Result<bool, ErrorKind> {
        let mut escaped = false;
        loop {
            let start = self.pos;
            while self
                .input
                .get(self.pos)
                .is_some_and(|&b| class(b) & (STOP | IJC) == 0)
            {
                self.pos += 1;
            }
            out.extend_from_slice(&self.input[start..self.pos]);

            let c = self.read_byte().map_err(ErrorKind::Io)?;
            match c {
                b'"' => return Ok(escaped),
                b'\\' => {
                    escaped = true;
                    if verbatim {
                        self.copy_escape(out)?;
                    } else {
                        self.decode_escape(out)?;
                    }
                }
                _ => return Err(ErrorKind::InvalidJsonChar(c)),
            }
        }
    }

    fn read_unit(&mut self) -> Result<u16, ErrorKind> {
        let mut esc = UnicodeEscape::new();
        loop {
            let b = self.read_byte().map_err(ErrorKind::Io)?;
            if let Some(unit) = esc.feed(b)? {
                return Ok(unit);
            }
        }
    }

    fn copy_escape(&mut self, out: &mut Vec<u8>) -> Result<(), ErrorKind> {
        let b = self.read_byte().map_err(ErrorKind::Io)?;
        if b == b'u' {
            let start = self.pos - 2;
            self.read_unit()?;
            out.extend_from_slice(&self.input[start..self.pos]);
            return Ok(());
        }
        if escape::simple_escape(b).is_none() {
            return Err(ErrorKind::InvalidEscapedChar(b));
        }
        out.extend_from_slice(&[b'\\', b]);
        Ok(())
    }

    fn decode_escape(&mut self, out: &mut Vec<u8>) -> Result<(), ErrorKind> {
        let b = self.read_byte().map_err(ErrorKind::Io)?;
        if b != b'u' {
            let decoded = escape::simple_escape(b).ok_or(ErrorKind::InvalidEscapedChar(b))?;
            out.push(decoded);
            return Ok(());
        }

        let unit = self.read_unit()?;
        let ch = if escape::is_high_surrogate(unit) {
            if self.input[self.pos..].starts_with(b"\\u") {
                self.pos += 2;
                let low = self.read_unit()?;
                escape::combine_surrogates(unit, low).unwrap_or_else(|| {
                    // Not a pair: the second escape is decoded on its own.
                    self.pos -= 6;
                    escape::REPLACEMENT
                })
            } else {
                escape::REPLACEMENT
            }
        } else {
            char::from_u32(u32::from(unit)).unwrap_or(escape::REPLACEMENT)
        };
        let mut tmp = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut tmp).as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(input: &[u8], verbatim: bool) -> Result<(Vec<u8>, bool, usize), ErrorKind> {
        let mut r = ByteReader::new(input);
        let mut out = Vec::new();
        let escaped = r.slice_quoted_string(&mut out, verbatim)?;
        Ok((out, escaped, r.pos()))
    }

    #[test]
    fn read_and_unread() {
        let mut r = ByteReader::new(b"ab");
        assert_eq!(r.read_byte(), Ok(b'a'));
        r.unread_byte();
        assert_eq!(r.read_byte(), Ok(b'a'));
        assert_eq!(r.read_byte(), Ok(b'b'));
        assert_eq!(r.read_byte(), Err(ReadError::Eof));
    }

    #[test]
    #[should_panic(expected = "at beginning of input")]
    fn unread_at_start_panics() {
        ByteReader::new(b"x").unread_byte();
    }

    #[test]
    fn skips_all_six_whitespace_bytes() {
        let mut r = ByteReader::new(b" \t\n\r\x0b\x0cx");
        assert_eq!(r.read_byte_skip_ws(), Ok(b'x'));
        assert_eq!(r.read_byte_skip_ws(), Err(ReadError::Eof));
    }

    #[test]
    fn plain_string_fast_path() {
        let (out, escaped, pos) = slice(b"hello\", rest", false).unwrap();
        assert_eq!(out, b"hello");
        assert!(!escaped);
        assert_eq!(pos, 6);
    }

    #[test]
    fn decodes_simple_escapes() {
        let (out, escaped, _) = slice(br#"\"\\\/\b\f\n\r\t""#, false).unwrap();
        assert_eq!(out, b"\"\\/\x08\x0c\n\r\t");
        assert!(escaped);
    }

    #[test]
    fn decodes_control_character_escape() {
        let (out, _, _) = slice(br#"\u0012 escaped control character""#, false).unwrap();
        assert_eq!(out[0], 0x12);
        assert_eq!(&out[1..], b" escaped control character");
    }

    #[test]
    fn decodes_surrogate_pair() {
        let (out, _, _) = slice(br#"\uD834\uDD1E surrogate""#, false).unwrap();
        assert_eq!(core::str::from_utf8(&out).unwrap(), "\u{1D11E} surrogate");
    }

    #[test]
    fn lone_surrogates_become_replacement() {
        let (out, _, _) = slice(br#"\uD834x\uDD1E\uD834A""#, false).unwrap();
        assert_eq!(
            core::str::from_utf8(&out).unwrap(),
            "\u{FFFD}x\u{FFFD}\u{FFFD}A"
        );
    }

    #[test]
    fn unpaired_high_surrogate_reprocesses_next_escape() {
        let (out, _, _) = slice(br#"\uD834\u0041""#, false).unwrap();
        assert_eq!(core::str::from_utf8(&out).unwrap(), "\u{FFFD}A");
    }

    #[test]
    fn verbatim_keeps_escapes() {
        let (out, escaped, _) = slice(r#"a\"bé\u00e9""#.as_bytes(), true).unwrap();
        assert_eq!(out, r#"a\"bé\u00e9"#.as_bytes());
        assert!(escaped);
    }

    #[test]
    fn multibyte_utf8_passes_through() {
        let (out, _, _) = slice("€þı\"".as_bytes(), false).unwrap();
        assert_eq!(out, "€þı".as_bytes());
    }

    #[test]
    fn errors() {
        assert_eq!(slice(b"abc", false), Err(ErrorKind::Io(ReadError::Eof)));
        assert_eq!(slice(b"a\x01\"", false), Err(ErrorKind::InvalidJsonChar(1)));
        assert_eq!(slice(br#"\x""#, false), Err(ErrorKind::InvalidEscapedChar(b'x')));
        assert_eq!(slice(br#"\u00zz""#, false), Err(ErrorKind::InvalidHexChar(b'z')));
        assert_eq!(slice(br#"\x""#, true), Err(ErrorKind::InvalidEscapedChar(b'x')));
        assert_eq!(slice(b"\\u00", false), Err(ErrorKind::Io(ReadError::Eof)));
    }
}
