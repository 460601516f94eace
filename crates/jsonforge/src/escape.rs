//! Decoding of backslash escapes inside quoted strings.
//!
//! [`UnicodeEscape`] accumulates the four hexadecimal digits of a `\uXXXX`
//! escape into a UTF-16 code unit. Surrogate halves are paired by the reader
//! with [`combine_surrogates`]; a half that cannot be paired decodes to
//! U+FFFD.
use crate::error::ErrorKind;

pub(crate) const REPLACEMENT: char = '\u{FFFD}';

/// Accumulates exactly four hex digits into a UTF-16 code unit.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscape {
    acc: u16,
    len: u8,
}

impl UnicodeEscape {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn hex_val(b: u8) -> Option<u16> {
        match b {
            b'0'..=b'9' => Some(u16::from(b - b'0')),
            b'a'..=b'f' => Some(u16::from(b - b'a' + 10)),
            b'A'..=b'F' => Some(u16::from(b - b'A' + 10)),
            _ => None,
        }
    }

    /// Feeds one digit. Returns the code unit once the fourth digit arrives
    /// and resets for the next escape.
    pub fn feed(&mut self, b: u8) -> Result<Option<u16>, ErrorKind> {
        let d = Self::hex_val(b).ok_or(ErrorKind::InvalidHexChar(b))?;
        self.acc = (self.acc << 4) | d;
        self.len += 1;
        if self.len < 4 {
            return Ok(None);
        }
        let unit = self.acc;
        self.acc = 0;
        self.len = 0;
        Ok(Some(unit))
    }
}

#[inline]
pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

#[inline]
pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Combines a high and a low surrogate into one scalar value.
pub(crate) fn combine_surrogates(high: u16, low: u16) -> Option<char> {
    if !is_high_surrogate(high) || !is_low_surrogate(low) {
        return None;
    }
    let code = 0x1_0000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(code)
}

/// The byte a single-character escape (`\n`, `\"`, ...) stands for.
pub(crate) fn simple_escape(b: u8) -> Option<u8> {
    Some(match b {
        b'"' => b'"',
        b'\\' => b'\\',
        b'/' => b'/',
        b'b' => 0x08,
        b'f' => 0x0C,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        _ => return None,
    })
}
