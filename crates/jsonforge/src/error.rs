//! Error taxonomy for the lexer, the field state machine and the value
//! strategies.
//!
//! Low-level failures are recorded as an [`ErrorKind`] on the lexer; the
//! caller turns them into an [`Error`] with [`Lexer::wrap_err`], which is the
//! only place a source position is attached. Line and column are derived on
//! that error path by rescanning the input, so the success path never pays
//! for them.
//!
//! [`Lexer::wrap_err`]: crate::Lexer::wrap_err
use alloc::string::String;

use thiserror::Error;

use crate::token::Token;

/// A decode failure with the source position it was detected at.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at offset {offset} (line {line}, column {column})")]
pub struct Error {
    kind: ErrorKind,
    offset: usize,
    line: usize,
    column: usize,
}

impl Error {
    pub(crate) fn at(kind: ErrorKind, input: &[u8], offset: usize) -> Self {
        let (line, column) = line_column(input, offset);
        Self {
            kind,
            offset,
            line,
            column,
        }
    }

    /// The failure class.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Byte offset of the reader cursor when the error was raised.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based line of [`Error::offset`].
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column (in bytes) of [`Error::offset`].
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Consumes the error, keeping only its kind.
    #[must_use]
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }
}

/// Failure of the underlying byte source.
///
/// Buffers are fully resident, so only `Eof` is reachable in practice; `Io`
/// is kept for sources that can fail mid-read.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// The input ended.
    #[error("unexpected end of input")]
    Eof,
    /// The source failed mid-read.
    #[error("input source failed")]
    Io,
}

/// Every way a decode can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// The byte source stopped early.
    #[error("I/O error: {0}")]
    Io(ReadError),
    /// A string payload is not valid UTF-8.
    #[error("string with invalid UTF-8 sequence")]
    InvalidUtf8,
    /// Unknown letter after a backslash.
    #[error("string with invalid escaped character {:?}", char::from(*.0))]
    InvalidEscapedChar(u8),
    /// Raw control byte inside a string.
    #[error("string with invalid JSON character 0x{0:02x}")]
    InvalidJsonChar(u8),
    /// Non-hex digit in a `\uXXXX` escape.
    #[error("string with invalid hex character {:?}", char::from(*.0))]
    InvalidHexChar(u8),
    /// A byte that cannot start any token.
    #[error("invalid character {:?}", char::from(*.0))]
    InvalidChar(u8),
    /// Malformed `true`, `false` or `null` literal.
    #[error("invalid string")]
    InvalidString,
    /// `.` not followed by a digit.
    #[error("missing integer after decimal")]
    MissingIntegerAfterDecimal,
    /// `e` or `E` not followed by a digit.
    #[error("missing integer after exponent")]
    MissingIntegerAfterExponent,
    /// `-` not followed by a digit.
    #[error("missing integer after minus")]
    MissingIntegerAfterMinus,
    /// A comment where comments are not allowed.
    #[error("unallowed comment")]
    UnallowedComment,
    /// `/` not followed by `/` or `*`, or an unterminated block comment.
    #[error("incomplete comment")]
    IncompleteComment,
    /// Input ended inside a skipped or captured container.
    #[error("unexpected end of input inside {0}")]
    UnterminatedContainer(Token),
    /// The automaton expected a different structural token.
    #[error("wanted token {expected}, but got token {found}")]
    WrongToken {
        /// What the current state accepts.
        expected: Token,
        /// What was scanned.
        found: Token,
    },
    /// A value was expected.
    #[error("wanted value token, but got token {0}")]
    WantedValueToken(Token),
    /// The token cannot start a value of the target type.
    #[error("cannot decode {found} into value of type {target}")]
    Mismatch {
        /// Name of the target type.
        target: &'static str,
        /// The offending token.
        found: Token,
    },
    /// Capture or skip was asked to start on a non-value token.
    #[error("invalid capture start {0}")]
    InvalidCapture(Token),
    /// Numeric conversion failed.
    #[error(transparent)]
    Number(#[from] NumberError),
    /// Strict mode met a key with no matching field.
    #[error("unknown field {0:?}")]
    UnknownField(String),
    /// Typed decoding opened more nested objects and arrays than
    /// [`DecodeOptions::max_depth`](crate::DecodeOptions::max_depth) allows.
    #[error("nesting exceeds {0} levels")]
    DepthLimitExceeded(usize),
    /// Input continues past the top-level value.
    #[error("trailing characters after value")]
    TrailingCharacters,
    /// Failure reported by a custom decoder.
    #[error("{0}")]
    Custom(String),
}

/// Width-specific numeric conversion failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    /// Not a base-10 number of the expected form.
    #[error("invalid number syntax")]
    Invalid,
    /// The value does not fit the target type.
    #[error("number out of range for {target}")]
    Overflow {
        /// Name of the target type.
        target: &'static str,
    },
}

/// Failure while writing JSON.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// NaN and infinities have no JSON form.
    #[error("unsupported float value {0}")]
    UnsupportedFloat(f64),
    /// Failure reported by a custom encoder.
    #[error("{0}")]
    Custom(String),
}

/// Rescans `input[..offset]` for the 1-based line and column of `offset`.
fn line_column(input: &[u8], offset: usize) -> (usize, usize) {
    let end = offset.min(input.len());
    let mut line = 1;
    let mut line_start = 0;
    for (i, &b) in input[..end].iter().enumerate() {
        if b == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    (line, offset - line_start + 1)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn position_on_first_line() {
        let err = Error::at(ErrorKind::InvalidString, br#"{"a": nul}"#, 9);
        assert_eq!((err.line(), err.column()), (1, 10));
    }

    #[test]
    fn position_after_newlines() {
        let input = b"{\n  \"a\":\n  x}";
        let err = Error::at(ErrorKind::InvalidChar(b'x'), input, 11);
        assert_eq!((err.line(), err.column()), (3, 3));
    }

    #[test]
    fn position_clamps_to_input() {
        let err = Error::at(ErrorKind::Io(ReadError::Eof), b"ab", 2);
        assert_eq!((err.line(), err.column()), (1, 3));
    }

    #[test]
    fn display_includes_position() {
        let err = Error::at(ErrorKind::InvalidChar(b'\''), b"'", 1);
        assert_eq!(
            err.to_string(),
            "invalid character '\\'' at offset 1 (line 1, column 2)"
        );
    }
}
