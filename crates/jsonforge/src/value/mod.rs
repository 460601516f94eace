//! Value strategies: how each Rust type reads itself from the token stream
//! and writes itself as JSON.
//!
//! Decoding is driven by the token the caller has just scanned. A strategy
//! consumes exactly the tokens of its own value and leaves the lexer on the
//! last of them, so the caller's automaton continues with the next scan.
use crate::{
    encode::{EncodeBuffer, write_escaped},
    error::{EncodeError, Error, ErrorKind},
    lexer::Lexer,
    options::DecodeOptions,
    record::ValueKind,
    token::Token,
};

mod container;
mod number;
mod raw;
mod scalar;

#[cfg(feature = "serde")]
pub use raw::Fallback;
pub use raw::RawJson;

/// A type that can be filled in from a JSON value.
///
/// Decoding mutates in place. A `null` token leaves scalars and nested
/// records untouched, resets `Option` to `None` and empties collections.
pub trait Decode {
    /// Strategy class, recorded in each [`Field`](crate::Field) descriptor.
    const KIND: ValueKind;

    /// Decodes the value that starts with `tok`, the token just scanned.
    ///
    /// # Errors
    ///
    /// `Mismatch` when `tok` cannot start a value of this type, or any error
    /// met while consuming the rest of the value.
    fn decode_value(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error>;

    /// Decodes a value encoded inside a JSON string, as written by
    /// [`Encode::encode_quoted`].
    ///
    /// `null` is passed to [`Decode::decode_value`] unchanged.
    ///
    /// # Errors
    ///
    /// `Mismatch` for any token but a string or `null`; otherwise whatever
    /// decoding the string's contents reports, positioned at the string.
    fn decode_quoted(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
        match tok {
            Token::Null => self.decode_value(tok, lexer),
            t if t.is_string() => {
                let text = lexer.output().to_vec();
                let options = DecodeOptions {
                    allow_trailing_data: false,
                    max_depth: lexer.options().max_depth.saturating_sub(lexer.depth()),
                    ..*lexer.options()
                };
                decode_text(self, &text, options).map_err(|e| lexer.wrap_err(e.into_kind()))
            }
            other => Err(mismatch::<Self>(lexer, other)),
        }
    }
}

/// A type that can write itself as JSON.
pub trait Encode {
    /// Appends the JSON encoding of `self` to `buf`.
    ///
    /// # Errors
    ///
    /// [`EncodeError::UnsupportedFloat`] for non-finite floats, or a custom
    /// encoder's failure.
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError>;

    /// Whether an `omitempty` field holding this value is left out.
    fn is_empty_value(&self) -> bool {
        false
    }

    /// Appends the encoding of `self` wrapped in a JSON string.
    ///
    /// # Errors
    ///
    /// As for [`Encode::encode`].
    fn encode_quoted(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        let mut inner = EncodeBuffer::new();
        self.encode(&mut inner)?;
        write_escaped(buf.bytes_mut(), inner.as_bytes());
        Ok(())
    }
}

/// Decodes one complete value from `text` into `target`.
fn decode_text<T: Decode + ?Sized>(
    target: &mut T,
    text: &[u8],
    options: DecodeOptions,
) -> Result<(), Error> {
    let mut inner = Lexer::with_options(text, options);
    let tok = expect_value(&mut inner)?;
    target.decode_value(tok, &mut inner)?;
    inner.finish()
}

/// Scans the next token and requires it to start a value.
pub(crate) fn expect_value(lexer: &mut Lexer<'_>) -> Result<Token, Error> {
    match lexer.next_token() {
        Token::Error => Err(lexer.take_error()),
        tok if tok.starts_value() => Ok(tok),
        tok => Err(lexer.wrap_err(ErrorKind::WantedValueToken(tok))),
    }
}

pub(crate) fn mismatch<T: ?Sized>(lexer: &Lexer<'_>, found: Token) -> Error {
    lexer.wrap_err(ErrorKind::Mismatch {
        target: core::any::type_name::<T>(),
        found,
    })
}

/// Decodes a value from a complete buffer: the buffer must hold exactly one
/// JSON value, optionally surrounded by whitespace.
///
/// Unlike [`decode`](crate::decode) this accepts any [`Decode`] type at the
/// top level, including arrays and bare scalars.
///
/// ```rust
/// let v: Vec<Option<u8>> = jsonforge::from_slice(b"[1, null, 3]").unwrap();
/// assert_eq!(v, [Some(1), None, Some(3)]);
/// ```
///
/// # Errors
///
/// Any lexer, structural or conversion error, positioned in `input`.
pub fn from_slice<T: Decode + Default>(input: &[u8]) -> Result<T, Error> {
    from_slice_with_options(input, DecodeOptions::default())
}

/// [`from_slice`] with explicit options.
///
/// # Errors
///
/// As for [`from_slice`].
pub fn from_slice_with_options<T: Decode + Default>(
    input: &[u8],
    options: DecodeOptions,
) -> Result<T, Error> {
    let mut value = T::default();
    decode_text(&mut value, input, options)?;
    Ok(value)
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        (**self).encode(buf)
    }

    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }

    fn encode_quoted(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        (**self).encode_quoted(buf)
    }
}
