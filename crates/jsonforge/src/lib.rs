//! Fast JSON codecs for record types.
//!
//! A record's shape is declared once with [`record!`]; the macro emits a
//! constant field table and a direct per-field dispatch, so decoding and
//! encoding never inspect types at run time.
//!
//! Decoding runs a hand-built byte [`Lexer`] under a small object automaton
//! shared by every record. Tokens are typed but carry no payload; the bytes
//! of the token just scanned sit in the lexer's output buffer, where value
//! strategies convert them in place. Unknown keys are skipped without being
//! decoded, at any depth.
//!
//! ```rust
//! use jsonforge::record;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct LogRecord {
//!     timestamp: i64,
//!     origin_id: u32,
//!     method: String,
//! }
//!
//! record!(LogRecord {
//!     timestamp: i64 => "id" [omitempty],
//!     origin_id: u32 => "OriginId",
//!     method: String => "meth",
//! });
//!
//! let rec: LogRecord =
//!     jsonforge::decode(br#"{"id": 123213, "OriginId": 22, "meth": "GET"}"#).unwrap();
//! assert_eq!(rec.timestamp, 123_213);
//! assert_eq!(
//!     jsonforge::encode(&rec).unwrap(),
//!     br#"{"id":123213,"OriginId":22,"meth":"GET"}"#
//! );
//! ```
//!
//! The crate is `no_std` and needs only `alloc`.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod encode;
mod error;
mod escape;
mod lexer;
mod machine;
mod numbers;
mod options;
mod reader;
mod record;
mod token;
mod value;

#[cfg(test)]
mod tests;

pub use encode::{EncodeBuffer, Encoder, encode, encode_into, encode_record};
pub use error::{EncodeError, Error, ErrorKind, NumberError, ReadError};
pub use lexer::Lexer;
pub use options::{DEFAULT_MAX_DEPTH, DecodeOptions};
#[cfg(feature = "fuzzing")]
pub use reader::ByteReader;
pub use record::{Field, Record, ValueKind};
pub use token::{ParseState, Token};
#[cfg(feature = "serde")]
pub use value::Fallback;
pub use value::{Decode, Encode, RawJson, from_slice, from_slice_with_options};

#[doc(hidden)]
pub mod __private {
    pub use crate::record::assert_wire_names;
}

/// Decodes a JSON object into a new `T`.
///
/// Fields missing from the input keep their `Default` value; keys with no
/// matching field are skipped.
///
/// # Errors
///
/// Any lexer, structural or conversion error, positioned in `input`, and
/// `TrailingCharacters` if anything but whitespace follows the object.
pub fn decode<T: Record + Default>(input: &[u8]) -> Result<T, Error> {
    decode_with_options(input, DecodeOptions::default())
}

/// [`decode`] with explicit options.
///
/// ```rust
/// # use jsonforge::{record, DecodeOptions, ErrorKind};
/// #[derive(Debug, Default)]
/// struct Ping { seq: u32 }
/// record!(Ping { seq: u32 => "seq" });
///
/// let strict = DecodeOptions { deny_unknown_fields: true, ..Default::default() };
/// let err = jsonforge::decode_with_options::<Ping>(br#"{"seq": 1, "x": 2}"#, strict)
///     .unwrap_err();
/// assert_eq!(err.kind(), &ErrorKind::UnknownField("x".into()));
/// ```
///
/// # Errors
///
/// As for [`decode`], plus whatever the options make fatal.
pub fn decode_with_options<T: Record + Default>(
    input: &[u8],
    options: DecodeOptions,
) -> Result<T, Error> {
    let mut value = T::default();
    decode_into_with_options(input, &mut value, options)?;
    Ok(value)
}

/// Decodes a JSON object into an existing value.
///
/// Only fields present in the input are touched. The decode is not
/// transactional: on error, fields decoded before the failure keep their new
/// values.
///
/// # Errors
///
/// As for [`decode`].
pub fn decode_into<T: Record + ?Sized>(input: &[u8], target: &mut T) -> Result<(), Error> {
    decode_into_with_options(input, target, DecodeOptions::default())
}

/// [`decode_into`] with explicit options.
///
/// # Errors
///
/// As for [`decode_with_options`].
pub fn decode_into_with_options<T: Record + ?Sized>(
    input: &[u8],
    target: &mut T,
    options: DecodeOptions,
) -> Result<(), Error> {
    let mut lexer = Lexer::with_options(input, options);
    target.decode_inline(&mut lexer, ParseState::ObjectStart)?;
    lexer.finish()
}
