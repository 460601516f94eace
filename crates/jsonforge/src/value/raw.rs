use alloc::vec::Vec;

use bstr::BStr;

use super::{Decode, Encode};
use crate::{
    encode::EncodeBuffer,
    error::{EncodeError, Error},
    lexer::Lexer,
    record::ValueKind,
    token::Token,
};

/// A JSON value kept as text.
///
/// Decoding captures the value exactly as it appears in the input, nested
/// whitespace and escapes included. Captured containers are checked token by
/// token, so `[1 2]` or `{"a" 1}` fail the decode rather than being kept.
/// Encoding writes the bytes back unchanged; an empty `RawJson` encodes as
/// `null`. Bytes assigned to the field directly are not validated.
///
/// ```rust
/// use jsonforge::RawJson;
///
/// let raw: RawJson = jsonforge::from_slice(br#"{"a": [1, 2]}"#).unwrap();
/// assert_eq!(raw.as_bytes(), br#"{"a": [1, 2]}"#);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct RawJson(pub Vec<u8>);

impl RawJson {
    /// The captured JSON text.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for RawJson {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("RawJson").field(&BStr::new(&self.0)).finish()
    }
}

impl Decode for RawJson {
    const KIND: ValueKind = ValueKind::Raw;

    fn decode_value(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
        let captured = lexer.capture_field(tok)?;
        self.0.clear();
        self.0.extend_from_slice(captured);
        Ok(())
    }
}

impl Encode for RawJson {
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        if self.0.is_empty() {
            buf.extend_from_slice(b"null");
        } else {
            buf.extend_from_slice(&self.0);
        }
        Ok(())
    }

    fn is_empty_value(&self) -> bool {
        self.0.is_empty()
    }
}

/// Adapter for types with no native strategy: the value is captured as JSON
/// text and handed to `serde_json`.
///
/// ```rust
/// use jsonforge::Fallback;
///
/// #[derive(Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let p: Fallback<Point> = jsonforge::from_slice(br#"{"x": 1, "y": 2}"#).unwrap();
/// assert_eq!(p.0, Point { x: 1, y: 2 });
/// assert_eq!(jsonforge::encode(&p).unwrap(), br#"{"x":1,"y":2}"#);
/// ```
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fallback<T>(pub T);

#[cfg(feature = "serde")]
impl<T: serde::de::DeserializeOwned> Decode for Fallback<T> {
    const KIND: ValueKind = ValueKind::Fallback;

    fn decode_value(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
        use alloc::string::ToString;

        let captured = lexer.capture_field(tok)?;
        match serde_json::from_slice(captured) {
            Ok(v) => {
                self.0 = v;
                Ok(())
            }
            Err(e) => Err(lexer.wrap_err(crate::ErrorKind::Custom(e.to_string()))),
        }
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> Encode for Fallback<T> {
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        use alloc::string::ToString;

        let bytes = serde_json::to_vec(&self.0).map_err(|e| EncodeError::Custom(e.to_string()))?;
        buf.extend_from_slice(&bytes);
        Ok(())
    }
}
