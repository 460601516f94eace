use alloc::{boxed::Box, collections::BTreeMap, string::String, vec::Vec};

use super::{Decode, Encode, expect_value, mismatch};
use crate::{
    encode::EncodeBuffer,
    error::{EncodeError, Error, ErrorKind},
    lexer::Lexer,
    machine::{self, ObjectSink},
    record::ValueKind,
    token::{ParseState, Token},
};

impl<T: Decode + Default> Decode for Option<T> {
    const KIND: ValueKind = ValueKind::Optional;

    fn decode_value(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
        if tok == Token::Null {
            *self = None;
            return Ok(());
        }
        self.get_or_insert_with(T::default).decode_value(tok, lexer)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        match self {
            Some(v) => v.encode(buf),
            None => {
                buf.extend_from_slice(b"null");
                Ok(())
            }
        }
    }

    fn is_empty_value(&self) -> bool {
        self.is_none()
    }

    fn encode_quoted(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        match self {
            Some(v) => v.encode_quoted(buf),
            None => self.encode(buf),
        }
    }
}

impl<T: Decode + ?Sized> Decode for Box<T> {
    const KIND: ValueKind = T::KIND;

    fn decode_value(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
        (**self).decode_value(tok, lexer)
    }

    fn decode_quoted(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
        (**self).decode_quoted(tok, lexer)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
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

impl<T: Decode + Default> Decode for Vec<T> {
    const KIND: ValueKind = ValueKind::Sequence;

    /// Elements and commas must alternate strictly: `[,]`, `[1,]` and `[1 2]`
    /// are all rejected.
    fn decode_value(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
        match tok {
            Token::Null => {
                self.clear();
                return Ok(());
            }
            Token::LeftBracket => self.clear(),
            other => return Err(mismatch::<Self>(lexer, other)),
        }

        lexer.enter_container()?;
        let result = decode_elements(self, lexer);
        lexer.leave_container();
        result
    }
}

fn decode_elements<T: Decode + Default>(
    items: &mut Vec<T>,
    lexer: &mut Lexer<'_>,
) -> Result<(), Error> {
    let mut tok = lexer.next_token();
    if tok == Token::RightBracket {
        return Ok(());
    }
    loop {
        match tok {
            Token::Error => return Err(lexer.take_error()),
            t if t.starts_value() => {}
            t => return Err(lexer.wrap_err(ErrorKind::WantedValueToken(t))),
        }
        let mut elem = T::default();
        elem.decode_value(tok, lexer)?;
        items.push(elem);

        match lexer.next_token() {
            Token::Comma => tok = expect_value(lexer)?,
            Token::RightBracket => return Ok(()),
            Token::Error => return Err(lexer.take_error()),
            found => {
                return Err(lexer.wrap_err(ErrorKind::WrongToken {
                    expected: Token::Comma,
                    found,
                }));
            }
        }
    }
}

fn encode_seq<T: Encode>(items: &[T], buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
    buf.push(b'[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        item.encode(buf)?;
    }
    buf.push(b']');
    Ok(())
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        encode_seq(self, buf)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        encode_seq(self, buf)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

/// Map entries are decoded by the shared object automaton, with the key
/// text as the map key.
struct MapSink<'m, V>(&'m mut BTreeMap<String, V>);

impl<V: Decode + Default> ObjectSink for MapSink<'_, V> {
    type Key = String;

    fn match_key(&mut self, lexer: &Lexer<'_>) -> Result<Option<String>, Error> {
        Ok(Some(String::from(lexer.output_str()?)))
    }

    fn decode_entry(
        &mut self,
        key: String,
        tok: Token,
        lexer: &mut Lexer<'_>,
    ) -> Result<(), Error> {
        self.0.entry(key).or_default().decode_value(tok, lexer)
    }
}

/// Existing entries are kept; keys present in the input overwrite them.
impl<V: Decode + Default> Decode for BTreeMap<String, V> {
    const KIND: ValueKind = ValueKind::Map;

    fn decode_value(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
        match tok {
            Token::Null => {
                self.clear();
                Ok(())
            }
            Token::LeftBrace => {
                machine::decode_object(&mut MapSink(self), lexer, ParseState::WantKey)
            }
            other => Err(mismatch::<Self>(lexer, other)),
        }
    }
}

impl<V: Encode> Encode for BTreeMap<String, V> {
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        buf.push(b'{');
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                buf.push(b',');
            }
            buf.write_json_string(key);
            buf.push(b':');
            value.encode(buf)?;
        }
        buf.push(b'}');
        Ok(())
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{boxed::Box, collections::BTreeMap, string::String, vec, vec::Vec};

    use rstest::rstest;

    use crate::{ErrorKind, Token, encode, from_slice};

    #[test]
    fn option_null_and_value() {
        assert_eq!(from_slice::<Option<u32>>(b"null"), Ok(None));
        assert_eq!(from_slice::<Option<u32>>(b"22"), Ok(Some(22)));
        assert_eq!(encode(&None::<String>).unwrap(), b"null");
    }

    #[test]
    fn nested_vectors() {
        let v: Vec<Vec<i8>> = from_slice(b"[[1, -2], [], [3]]").unwrap();
        assert_eq!(v, vec![vec![1, -2], vec![], vec![3]]);
        assert_eq!(encode(&v).unwrap(), b"[[1,-2],[],[3]]");
    }

    #[test]
    fn vec_null_clears() {
        let mut v = vec![1u8, 2];
        let mut lexer = crate::Lexer::new(b"null");
        let tok = lexer.scan();
        crate::Decode::decode_value(&mut v, tok, &mut lexer).unwrap();
        assert!(v.is_empty());
    }

    #[rstest]
    #[case(b"[,]", ErrorKind::WantedValueToken(Token::Comma))]
    #[case(b"[1,]", ErrorKind::WantedValueToken(Token::RightBracket))]
    #[case(b"[1 2]", ErrorKind::WrongToken { expected: Token::Comma, found: Token::Integer })]
    #[case(b"[1", ErrorKind::WrongToken { expected: Token::Comma, found: Token::Eof })]
    fn strict_array_grammar(#[case] input: &[u8], #[case] kind: ErrorKind) {
        assert_eq!(from_slice::<Vec<u8>>(input).unwrap_err().into_kind(), kind);
    }

    #[test]
    fn vec_rejects_object() {
        let err = from_slice::<Vec<u8>>(b"{}").unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::Mismatch {
                found: Token::LeftBrace,
                ..
            }
        ));
    }

    #[test]
    fn maps_round_trip_in_key_order() {
        let m: BTreeMap<String, Vec<bool>> =
            from_slice(br#"{"b": [true], "a": [], "c\n": [false, true]}"#).unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m["c\n"], [false, true]);
        assert_eq!(
            encode(&m).unwrap(),
            br#"{"a":[],"b":[true],"c\n":[false,true]}"#
        );
    }

    #[test]
    fn map_values_merge_by_key() {
        let m: BTreeMap<String, u8> = from_slice(br#"{"a": 1, "a": 2}"#).unwrap();
        assert_eq!(m["a"], 2);
    }

    #[test]
    fn boxed_values_delegate() {
        let b: Box<Option<String>> = from_slice(br#""x""#).unwrap();
        assert_eq!(*b, Some(String::from("x")));
        assert_eq!(encode(&b).unwrap(), br#""x""#);
    }
}
