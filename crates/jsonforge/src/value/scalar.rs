use alloc::{borrow::ToOwned, string::String};

use super::{Decode, Encode, mismatch};
use crate::{
    encode::EncodeBuffer,
    error::{EncodeError, Error, ErrorKind},
    lexer::Lexer,
    record::ValueKind,
    token::Token,
};

impl Decode for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn decode_value(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
        match tok {
            Token::Bool => {
                *self = lexer.output() == b"true";
                Ok(())
            }
            Token::Null => Ok(()),
            other => Err(mismatch::<bool>(lexer, other)),
        }
    }
}

impl Encode for bool {
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        buf.extend_from_slice(if *self { b"true" } else { b"false" });
        Ok(())
    }

    fn is_empty_value(&self) -> bool {
        !*self
    }

    fn encode_quoted(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        buf.extend_from_slice(if *self { b"\"true\"" } else { b"\"false\"" });
        Ok(())
    }
}

impl Decode for String {
    const KIND: ValueKind = ValueKind::String;

    fn decode_value(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
        match tok {
            Token::String | Token::StringWithEscapes => {
                let s = lexer.output_str()?;
                self.clear();
                self.push_str(s);
                Ok(())
            }
            Token::Null => Ok(()),
            other => Err(mismatch::<String>(lexer, other)),
        }
    }
}

impl Encode for String {
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        buf.write_json_string(self);
        Ok(())
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl Encode for str {
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        buf.write_json_string(self);
        Ok(())
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl Decode for char {
    const KIND: ValueKind = ValueKind::String;

    fn decode_value(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
        match tok {
            Token::String | Token::StringWithEscapes => {
                let mut chars = lexer.output_str()?.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        *self = c;
                        Ok(())
                    }
                    _ => Err(lexer.wrap_err(ErrorKind::Custom(
                        "expected a string holding exactly one character".to_owned(),
                    ))),
                }
            }
            Token::Null => Ok(()),
            other => Err(mismatch::<char>(lexer, other)),
        }
    }
}

impl Encode for char {
    fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        let mut tmp = [0u8; 4];
        buf.write_json_string(self.encode_utf8(&mut tmp));
        Ok(())
    }

    fn is_empty_value(&self) -> bool {
        *self == '\0'
    }
}
