use super::{Decode, Encode, mismatch};
use crate::{
    encode::EncodeBuffer,
    error::{EncodeError, Error, ErrorKind},
    lexer::Lexer,
    numbers,
    record::ValueKind,
    token::Token,
};

macro_rules! impl_integer {
    ($parse:ident, $format:ident, $wide:ty => $($t:ty),+) => {$(
        impl Decode for $t {
            const KIND: ValueKind = ValueKind::Integer;

            fn decode_value(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
                match tok {
                    Token::Integer => {
                        *self = numbers::$parse::<$t>(lexer.output(), stringify!($t))
                            .map_err(|e| lexer.wrap_err(ErrorKind::Number(e)))?;
                        Ok(())
                    }
                    Token::Null => Ok(()),
                    other => Err(mismatch::<$t>(lexer, other)),
                }
            }
        }

        impl Encode for $t {
            #[allow(clippy::cast_lossless, clippy::cast_possible_wrap)]
            fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
                numbers::$format(buf.bytes_mut(), *self as $wide);
                Ok(())
            }

            fn is_empty_value(&self) -> bool {
                *self == 0
            }

            fn encode_quoted(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
                buf.push(b'"');
                self.encode(buf)?;
                buf.push(b'"');
                Ok(())
            }
        }
    )+};
}

impl_integer!(parse_signed, format_i64, i64 => i8, i16, i32, i64, isize);
impl_integer!(parse_unsigned, format_u64, u64 => u8, u16, u32, u64, usize);

macro_rules! impl_float {
    ($t:ty, $parse:ident, $format:ident) => {
        impl Decode for $t {
            const KIND: ValueKind = ValueKind::Float;

            fn decode_value(&mut self, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
                match tok {
                    Token::Integer | Token::Double => {
                        *self = numbers::$parse(lexer.output())
                            .map_err(|e| lexer.wrap_err(ErrorKind::Number(e)))?;
                        Ok(())
                    }
                    Token::Null => Ok(()),
                    other => Err(mismatch::<$t>(lexer, other)),
                }
            }
        }

        impl Encode for $t {
            fn encode(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
                numbers::$format(buf.bytes_mut(), *self)
            }

            fn is_empty_value(&self) -> bool {
                *self == 0.0
            }

            fn encode_quoted(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
                buf.push(b'"');
                self.encode(buf)?;
                buf.push(b'"');
                Ok(())
            }
        }
    };
}

impl_float!(f64, parse_f64, format_f64);
impl_float!(f32, parse_f32, format_f32);
