//! Record descriptors and the [`record!`](crate::record!) macro that
//! generates them.
//!
//! A record is a struct whose JSON shape is fixed: an object with one key
//! per declared field. Its [`Field`] table is a `'static` constant, built at
//! compile time and never mutated, so any number of threads may decode the
//! same record type at once.
use crate::{
    encode::{self, EncodeBuffer},
    error::{EncodeError, Error},
    lexer::Lexer,
    machine::{self, RecordSink},
    token::{ParseState, Token},
};

/// Strategy class of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Signed or unsigned integer of any width.
    Integer,
    /// `f32` or `f64`.
    Float,
    /// `bool`
    Bool,
    /// `String` or `char`.
    String,
    /// `Vec<T>`
    Sequence,
    /// `BTreeMap<String, V>`
    Map,
    /// `Option<T>`: `null` when absent.
    Optional,
    /// Another record, decoded by its own descriptor.
    Record,
    /// Verbatim JSON text.
    Raw,
    /// A type handed to an external codec.
    Fallback,
}

/// Compile-time description of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Rust field name.
    pub name: &'static str,
    /// Key used on the wire.
    pub wire_name: &'static str,
    /// The encoded key with its quotes and trailing colon, e.g. `"id":`.
    pub key: &'static [u8],
    /// Strategy class of the field's type.
    pub kind: ValueKind,
    /// Elide the field on encode when its value is empty.
    pub omit_empty: bool,
    /// Encode the value inside a JSON string and accept it that way.
    pub stringify: bool,
}

/// A struct with a fixed JSON object shape.
///
/// Implemented by [`record!`](crate::record!); implement it by hand only to
/// control per-field dispatch directly.
pub trait Record {
    /// Type name, for diagnostics.
    const NAME: &'static str;

    /// Fields in declared order. Encoding follows this order.
    const FIELDS: &'static [Field];

    /// Decodes the value for `FIELDS[index]`, starting with `tok`.
    ///
    /// # Errors
    ///
    /// Whatever the field's strategy reports.
    fn decode_field(&mut self, index: usize, tok: Token, lexer: &mut Lexer<'_>)
    -> Result<(), Error>;

    /// Writes the value of `FIELDS[index]`, without its key.
    ///
    /// # Errors
    ///
    /// Whatever the field's strategy reports.
    fn encode_field(&self, index: usize, buf: &mut EncodeBuffer) -> Result<(), EncodeError>;

    /// Whether `FIELDS[index]` holds an empty value.
    fn field_is_empty(&self, index: usize) -> bool;

    /// Runs the object automaton over `lexer`, filling fields in place.
    ///
    /// Start with [`ParseState::ObjectStart`] to consume the opening `{`
    /// here, or with [`ParseState::WantKey`] when it has already been
    /// scanned, as when this record is nested inside another value.
    ///
    /// Decoding is not transactional: on error, fields decoded before the
    /// failure keep their new values.
    ///
    /// # Errors
    ///
    /// Structural errors from the automaton and any field decode error.
    fn decode_inline(&mut self, lexer: &mut Lexer<'_>, state: ParseState) -> Result<(), Error> {
        machine::decode_object(&mut RecordSink(self), lexer, state)
    }

    /// Writes this record as a JSON object.
    ///
    /// # Errors
    ///
    /// The first field encode error.
    fn encode_record(&self, buf: &mut EncodeBuffer) -> Result<(), EncodeError> {
        encode::encode_record(self, buf)
    }
}

const fn needs_escape(name: &str) -> bool {
    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x20 || b == b'"' || b == b'\\' {
            return true;
        }
        i += 1;
    }
    false
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Compile-time check run by [`record!`](crate::record!): wire names are
/// unique and can be written without escaping.
///
/// # Panics
///
/// During const evaluation, turning either violation into a build error.
#[doc(hidden)]
pub const fn assert_wire_names(names: &[&str]) {
    let mut i = 0;
    while i < names.len() {
        assert!(!needs_escape(names[i]), "record wire names must not need JSON escaping");
        let mut j = i + 1;
        while j < names.len() {
            assert!(!str_eq(names[i], names[j]), "duplicate wire name in record");
            j += 1;
        }
        i += 1;
    }
}

/// Whether `flag` appears among a field's options.
#[doc(hidden)]
#[macro_export]
macro_rules! __record_flag {
    ($flag:ident) => {
        false
    };
    (omitempty omitempty $($rest:ident)*) => {
        true
    };
    (string string $($rest:ident)*) => {
        true
    };
    ($flag:ident $other:ident $($rest:ident)*) => {
        $crate::__record_flag!($flag $($rest)*)
    };
}

/// Rejects unknown field options at compile time.
#[doc(hidden)]
#[macro_export]
macro_rules! __record_option {
    (omitempty) => {};
    (string) => {};
    ($other:ident) => {
        compile_error!(concat!(
            "unknown record field option `",
            stringify!($other),
            "`; expected `omitempty` or `string`"
        ));
    };
}

/// Implements [`Record`], [`Decode`](crate::Decode) and
/// [`Encode`](crate::Encode) for a struct.
///
/// Each field is listed with its type and wire name, optionally followed by
/// options in brackets:
///
/// - `omitempty`: leave the field out when its value is empty (zero, `false`,
///   `""`, `None`, an empty collection).
/// - `string`: write the value inside a JSON string, e.g. `"42"`, and accept
///   it that way.
///
/// Fields not listed are left untouched by decoding and never encoded.
///
/// ```rust
/// use jsonforge::record;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Hit {
///     id: i64,
///     method: String,
///     bytes: u64,
/// }
///
/// record!(Hit {
///     id: i64 => "id" [omitempty],
///     method: String => "meth",
///     bytes: u64 => "bytes" [string],
/// });
///
/// let hit: Hit = jsonforge::decode(br#"{"meth": "GET", "bytes": "512"}"#).unwrap();
/// assert_eq!(hit, Hit { id: 0, method: "GET".into(), bytes: 512 });
/// assert_eq!(
///     jsonforge::encode(&hit).unwrap(),
///     br#"{"meth":"GET","bytes":"512"}"#
/// );
/// ```
///
/// Wire names must be unique and free of characters that need escaping;
/// both are checked at compile time.
#[macro_export]
macro_rules! record {
    ($ty:ident {
        $( $field:ident : $fty:ty => $wire:literal $([ $($opt:ident),* $(,)? ])? ),* $(,)?
    }) => {
        const _: () = {
            $( $( $( $crate::__record_option!($opt); )* )? )*
            $crate::__private::assert_wire_names(&[$($wire),*]);
        };

        impl $crate::Record for $ty {
            const NAME: &'static str = stringify!($ty);

            const FIELDS: &'static [$crate::Field] = &[$(
                $crate::Field {
                    name: stringify!($field),
                    wire_name: $wire,
                    key: concat!("\"", $wire, "\":").as_bytes(),
                    kind: <$fty as $crate::Decode>::KIND,
                    omit_empty: $crate::__record_flag!(omitempty $($($opt)*)?),
                    stringify: $crate::__record_flag!(string $($($opt)*)?),
                },
            )*];

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn decode_field(
                &mut self,
                index: usize,
                tok: $crate::Token,
                lexer: &mut $crate::Lexer<'_>,
            ) -> ::core::result::Result<(), $crate::Error> {
                let mut slot = 0usize;
                $(
                    if index == slot {
                        return if $crate::__record_flag!(string $($($opt)*)?) {
                            $crate::Decode::decode_quoted(&mut self.$field, tok, lexer)
                        } else {
                            $crate::Decode::decode_value(&mut self.$field, tok, lexer)
                        };
                    }
                    slot += 1;
                )*
                lexer.skip_field(tok)
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn encode_field(
                &self,
                index: usize,
                buf: &mut $crate::EncodeBuffer,
            ) -> ::core::result::Result<(), $crate::EncodeError> {
                let mut slot = 0usize;
                $(
                    if index == slot {
                        return if $crate::__record_flag!(string $($($opt)*)?) {
                            $crate::Encode::encode_quoted(&self.$field, buf)
                        } else {
                            $crate::Encode::encode(&self.$field, buf)
                        };
                    }
                    slot += 1;
                )*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn field_is_empty(&self, index: usize) -> bool {
                let mut slot = 0usize;
                $(
                    if index == slot {
                        return $crate::Encode::is_empty_value(&self.$field);
                    }
                    slot += 1;
                )*
                true
            }
        }

        impl $crate::Decode for $ty {
            const KIND: $crate::ValueKind = $crate::ValueKind::Record;

            fn decode_value(
                &mut self,
                tok: $crate::Token,
                lexer: &mut $crate::Lexer<'_>,
            ) -> ::core::result::Result<(), $crate::Error> {
                match tok {
                    $crate::Token::LeftBrace => {
                        $crate::Record::decode_inline(self, lexer, $crate::ParseState::WantKey)
                    }
                    $crate::Token::Null => ::core::result::Result::Ok(()),
                    found => ::core::result::Result::Err(lexer.wrap_err(
                        $crate::ErrorKind::Mismatch {
                            target: stringify!($ty),
                            found,
                        },
                    )),
                }
            }
        }

        impl $crate::Encode for $ty {
            fn encode(
                &self,
                buf: &mut $crate::EncodeBuffer,
            ) -> ::core::result::Result<(), $crate::EncodeError> {
                $crate::Record::encode_record(self, buf)
            }
        }
    };
}
