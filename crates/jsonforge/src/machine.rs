//! The object automaton shared by every record type and by string-keyed
//! maps.
//!
//! ```text
//!   ObjectStart --{--> WantKey --key--> WantColon --:--> WantValue
//!                       ^   |                                |
//!                       |   }--> done                      value
//!                       |                                    v
//!                       +-------------,------------------ AfterValue --}--> done
//! ```
//!
//! The loop is identical for every object; an [`ObjectSink`] supplies the
//! key lookup and the per-entry decode. Any (state, token) pair not listed
//! above fails the decode.
use alloc::string::String;

use bstr::ByteSlice;

use crate::{
    error::{Error, ErrorKind},
    lexer::Lexer,
    record::Record,
    token::{ParseState, Token},
};

/// Receiver for the entries of one JSON object.
pub(crate) trait ObjectSink {
    /// Identifies a matched key between the key and value tokens.
    type Key;

    /// Looks up the key held in the lexer output. `None` marks the key as
    /// unknown; its value is skipped.
    fn match_key(&mut self, lexer: &Lexer<'_>) -> Result<Option<Self::Key>, Error>;

    /// Decodes the value for `key`, starting with the token just scanned.
    fn decode_entry(&mut self, key: Self::Key, tok: Token, lexer: &mut Lexer<'_>)
    -> Result<(), Error>;
}

fn wrong_token(lexer: &Lexer<'_>, expected: Token, found: Token) -> Error {
    lexer.wrap_err(ErrorKind::WrongToken { expected, found })
}

/// Drives `lexer` through one object, starting in `state`.
///
/// Start in [`ParseState::ObjectStart`] for a standalone object, or in
/// [`ParseState::WantKey`] when the caller has already consumed the `{`.
/// The object counts as one nesting level until it returns.
pub(crate) fn decode_object<S: ObjectSink>(
    sink: &mut S,
    lexer: &mut Lexer<'_>,
    state: ParseState,
) -> Result<(), Error> {
    lexer.enter_container()?;
    let result = walk_object(sink, lexer, state);
    lexer.leave_container();
    result
}

fn walk_object<S: ObjectSink>(
    sink: &mut S,
    lexer: &mut Lexer<'_>,
    mut state: ParseState,
) -> Result<(), Error> {
    let mut current: Option<S::Key> = None;

    loop {
        let tok = lexer.next_token();
        if tok == Token::Error {
            return Err(lexer.take_error());
        }
        tracing::trace!(%state, %tok, "object transition");

        state = match state {
            ParseState::ObjectStart => match tok {
                Token::LeftBrace => ParseState::WantKey,
                found => return Err(wrong_token(lexer, Token::LeftBrace, found)),
            },
            ParseState::WantKey => match tok {
                Token::RightBrace => return Ok(()),
                t if t.is_string() => {
                    current = sink.match_key(lexer)?;
                    if current.is_none() {
                        unknown_key(lexer)?;
                    }
                    ParseState::WantColon
                }
                found => return Err(wrong_token(lexer, Token::String, found)),
            },
            ParseState::WantColon => match tok {
                Token::Colon => ParseState::WantValue,
                found => return Err(wrong_token(lexer, Token::Colon, found)),
            },
            ParseState::WantValue => {
                if !tok.starts_value() {
                    return Err(lexer.wrap_err(ErrorKind::WantedValueToken(tok)));
                }
                match current.take() {
                    Some(key) => sink.decode_entry(key, tok, lexer)?,
                    None => lexer.skip_field(tok)?,
                }
                ParseState::AfterValue
            }
            ParseState::AfterValue => match tok {
                Token::Comma => ParseState::WantKey,
                Token::RightBrace => return Ok(()),
                found => return Err(wrong_token(lexer, Token::Comma, found)),
            },
        };
    }
}

fn unknown_key(lexer: &Lexer<'_>) -> Result<(), Error> {
    let key = lexer.output().as_bstr();
    if lexer.options().deny_unknown_fields {
        tracing::debug!(%key, "rejecting unknown field");
        return Err(lexer.wrap_err(ErrorKind::UnknownField(String::from_utf8_lossy(key).into_owned())));
    }
    tracing::trace!(%key, "skipping unknown field");
    Ok(())
}

/// Adapts a [`Record`] to the automaton: keys resolve to field indexes.
pub(crate) struct RecordSink<'r, R: ?Sized>(pub &'r mut R);

impl<R: Record + ?Sized> ObjectSink for RecordSink<'_, R> {
    type Key = usize;

    /// Exact byte comparison first; failing that, an ASCII case-insensitive
    /// match, so `"originid"` still fills a field named `"OriginId"`.
    fn match_key(&mut self, lexer: &Lexer<'_>) -> Result<Option<usize>, Error> {
        let key = lexer.output();
        let fields = R::FIELDS;
        let exact = fields.iter().position(|f| {
            f.wire_name.len() == key.len()
                && f.wire_name.as_bytes().first() == key.first()
                && f.wire_name.as_bytes() == key
        });
        Ok(exact.or_else(|| {
            fields
                .iter()
                .position(|f| f.wire_name.as_bytes().eq_ignore_ascii_case(key))
        }))
    }

    fn decode_entry(&mut self, index: usize, tok: Token, lexer: &mut Lexer<'_>) -> Result<(), Error> {
        self.0.decode_field(index, tok, lexer)
    }
}
