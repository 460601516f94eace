//! The tokenizer.
//!
//! [`Lexer::scan`] produces one [`Token`] per call and leaves the token's
//! bytes in [`Lexer::output`]: string payloads with escapes decoded, number
//! and literal text as written. The output is overwritten by the next scan
//! except while a container is being captured verbatim, when every byte
//! (whitespace included) is appended instead.
//!
//! Errors never unwind out of `scan`: the lexer records an [`ErrorKind`] and
//! returns [`Token::Error`]. Callers check for that token after every scan and
//! turn the recorded kind into a positioned [`Error`] with
//! [`Lexer::take_error`].
use alloc::vec::Vec;
use core::mem;

use bstr::ByteSlice;

use crate::{
    encode,
    error::{Error, ErrorKind, ReadError},
    options::DecodeOptions,
    reader::{ByteReader, is_whitespace},
    token::Token,
};

const TRUE_REST: &[u8] = b"rue";
const FALSE_REST: &[u8] = b"alse";
const NULL_REST: &[u8] = b"ull";

/// What the container scanner accepts next. Objects take a trailing comma
/// like the typed decoder does; arrays do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    KeyOrClose,
    Colon,
    Value,
    ValueOrClose,
    CommaOrClose,
}

impl Expect {
    fn opened(start: Token) -> Self {
        if start == Token::LeftBrace {
            Expect::KeyOrClose
        } else {
            Expect::ValueOrClose
        }
    }
}

/// Byte-level JSON tokenizer over a borrowed input buffer.
///
/// One lexer serves one top-level decode call; nested decoders share it.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    reader: ByteReader<'a>,
    output: Vec<u8>,
    token: Token,
    error: Option<ErrorKind>,
    capture_all: bool,
    closers: Vec<Token>,
    depth: usize,
    options: DecodeOptions,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer with default options.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, DecodeOptions::default())
    }

    /// Creates a lexer with the given options.
    #[must_use]
    pub fn with_options(input: &'a [u8], options: DecodeOptions) -> Self {
        Self {
            reader: ByteReader::new(input),
            output: Vec::with_capacity(64),
            token: Token::Init,
            error: None,
            capture_all: false,
            closers: Vec::new(),
            depth: 0,
            options,
        }
    }

    /// The last token produced.
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Raw bytes of the last token. Valid until the next scan.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// The error recorded by the last scan that returned [`Token::Error`].
    #[must_use]
    pub fn error(&self) -> Option<&ErrorKind> {
        self.error.as_ref()
    }

    /// Options this lexer was created with.
    #[must_use]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Objects and arrays currently open in typed decoding.
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// Counts one more open container against
    /// [`DecodeOptions::max_depth`].
    pub(crate) fn enter_container(&mut self) -> Result<(), Error> {
        if self.depth >= self.options.max_depth {
            return Err(self.wrap_err(ErrorKind::DepthLimitExceeded(self.options.max_depth)));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave_container(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Current byte offset into the input.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.reader.pos()
    }

    /// Attaches the current position to `kind`.
    #[must_use]
    pub fn wrap_err(&self, kind: ErrorKind) -> Error {
        tracing::debug!(pos = self.reader.pos(), error = %kind, "decode failed");
        Error::at(kind, self.reader.input(), self.reader.pos())
    }

    /// Takes the recorded lexer error and attaches the current position.
    #[must_use]
    pub fn take_error(&mut self) -> Error {
        let kind = self.error.take().unwrap_or(ErrorKind::Io(ReadError::Io));
        self.wrap_err(kind)
    }

    /// The output interpreted as UTF-8 text.
    ///
    /// # Errors
    ///
    /// `InvalidUtf8` if the token bytes are not valid UTF-8.
    pub fn output_str(&self) -> Result<&str, Error> {
        self.output
            .to_str()
            .map_err(|_| self.wrap_err(ErrorKind::InvalidUtf8))
    }

    fn fail(&mut self, kind: ErrorKind) -> Token {
        self.error = Some(kind);
        Token::Error
    }

    #[inline]
    fn scan_read_byte(&mut self) -> Result<u8, ReadError> {
        if self.capture_all {
            self.reader.read_byte()
        } else {
            self.reader.read_byte_skip_ws()
        }
    }

    /// Scans the next token.
    pub fn scan(&mut self) -> Token {
        if !self.capture_all {
            self.output.clear();
        }
        self.token = Token::Init;

        let tok = loop {
            let c = match self.scan_read_byte() {
                Ok(c) => c,
                Err(ReadError::Eof) => break Token::Eof,
                Err(e) => break self.fail(ErrorKind::Io(e)),
            };
            match c {
                b'{' => break self.structural(c, Token::LeftBrace),
                b'}' => break self.structural(c, Token::RightBrace),
                b'[' => break self.structural(c, Token::LeftBracket),
                b']' => break self.structural(c, Token::RightBracket),
                b',' => break self.structural(c, Token::Comma),
                b':' => break self.structural(c, Token::Colon),
                b't' => break self.want_bytes(c, TRUE_REST, Token::Bool),
                b'f' => break self.want_bytes(c, FALSE_REST, Token::Bool),
                b'n' => break self.want_bytes(c, NULL_REST, Token::Null),
                b'"' => break self.lex_string(),
                b'-' | b'0'..=b'9' => {
                    self.reader.unread_byte();
                    break self.lex_number();
                }
                b'/' => break self.lex_comment(),
                // Only reachable while capturing.
                _ if is_whitespace(c) => self.output.push(c),
                _ => break self.fail(ErrorKind::InvalidChar(c)),
            }
        };

        self.token = tok;
        tok
    }

    /// Scans the next token, applying the comment policy from
    /// [`DecodeOptions::allow_comments`].
    pub fn next_token(&mut self) -> Token {
        loop {
            let tok = self.scan();
            if tok != Token::Comment {
                return tok;
            }
            if !self.options.allow_comments {
                self.token = self.fail(ErrorKind::UnallowedComment);
                return Token::Error;
            }
        }
    }

    fn structural(&mut self, c: u8, tok: Token) -> Token {
        if self.capture_all {
            self.output.push(c);
        }
        tok
    }

    fn want_bytes(&mut self, first: u8, rest: &[u8], tok: Token) -> Token {
        self.output.push(first);
        for &want in rest {
            match self.reader.read_byte() {
                Ok(c) if c == want => self.output.push(c),
                Ok(_) => {
                    self.reader.unread_byte();
                    return self.fail(ErrorKind::InvalidString);
                }
                Err(_) => return self.fail(ErrorKind::InvalidString),
            }
        }
        tok
    }

    fn lex_string(&mut self) -> Token {
        if self.capture_all {
            self.output.push(b'"');
        }
        match self
            .reader
            .slice_quoted_string(&mut self.output, self.capture_all)
        {
            Ok(escaped) => {
                if self.capture_all {
                    self.output.push(b'"');
                }
                if escaped {
                    Token::StringWithEscapes
                } else {
                    Token::String
                }
            }
            Err(kind) => self.fail(kind),
        }
    }

    #[inline]
    fn num_byte(&mut self) -> Option<u8> {
        self.reader.read_byte().ok()
    }

    /// Pushes digits while they last; returns the first non-digit byte and
    /// the number of digits consumed.
    fn lex_digits(&mut self, mut c: Option<u8>) -> (Option<u8>, usize) {
        let mut n = 0;
        while let Some(d @ b'0'..=b'9') = c {
            self.output.push(d);
            n += 1;
            c = self.num_byte();
        }
        (c, n)
    }

    /// Rewinds the one byte read past the end of the number, if any.
    fn unread_lookahead(&mut self, c: Option<u8>) {
        if c.is_some() {
            self.reader.unread_byte();
        }
    }

    fn lex_number(&mut self) -> Token {
        let mut tok = Token::Integer;
        let mut c = self.num_byte();

        if c == Some(b'-') {
            self.output.push(b'-');
            c = self.num_byte();
        }

        match c {
            Some(b'0') => {
                self.output.push(b'0');
                c = self.num_byte();
            }
            Some(b'1'..=b'9') => c = self.lex_digits(c).0,
            _ => {
                self.unread_lookahead(c);
                return self.fail(ErrorKind::MissingIntegerAfterMinus);
            }
        }

        if c == Some(b'.') {
            self.output.push(b'.');
            let first = self.num_byte();
            let (next, n) = self.lex_digits(first);
            c = next;
            if n == 0 {
                self.unread_lookahead(c);
                return self.fail(ErrorKind::MissingIntegerAfterDecimal);
            }
            tok = Token::Double;
        }

        if let Some(e @ (b'e' | b'E')) = c {
            self.output.push(e);
            c = self.num_byte();
            if let Some(sign @ (b'+' | b'-')) = c {
                self.output.push(sign);
                c = self.num_byte();
            }
            let (next, n) = self.lex_digits(c);
            c = next;
            if n == 0 {
                self.unread_lookahead(c);
                return self.fail(ErrorKind::MissingIntegerAfterExponent);
            }
            tok = Token::Double;
        }

        self.unread_lookahead(c);
        tok
    }

    fn lex_comment(&mut self) -> Token {
        match self.reader.read_byte() {
            Ok(b'/') => loop {
                match self.reader.read_byte() {
                    Ok(b'\n') | Err(ReadError::Eof) => return Token::Comment,
                    Ok(_) => {}
                    Err(e) => return self.fail(ErrorKind::Io(e)),
                }
            },
            Ok(b'*') => loop {
                match self.reader.read_byte() {
                    Ok(b'*') => match self.reader.read_byte() {
                        Ok(b'/') => return Token::Comment,
                        Ok(_) => self.reader.unread_byte(),
                        Err(_) => return self.fail(ErrorKind::IncompleteComment),
                    },
                    Ok(_) => {}
                    Err(_) => return self.fail(ErrorKind::IncompleteComment),
                }
            },
            Ok(_) => {
                self.reader.unread_byte();
                self.fail(ErrorKind::IncompleteComment)
            }
            Err(_) => self.fail(ErrorKind::IncompleteComment),
        }
    }

    /// Consumes the value opened by `start` (the token just scanned) and
    /// returns it as JSON text.
    ///
    /// Containers are returned byte for byte as written in the input, after
    /// the same token order checks the typed decoder applies. A
    /// scalar string is re-encoded as a quoted JSON string; other scalars are
    /// returned as scanned.
    ///
    /// # Errors
    ///
    /// `UnterminatedContainer` if the input ends first, `WrongToken` for a
    /// mismatched closer or a missing `:` or `,`, `WantedValueToken` where a
    /// value is missing, any lexer error met on the way, and `InvalidCapture`
    /// if `start` cannot begin a value.
    pub fn capture_field(&mut self, start: Token) -> Result<&[u8], Error> {
        self.scan_field(start, true)?;
        Ok(&self.output)
    }

    /// Consumes and discards the value opened by `start`.
    ///
    /// # Errors
    ///
    /// As for [`Lexer::capture_field`].
    pub fn skip_field(&mut self, start: Token) -> Result<(), Error> {
        self.scan_field(start, false)
    }

    fn scan_field(&mut self, start: Token, capture: bool) -> Result<(), Error> {
        match start {
            Token::LeftBrace | Token::LeftBracket => {
                if capture {
                    self.output.clear();
                    self.output
                        .push(if start == Token::LeftBrace { b'{' } else { b'[' });
                    self.capture_all = true;
                }
                let result = self.scan_container(start);
                self.capture_all = false;
                self.closers.clear();
                result.map_err(|kind| self.wrap_err(kind))
            }
            Token::Bool | Token::Null | Token::Integer | Token::Double => Ok(()),
            Token::String | Token::StringWithEscapes => {
                if capture {
                    let payload = mem::take(&mut self.output);
                    encode::write_escaped(&mut self.output, &payload);
                }
                Ok(())
            }
            other => Err(self.wrap_err(ErrorKind::InvalidCapture(other))),
        }
    }

    fn scan_container(&mut self, start: Token) -> Result<(), ErrorKind> {
        self.closers.clear();
        self.closers.extend(start.closer());
        let mut expect = Expect::opened(start);
        loop {
            let tok = self.next_token();
            expect = match (expect, tok) {
                (_, Token::Eof) => return Err(ErrorKind::UnterminatedContainer(start)),
                (_, Token::Error) => {
                    return Err(self.error.take().unwrap_or(ErrorKind::Io(ReadError::Io)));
                }
                (
                    Expect::KeyOrClose | Expect::ValueOrClose | Expect::CommaOrClose,
                    Token::RightBrace | Token::RightBracket,
                ) => {
                    let expected = self.closers.pop().unwrap_or(tok);
                    if expected != tok {
                        return Err(ErrorKind::WrongToken {
                            expected,
                            found: tok,
                        });
                    }
                    if self.closers.is_empty() {
                        return Ok(());
                    }
                    Expect::CommaOrClose
                }
                (Expect::KeyOrClose, t) if t.is_string() => Expect::Colon,
                (Expect::Colon, Token::Colon) => Expect::Value,
                (Expect::Value | Expect::ValueOrClose, Token::LeftBrace | Token::LeftBracket) => {
                    self.closers.extend(tok.closer());
                    Expect::opened(tok)
                }
                (Expect::Value | Expect::ValueOrClose, t) if t.starts_value() => {
                    Expect::CommaOrClose
                }
                (Expect::CommaOrClose, Token::Comma) => {
                    if self.closers.last() == Some(&Token::RightBrace) {
                        Expect::KeyOrClose
                    } else {
                        Expect::Value
                    }
                }
                (Expect::Value | Expect::ValueOrClose, found) => {
                    return Err(ErrorKind::WantedValueToken(found));
                }
                (Expect::KeyOrClose, found) => {
                    return Err(ErrorKind::WrongToken {
                        expected: Token::String,
                        found,
                    });
                }
                (Expect::Colon, found) => {
                    return Err(ErrorKind::WrongToken {
                        expected: Token::Colon,
                        found,
                    });
                }
                (Expect::CommaOrClose, found) => {
                    return Err(ErrorKind::WrongToken {
                        expected: Token::Comma,
                        found,
                    });
                }
            };
        }
    }

    /// Requires that only whitespace remains, unless
    /// [`DecodeOptions::allow_trailing_data`] is set.
    ///
    /// # Errors
    ///
    /// `TrailingCharacters` if another token follows, or the lexer error met
    /// while looking for one.
    pub fn finish(&mut self) -> Result<(), Error> {
        if self.options.allow_trailing_data {
            return Ok(());
        }
        match self.next_token() {
            Token::Eof => Ok(()),
            Token::Error => Err(self.take_error()),
            _ => Err(self.wrap_err(ErrorKind::TrailingCharacters)),
        }
    }
}
