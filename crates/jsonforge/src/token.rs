//! Token tags produced by the lexer and the parse states of the field state
//! machine.
use core::fmt;

/// A lexical token.
///
/// Tokens carry no payload: the bytes of the most recent token live in
/// [`Lexer::output`](crate::Lexer::output) until the next scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// No token scanned yet.
    Init,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// A quoted string without escape sequences.
    String,
    /// A quoted string that contained at least one escape sequence; the
    /// output holds the decoded payload.
    StringWithEscapes,
    /// A number without fraction or exponent.
    Integer,
    /// A number with a fraction and/or an exponent.
    Double,
    /// `true` or `false`
    Bool,
    /// `null`
    Null,
    /// `// ...` or `/* ... */`
    Comment,
    /// End of input.
    Eof,
    /// The lexer recorded an error; see [`Lexer::error`](crate::Lexer::error).
    Error,
}

impl Token {
    /// Whether this token can begin a JSON value.
    #[must_use]
    pub fn starts_value(self) -> bool {
        matches!(
            self,
            Token::LeftBrace
                | Token::LeftBracket
                | Token::Integer
                | Token::Double
                | Token::String
                | Token::StringWithEscapes
                | Token::Bool
                | Token::Null
        )
    }

    /// Whether this token is one of the two string variants.
    #[must_use]
    pub fn is_string(self) -> bool {
        matches!(self, Token::String | Token::StringWithEscapes)
    }

    /// The closing token matching an opening brace or bracket.
    #[must_use]
    pub fn closer(self) -> Option<Token> {
        match self {
            Token::LeftBrace => Some(Token::RightBrace),
            Token::LeftBracket => Some(Token::RightBracket),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Token::Init => "tok:init",
            Token::LeftBrace => "tok:left_brace",
            Token::RightBrace => "tok:right_brace",
            Token::LeftBracket => "tok:left_bracket",
            Token::RightBracket => "tok:right_bracket",
            Token::Colon => "tok:colon",
            Token::Comma => "tok:comma",
            Token::String => "tok:string",
            Token::StringWithEscapes => "tok:string_with_escapes",
            Token::Integer => "tok:integer",
            Token::Double => "tok:double",
            Token::Bool => "tok:bool",
            Token::Null => "tok:null",
            Token::Comment => "tok:comment",
            Token::Eof => "tok:eof",
            Token::Error => "tok:error",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position of the field state machine inside one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseState {
    /// Before the opening `{`.
    ObjectStart,
    /// After `{` or `,`: a key or `}` is next.
    WantKey,
    /// After a key: `:` is next.
    WantColon,
    /// After `:`: a value is next.
    WantValue,
    /// After a value: `,` or `}` is next.
    AfterValue,
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseState::ObjectStart => "map:start",
            ParseState::WantKey => "want_key",
            ParseState::WantColon => "want_colon",
            ParseState::WantValue => "want_value",
            ParseState::AfterValue => "after_value",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Token;

    #[test]
    fn both_string_variants_are_strings() {
        assert!(Token::String.is_string());
        assert!(Token::StringWithEscapes.is_string());
        assert!(!Token::Null.is_string());
        assert!(!Token::Colon.is_string());
        assert!(Token::StringWithEscapes.starts_value());
        assert!(!Token::Comma.starts_value());
    }
}
