#![expect(missing_docs)]

// Inputs every conforming parser must reject, checked against `serde_json`
// as a second opinion. Cases adapted from the jansson invalid suite.

use jsonforge::{ErrorKind, ReadError, Token, decode, from_slice, record};
use rstest::rstest;

#[derive(Debug, Default)]
struct Xstring {
    x: String,
}

record!(Xstring {
    x: String => "X",
});

#[derive(Debug, Default)]
struct Xarray {
    x: Vec<i64>,
}

record!(Xarray {
    x: Vec<i64> => "X",
});

fn serde_rejects(input: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(input).is_err()
}

#[rstest]
#[case::apostrophe(b"'", ErrorKind::InvalidChar(b'\''))]
#[case::ascii_unicode_identifier("a\u{221a}\u{e5}".as_bytes(), ErrorKind::InvalidChar(b'a'))]
#[case::brace_comma(b"{,}", ErrorKind::WrongToken { expected: Token::String, found: Token::Comma })]
#[case::bracket_comma(b"[,]", ErrorKind::WrongToken { expected: Token::LeftBrace, found: Token::LeftBracket })]
#[case::double_comma(br#"{"X": "a",,}"#, ErrorKind::WrongToken { expected: Token::String, found: Token::Comma })]
#[case::missing_colon(br#"{"X" "a"}"#, ErrorKind::WrongToken { expected: Token::Colon, found: Token::String })]
#[case::missing_value(br#"{"X":}"#, ErrorKind::WantedValueToken(Token::RightBrace))]
#[case::bare_key(b"{X: 1}", ErrorKind::InvalidChar(b'X'))]
#[case::unclosed(br#"{"X": "a""#, ErrorKind::WrongToken { expected: Token::Comma, found: Token::Eof })]
#[case::truncated_literal(br#"{"X": nul}"#, ErrorKind::InvalidString)]
fn rejected_as_record(#[case] input: &[u8], #[case] kind: ErrorKind) {
    assert!(serde_rejects(input));
    assert_eq!(decode::<Xstring>(input).unwrap_err().into_kind(), kind);
}

#[rstest]
#[case::bracket_comma(b"[,]", ErrorKind::WantedValueToken(Token::Comma))]
#[case::trailing_comma(b"[1,]", ErrorKind::WantedValueToken(Token::RightBracket))]
#[case::missing_comma(b"[1 2]", ErrorKind::WrongToken { expected: Token::Comma, found: Token::Integer })]
#[case::leading_zero(b"[01]", ErrorKind::WrongToken { expected: Token::Comma, found: Token::Integer })]
#[case::lone_minus(b"[-]", ErrorKind::MissingIntegerAfterMinus)]
#[case::bare_decimal_point(b"[1.]", ErrorKind::MissingIntegerAfterDecimal)]
#[case::bare_exponent(b"[1e]", ErrorKind::MissingIntegerAfterExponent)]
#[case::signed_bare_exponent(b"[1e+]", ErrorKind::MissingIntegerAfterExponent)]
#[case::plus_sign(b"[+1]", ErrorKind::InvalidChar(b'+'))]
#[case::leading_point(b"[.5]", ErrorKind::InvalidChar(b'.'))]
#[case::unclosed(b"[1", ErrorKind::WrongToken { expected: Token::Comma, found: Token::Eof })]
#[case::extra_closer(b"[1]]", ErrorKind::TrailingCharacters)]
#[case::mismatched_closer(b"[1}", ErrorKind::WrongToken { expected: Token::Comma, found: Token::RightBrace })]
fn rejected_as_integer_list(#[case] input: &[u8], #[case] kind: ErrorKind) {
    assert!(serde_rejects(input));
    assert_eq!(from_slice::<Vec<i64>>(input).unwrap_err().into_kind(), kind);
}

#[rstest]
#[case::invalid_escape(br#""\a""#, ErrorKind::InvalidEscapedChar(b'a'))]
#[case::short_unicode_escape(br#""\u12""#, ErrorKind::InvalidHexChar(b'"'))]
#[case::raw_tab(b"\"a\tb\"", ErrorKind::InvalidJsonChar(b'\t'))]
#[case::raw_newline(b"\"a\nb\"", ErrorKind::InvalidJsonChar(b'\n'))]
#[case::unterminated(br#""abc"#, ErrorKind::Io(ReadError::Eof))]
fn rejected_as_string(#[case] input: &[u8], #[case] kind: ErrorKind) {
    assert!(serde_rejects(input));
    assert_eq!(from_slice::<String>(input).unwrap_err().into_kind(), kind);
}

#[test]
fn skipped_values_must_still_be_well_formed() {
    for input in [
        &br#"{"unknown": [1, "\q"]}"#[..],
        &br#"{"unknown": {"a": [}]}"#[..],
        &br#"{"unknown": [1, 2"#[..],
        &br#"{"unknown": tru}"#[..],
        &br#"{"unknown": [1 2]}"#[..],
        &br#"{"unknown": {"a" 1}}"#[..],
        &br#"{"unknown": [1, 2,]}"#[..],
    ] {
        assert!(serde_rejects(input));
        assert!(decode::<Xstring>(input).is_err(), "{}", String::from_utf8_lossy(input));
    }
}

#[test]
fn nested_list_errors_surface_through_records() {
    let err = decode::<Xarray>(br#"{"X": [1, 2,]}"#).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::WantedValueToken(Token::RightBracket));
    assert_eq!(err.offset(), 13);
}
