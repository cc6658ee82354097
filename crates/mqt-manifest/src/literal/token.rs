use std::fmt::{self, Display};

use logos::{Lexer, Logos};
use serde_json::Number;

type Result<T> = std::result::Result<T, LexingError>;

/// Tokens of the Python literal subset found in manifests.
///
/// Whitespace, `#` comments and backslash line continuations are skipped.
#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(skip r"([ \t\r\n\f]+|#[^\n]*|\\\r?\n)", error = LexingError)]
pub(crate) enum Token {
    #[token("{")]
    OpenBrace,

    #[token("}")]
    CloseBrace,

    #[token("[")]
    OpenBracket,

    #[token("]")]
    CloseBracket,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("-")]
    Minus,

    #[token("+")]
    Plus,

    #[token("True", |_| true)]
    #[token("False", |_| false)]
    Bool(bool),

    #[token("None")]
    Null,

    #[regex(r#"([rRuUbB]|[bB][rR]|[rR][bB])?['"]"#, lex_string)]
    Str(String),

    #[regex(r"[0-9][0-9_]*", lex_decimal)]
    #[regex(r"0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+", lex_radix)]
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?", lex_float)]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", lex_float)]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+", lex_float)]
    Number(Number),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_owned())]
    Name(String),
}

/// Lex a string literal, from its prefix and opening quote up to the
/// matching closing quote.
fn lex_string(input: &mut Lexer<'_, Token>) -> Result<String> {
    let opening = input.slice();
    let (prefix, quote) = opening.split_at(opening.len() - 1);
    let raw = prefix.contains(['r', 'R']);

    let rest = input.remainder();
    let triple = rest.starts_with(&quote.repeat(2));
    let delimiter = if triple { quote.repeat(3) } else { quote.to_owned() };
    let body = &rest[delimiter.len() - 1..];

    let mut chars = body.char_indices();
    let end = loop {
        match chars.next() {
            None => return Err(LexingError::UnterminatedString),
            Some((_, '\\')) => {
                chars.next();
            }
            Some((_, '\n')) if !triple => return Err(LexingError::NewlineInString),
            Some((i, _)) if body[i..].starts_with(&delimiter) => break i,
            Some(_) => {}
        }
    };
    input.bump(delimiter.len() - 1 + end + delimiter.len());

    let content = &body[..end];
    if raw {
        Ok(content.to_owned())
    } else {
        unescape(content)
    }
}

fn unescape(content: &str) -> Result<String> {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            return Err(LexingError::UnterminatedString);
        };
        match escaped {
            '\n' => {}
            '\\' | '\'' | '"' => out.push(escaped),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            'x' => out.push(code_point(&mut chars, 2)?),
            'u' => out.push(code_point(&mut chars, 4)?),
            'U' => out.push(code_point(&mut chars, 8)?),
            '0'..='7' => {
                let mut digits = String::from(escaped);
                while digits.len() < 3 {
                    match chars.next_if(|d| d.is_digit(8)) {
                        Some(d) => digits.push(d),
                        None => break,
                    }
                }
                out.push(parse_code_point(&digits, 8)?);
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Ok(out)
}

fn code_point(chars: &mut impl Iterator<Item = char>, len: usize) -> Result<char> {
    let digits: String = chars.take(len).collect();
    if digits.chars().count() != len {
        return Err(LexingError::InvalidEscape(digits));
    }
    parse_code_point(&digits, 16)
}

fn parse_code_point(digits: &str, radix: u32) -> Result<char> {
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| LexingError::InvalidEscape(digits.to_owned()))
}

/// Lex a decimal integer.
///
/// Values beyond the `i64` and `u64` ranges are kept as floats.
fn lex_decimal(input: &mut Lexer<'_, Token>) -> Result<Number> {
    let slice = input.slice();
    let digits = slice.replace('_', "");
    if digits.len() > 1 && digits.starts_with('0') && digits.bytes().any(|b| b != b'0') {
        return Err(LexingError::LeadingZeros(slice.to_owned()));
    }

    if let Ok(value) = digits.parse::<i64>() {
        return Ok(value.into());
    }
    if let Ok(value) = digits.parse::<u64>() {
        return Ok(value.into());
    }
    digits
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| LexingError::InvalidNumber(slice.to_owned()))
}

/// Lex a hexadecimal, octal or binary integer.
fn lex_radix(input: &mut Lexer<'_, Token>) -> Result<Number> {
    let slice = input.slice();
    let radix = match slice.as_bytes().get(1) {
        Some(b'x' | b'X') => 16,
        Some(b'o' | b'O') => 8,
        _ => 2,
    };
    let digits = slice[2..].replace('_', "");

    if let Ok(value) = i64::from_str_radix(&digits, radix) {
        return Ok(value.into());
    }
    u64::from_str_radix(&digits, radix)
        .map(Number::from)
        .map_err(|_| LexingError::InvalidNumber(slice.to_owned()))
}

/// Lex a float.
fn lex_float(input: &mut Lexer<'_, Token>) -> Result<Number> {
    let slice = input.slice();
    slice
        .replace('_', "")
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| LexingError::InvalidNumber(slice.to_owned()))
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::OpenBrace => write!(f, "{{"),
            Token::CloseBrace => write!(f, "}}"),
            Token::OpenBracket => write!(f, "["),
            Token::CloseBracket => write!(f, "]"),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Minus => write!(f, "-"),
            Token::Plus => write!(f, "+"),
            Token::Bool(true) => write!(f, "True"),
            Token::Bool(false) => write!(f, "False"),
            Token::Null => write!(f, "None"),
            Token::Str(s) => write!(f, "{s:?}"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Error arising during lexing.
#[derive(Default, Debug, Clone, PartialEq, thiserror::Error)]
pub(crate) enum LexingError {
    #[error("unexpected character")]
    #[default]
    UnexpectedCharacter,

    #[error("unterminated string")]
    UnterminatedString,

    #[error("newline in single-quoted string")]
    NewlineInString,

    #[error("invalid escape sequence '{0}'")]
    InvalidEscape(String),

    #[error("leading zeros in decimal integer '{0}'")]
    LeadingZeros(String),

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
}
