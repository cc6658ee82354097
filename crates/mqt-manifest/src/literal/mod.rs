//! Strict parser for Python literal expressions.
//!
//! Only the literal subset used by module manifests is understood:
//!
//! - dicts `{k: v}`, lists `[a, b]`, tuples `(a, b)` and sets `{a, b}`
//!   (tuples and sets become JSON arrays)
//! - strings in single, double or triple quotes, with optional `r`, `u` or
//!   `b` prefixes, and implicit concatenation of adjacent strings
//! - integers (decimal, `0x`, `0o`, `0b`, with `_` separators) and floats
//! - `True`, `False` and `None`
//! - `#` comments and trailing commas
//!
//! The source is first split into tokens with [`logos`], then the token
//! stream is parsed with [`nom`] combinators. The result is a
//! [`serde_json::Value`], which lets manifests be deserialized into typed
//! structs with serde.
//!
//! # Examples
//!
//! ```
//! use mqt_manifest::literal::parse_literal;
//! use serde_json::json;
//!
//! let value = parse_literal("{'name': 'Sale', 'depends': ['base'], 'installable': True}")
//!     .unwrap();
//! assert_eq!(value, json!({"name": "Sale", "depends": ["base"], "installable": true}));
//! ```

mod token;

use std::cmp::Ordering;
use std::ops::Range;

use logos::Logos;
use nom::{
    Finish as _, IResult, InputLength, Parser,
    branch::alt,
    combinator::{all_consuming, cut, map, map_opt, opt, success},
    error::{ErrorKind, ParseError},
    multi::{many1, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
};
use serde_json::{Map, Number, Value};

use self::token::{LexingError, Token};
use crate::error::{Error, Result};

/// Parse a complete literal expression.
///
/// Anything other than whitespace and comments after the expression is an
/// error.
pub fn parse_literal(source: &str) -> Result<Value> {
    let tokens = lex(source)?;
    all_consuming(value)(Tokens::new(&tokens))
        .finish()
        .map(|(_, value)| value)
        .map_err(|err| err.into_error(source))
}

/// A token with its byte range in the source.
#[derive(Debug, Clone, PartialEq)]
struct Spanned {
    token: Token,
    span: Range<usize>,
}

fn lex(source: &str) -> Result<Vec<Spanned>> {
    Token::lexer(source)
        .spanned()
        .map(|(token, span)| match token {
            Ok(token) => Ok(Spanned { token, span }),
            Err(LexingError::UnexpectedCharacter) => {
                let found = source.get(span.clone()).unwrap_or_default();
                let message = format!("unexpected character '{found}'");
                Err(literal_error(source, span.start, message))
            }
            Err(err) => Err(literal_error(source, span.start, err.to_string())),
        })
        .collect()
}

fn literal_error(source: &str, offset: usize, message: String) -> Error {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    Error::Literal {
        line,
        column,
        message,
    }
}

/// Parser input: the tokens not consumed yet.
#[derive(Debug, Clone, Copy)]
struct Tokens<'t> {
    tokens: &'t [Spanned],
}

impl<'t> Tokens<'t> {
    fn new(tokens: &'t [Spanned]) -> Self {
        Self { tokens }
    }

    fn split_first(self) -> Option<(&'t Token, Self)> {
        self.tokens
            .split_first()
            .map(|(head, rest)| (&head.token, Self::new(rest)))
    }
}

impl InputLength for Tokens<'_> {
    fn input_len(&self) -> usize {
        self.tokens.len()
    }
}

/// Parse failure, positioned at the first token that did not fit.
#[derive(Debug)]
struct SyntaxError<'t> {
    input: Tokens<'t>,
    expected: Option<String>,
}

impl<'t> SyntaxError<'t> {
    fn expected(input: Tokens<'t>, expected: impl Into<String>) -> Self {
        Self {
            input,
            expected: Some(expected.into()),
        }
    }

    fn into_error(self, source: &str) -> Error {
        let Some(head) = self.input.tokens.first() else {
            let message = match self.expected {
                Some(expected) => format!("expected {expected}, found end of input"),
                None => "unexpected end of input".to_owned(),
            };
            return literal_error(source, source.trim_end().len(), message);
        };

        let message = match (&head.token, self.expected) {
            (Token::Name(name), _) => format!("'{name}' is not a literal"),
            (token, Some(expected)) => format!("expected {expected}, found '{token}'"),
            (token, None) => format!("unexpected '{token}'"),
        };
        literal_error(source, head.span.start, message)
    }
}

impl<'t> ParseError<Tokens<'t>> for SyntaxError<'t> {
    fn from_error_kind(input: Tokens<'t>, kind: ErrorKind) -> Self {
        Self {
            input,
            expected: (kind == ErrorKind::Eof).then(|| "end of input".to_owned()),
        }
    }

    fn append(_input: Tokens<'t>, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    /// Keep the error that got furthest into the input.
    fn or(self, other: Self) -> Self {
        match other.input.input_len().cmp(&self.input.input_len()) {
            Ordering::Less => other,
            Ordering::Greater => self,
            Ordering::Equal if self.expected == other.expected => self,
            Ordering::Equal => Self {
                input: self.input,
                expected: None,
            },
        }
    }
}

type PResult<'t, O> = IResult<Tokens<'t>, O, SyntaxError<'t>>;

impl<'t> Parser<Tokens<'t>, (), SyntaxError<'t>> for Token {
    fn parse(&mut self, input: Tokens<'t>) -> PResult<'t, ()> {
        match input.split_first() {
            Some((head, rest)) if *head == *self => Ok((rest, ())),
            _ => Err(nom::Err::Error(SyntaxError::expected(
                input,
                format!("'{self}'"),
            ))),
        }
    }
}

/// Match one token carrying data, extracted with `extract`.
fn data<'t, O>(
    expected: &'static str,
    extract: impl Fn(&Token) -> Option<O>,
) -> impl FnMut(Tokens<'t>) -> PResult<'t, O> {
    move |input: Tokens<'t>| {
        input
            .split_first()
            .and_then(|(head, rest)| extract(head).map(|out| (rest, out)))
            .ok_or_else(|| nom::Err::Error(SyntaxError::expected(input, expected)))
    }
}

fn value(input: Tokens<'_>) -> PResult<'_, Value> {
    alt((dict_or_set, list, tuple_or_group, strings, number, constant))(input)
}

/// One or more adjacent strings, concatenated.
fn strings(input: Tokens<'_>) -> PResult<'_, Value> {
    let string = data("a string", |token| match token {
        Token::Str(s) => Some(s.clone()),
        _ => None,
    });
    map(many1(string), |parts: Vec<String>| Value::String(parts.concat()))(input)
}

fn number(input: Tokens<'_>) -> PResult<'_, Value> {
    let sign = alt((map(Token::Minus, |()| true), map(Token::Plus, |()| false)));
    let magnitude = data("a number", |token| match token {
        Token::Number(n) => Some(n.clone()),
        _ => None,
    });
    map_opt(pair(opt(sign), magnitude), |(negative, n): (Option<bool>, Number)| {
        if negative == Some(true) {
            negate(&n).map(Value::Number)
        } else {
            Some(Value::Number(n))
        }
    })(input)
}

fn negate(n: &Number) -> Option<Number> {
    match n.as_i64().and_then(i64::checked_neg) {
        Some(negated) => Some(negated.into()),
        None => n.as_f64().and_then(|f| Number::from_f64(-f)),
    }
}

fn constant(input: Tokens<'_>) -> PResult<'_, Value> {
    data("a literal", |token| match token {
        Token::Bool(b) => Some(Value::Bool(*b)),
        Token::Null => Some(Value::Null),
        _ => None,
    })(input)
}

/// Comma separated values with an optional trailing comma.
fn items(input: Tokens<'_>) -> PResult<'_, Vec<Value>> {
    terminated(separated_list1(Token::Comma, value), opt(Token::Comma))(input)
}

fn list(input: Tokens<'_>) -> PResult<'_, Value> {
    let contents = map(opt(items), Option::unwrap_or_default);
    map(
        delimited(Token::OpenBracket, contents, Token::CloseBracket),
        Value::Array,
    )(input)
}

/// A parenthesized value, or a tuple when a comma is present.
fn tuple_or_group(input: Tokens<'_>) -> PResult<'_, Value> {
    let group = map(
        pair(separated_list1(Token::Comma, value), opt(Token::Comma)),
        |(mut values, trailing): (Vec<Value>, Option<()>)| {
            if trailing.is_none() && values.len() == 1 {
                values.swap_remove(0)
            } else {
                Value::Array(values)
            }
        },
    );
    delimited(
        Token::OpenParen,
        alt((group, success(Value::Array(Vec::new())))),
        Token::CloseParen,
    )(input)
}

fn dict_or_set(input: Tokens<'_>) -> PResult<'_, Value> {
    delimited(
        Token::OpenBrace,
        alt((
            dict_entries,
            map(items, Value::Array),
            success(Value::Object(Map::new())),
        )),
        Token::CloseBrace,
    )(input)
}

/// `key: value` pairs. Once the colon is seen the entry must complete.
fn dict_entries(input: Tokens<'_>) -> PResult<'_, Value> {
    let entry = pair(key, preceded(Token::Colon, cut(value)));
    map(
        terminated(separated_list1(Token::Comma, entry), opt(Token::Comma)),
        |entries: Vec<(String, Value)>| Value::Object(entries.into_iter().collect()),
    )(input)
}

/// JSON objects only have string keys; scalar keys are stringified.
fn key(input: Tokens<'_>) -> PResult<'_, String> {
    map(alt((strings, number, constant)), |key: Value| match key {
        Value::String(s) => s,
        Value::Bool(true) => "True".to_owned(),
        Value::Bool(false) => "False".to_owned(),
        Value::Null => "None".to_owned(),
        other => other.to_string(),
    })(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn error_position(source: &str) -> (usize, usize) {
        match parse_literal(source).unwrap_err() {
            Error::Literal { line, column, .. } => (line, column),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse_literal("True").unwrap(), json!(true));
        assert_eq!(parse_literal("False").unwrap(), json!(false));
        assert_eq!(parse_literal("None").unwrap(), Value::Null);
        assert_eq!(parse_literal("42").unwrap(), json!(42));
        assert_eq!(parse_literal("-7").unwrap(), json!(-7));
        assert_eq!(parse_literal("1_000").unwrap(), json!(1000));
        assert_eq!(parse_literal("0x1F").unwrap(), json!(31));
        assert_eq!(parse_literal("2.5").unwrap(), json!(2.5));
        assert_eq!(parse_literal("1e3").unwrap(), json!(1000.0));
        assert_eq!(parse_literal("0").unwrap(), json!(0));
    }

    #[test]
    fn test_integers_beyond_i64() {
        assert_eq!(
            parse_literal("18446744073709551615").unwrap(),
            json!(u64::MAX)
        );
        let huge = parse_literal("{'version': 123456789012345678901234567890}").unwrap();
        assert!(huge["version"].is_f64());
    }

    #[test]
    fn test_strings() {
        assert_eq!(parse_literal("'sale'").unwrap(), json!("sale"));
        assert_eq!(parse_literal("\"sale\"").unwrap(), json!("sale"));
        assert_eq!(parse_literal("u'caf\\xe9'").unwrap(), json!("café"));
        assert_eq!(parse_literal("r'a\\nb'").unwrap(), json!("a\\nb"));
        assert_eq!(parse_literal("'a\\nb'").unwrap(), json!("a\nb"));
        assert_eq!(parse_literal("'it\\'s'").unwrap(), json!("it's"));
    }

    #[test]
    fn test_triple_quoted_and_concatenated() {
        let src = "\"\"\"\nLine one\nLine \"two\"\n\"\"\"";
        assert_eq!(parse_literal(src).unwrap(), json!("\nLine one\nLine \"two\"\n"));

        let src = "('Odoo Community Association (OCA), '\n 'Akretion')";
        assert_eq!(
            parse_literal(src).unwrap(),
            json!("Odoo Community Association (OCA), Akretion")
        );
    }

    #[test]
    fn test_containers() {
        assert_eq!(parse_literal("[]").unwrap(), json!([]));
        assert_eq!(parse_literal("()").unwrap(), json!([]));
        assert_eq!(parse_literal("{}").unwrap(), json!({}));
        assert_eq!(parse_literal("('a',)").unwrap(), json!(["a"]));
        assert_eq!(parse_literal("('a')").unwrap(), json!("a"));
        assert_eq!(parse_literal("{'a', 'b'}").unwrap(), json!(["a", "b"]));
        assert_eq!(
            parse_literal("{'a': [1, 2,], 'b': {'c': None},}").unwrap(),
            json!({"a": [1, 2], "b": {"c": null}})
        );
        assert_eq!(parse_literal("{1: 'x'}").unwrap(), json!({"1": "x"}));
    }

    #[test]
    fn test_comments_are_skipped() {
        let src = "# -*- coding: utf-8 -*-\n\
                   {\n    'name': 'x',  # the name\n    # 'installable': False,\n}\n";
        assert_eq!(parse_literal(src).unwrap(), json!({"name": "x"}));
    }

    #[test]
    fn test_rejects_expressions() {
        assert!(parse_literal("__import__('os').system('true')").is_err());
        assert!(parse_literal("{'a': 1 + 2}").is_err());
        assert!(parse_literal("{'a': open}").is_err());
        assert!(parse_literal("f'{x}'").is_err());
        assert!(parse_literal("{'a': 1} {'b': 2}").is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(parse_literal("").is_err());
        assert!(parse_literal("{'a': 1").is_err());
        assert!(parse_literal("['a' 'b'").is_err());
        assert!(parse_literal("[,]").is_err());
        assert!(parse_literal("'unterminated").is_err());
        assert!(parse_literal("'line\nbreak'").is_err());
        assert!(parse_literal("{['a']: 1}").is_err());
        assert!(parse_literal("012").is_err());
    }

    #[test]
    fn test_error_position() {
        assert_eq!(error_position("{\n  'a': foo,\n}"), (2, 8));
        assert_eq!(error_position("{\n  'a': 1,\n  'b': 'open\n}"), (3, 8));
        assert_eq!(error_position("['a', 'b'"), (1, 10));
    }

    #[test]
    fn test_error_messages() {
        let message = parse_literal("{'a': open}").unwrap_err().to_string();
        assert_eq!(
            message,
            "invalid literal at line 1, column 7: 'open' is not a literal"
        );

        let message = parse_literal("{'a': 1} x").unwrap_err().to_string();
        assert!(message.contains("'x' is not a literal"), "{message}");

        let message = parse_literal("[1 2]").unwrap_err().to_string();
        assert!(message.contains("expected ']', found '2'"), "{message}");
    }
}
