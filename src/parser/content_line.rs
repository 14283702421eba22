//! Group the tokens of a `Lexer` into logical content lines.
//!
//! A content line is one `NAME *(;PARAM=VALUE) ":" VALUE` record. Physical
//! lines that start with a space or a tab continue the previous line: the
//! line break and that single blank are dropped (RFC 5545 §3.1).
//!
//! Splitting a line into its parts works on token kinds, so a `;`, `:` or
//! `,` inside a quoted parameter value stays part of the value.
//!
//! #### Warning
//!   The parser only checks the syntax of the line. Names are uppercased,
//!   values are left untouched and nothing is checked against RFC 5545.
//!
//! # Examples
//!
//! ```rust
//! let input = "ATTENDEE;CN=\"Doe, Jane\":mailto:jane@ex\r\n ample.com\r\n";
//! let line = caltree::ContentLineParser::from_str(input)
//!     .next()
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(line.name, "ATTENDEE");
//! assert_eq!(line.params.get_param("CN"), Some("Doe, Jane"));
//! assert_eq!(line.value, "mailto:jane@example.com");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::iter::Peekable;

use lazy_static::lazy_static;
use regex::Regex;

use super::{Lexer, Reader, Token, TokenKind};
use crate::{
    PARAM_NAME_DELIMITER, VALUE_DELIMITER,
    property::{Parameter, Parameters},
};

lazy_static! {
    static ref RE_NAME: Regex = Regex::new(r"^[A-Za-z0-9-]+$").unwrap();
}

/// Error arising when trying to parse a content line
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ContentLineError {
    #[error("Line {0}: Missing property name.")]
    MissingName(usize),
    #[error("Line {0}: Invalid name \"{1}\".")]
    InvalidName(usize, String),
    #[error("Line {0}: Missing a \"{1}\" delimiter.")]
    MissingDelimiter(usize, char),
    #[error("Line {0}: Missing a parameter name.")]
    MissingParamName(usize),
    #[error("Line {0}: Missing a closing quote.")]
    MissingClosingQuote(usize),
    #[error("Line {0}: Unexpected content after a closing quote.")]
    UnexpectedAfterQuote(usize),
}

impl ContentLineError {
    pub fn line(&self) -> usize {
        match self {
            Self::MissingName(line)
            | Self::InvalidName(line, _)
            | Self::MissingDelimiter(line, _)
            | Self::MissingParamName(line)
            | Self::MissingClosingQuote(line)
            | Self::UnexpectedAfterQuote(line) => *line,
        }
    }
}

/// An unfolded ICAL content line.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct ContentLine {
    /// Property name, uppercased.
    pub name: String,
    pub params: Parameters,
    /// Raw value, still escaped.
    pub value: String,
    /// Physical line the content line starts on, 0 if it was not read from
    /// input.
    pub line: usize,
}

impl fmt::Display for ContentLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "line: {}\nname: {}\nparams: {:?}\nvalue: {:?}",
            self.line, self.name, self.params, self.value
        )
    }
}

/// Decode RFC 6868 caret escapes of a parameter value.
fn decode_param_value(value: &str) -> String {
    if !value.contains('^') {
        return value.to_owned();
    }
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '^' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('^') => out.push('^'),
            Some('n') => out.push('\n'),
            Some('\'') => out.push('"'),
            _ => {
                out.push('^');
                continue;
            }
        }
        chars.next();
    }
    out
}

/// Cursor over the tokens of one logical line.
struct LineTokens<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    line: usize,
}

impl<'a> LineTokens<'a> {
    #[inline]
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    #[inline]
    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    #[inline]
    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Concatenate tokens until `stop` holds for one, which is not consumed.
    fn take_until(&mut self, stop: impl Fn(&Token) -> bool) -> String {
        let mut out = String::new();
        while let Some(token) = self.tokens.get(self.pos) {
            if stop(token) {
                break;
            }
            out.push_str(&token.text);
            self.pos += 1;
        }
        out
    }

    fn rest(&mut self) -> String {
        self.take_until(|_| false)
    }
}

#[inline]
fn is_param_name_delimiter(token: &Token) -> bool {
    token.kind == TokenKind::Char && token.text.starts_with(PARAM_NAME_DELIMITER)
}

pub struct ContentLineParser<'a> {
    tokens: Peekable<Lexer<'a>>,
}

impl<'a> ContentLineParser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        ContentLineParser {
            tokens: lexer.peekable(),
        }
    }

    pub fn from_reader(reader: Reader<'a>) -> Self {
        Self::new(Lexer::new(reader))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Self::new(Lexer::from_str(input))
    }

    /// Collect the tokens of the next logical line, undoing line folding.
    ///
    /// Blank lines are skipped.
    fn next_logical_line(&mut self) -> Option<LineTokens<'a>> {
        loop {
            let first = self.tokens.next()?;
            if first.kind == TokenKind::Newline {
                continue;
            }
            let line = first.line;
            let mut tokens = vec![first];

            while let Some(token) = self.tokens.next() {
                if token.kind != TokenKind::Newline {
                    tokens.push(token);
                    continue;
                }
                if self.tokens.peek().map(|next| next.kind) != Some(TokenKind::Whitespace) {
                    break;
                }
                // Folded: drop the line break and one blank
                if let Some(blank) = self.tokens.next()
                    && blank.text.len() > 1
                {
                    let text = match blank.text {
                        Cow::Borrowed(text) => Cow::Borrowed(&text[1..]),
                        Cow::Owned(text) => Cow::Owned(text[1..].to_owned()),
                    };
                    tokens.push(Token {
                        text,
                        column: blank.column + 1,
                        ..blank
                    });
                }
            }

            if tokens.iter().all(|token| token.kind == TokenKind::Whitespace) {
                continue;
            }
            return Some(LineTokens {
                tokens,
                pos: 0,
                line,
            });
        }
    }

    fn parse(&self, mut line: LineTokens<'a>) -> Result<ContentLine, ContentLineError> {
        let number = line.line;

        let name = line.take_until(|token| {
            matches!(token.kind, TokenKind::Semicolon | TokenKind::Colon)
        });
        if line.peek().is_none() {
            return Err(ContentLineError::MissingDelimiter(number, VALUE_DELIMITER));
        }
        if name.is_empty() {
            return Err(ContentLineError::MissingName(number));
        }
        if !RE_NAME.is_match(&name) {
            return Err(ContentLineError::InvalidName(number, name));
        }

        let mut params = Parameters::default();
        while line.peek_kind() == Some(TokenKind::Semicolon) {
            line.advance();
            params.push(Self::parse_param(&mut line, number)?);
        }

        // Only a colon can be left here
        line.advance();
        Ok(ContentLine {
            name: name.to_ascii_uppercase(),
            params,
            value: line.rest(),
            line: number,
        })
    }

    fn parse_param(line: &mut LineTokens<'a>, number: usize) -> Result<Parameter, ContentLineError> {
        let key = line.take_until(|token| {
            is_param_name_delimiter(token)
                || matches!(token.kind, TokenKind::Semicolon | TokenKind::Colon)
        });
        if !line.peek().is_some_and(is_param_name_delimiter) {
            return Err(ContentLineError::MissingDelimiter(
                number,
                PARAM_NAME_DELIMITER,
            ));
        }
        if key.is_empty() {
            return Err(ContentLineError::MissingParamName(number));
        }
        if !RE_NAME.is_match(&key) {
            return Err(ContentLineError::InvalidName(number, key));
        }
        line.advance();

        // In almost all cases we'll have one parameter value
        let mut values = Vec::with_capacity(1);
        loop {
            if line.peek_kind() == Some(TokenKind::Quote) {
                // This is a dquoted value. (NAME;Foo="Bar":value)
                line.advance();
                let content = line.take_until(|token| token.kind == TokenKind::Quote);
                if line.peek().is_none() {
                    return Err(ContentLineError::MissingClosingQuote(number));
                }
                line.advance();
                values.push(decode_param_value(&content));
                if !matches!(
                    line.peek_kind(),
                    Some(TokenKind::Comma | TokenKind::Semicolon | TokenKind::Colon)
                ) {
                    return Err(ContentLineError::UnexpectedAfterQuote(number));
                }
            } else {
                // This is a 'raw' value. (NAME;Foo=Bar:value)
                let content = line.take_until(|token| {
                    matches!(
                        token.kind,
                        TokenKind::Comma | TokenKind::Semicolon | TokenKind::Colon
                    )
                });
                if line.peek().is_none() {
                    return Err(ContentLineError::MissingDelimiter(number, VALUE_DELIMITER));
                }
                values.push(decode_param_value(&content));
            }

            if line.peek_kind() != Some(TokenKind::Comma) {
                break;
            }
            line.advance();
        }

        Ok(Parameter::with_values(key, values))
    }
}

impl<'a> Iterator for ContentLineParser<'a> {
    type Item = Result<ContentLine, ContentLineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.next_logical_line()?;
        Some(self.parse(line))
    }
}
