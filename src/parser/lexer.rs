//! Split the characters of a `Reader` into classified tokens.
//!
//! Every input character ends up in exactly one token. Letters, digits and
//! blanks are grouped into maximal runs, line terminators (CR, LF or CRLF) are
//! normalised to a single `\r\n` token and every other character is a token of
//! its own.
//!
//! # Examples
//!
//! ```rust
//! use caltree::parser::{Lexer, TokenKind};
//!
//! let kinds: Vec<_> = Lexer::from_str("DTSTART;TZID=X:19970714\r\n")
//!     .map(|token| token.kind)
//!     .collect();
//! assert_eq!(kinds[0], TokenKind::Alpha);
//! assert_eq!(kinds[1], TokenKind::Semicolon);
//! assert_eq!(*kinds.last().unwrap(), TokenKind::Newline);
//! ```

use std::borrow::Cow;
use std::fmt;

use super::Reader;

const CRLF: &str = "\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Alpha,
    Numeric,
    Colon,
    Semicolon,
    Quote,
    Apostrophe,
    Comma,
    Dash,
    Newline,
    Whitespace,
    Char,
}

/// A lexed token. `line` and `column` point at its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: Cow<'a, str>,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{} {:?} {:?}",
            self.line, self.column, self.kind, self.text
        )
    }
}

#[inline]
fn is_newline(c: char) -> bool {
    c == '\r' || c == '\n'
}

#[inline]
fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

#[inline]
fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn single_char_kind(c: char) -> TokenKind {
    match c {
        ':' => TokenKind::Colon,
        ';' => TokenKind::Semicolon,
        '"' => TokenKind::Quote,
        '\'' => TokenKind::Apostrophe,
        ',' => TokenKind::Comma,
        '-' => TokenKind::Dash,
        _ => TokenKind::Char,
    }
}

pub struct Lexer<'a> {
    reader: Reader<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(reader: Reader<'a>) -> Self {
        Self { reader }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Self::new(Reader::new(input))
    }

    /// Consume characters while `pred` holds, then push back the first
    /// character that did not match.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.reader.get_char() {
            if !pred(c) {
                self.reader.back_up();
                break;
            }
        }
    }

    /// Swallow the LF of a CRLF pair.
    fn eat_newline(&mut self, first: char) {
        if first == '\r' {
            match self.reader.get_char() {
                Some('\n') | None => {}
                Some(_) => self.reader.back_up(),
            }
        }
    }

    pub fn next_token(&mut self) -> Option<Token<'a>> {
        let start = self.reader.position();
        let c = self.reader.get_char()?;

        let kind = if is_newline(c) {
            self.eat_newline(c);
            TokenKind::Newline
        } else if is_alpha(c) {
            self.eat_while(is_alpha);
            TokenKind::Alpha
        } else if is_numeric(c) {
            self.eat_while(is_numeric);
            TokenKind::Numeric
        } else if is_whitespace(c) {
            self.eat_while(is_whitespace);
            TokenKind::Whitespace
        } else {
            single_char_kind(c)
        };

        let text = match kind {
            TokenKind::Newline => Cow::Borrowed(CRLF),
            _ => Cow::Borrowed(self.reader.slice_from(start)),
        };

        Some(Token {
            kind,
            text,
            line: start.line,
            column: start.column,
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
