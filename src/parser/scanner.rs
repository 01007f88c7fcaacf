//! Tokenizer for brief text.
//!
//! The scanner is pull-based: each call to [`Scanner::next_token`] skips
//! inter-token whitespace, measures the indentation of a new line when a
//! newline was crossed, and classifies the next token.
//!
//! Indentation counts a space as one column and a tab as `tab_width`
//! columns. Blank lines never produce an indent of their own; the indent
//! reported is that of the next non-blank line.

use crate::error::{BriefError, Result};

use super::span::{Location, Span};
use super::token::{Token, TokenKind};

/// Columns per tab when no width is configured.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Characters allowed after `#` to open a raw content block.
pub const BLOCK_DELIMITERS: [char; 4] = ['|', '@', '$', '%'];

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_newline(c: Option<char>) -> bool {
    matches!(c, Some('\n' | '\r'))
}

/// Tokenizer over a borrowed source string.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    tab_width: usize,
    indent: usize,
    at_start: bool,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self::with_tab_width(src, DEFAULT_TAB_WIDTH)
    }

    pub fn with_tab_width(src: &'a str, tab_width: usize) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            tab_width,
            indent: 0,
            at_start: true,
            done: false,
        }
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Scan the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let line_start = self.skip_whitespace();
        let Some(ch) = self.peek() else {
            return Ok(None);
        };
        let start = self.location();

        let (kind, text) = match ch {
            c if is_ident_start(c) => (TokenKind::Ident, self.take_while(is_ident_continue)),
            c if c.is_ascii_digit() => self.scan_number(start)?,
            '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number(start)?
            }
            '"' => (TokenKind::String, self.scan_string(start)?),
            '`' => (TokenKind::Raw, self.scan_raw_string(start)?),
            '#' => self.scan_hash(start)?,
            '/' if self.peek_second() == Some('/') => {
                (TokenKind::Comment, self.take_while(|c| c != '\n' && c != '\r'))
            }
            '/' if self.peek_second() == Some('*') => {
                (TokenKind::Comment, self.scan_block_comment(start)?)
            }
            other => {
                self.bump();
                let kind = match other {
                    ':' => TokenKind::Colon,
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    c => TokenKind::Symbol(c),
                };
                (kind, other.to_string())
            }
        };

        Ok(Some(Token {
            kind,
            text,
            span: Span::new(start, self.location()),
            line_start,
            indent: self.indent,
        }))
    }

    fn location(&self) -> Location {
        Location::new(self.pos, self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.src[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\r' => {
                if self.peek() != Some('\n') {
                    self.line += 1;
                }
                self.column = 1;
            }
            _ => self.column += 1,
        }
        Some(c)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }

    fn error(&self, message: impl Into<String>, location: Location) -> BriefError {
        BriefError::Scan {
            message: message.into(),
            location,
        }
    }

    /// Skip spaces and tabs; returns true if a newline (or the start of input) was crossed.
    fn skip_whitespace(&mut self) -> bool {
        if self.at_start {
            self.at_start = false;
            self.read_indent();
            return true;
        }
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.bump();
        }
        if is_newline(self.peek()) {
            self.read_indent();
            return true;
        }
        false
    }

    fn read_indent(&mut self) {
        loop {
            self.indent = 0;
            while is_newline(self.peek()) {
                self.bump();
            }
            while let Some(c @ (' ' | '\t')) = self.peek() {
                self.indent += if c == '\t' { self.tab_width } else { 1 };
                self.bump();
            }
            if !is_newline(self.peek()) {
                break;
            }
        }
    }

    fn eat_digits(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        self.pos > start
    }

    fn scan_number(&mut self, start: Location) -> Result<(TokenKind, String)> {
        let from = self.pos;

        if self.peek() == Some('0') && matches!(self.peek_second(), Some('x' | 'X')) {
            self.bump();
            self.bump();
            if !self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                return Err(self.error("hexadecimal literal has no digits", start));
            }
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            }
            return Ok((TokenKind::Int, self.src[from..self.pos].to_string()));
        }

        let mut kind = TokenKind::Int;
        self.eat_digits();
        if self.peek() == Some('.') {
            kind = TokenKind::Float;
            self.bump();
            self.eat_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            kind = TokenKind::Float;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if !self.eat_digits() {
                return Err(self.error("exponent has no digits", start));
            }
        }
        Ok((kind, self.src[from..self.pos].to_string()))
    }

    fn scan_string(&mut self, start: Location) -> Result<String> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None | Some('\n' | '\r') => {
                    return Err(self.error("string literal not terminated", start));
                }
                Some('"') => return Ok(value),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some(c) => {
                            return Err(self.error(format!("unknown escape sequence \\{c}"), start));
                        }
                        None => return Err(self.error("string literal not terminated", start)),
                    };
                    value.push(escaped);
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn scan_raw_string(&mut self, start: Location) -> Result<String> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("raw string literal not terminated", start)),
                Some('`') => return Ok(value),
                Some(c) => value.push(c),
            }
        }
    }

    /// `#` is either a raw block opener (`#|`, `#@`, `#$`, `#%`) or the feature marker.
    fn scan_hash(&mut self, start: Location) -> Result<(TokenKind, String)> {
        match self.peek_second() {
            Some(delim) if BLOCK_DELIMITERS.contains(&delim) => {
                self.bump();
                self.bump();
                Ok((TokenKind::Raw, self.scan_block(delim, start)?))
            }
            Some(c) if is_ident_start(c) => {
                self.bump();
                Ok((TokenKind::Hash, "#".to_string()))
            }
            Some(c) => Err(self.error(format!("invalid block delimiter: #{c}"), start)),
            None => Err(self.error("invalid block delimiter at end of input", start)),
        }
    }

    /// Content runs until `<delim>#`; a lone delimiter is ordinary content.
    fn scan_block(&mut self, delim: char, start: Location) -> Result<String> {
        let mut content = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(self.error(
                        format!("found end of input while reading block, no matching {delim}#"),
                        start,
                    ));
                }
                Some(c) if c == delim && self.peek() == Some('#') => {
                    self.bump();
                    return Ok(content);
                }
                Some(c) => content.push(c),
            }
        }
    }

    fn scan_block_comment(&mut self, start: Location) -> Result<String> {
        let from = self.pos;
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                None => return Err(self.error("comment not terminated", start)),
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(self.src[from..self.pos].to_string());
                }
                Some(_) => {}
            }
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
