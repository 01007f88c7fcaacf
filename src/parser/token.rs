//! Token classes produced by the scanner.

use std::fmt;

use super::span::{Location, Span};

/// Classification of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare identifier: `html`, `class`, `_id2`
    Ident,
    /// Double-quoted string; token text is the unescaped value
    String,
    /// Backtick string or `#|...|#` block; token text is the content
    Raw,
    Int,
    Float,
    /// `// line` or `/* block */` comment
    Comment,
    Colon,
    Plus,
    Minus,
    /// `#` introducing a feature such as `#include`
    Hash,
    /// Any other single character
    Symbol(char),
}

impl TokenKind {
    pub fn is_number(self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Float)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident => write!(f, "Ident"),
            TokenKind::String => write!(f, "String"),
            TokenKind::Raw => write!(f, "Raw"),
            TokenKind::Int => write!(f, "Int"),
            TokenKind::Float => write!(f, "Float"),
            TokenKind::Comment => write!(f, "Comment"),
            TokenKind::Colon => write!(f, "\":\""),
            TokenKind::Plus => write!(f, "\"+\""),
            TokenKind::Minus => write!(f, "\"-\""),
            TokenKind::Hash => write!(f, "\"#\""),
            TokenKind::Symbol(c) => write!(f, "{c:?}"),
        }
    }
}

/// A scanned token with position and indentation metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Literal text (unquoted for strings, unwrapped for raw content)
    pub text: String,
    pub span: Span,
    /// True for the first token after one or more newlines (and the first token of the input)
    pub line_start: bool,
    /// Width of the leading whitespace of the token's line
    pub indent: usize,
}

impl Token {
    pub fn location(&self) -> Location {
        self.span.start
    }
}
