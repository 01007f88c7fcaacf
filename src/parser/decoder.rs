//! The brief decoder: a state machine over the scanner's token stream.
//!
//! Every line opens an element (or continues one with `+`, or runs a
//! `#feature`). Where the element lands in the tree is decided by its
//! indent against a stack of open elements: entries whose indent is not
//! strictly smaller are closed, and the first remaining entry becomes the
//! parent. An empty stack makes the element a new root.
//!
//! | state        | token                      | next        |
//! |--------------|----------------------------|-------------|
//! | `NewLine`    | ident (opens element)      | `KeyElem`   |
//! | `NewLine`    | `+`                        | `KeyEmpty`  |
//! | `NewLine`    | `#`                        | `OnFeature` |
//! | `KeyElem`    | ident (key)                | `KeyValue`  |
//! | `KeyElem`    | `:`                        | `OnName`    |
//! | `KeyElem`    | raw (content)              | `KeyEmpty`  |
//! | `KeyEmpty`   | ident (key)                | `KeyValue`  |
//! | `KeyEmpty`   | raw (content)              | `KeyEmpty`  |
//! | `KeyEmpty`   | `#`                        | `OnFeature` |
//! | `KeyValue`   | `:`                        | `OnValue`   |
//! | `OnName`     | ident / literal (name)     | `KeyEmpty`  |
//! | `OnName`     | `-`                        | `NegValue`  |
//! | `OnValue`    | ident / literal (value)    | `KeyEmpty`  |
//! | `OnValue`    | `-`                        | `NegValue`  |
//! | `NegValue`   | number                     | `KeyEmpty`  |
//! | `OnFeature`  | ident (feature name)       | `FeatureSet`|
//! | `FeatureSet` | literal / raw (argument)   | `KeyEmpty`  |
//!
//! Any other pair is a syntax error. A new line may only begin from
//! `KeyElem`, `KeyEmpty` or `OnComment`.

use std::fmt;
use std::path::PathBuf;

use tracing::trace;

use crate::error::{BriefError, Result};
use crate::node::{Forest, Node, NodeId};

use super::options::DecodeOptions;
use super::scanner::Scanner;
use super::span::Location;
use super::token::{Token, TokenKind};

/// What a `-` in value position negates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Name,
    Value,
}

/// Decoder states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// At the first token of a line
    NewLine,
    /// Element just opened; the key holds its type
    KeyElem,
    /// Key captured, waiting for `:`
    KeyValue,
    /// Ready for the next key or content
    KeyEmpty,
    /// `:` right after the element; next literal is the name
    OnName,
    /// `:` after a key; next literal is the value
    OnValue,
    /// Minus consumed where a name or value was expected
    NegValue(Slot),
    /// `#` seen; next identifier is the feature
    OnFeature,
    /// Feature captured, waiting for its argument
    FeatureSet,
    /// Line holds only a comment so far
    OnComment,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::NegValue(slot) => write!(f, "NegValue({slot:?})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Decoder for one brief source.
///
/// Includes run a fresh nested decoder to completion before this one resumes.
pub struct Decoder<'a> {
    pub(super) scanner: Scanner<'a>,
    pub(super) forest: Forest,
    nesting: Vec<NodeId>,
    state: State,
    key: String,
    pub(super) feature: String,
    /// Added to every scanned indent; set when decoding an included file
    pub(super) padding: usize,
    line_indent: usize,
    end: Location,
    pub(super) base_dir: PathBuf,
    pub(super) options: DecodeOptions,
    pub(super) depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(source: &'a str, options: DecodeOptions) -> Self {
        let base_dir = options.resolve_base_dir();
        Self::nested(source, options, base_dir, 0, 0)
    }

    pub(super) fn nested(
        source: &'a str,
        options: DecodeOptions,
        base_dir: PathBuf,
        padding: usize,
        depth: usize,
    ) -> Self {
        Self {
            scanner: Scanner::with_tab_width(source, options.tab_width),
            forest: Forest::new(),
            nesting: Vec::new(),
            state: State::KeyEmpty,
            key: String::new(),
            feature: String::new(),
            padding,
            line_indent: 0,
            end: Location::start(),
            base_dir,
            options,
            depth,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Consume the whole input. Stops at the first error.
    pub fn decode(mut self) -> Result<Forest> {
        while let Some(token) = self.scanner.next_token()? {
            self.end = token.span.end;
            self.step(&token)?;
        }

        match self.state {
            State::NewLine | State::KeyElem | State::KeyEmpty | State::OnComment => Ok(self.forest),
            state => Err(BriefError::Syntax {
                message: "unexpected end of input".to_string(),
                state: state.to_string(),
                token: String::new(),
                location: self.end,
                help: Some("Complete the name, value or feature on the last line".to_string()),
            }),
        }
    }

    fn step(&mut self, token: &Token) -> Result<()> {
        self.line_indent = token.indent;

        if token.line_start {
            match self.state {
                State::KeyElem | State::KeyEmpty | State::OnComment => self.state = State::NewLine,
                _ => return Err(self.syntax_error("invalid stray token at end of line above", token)),
            }
        }

        trace!(state = %self.state, kind = %token.kind, text = %token.text, "decode");

        use TokenKind as K;
        let next = match (self.state, token.kind) {
            (State::NewLine, K::Comment) | (State::OnComment, K::Comment) => State::OnComment,
            (state, K::Comment) => state,

            (State::NewLine, K::Ident) => {
                self.open_node(token);
                self.key = token.text.clone();
                State::KeyElem
            }
            (State::NewLine, K::Plus) => State::KeyEmpty,
            (State::NewLine | State::KeyElem | State::KeyEmpty, K::Hash) => State::OnFeature,

            (State::KeyElem | State::KeyEmpty, K::Ident) => {
                self.key = token.text.clone();
                State::KeyValue
            }
            (State::KeyElem | State::KeyEmpty, K::Raw) => {
                self.key.clear();
                self.set_content(token)?;
                State::KeyEmpty
            }
            (State::KeyElem, K::Colon) => State::OnName,
            (State::KeyValue, K::Colon) => State::OnValue,

            (State::OnName, K::Ident | K::String | K::Int | K::Float) => {
                self.set_name(token, false)?;
                self.key.clear();
                State::KeyEmpty
            }
            (State::OnValue, K::Ident | K::String | K::Int | K::Float) => {
                self.set_value(token, false)?;
                self.key.clear();
                State::KeyEmpty
            }
            (State::OnName, K::Minus) => State::NegValue(Slot::Name),
            (State::OnValue, K::Minus) => State::NegValue(Slot::Value),

            (State::NegValue(slot), K::Int | K::Float) => {
                match slot {
                    Slot::Name => self.set_name(token, true)?,
                    Slot::Value => self.set_value(token, true)?,
                }
                self.key.clear();
                State::KeyEmpty
            }
            (State::NegValue(_), K::Ident) => {
                return Err(self.syntax_error("invalid minus before identifier", token));
            }
            (State::NegValue(_), K::String) => {
                return Err(self.syntax_error("invalid minus before string", token));
            }
            (State::NegValue(_), K::Raw) => {
                return Err(self.syntax_error("invalid minus before content", token));
            }

            (State::OnFeature, K::Ident) => {
                self.feature = token.text.clone();
                State::FeatureSet
            }
            (State::FeatureSet, K::String | K::Int | K::Float | K::Raw) => {
                self.run_feature(token)?;
                State::KeyEmpty
            }

            (_, kind) => return Err(self.syntax_error(&unexpected(kind), token)),
        };

        self.state = next;
        Ok(())
    }

    /// Indent of the current line, shifted by the include padding.
    pub(super) fn indent(&self) -> usize {
        self.line_indent + self.padding
    }

    /// Close every open element at `indent` or deeper; the remaining top is the parent.
    pub(super) fn find_parent(&mut self, indent: usize) -> Option<NodeId> {
        while let Some(&top) = self.nesting.last() {
            if indent > self.forest.node(top).indent() {
                return Some(top);
            }
            self.nesting.pop();
        }
        None
    }

    /// Place a node taken from an included file by its indent, then open it
    /// and its last-child chain, as if its lines had been decoded here.
    pub(super) fn place(&mut self, id: NodeId) {
        let indent = self.forest.node(id).indent();
        let parent = self.find_parent(indent);
        self.forest.link(parent, id);

        let mut open = Some(id);
        while let Some(id) = open {
            self.nesting.push(id);
            open = self.forest.node(id).node().body().last().copied();
        }
    }

    fn open_node(&mut self, token: &Token) {
        let indent = self.indent();
        let parent = self.find_parent(indent);
        let id = self
            .forest
            .attach(parent, Node::new(token.text.as_str()).with_indent(indent));
        self.nesting.push(id);
    }

    fn current(&self, token: &Token) -> Result<NodeId> {
        self.nesting.last().copied().ok_or_else(|| BriefError::Structural {
            message: format!("no open element for {:?}", token.text),
            location: token.location(),
        })
    }

    fn set_name(&mut self, token: &Token, negative: bool) -> Result<()> {
        let id = self.current(token)?;
        self.forest.node_mut(id).name = signed(token, negative);
        Ok(())
    }

    fn set_value(&mut self, token: &Token, negative: bool) -> Result<()> {
        let id = self.current(token)?;
        if self.key.is_empty() {
            return Err(BriefError::Structural {
                message: format!("value {:?} has no key", token.text),
                location: token.location(),
            });
        }
        let key = std::mem::take(&mut self.key);
        self.forest.put(id, key, signed(token, negative));
        Ok(())
    }

    fn set_content(&mut self, token: &Token) -> Result<()> {
        let id = self.current(token)?;
        self.forest.node_mut(id).content = token.text.clone();
        Ok(())
    }

    pub(super) fn syntax_error(&self, message: &str, token: &Token) -> BriefError {
        BriefError::Syntax {
            message: message.to_string(),
            state: self.state.to_string(),
            token: token.text.clone(),
            location: token.location(),
            help: None,
        }
    }
}

fn signed(token: &Token, negative: bool) -> String {
    if negative {
        format!("-{}", token.text)
    } else {
        token.text.clone()
    }
}

fn unexpected(kind: TokenKind) -> String {
    match kind {
        TokenKind::Ident => "invalid identifier found".to_string(),
        TokenKind::String | TokenKind::Int | TokenKind::Float => "invalid value found".to_string(),
        TokenKind::Raw => "invalid content found".to_string(),
        TokenKind::Minus => "invalid minus".to_string(),
        TokenKind::Colon => "invalid syntax ':'".to_string(),
        TokenKind::Plus => "invalid syntax '+'".to_string(),
        TokenKind::Hash => "invalid syntax '#'".to_string(),
        TokenKind::Comment => "invalid comment".to_string(),
        TokenKind::Symbol(c) => format!("invalid character {c:?}"),
    }
}
