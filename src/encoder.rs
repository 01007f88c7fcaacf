//! Writing nodes back out as brief text.
//!
//! Output is pre-order with every node on its own line at its recorded
//! indent, so decoding it rebuilds the same tree. Names and values are left
//! bare when they scan back as a single identifier or a (possibly negative)
//! number, and quoted otherwise.

use std::fmt::Write;

use tracing::warn;

use crate::node::{Forest, NodeRef};
use crate::parser::scanner::{Scanner, BLOCK_DELIMITERS};
use crate::parser::token::TokenKind;

/// True when `value` reads back as itself without quotes.
pub fn no_quote(value: &str) -> bool {
    let mut scanner = Scanner::new(value);
    let text = match scanner.next_token() {
        Ok(Some(token)) if token.kind == TokenKind::Ident || token.kind.is_number() => token.text,
        Ok(Some(token)) if token.kind == TokenKind::Minus => match scanner.next_token() {
            Ok(Some(number)) if number.kind.is_number() => format!("-{}", number.text),
            _ => return false,
        },
        _ => return false,
    };
    text == value && matches!(scanner.next_token(), Ok(None))
}

/// `value` as a double-quoted string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn literal(value: &str) -> String {
    if no_quote(value) {
        value.to_string()
    } else {
        quote(value)
    }
}

/// Content as a backtick string, or a `#<delim>` block when it holds backticks.
fn content(value: &str) -> String {
    if !value.contains('`') {
        return format!("`{value}`");
    }
    let delim = BLOCK_DELIMITERS
        .iter()
        .copied()
        .find(|d| !value.contains(&format!("{d}#")))
        .unwrap_or_else(|| {
            warn!("content contains every block terminator; output will not decode");
            BLOCK_DELIMITERS[0]
        });
    format!("#{delim}{value}{delim}#")
}

fn write_node(out: &mut String, node: NodeRef<'_>, shift: usize) {
    let indent = node.indent().saturating_sub(shift);
    let _ = write!(out, "{:indent$}{}", "", node.kind());
    if !node.name().is_empty() {
        let _ = write!(out, ":{}", literal(node.name()));
    }
    for (key, value) in node.keys() {
        let _ = write!(out, " {}:{}", key, literal(value));
    }
    if !node.content().is_empty() {
        let _ = write!(out, " {}", content(node.content()));
    }
    out.push('\n');

    for child in node.children() {
        write_node(out, child, shift);
    }
}

impl NodeRef<'_> {
    /// Brief text for this node and its subtree.
    pub fn encode(&self) -> Vec<u8> {
        self.encode_string().into_bytes()
    }

    pub fn encode_string(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, *self, 0);
        out
    }

    /// Like [`encode_string`](Self::encode_string), shifted so this node sits at column 0.
    pub fn encode_rebased(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, *self, self.indent());
        out
    }
}

impl Forest {
    /// Every root in order.
    pub fn encode(&self) -> Vec<u8> {
        self.encode_string().into_bytes()
    }

    pub fn encode_string(&self) -> String {
        let mut out = String::new();
        for root in self.roots() {
            write_node(&mut out, root, 0);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::parser::{decode_file, decode_str, DecodeOptions};
    use pretty_assertions::assert_eq;

    const TEST0: &str = include_str!("../tests/fixtures/test0.brf");
    const TEST1: &str = include_str!("../tests/fixtures/test1.brf");
    const MULTIPLE: &str = include_str!("../tests/fixtures/multiple.brf");
    const SPRITES: &str = include_str!("../tests/fixtures/sprites.brf");

    fn assert_round_trip(source: &str) {
        let forest = decode_str(source).unwrap();
        let encoded = forest.encode_string();
        let again = decode_str(&encoded).unwrap();

        assert_eq!(forest.len(), again.len());
        for (a, b) in forest.roots().zip(again.roots()) {
            assert_eq!(a, b, "encoded as:\n{encoded}");
        }
    }

    #[test]
    fn test_no_quote() {
        for value in ["one", "-22", "33.0e-4", "0x1F", "-.5", "snake_case", "été"] {
            assert!(no_quote(value), "{value} should be bare");
        }
        for value in ["", "two words", "a:b", "say \"hi\"", "-", "-abc", "a.png", "#x", " x", "x\n", "1 2"] {
            assert!(!no_quote(value), "{value:?} should be quoted");
        }
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a \"b\" \\ c"), r#""a \"b\" \\ c""#);
        assert_eq!(quote("line\nnext\ttab"), r#""line\nnext\ttab""#);
    }

    #[test]
    fn test_encode_exact_output() {
        let mut forest = Forest::new();
        let html = forest.add_root(Node::new("html").named("index").with_key("lang", "en"));
        let body = forest.add(html, Node::new("body").with_key("class", "main page"));
        forest.add(body, Node::new("p").with_key("z", "-3").with_key("a", "1").with_content("hi"));
        forest.add(html, Node::new("foot").named("X/Y"));

        let expected = "\
html:index lang:en
    body class:\"main page\"
        p a:1 z:-3 `hi`
    foot:\"X/Y\"
";
        assert_eq!(forest.encode_string(), expected);
    }

    #[test]
    fn test_content_fallback_to_block() {
        let mut forest = Forest::new();
        forest.add_root(Node::new("code").with_content("use `tick`"));
        forest.add_root(Node::new("odd").with_content("`a|#b`"));

        assert_eq!(forest.encode_string(), "code #|use `tick`|#\nodd #@`a|#b`@#\n");
        let again = decode_str(&forest.encode_string()).unwrap();
        assert_eq!(again.root(1).unwrap().content(), "`a|#b`");
    }

    #[test]
    fn test_round_trip_fixtures() {
        assert_round_trip(TEST0);
        assert_round_trip(TEST1);
        assert_round_trip(MULTIPLE);
        assert_round_trip(SPRITES);
    }

    #[test]
    fn test_round_trip_after_includes() {
        let pages = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("pages.brf");
        let forest = decode_file(&pages, &DecodeOptions::default()).unwrap();
        let encoded = forest.encode_string();

        assert_round_trip(&encoded);
        assert_eq!(decode_str(&encoded).unwrap().root(0).unwrap(), forest.root(0).unwrap());
    }

    #[test]
    fn test_round_trip_awkward_values() {
        let mut forest = Forest::new();
        let root = forest.add_root(
            Node::new("root")
                .named("with space")
                .with_key("empty", "")
                .with_key("quote", "say \"hi\"")
                .with_key("neg", "-42.0")
                .with_key("path", "a/b:c"),
        );
        forest.add(root, Node::new("leaf").with_content("multi\nline"));

        let again = decode_str(&forest.encode_string()).unwrap();
        assert_eq!(forest.node(root), again.root(0).unwrap());
    }

    #[test]
    fn test_encode_single_subtree() {
        let forest = decode_str(TEST1).unwrap();
        let div = forest.root(0).unwrap().find("div").unwrap();

        assert_eq!(
            String::from_utf8(div.encode()).unwrap(),
            "        div:main class:myblock\n            p id:\"X/Y = 2\" `the quick brown fox`\n"
        );
        assert_eq!(
            div.encode_rebased(),
            "div:main class:myblock\n    p id:\"X/Y = 2\" `the quick brown fox`\n"
        );
    }
}
