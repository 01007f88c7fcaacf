//! Decode command implementation.
//!
//! Decodes one file and prints it re-encoded, as a debug tree, or as JSON.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::error::Result;
use crate::node::Forest;
use crate::parser::decode_file;

use super::load_options;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Brief text, re-encoded
    #[default]
    Brief,
    /// Indented debug tree with parent links
    Tree,
    /// JSON array of root elements
    Json,
}

/// Decode a file and print the result
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File to decode
    pub file: PathBuf,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = Format::Brief)]
    pub format: Format,

    /// Columns per tab in leading whitespace
    #[arg(long)]
    pub tab_width: Option<usize>,

    /// YAML file with decode options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fold content-only children into their parent's keys
    #[arg(long)]
    pub compile: bool,
}

pub fn run(args: DecodeArgs) -> Result<()> {
    let options = load_options(args.config.as_deref(), args.tab_width)?;
    let mut forest = decode_file(&args.file, &options)?;

    if args.compile {
        compile_all(&mut forest);
    }

    let rendered = render(&forest, args.format)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    Ok(())
}

/// Compile every element, innermost first.
pub fn compile_all(forest: &mut Forest) {
    let mut order = Vec::new();
    let mut stack: Vec<_> = forest.root_ids().to_vec();
    while let Some(id) = stack.pop() {
        order.push(id);
        stack.extend(forest.node(id).node().body().iter().copied());
    }
    for id in order.into_iter().rev() {
        forest.compile(id);
    }
}

pub fn render(forest: &Forest, format: Format) -> Result<String> {
    Ok(match format {
        Format::Brief => forest.encode_string(),
        Format::Tree => forest.roots().map(|root| format!("{root}\n")).collect(),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(forest).map_err(std::io::Error::from)?;
            json.push('\n');
            json
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::decode_str;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_brief() {
        let forest = decode_str("a x:1\n  b\n").unwrap();
        assert_eq!(render(&forest, Format::Brief).unwrap(), "a x:1\n  b\n");
    }

    #[test]
    fn test_render_json() {
        let forest = decode_str("a:one\n").unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render(&forest, Format::Json).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!([{ "type": "a", "name": "one" }]));
    }

    #[test]
    fn test_compile_all_folds_nested_levels() {
        let mut forest = decode_str("page\n  meta\n    title `Home`\n  body `text`\n").unwrap();
        compile_all(&mut forest);

        let page = forest.root(0).unwrap();
        assert_eq!(page.get("body"), Some("text"));
        let meta = page.child(&["meta"]).unwrap();
        assert_eq!(meta.get("title"), Some("Home"));
        assert_eq!(meta.children().len(), 0);
    }
}
