//! Reading brief sources into a [`Forest`].
//!
//! A brief file is a sequence of indented lines. Each line opens an element
//! with a type, an optional name, `key:value` pairs and optional content:
//!
//! ```text
//! html:index lang:en
//!     head
//!         title `My Web Page`
//!     body class:main
//!         #include "body.brf"
//! ```
//!
//! Indentation decides nesting. `+` continues the previous element on a new
//! line, and `#include "path"` splices in another file at the current indent.
//!
//! # Usage
//!
//! ```ignore
//! use brief::parser::{decode_file, DecodeOptions};
//!
//! let forest = decode_file("site/index.brf".as_ref(), &DecodeOptions::default())?;
//! for root in forest.roots() {
//!     println!("{}", root.node().spec_string());
//! }
//! ```

mod decoder;
mod include;
pub mod options;
pub mod scanner;
pub mod span;
pub mod token;

use std::io::Read;
use std::path::{Path, PathBuf};

pub use decoder::{Decoder, Slot, State};
pub use options::DecodeOptions;
pub use scanner::Scanner;
pub use span::{Location, Span};
pub use token::{Token, TokenKind};

use crate::error::{BriefError, Result};
use crate::node::Forest;

/// Decode `source`, resolving includes against `base_dir`.
pub fn decode(source: &str, base_dir: impl AsRef<Path>) -> Result<Forest> {
    let options = DecodeOptions::default().with_base_dir(base_dir.as_ref());
    decode_with(source, &options)
}

/// Decode `source` with default options.
pub fn decode_str(source: &str) -> Result<Forest> {
    decode_with(source, &DecodeOptions::default())
}

pub fn decode_with(source: &str, options: &DecodeOptions) -> Result<Forest> {
    Decoder::new(source, options.clone()).decode()
}

/// Decode a file. Includes resolve relative to the file's directory,
/// overriding any `base_dir` in `options`.
pub fn decode_file(path: &Path, options: &DecodeOptions) -> Result<Forest> {
    let path = absolute(path);
    let source = std::fs::read_to_string(&path).map_err(|e| BriefError::Io {
        path: path.clone(),
        message: format!("Failed to read file: {}", e),
    })?;

    let mut options = options.clone();
    if let Some(dir) = path.parent() {
        options.base_dir = Some(dir.to_path_buf());
    }
    decode_with(&source, &options)
}

/// Decode everything readable from `reader`.
pub fn decode_reader(mut reader: impl Read, options: &DecodeOptions) -> Result<Forest> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    decode_with(&source, options)
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_reader() {
        let forest = decode_reader("a\n  b\n".as_bytes(), &DecodeOptions::default()).unwrap();
        assert_eq!(forest.root(0).unwrap().children().len(), 1);
    }

    #[test]
    fn test_decode_file_missing() {
        let result = decode_file(Path::new("/nonexistent/site.brf"), &DecodeOptions::default());
        assert!(matches!(result, Err(BriefError::Io { .. })));
    }

    #[test]
    fn test_decode_file_overrides_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.brf"), "root\n  #include \"leaf.brf\"\n").unwrap();
        std::fs::write(dir.path().join("leaf.brf"), "leaf\n").unwrap();

        let options = DecodeOptions::default().with_base_dir("/nonexistent");
        let forest = decode_file(&dir.path().join("main.brf"), &options).unwrap();
        assert_eq!(forest.root(0).unwrap().children().next().unwrap().kind(), "leaf");
    }

    #[test]
    fn test_decode_with_tab_width() {
        let options = DecodeOptions::default().with_tab_width(2);
        let forest = decode_with("a\n\tb\n", &options).unwrap();
        assert_eq!(forest.root(0).unwrap().children().next().unwrap().indent(), 2);
    }
}
