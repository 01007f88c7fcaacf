//! brief - an indentation-structured element tree format
//!
//! Decodes brief text into a forest of typed elements, answers path and
//! ancestor-context queries over it, and encodes it back to text that
//! decodes to the same tree.
//!
//! ```ignore
//! let forest = brief::decode_str("html\n  body class:main\n    div:d1\n")?;
//! let div = forest.root(0).unwrap().find("div").unwrap();
//! assert_eq!(div.lookup("body.class"), "main");
//! ```

pub mod cli;
pub mod encoder;
pub mod error;
pub mod node;
pub mod output;
pub mod parser;
pub mod query;
pub mod store;

pub use error::{BriefError, Result};
pub use node::{Forest, Node, NodeId, NodeRef, SYNTH_INDENT};
pub use parser::{decode, decode_file, decode_reader, decode_str, decode_with, DecodeOptions};
pub use query::{Spec, ValueSpec, NO_CONTEXT, NO_KEY, NO_NAME, NO_VALUE};
pub use store::Store;
