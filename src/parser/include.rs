//! Decoder features (`#name "argument"`). Only `#include` exists.
//!
//! `#include "path"` decodes another file in place. The path is relative to
//! the directory of the file being decoded. The included file is decoded by
//! a nested decoder whose indents are padded by the indent of the `#include`
//! line. Each included root is then placed by its padded indent exactly as
//! a decoded line would be, and stays open for the lines that follow.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{BriefError, Result};

use super::decoder::Decoder;
use super::token::Token;

impl Decoder<'_> {
    /// Dispatch the captured feature with its argument.
    pub(super) fn run_feature(&mut self, argument: &Token) -> Result<()> {
        match self.feature.to_lowercase().as_str() {
            "include" => self.include(&argument.text),
            other => Err(BriefError::Reference {
                message: format!("unknown brief feature {other} at {}", argument.location()),
                help: Some("The only supported feature is #include".to_string()),
            }),
        }
    }

    fn include(&mut self, target: &str) -> Result<()> {
        let path = self.base_dir.join(target);
        let padding = self.indent();

        if self.depth >= self.options.max_include_depth {
            return Err(BriefError::Reference {
                message: format!(
                    "include depth limit of {} exceeded at {}",
                    self.options.max_include_depth,
                    path.display()
                ),
                help: Some("Check for files that include each other".to_string()),
            });
        }

        debug!(path = %path.display(), padding, depth = self.depth + 1, "include");

        let source = fs::read_to_string(&path).map_err(|e| BriefError::Reference {
            message: format!("unable to read include {}: {}", path.display(), e),
            help: None,
        })?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.clone());

        let included = Decoder::nested(&source, self.options.clone(), dir, padding, self.depth + 1)
            .decode()
            .map_err(|e| BriefError::Include {
                path: path.clone(),
                source: Box::new(e),
            })?;

        if included.is_empty() {
            debug!(path = %path.display(), "include file was empty");
            return Ok(());
        }
        for id in self.forest.absorb(included) {
            self.place(id);
        }
        Ok(())
    }
}
