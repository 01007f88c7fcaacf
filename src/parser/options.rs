//! Decoder configuration, loadable from YAML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BriefError, Result};

use super::scanner::DEFAULT_TAB_WIDTH;

/// Default bound on nested `#include` depth.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

/// Options for a decode.
///
/// ```yaml
/// tab_width: 2
/// base_dir: ./site
/// max_include_depth: 8
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Columns counted for a tab in leading whitespace.
    pub tab_width: usize,

    /// Directory that relative `#include` paths resolve against.
    /// `None` means the process working directory at decode time.
    pub base_dir: Option<PathBuf>,

    /// Maximum nesting of `#include` before decoding fails.
    pub max_include_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            base_dir: None,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Load options from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BriefError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse options from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        let options: Self = serde_yaml::from_str(content).map_err(|e| BriefError::Config {
            message: format!("Invalid config: {}", e),
            help: Some("Check the YAML syntax and field names".to_string()),
        })?;

        if options.tab_width == 0 {
            return Err(BriefError::Config {
                message: "tab_width must be at least 1".to_string(),
                help: None,
            });
        }
        Ok(options)
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// The include base directory, falling back to the working directory.
    pub fn resolve_base_dir(&self) -> PathBuf {
        match &self.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = DecodeOptions::default();
        assert_eq!(options.tab_width, 4);
        assert_eq!(options.base_dir, None);
        assert_eq!(options.max_include_depth, 32);
    }

    #[test]
    fn test_parse_partial_config() {
        let options = DecodeOptions::parse("tab_width: 2\n").unwrap();
        assert_eq!(options.tab_width, 2);
        assert_eq!(options.max_include_depth, DEFAULT_MAX_INCLUDE_DEPTH);
    }

    #[test]
    fn test_parse_full_config() {
        let options =
            DecodeOptions::parse("tab_width: 8\nbase_dir: site\nmax_include_depth: 3\n").unwrap();
        assert_eq!(options.tab_width, 8);
        assert_eq!(options.base_dir, Some(PathBuf::from("site")));
        assert_eq!(options.max_include_depth, 3);
    }

    #[test]
    fn test_parse_rejects_zero_tab_width() {
        assert!(matches!(
            DecodeOptions::parse("tab_width: 0"),
            Err(BriefError::Config { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(DecodeOptions::parse("tab_width: [nope").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brief.yaml");
        std::fs::write(&path, "max_include_depth: 4\n").unwrap();

        let options = DecodeOptions::load(&path).unwrap();
        assert_eq!(options.max_include_depth, 4);
    }

    #[test]
    fn test_load_missing_file() {
        let result = DecodeOptions::load(Path::new("/nonexistent/brief.yaml"));
        assert!(matches!(result, Err(BriefError::Io { .. })));
    }

    #[test]
    fn test_resolve_base_dir() {
        let options = DecodeOptions::default().with_base_dir("/tmp/site");
        assert_eq!(options.resolve_base_dir(), PathBuf::from("/tmp/site"));
    }
}
