pub mod check;
pub mod completions;
pub mod decode;
pub mod store;

use std::path::Path;

use clap::{ArgAction, Parser, Subcommand};

use crate::error::Result;
use crate::parser::DecodeOptions;

/// brief - Indented element tree decoder and encoder
#[derive(Parser, Debug)]
#[command(name = "brief")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a file and print the result
    Decode(decode::DecodeArgs),

    /// Decode files and report which ones fail
    Check(check::CheckArgs),

    /// Store a file's root elements in a node store
    Put(store::PutArgs),

    /// Print a stored element
    Get(store::GetArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Log filter directive for a `-v` count.
pub fn directive_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Options from an optional YAML file, with command-line overrides applied.
pub fn load_options(config: Option<&Path>, tab_width: Option<usize>) -> Result<DecodeOptions> {
    let mut options = match config {
        Some(path) => DecodeOptions::load(path)?,
        None => DecodeOptions::default(),
    };
    if let Some(width) = tab_width {
        options = options.with_tab_width(width.max(1));
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::parse_from(["brief", "-vv", "check", "a.brf"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(directive_for_verbosity(cli.verbose), "trace");
        assert_eq!(directive_for_verbosity(0), "warn");
    }

    #[test]
    fn test_load_options_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brief.yaml");
        std::fs::write(&path, "tab_width: 8\nmax_include_depth: 2\n").unwrap();

        let options = load_options(Some(&path), Some(2)).unwrap();
        assert_eq!(options.tab_width, 2);
        assert_eq!(options.max_include_depth, 2);

        assert_eq!(load_options(None, None).unwrap(), DecodeOptions::default());
    }
}
