use std::path::PathBuf;

use clap::Args;

use crate::error::{BriefError, Result};
use crate::output::{display_path, plural, Printer};
use crate::parser::decode_file;

use super::load_options;

/// Decode files and report which ones fail
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// YAML file with decode options
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let options = load_options(args.config.as_deref(), None)?;
    let printer = Printer::new();
    let mut failed = 0;

    for file in &args.files {
        match decode_file(file, &options) {
            Ok(forest) => printer.status(
                "Checked",
                &format!(
                    "{} {}",
                    display_path(file),
                    printer.dim(&format!("({})", plural(forest.len(), "root", "roots")))
                ),
            ),
            Err(err) => {
                failed += 1;
                printer.error("Failed", &format!("{}: {}", display_path(file), err));
                if let Some(location) = err.location() {
                    eprintln!("{:>12} {}", "", printer.dim(&format!("at {location}")));
                }
            }
        }
    }

    if failed > 0 {
        return Err(BriefError::Reference {
            message: format!("{} of {} failed to decode", plural(failed, "file", "files"), args.files.len()),
            help: Some("Run `brief decode <file>` for the full error".to_string()),
        });
    }

    printer.success("Finished", &format!("{} ok", plural(args.files.len(), "file", "files")));
    Ok(())
}
