//! Put and get commands for the node store.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use crate::error::{BriefError, Result};
use crate::output::{display_path, plural, Printer};
use crate::parser::{decode_file, DecodeOptions};
use crate::store::Store;

/// Store a file's root elements in a node store
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Store directory
    #[arg(long, short)]
    pub store: PathBuf,

    /// File whose root elements are stored
    pub file: PathBuf,
}

/// Print a stored element
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Store directory
    #[arg(long, short)]
    pub store: PathBuf,

    /// Element type
    #[arg(value_name = "TYPE")]
    pub kind: String,

    /// Element name; lists the stored names when omitted
    pub name: Option<String>,
}

pub fn put(args: PutArgs) -> Result<()> {
    let store = Store::open(&args.store)?;
    let forest = decode_file(&args.file, &DecodeOptions::default())?;
    let printer = Printer::new();

    for root in forest.roots() {
        let path = store.put(root)?;
        printer.status("Stored", &display_path(&path));
    }
    printer.success("Finished", &plural(forest.len(), "element", "elements"));
    Ok(())
}

pub fn get(args: GetArgs) -> Result<()> {
    let store = Store::open(&args.store)?;
    let mut stdout = std::io::stdout().lock();

    let Some(name) = args.name else {
        for name in store.list(&args.kind)? {
            writeln!(stdout, "{name}")?;
        }
        return Ok(());
    };

    match store.get(&args.kind, &name)? {
        Some(forest) => {
            stdout.write_all(&forest.encode())?;
            Ok(())
        }
        None => Err(BriefError::Store {
            message: format!("no {}:{} in {}", args.kind, name, display_path(store.root())),
            help: Some(format!("Run `brief get --store {} {}` to list names", display_path(store.root()), args.kind)),
        }),
    }
}
