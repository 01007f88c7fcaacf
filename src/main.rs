use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

use brief::cli::{directive_for_verbosity, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Decode(args) => brief::cli::decode::run(args)?,
        Commands::Check(args) => brief::cli::check::run(args)?,
        Commands::Put(args) => brief::cli::store::put(args)?,
        Commands::Get(args) => brief::cli::store::get(args)?,
        Commands::Completions(args) => brief::cli::completions::run(args)?,
    }

    Ok(())
}
