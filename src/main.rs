//! spritetrim CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, dispatch to
//! single-sheet, batch, or survey mode, and exit with appropriate status.
//! For programmatic use, prefer the library API (`spritetrim::api`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}
