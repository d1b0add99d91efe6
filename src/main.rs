//! # modspace CLI
//!
//! This is the binary entry point for the `modspace` command-line tool.
//!
//! It parses the command line with `clap` and hands over to [`cli::Cli::execute`].
//! Errors bubble up as `anyhow` errors, which are printed to stderr and turn
//! into exit code 1; usage errors exit with code 2 through `clap`.
//!
//! The workspace logic lives in the `modspace` library crate, keeping the
//! binary a thin wrapper around it.

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
