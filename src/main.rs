//! # interop
//!
//! Command-line front end for the `interop` metric codec and run summary.
//!
//! ## Usage
//!
//! ```bash
//! # Summarize a run from its metric files
//! interop summary --layout run.toml --tile TileMetricsOut.bin --q QMetricsOut.bin
//!
//! # Inspect a single metric file
//! interop dump --kind extraction ExtractionMetricsOut.bin
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
