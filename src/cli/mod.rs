use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod config;
mod dump;
mod summary;

/// interop - Sequencing run-quality metric reader and summarizer
#[derive(Parser)]
#[command(name = "interop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Metric file family understood by `dump`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MetricKind {
    /// TileMetricsOut.bin
    Tile,
    /// ErrorMetricsOut.bin
    Error,
    /// ExtractionMetricsOut.bin
    Extraction,
    /// QMetricsOut.bin
    Q,
    /// QMetrics2030Out.bin
    QCollapsed,
    /// CorrectedIntMetricsOut.bin
    CorrectedIntensity,
    /// IndexMetricsOut.bin
    Index,
}

/// Metric files handed to `summary`; every family is optional.
#[derive(Debug, Default, clap::Args)]
pub struct MetricFiles {
    /// Tile metrics file
    #[arg(long, value_name = "FILE")]
    pub tile: Option<PathBuf>,

    /// Error metrics file
    #[arg(long, value_name = "FILE")]
    pub error: Option<PathBuf>,

    /// Extraction metrics file
    #[arg(long, value_name = "FILE")]
    pub extraction: Option<PathBuf>,

    /// Q-score metrics file
    #[arg(long, value_name = "FILE")]
    pub q: Option<PathBuf>,

    /// Collapsed q-score metrics file (derived from --q when omitted)
    #[arg(long, value_name = "FILE")]
    pub q_collapsed: Option<PathBuf>,

    /// Corrected intensity metrics file
    #[arg(long, value_name = "FILE")]
    pub corrected_intensity: Option<PathBuf>,

    /// Index metrics file
    #[arg(long, value_name = "FILE")]
    pub index: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a run by read and lane
    Summary {
        /// Run layout and summary settings (TOML)
        #[arg(long, value_name = "FILE")]
        layout: PathBuf,

        #[command(flatten)]
        files: MetricFiles,

        /// Skip median computation (overrides the config file)
        #[arg(long)]
        skip_median: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode one metric file and describe its contents
    Dump {
        /// Metric file family
        #[arg(short, long, value_enum)]
        kind: MetricKind,

        /// Input metric file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Summary {
            layout,
            files,
            skip_median,
            json,
        } => summary::run(layout, files, skip_median, json),
        Commands::Dump { kind, file } => dump::run(kind, file),
    }
}
