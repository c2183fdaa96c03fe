// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `batchup`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "batchup",
    version,
    about = "Run a batch of local backup jobs: copy or archive, rotate, report.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the job file (TOML).
    ///
    /// Default: `$BATCHUP_CONFIG`, or `Batchup.toml` in the current working
    /// directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Only run the named job(s). May be given more than once; the order of
    /// the job file is kept.
    #[arg(long = "job", value_name = "NAME")]
    pub jobs: Vec<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BATCHUP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print what each job would run, but don't touch
    /// anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with status 1 when any job was aborted.
    #[arg(long)]
    pub strict: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
