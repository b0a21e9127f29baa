//! CLI argument definitions for the design tracker.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tracker",
    version,
    about = "Design tracker - outline, ownership and integrity checks",
    long_about = "Inspect the instance hierarchy of a JSON design.\n\n\
                  Shows every circuit instance and component with its owner, \
                  flags owners outside the selection and tracking metadata \
                  whose integrity hash no longer matches."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// TOML configuration file with [integrity], [outline] and [authors].
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Digest algorithm (overrides the configuration file).
    #[arg(long = "algorithm", value_name = "NAME", global = true)]
    pub algorithm: Option<String>,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the instance outline with its ownership overlay.
    Outline(OutlineArgs),

    /// List flagged nodes; exits with status 2 if there are any.
    Verify(VerifyArgs),

    /// Stamp and seal every element without an integrity hash.
    Seal(SealArgs),

    /// List the distinct owners in the whole hierarchy.
    Owners(DesignArg),

    /// Print the integrity digest of an ad-hoc tracking record.
    Hash(HashArgs),
}

#[derive(Parser)]
pub struct DesignArg {
    /// JSON design file.
    #[arg(value_name = "DESIGN")]
    pub design: PathBuf,
}

#[derive(Parser)]
pub struct OutlineArgs {
    #[command(flatten)]
    pub design: DesignArg,

    /// Expand this many levels below the root (default: all).
    #[arg(long = "depth", value_name = "N")]
    pub depth: Option<usize>,

    /// Comma-separated owners treated as valid (overrides the configuration).
    #[arg(long = "select", value_name = "AUTHORS")]
    pub select: Option<String>,

    /// Mark a `/`-separated chain of subcircuit labels or names as the
    /// current view.
    #[arg(long = "focus", value_name = "PATH")]
    pub focus: Option<String>,

    /// Print an indented text outline instead of a table.
    #[arg(long = "plain")]
    pub plain: bool,
}

#[derive(Parser)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub design: DesignArg,

    /// Comma-separated owners treated as valid (overrides the configuration).
    #[arg(long = "select", value_name = "AUTHORS")]
    pub select: Option<String>,
}

#[derive(Parser)]
pub struct SealArgs {
    #[command(flatten)]
    pub design: DesignArg,

    /// Owner written into elements that have none.
    #[arg(long = "author", value_name = "NAME")]
    pub author: String,

    /// Version written into elements that have none.
    #[arg(long = "version", value_name = "V", default_value = "1.0")]
    pub version: String,

    /// Destination file (default: overwrite DESIGN).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct HashArgs {
    #[arg(long = "owner")]
    pub owner: Option<String>,

    /// Date as `YYYY-MM-DD HH:MM:SS`.
    #[arg(long = "date")]
    pub date: Option<String>,

    #[arg(long = "version")]
    pub version: Option<String>,

    #[arg(long = "uuid")]
    pub uuid: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
