//! CLI argument definitions
//!
//! All Clap derive structs for `dml-config` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::ConfigFormat;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Check, repair and describe Deep Mob Learning: Refabricated settings.
#[derive(Parser, Debug)]
#[command(name = "dml-config", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "DML_COLOR")]
    pub color: ColorChoice,

    /// Format of diagnostics written to stderr.
    #[arg(long, default_value = "human", global = true, env = "DML_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load settings files and report every value that needed repair.
    Validate(ValidateArgs),

    /// Print the repaired settings, or write them back in place.
    Normalize(NormalizeArgs),

    /// Print the default settings.
    Defaults(DefaultsArgs),

    /// Describe every setting: type, default, bound and display group.
    Schema(SchemaArgs),
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Settings files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Fail when any value needed repair or any key is unknown.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `normalize`.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Settings file to normalize.
    #[arg(env = "DML_CONFIG")]
    pub file: PathBuf,

    /// Rewrite the file in place instead of printing.
    #[arg(short, long)]
    pub write: bool,

    /// Format of the printed output (defaults to the input's format).
    #[arg(long, conflicts_with = "write")]
    pub output_format: Option<FileFormat>,
}

/// Arguments for `defaults`.
#[derive(Args, Debug)]
pub struct DefaultsArgs {
    /// Output format.
    #[arg(long, default_value = "json")]
    pub output_format: FileFormat,

    /// Write to this path instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `schema`.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Settings file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl From<FileFormat> for ConfigFormat {
    fn from(format: FileFormat) -> Self {
        match format {
            FileFormat::Json => Self::Json,
            FileFormat::Yaml => Self::Yaml,
        }
    }
}
