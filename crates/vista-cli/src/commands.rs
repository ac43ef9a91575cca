//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Vista: SSIM-based visual regression testing against stored baselines
#[derive(Parser, Debug)]
#[command(name = "vista")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only failures and errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (YAML)
    #[arg(long, global = true, env = "VISTA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare one image against its baseline
    Compare(CompareArgs),

    /// Run every comparison in a suite manifest
    Run(RunArgs),

    /// Inspect or remove stored baselines
    Baseline(BaselineArgs),
}

/// Directory overrides shared by commands that touch stores
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Baseline directory
    #[arg(long)]
    pub baselines: Option<PathBuf>,

    /// Directory for diff artifacts
    #[arg(long)]
    pub results: Option<PathBuf>,
}

/// Arguments for the compare command
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Test name (baseline key)
    #[arg(short, long)]
    pub name: String,

    /// Image of the current state
    #[arg(short, long)]
    pub image: PathBuf,

    /// Minimum similarity to pass (0.0-1.0)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    #[command(flatten)]
    pub stores: StoreArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormatArg,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Suite manifest (YAML)
    pub manifest: PathBuf,

    #[command(flatten)]
    pub stores: StoreArgs,

    /// Where to write the JSON report (defaults to the results directory)
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormatArg,
}

/// Arguments for the baseline command
#[derive(Parser, Debug)]
pub struct BaselineArgs {
    /// Baseline directory
    #[arg(long, global = true)]
    pub baselines: Option<PathBuf>,

    /// Baseline operation
    #[command(subcommand)]
    pub action: BaselineAction,
}

/// Baseline operations
#[derive(Subcommand, Debug)]
pub enum BaselineAction {
    /// List stored baselines
    List,

    /// Delete a baseline so the next comparison re-creates it
    Remove {
        /// Test name
        name: String,
    },

    /// Show details of a baseline
    Show {
        /// Test name
        name: String,
    },
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

impl From<OutputFormatArg> for crate::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => Self::Text,
            OutputFormatArg::Json => Self::Json,
        }
    }
}
