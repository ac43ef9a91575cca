//! Vista CLI Library
//!
//! Command-line interface for the Vista visual regression engine.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    BaselineAction, BaselineArgs, Cli, ColorArg, Commands, CompareArgs, OutputFormatArg, RunArgs,
    StoreArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use handlers::Outcome;
pub use output::{format_result, OutputFormat, ProgressReporter};
