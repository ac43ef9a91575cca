//! Vista CLI: visual regression testing from the command line
//!
//! ## Usage
//!
//! ```bash
//! vista compare --name home --image shots/home.png   # One comparison
//! vista run suites/smoke.yaml                        # A whole suite
//! vista baseline list                                # Stored baselines
//! vista baseline remove home                         # Re-baseline next run
//! ```
//!
//! Exit status is 0 when nothing failed, 1 otherwise.

use clap::Parser;
use std::process::ExitCode;
use vista_cli::{
    handlers::{self, execute_baseline, execute_compare, execute_run},
    logging, Cli, CliConfig, CliResult, ColorChoice, Commands, Outcome, Verbosity,
};

fn main() -> ExitCode {
    match run() {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Problems) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<Outcome> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);
    logging::init(&config);

    let vista = handlers::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Compare(args) => execute_compare(&config, vista, &args),
        Commands::Run(args) => execute_run(&config, vista, &args),
        Commands::Baseline(args) => execute_baseline(&config, vista, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_log_json(cli.log_json)
}
