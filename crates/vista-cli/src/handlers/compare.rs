//! `vista compare`: one image against its baseline

use super::{apply_store_overrides, open_comparator, Outcome};
use crate::commands::CompareArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, ProgressReporter};
use vista::{ComparisonResult, FileCapture, TestIdentity, VistaConfig};

/// Run a single comparison and print its result
pub fn execute_compare(
    config: &CliConfig,
    vista: VistaConfig,
    args: &CompareArgs,
) -> CliResult<Outcome> {
    let result = compare(vista, args)?;

    match OutputFormat::from(args.format) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => {
            let reporter =
                ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
            reporter.result(&result);
        }
    }

    Ok(Outcome::from_problems(result.status.is_problem()))
}

/// Comparison without any output
pub fn compare(vista: VistaConfig, args: &CompareArgs) -> CliResult<ComparisonResult> {
    let id = TestIdentity::new(args.name.as_str())
        .map_err(|e| CliError::invalid_argument(e.to_string()))?;
    let vista = apply_store_overrides(vista, &args.stores);
    let threshold = args.threshold.unwrap_or(vista.threshold);

    let mut comparator = open_comparator(&vista)?;
    let mut capture = FileCapture::new();
    let target = args.image.to_string_lossy();
    Ok(comparator.run(&mut capture, &target, &id, threshold))
}
