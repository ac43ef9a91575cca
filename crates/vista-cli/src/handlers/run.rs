//! `vista run`: every comparison in a suite manifest
//!
//! Targets are resolved relative to the manifest's directory.

use super::{apply_store_overrides, open_comparator, Outcome};
use crate::commands::RunArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, ProgressReporter};
use std::path::{Path, PathBuf};
use vista::{FileCapture, Report, Suite, VistaConfig};

/// Run a suite, write its report and print a summary
pub fn execute_run(config: &CliConfig, vista: VistaConfig, args: &RunArgs) -> CliResult<Outcome> {
    let format = OutputFormat::from(args.format);
    let mut reporter = ProgressReporter::new(
        config.color.should_color(),
        config.verbosity.is_quiet() || format == OutputFormat::Json,
    );

    let (report, path) = run_suite(vista, args, &mut reporter)?;

    match format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => {
            reporter.summary(&report);
            reporter.info(&format!("Report written to {}", path.display()));
        }
    }

    Ok(Outcome::from_problems(report.has_problems()))
}

/// Run the suite and write the report, returning both
pub fn run_suite(
    vista: VistaConfig,
    args: &RunArgs,
    reporter: &mut ProgressReporter,
) -> CliResult<(Report, PathBuf)> {
    let suite = Suite::from_yaml_file(&args.manifest)?;
    let vista = apply_store_overrides(vista, &args.stores);
    let report_dir = args
        .report_dir
        .clone()
        .unwrap_or_else(|| vista.results_dir.clone());

    let mut comparator = open_comparator(&vista)?;
    let root = manifest_root(&args.manifest);
    tracing::debug!(
        manifest = %args.manifest.display(),
        root = %root.display(),
        reports = %report_dir.display(),
        "running suite"
    );
    let mut capture = FileCapture::new().with_root(root);

    let label = suite.name.clone().unwrap_or_else(|| "suite".to_string());
    reporter.start_progress(suite.tests.len() as u64, &label);
    let report = suite.run(&mut comparator, &mut capture, vista.threshold, |result| {
        reporter.set_message(&result.test_name);
        reporter.increment(1);
        reporter.result(result);
    });
    reporter.finish();

    let path = report
        .write_json(&report_dir)
        .map_err(|e| CliError::report_generation(e.to_string()))?;
    Ok((report, path))
}

fn manifest_root(manifest: &Path) -> PathBuf {
    manifest
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
