//! Run-level aggregation of comparison results.

use crate::artifacts::FILE_TIMESTAMP_FORMAT;
use crate::comparison::{ComparisonResult, ComparisonStatus};
use crate::result::VistaResult;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Accumulates results for one run, in the order they were recorded
#[derive(Debug, Clone, Default)]
pub struct ReportAggregator {
    results: Vec<ComparisonResult>,
}

impl ReportAggregator {
    /// Create an empty aggregator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result
    pub fn record(&mut self, result: ComparisonResult) {
        self.results.push(result);
    }

    /// Results recorded so far
    #[must_use]
    pub fn results(&self) -> &[ComparisonResult] {
        &self.results
    }

    /// Number of results recorded
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of PASSED results
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(ComparisonStatus::Passed)
    }

    /// Number of FAILED results
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(ComparisonStatus::Failed)
    }

    /// Number of BASELINE_CREATED results
    #[must_use]
    pub fn baselines_created(&self) -> usize {
        self.count(ComparisonStatus::BaselineCreated)
    }

    /// Number of ERROR results
    #[must_use]
    pub fn errors(&self) -> usize {
        self.count(ComparisonStatus::Error)
    }

    fn count(&self, status: ComparisonStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Close the run
    #[must_use]
    pub fn finalize(self) -> Report {
        Report::from_results(self.results)
    }
}

/// Summary of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// When the report was produced
    pub timestamp: DateTime<Local>,
    /// Number of results
    pub total_tests: usize,
    /// PASSED count
    pub passed: usize,
    /// FAILED count
    pub failed: usize,
    /// BASELINE_CREATED count
    pub baselines_created: usize,
    /// ERROR count
    pub errors: usize,
    /// Every result, in recorded order
    pub results: Vec<ComparisonResult>,
}

impl Report {
    /// Fold an ordered sequence of results into a report
    #[must_use]
    pub fn from_results(results: impl IntoIterator<Item = ComparisonResult>) -> Self {
        let results: Vec<ComparisonResult> = results.into_iter().collect();
        let count = |status: ComparisonStatus| results.iter().filter(|r| r.status == status).count();
        Self {
            timestamp: Local::now(),
            total_tests: results.len(),
            passed: count(ComparisonStatus::Passed),
            failed: count(ComparisonStatus::Failed),
            baselines_created: count(ComparisonStatus::BaselineCreated),
            errors: count(ComparisonStatus::Error),
            results,
        }
    }

    /// Whether any comparison failed or errored
    #[must_use]
    pub const fn has_problems(&self) -> bool {
        self.failed > 0 || self.errors > 0
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} test(s): {} passed, {} failed, {} baseline(s) created, {} error(s)",
            self.total_tests, self.passed, self.failed, self.baselines_created, self.errors
        )
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> VistaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write `report_<YYYYmmdd_HHMMSS>.json` into `dir`, returning its path
    ///
    /// An existing report is never replaced; a numeric suffix is added
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn write_json(&self, dir: &Path) -> VistaResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let stamp = self.timestamp.format(FILE_TIMESTAMP_FORMAT).to_string();

        let mut attempt = 0u32;
        let (path, file) = loop {
            let name = if attempt == 0 {
                format!("report_{stamp}.json")
            } else {
                format!("report_{stamp}_{attempt}.json")
            };
            let path = dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        };

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!(path = %path.display(), total = self.total_tests, "report written");
        Ok(path)
    }
}
