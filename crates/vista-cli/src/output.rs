//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use vista::{ComparisonResult, ComparisonStatus, Report};

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Progress reporter for comparison runs
///
/// Results and summaries go to stdout; progress and notices go to stderr.
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    out: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            out: Term::stdout(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar for a suite
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn write_line(&self, term: &Term, line: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.suspend(|| {
                let _ = term.write_line(line);
            }),
            None => {
                let _ = term.write_line(line);
            }
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        self.write_line(&self.term, &format!("{prefix} {message}"));
    }

    /// Print one comparison outcome
    pub fn result(&self, result: &ComparisonResult) {
        // Problems are printed even in quiet mode
        if self.quiet && !result.status.is_problem() {
            return;
        }
        self.write_line(&self.out, &format_result(result, self.use_color));
    }

    /// Print the run summary
    pub fn summary(&self, report: &Report) {
        if self.quiet && !report.has_problems() {
            return;
        }

        let line = if self.use_color {
            let status = if report.has_problems() {
                Style::new().red().bold().apply_to("FAILED")
            } else {
                Style::new().green().bold().apply_to("OK")
            };
            format!("{status} {}", report.summary())
        } else {
            let status = if report.has_problems() { "FAILED" } else { "OK" };
            format!("{status} {}", report.summary())
        };

        self.write_line(&self.out, "");
        self.write_line(&self.out, &line);
    }
}

/// Single-line rendering of a result
#[must_use]
pub fn format_result(result: &ComparisonResult, use_color: bool) -> String {
    let label = result.status.as_str();
    let label = if use_color {
        let styled = match result.status {
            ComparisonStatus::Passed => style(label).green().bold(),
            ComparisonStatus::BaselineCreated => style(label).cyan().bold(),
            ComparisonStatus::Failed => style(label).red().bold(),
            ComparisonStatus::Error => style(label).magenta().bold(),
        };
        styled.to_string()
    } else {
        label.to_string()
    };

    let mut line = format!("{label} {}: {}", result.test_name, result.message);
    if let Some(ref diff) = result.diff_image {
        line.push_str(&format!(" [diff: {diff}]"));
    }
    line
}
