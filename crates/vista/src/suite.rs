//! Suite manifests: an ordered list of targets to compare in one run.
//!
//! ```yaml
//! name: storefront
//! threshold: 0.97
//! tests:
//!   - name: home
//!     target: shots/home.png
//!   - name: cart
//!     target: shots/cart.png
//!     threshold: 0.9
//! ```

use crate::artifacts::ArtifactStore;
use crate::baseline::BaselineStore;
use crate::capture::Capture;
use crate::comparator::VisualComparator;
use crate::comparison::ComparisonResult;
use crate::identity::TestIdentity;
use crate::report::{Report, ReportAggregator};
use crate::result::{VistaError, VistaResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One entry of a suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteEntry {
    /// Test identity
    pub name: String,
    /// Capture target
    pub target: String,
    /// Overrides the suite threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

/// An ordered set of comparisons
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Suite {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Overrides the configured threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Entries, run in order
    #[serde(default)]
    pub tests: Vec<SuiteEntry>,
}

impl Suite {
    /// Parse a manifest
    ///
    /// # Errors
    ///
    /// Returns an error on malformed YAML or duplicate test names.
    pub fn from_yaml_str(yaml: &str) -> VistaResult<Self> {
        let suite: Self = serde_yaml_ng::from_str(yaml)?;
        suite.validate()?;
        Ok(suite)
    }

    /// Load a manifest file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_yaml_file(path: &Path) -> VistaResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
            .map_err(|e| VistaError::config(format!("{}: {e}", path.display())))
    }

    fn validate(&self) -> VistaResult<()> {
        let mut seen = HashSet::new();
        for entry in &self.tests {
            if !seen.insert(entry.name.as_str()) {
                return Err(VistaError::config(format!(
                    "duplicate test name '{}'",
                    entry.name
                )));
            }
        }
        Ok(())
    }

    /// Threshold for `entry`: its own, else the suite's, else `default`
    #[must_use]
    pub fn threshold_for(&self, entry: &SuiteEntry, default: f64) -> f64 {
        entry.threshold.or(self.threshold).unwrap_or(default)
    }

    /// Run every entry in order
    ///
    /// `on_result` sees each result as it is produced. Entries with unusable
    /// names are recorded as errors; the run always completes.
    pub fn run<B, A, C, F>(
        &self,
        comparator: &mut VisualComparator<B, A>,
        capture: &mut C,
        default_threshold: f64,
        mut on_result: F,
    ) -> Report
    where
        B: BaselineStore,
        A: ArtifactStore,
        C: Capture + ?Sized,
        F: FnMut(&ComparisonResult),
    {
        let mut aggregator = ReportAggregator::new();
        tracing::info!(
            suite = self.name.as_deref().unwrap_or("unnamed"),
            tests = self.tests.len(),
            "running suite"
        );

        for entry in &self.tests {
            let threshold = self.threshold_for(entry, default_threshold);
            let result = match TestIdentity::new(entry.name.as_str()) {
                Ok(id) => comparator.run(capture, &entry.target, &id, threshold),
                Err(e) => ComparisonResult::error(entry.name.as_str(), threshold, e.to_string()),
            };
            on_result(&result);
            aggregator.record(result);
        }

        aggregator.finalize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::artifacts::MemoryArtifactStore;
    use crate::baseline::MemoryBaselineStore;
    use crate::bitmap::Bitmap;
    use crate::comparison::ComparisonStatus;
    use image::Rgb;

    const MANIFEST: &str = "
name: storefront
threshold: 0.97
tests:
  - name: home
    target: home.png
  - name: cart
    target: cart.png
    threshold: 0.9
";

    #[test]
    fn test_parse_manifest() {
        let suite = Suite::from_yaml_str(MANIFEST).unwrap();
        assert_eq!(suite.name.as_deref(), Some("storefront"));
        assert_eq!(suite.tests.len(), 2);
        assert_eq!(suite.tests[1].target, "cart.png");
    }

    #[test]
    fn test_threshold_precedence() {
        let suite = Suite::from_yaml_str(MANIFEST).unwrap();
        assert!((suite.threshold_for(&suite.tests[0], 0.5) - 0.97).abs() < f64::EPSILON);
        assert!((suite.threshold_for(&suite.tests[1], 0.5) - 0.9).abs() < f64::EPSILON);

        let bare = Suite::from_yaml_str("tests:\n  - {name: a, target: a.png}\n").unwrap();
        assert!((bare.threshold_for(&bare.tests[0], 0.5) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let yaml = "tests:\n  - {name: a, target: x}\n  - {name: a, target: y}\n";
        assert!(matches!(
            Suite::from_yaml_str(yaml),
            Err(VistaError::Config { .. })
        ));
    }

    #[test]
    fn test_missing_target_rejected() {
        assert!(matches!(
            Suite::from_yaml_str("tests:\n  - name: a\n"),
            Err(VistaError::Yaml(_))
        ));
    }

    #[test]
    fn test_run_records_every_entry() {
        let suite = Suite::from_yaml_str(
            "tests:\n  - {name: ok, target: ok}\n  - {name: broken, target: broken}\n  - {name: '../bad', target: ok}\n",
        )
        .unwrap();
        let mut comparator =
            VisualComparator::new(MemoryBaselineStore::new(), MemoryArtifactStore::new());
        let mut capture = |target: &str| -> VistaResult<Bitmap> {
            if target == "ok" {
                Ok(Bitmap::from_pixel(16, 16, Rgb([200, 200, 200])))
            } else {
                Err(VistaError::capture("no such page"))
            }
        };

        let mut seen = Vec::new();
        let report = suite.run(&mut comparator, &mut capture, 0.95, |r| {
            seen.push(r.test_name.clone());
        });

        assert_eq!(seen, vec!["ok", "broken", "../bad"]);
        assert_eq!(report.total_tests, 3);
        assert_eq!(report.baselines_created, 1);
        assert_eq!(report.errors, 2);
        assert_eq!(report.results[2].status, ComparisonStatus::Error);
    }
}
