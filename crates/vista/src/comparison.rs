//! Comparison outcomes.

use crate::identity::TestIdentity;
use crate::regions::DiffRegion;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonStatus {
    /// No baseline existed; the current image became the baseline
    BaselineCreated,
    /// Similarity at or above the threshold
    Passed,
    /// Similarity below the threshold
    Failed,
    /// The comparison could not be carried out
    Error,
}

impl ComparisonStatus {
    /// Wire name, as used in reports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaselineCreated => "BASELINE_CREATED",
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Error => "ERROR",
        }
    }

    /// Whether this outcome should fail a run
    #[must_use]
    pub const fn is_problem(self) -> bool {
        matches!(self, Self::Failed | Self::Error)
    }
}

impl fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of comparing one capture against its baseline.
///
/// Built only through the constructors below, which keep the fields
/// consistent with the status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Test identity
    pub test_name: String,
    /// Outcome
    pub status: ComparisonStatus,
    /// SSIM score; absent for errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    /// Threshold the comparison was held to
    pub threshold: f64,
    /// Regions of significant change; only populated for failures
    #[serde(default)]
    pub regions: Vec<DiffRegion>,
    /// Reference to the rendered side-by-side artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_image: Option<String>,
    /// When the result was produced
    pub timestamp: DateTime<Local>,
    /// Human-readable summary
    pub message: String,
    /// Failure reason for errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComparisonResult {
    /// First sighting of an identity
    #[must_use]
    pub fn baseline_created(id: &TestIdentity, threshold: f64) -> Self {
        Self {
            test_name: id.to_string(),
            status: ComparisonStatus::BaselineCreated,
            similarity_score: Some(1.0),
            threshold,
            regions: Vec::new(),
            diff_image: None,
            timestamp: Local::now(),
            message: "Baseline created. Future runs will compare against this image.".to_string(),
            error: None,
        }
    }

    /// Score at or above the threshold
    #[must_use]
    pub fn passed(id: &TestIdentity, score: f64, threshold: f64) -> Self {
        Self {
            test_name: id.to_string(),
            status: ComparisonStatus::Passed,
            similarity_score: Some(score),
            threshold,
            regions: Vec::new(),
            diff_image: None,
            timestamp: Local::now(),
            message: similarity_message(score, threshold),
            error: None,
        }
    }

    /// Score below the threshold
    #[must_use]
    pub fn failed(
        id: &TestIdentity,
        score: f64,
        threshold: f64,
        regions: Vec<DiffRegion>,
        diff_image: String,
        timestamp: DateTime<Local>,
    ) -> Self {
        let changed_area: u64 = regions.iter().map(|r| u64::from(r.area)).sum();
        let message = format!(
            "{}; {} significant change region(s), {} pixel(s) changed",
            similarity_message(score, threshold),
            regions.len(),
            changed_area
        );
        Self {
            test_name: id.to_string(),
            status: ComparisonStatus::Failed,
            similarity_score: Some(score),
            threshold,
            regions,
            diff_image: Some(diff_image),
            timestamp,
            message,
            error: None,
        }
    }

    /// Comparison could not be carried out
    #[must_use]
    pub fn error(test_name: impl Into<String>, threshold: f64, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            test_name: test_name.into(),
            status: ComparisonStatus::Error,
            similarity_score: None,
            threshold,
            regions: Vec::new(),
            diff_image: None,
            timestamp: Local::now(),
            message: format!("Comparison error: {reason}"),
            error: Some(reason),
        }
    }

    /// Sum of region areas
    #[must_use]
    pub fn changed_area(&self) -> u64 {
        self.regions.iter().map(|r| u64::from(r.area)).sum()
    }
}

fn similarity_message(score: f64, threshold: f64) -> String {
    format!(
        "Images are {:.2}% similar (threshold: {:.2}%)",
        score * 100.0,
        threshold * 100.0
    )
}
