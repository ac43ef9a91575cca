//! The comparison pipeline and result classification.
//!
//! ```text
//! exists? ──no──► create baseline ─────────────────────► BASELINE_CREATED
//!    │
//!   yes ─► normalize ─► score ─► score >= threshold ────► PASSED
//!                                   │
//!                                   no ─► regions ─► render ─► store ─► FAILED
//! ```
//!
//! Any failure along the way becomes an `ERROR` result; `compare` and `run`
//! never return `Err`, so a batch always runs to completion.

use crate::artifacts::ArtifactStore;
use crate::baseline::BaselineStore;
use crate::bitmap::{self, Bitmap};
use crate::capture::Capture;
use crate::comparison::{ComparisonResult, ComparisonStatus};
use crate::config::validate_threshold;
use crate::identity::TestIdentity;
use crate::normalize::normalize;
use crate::regions::extract_regions;
use crate::render::{ComparisonRenderer, RenderConfig};
use crate::result::VistaResult;
use crate::similarity::{SimilarityScorer, SsimConfig};
use chrono::Local;

/// Runs comparisons against a baseline store
#[derive(Debug)]
pub struct VisualComparator<B, A> {
    baselines: B,
    artifacts: A,
    scorer: SimilarityScorer,
    renderer: ComparisonRenderer,
}

impl<B: BaselineStore, A: ArtifactStore> VisualComparator<B, A> {
    /// Create a comparator with default scoring and rendering
    #[must_use]
    pub fn new(baselines: B, artifacts: A) -> Self {
        Self {
            baselines,
            artifacts,
            scorer: SimilarityScorer::new(SsimConfig::default()),
            renderer: ComparisonRenderer::new(RenderConfig::default()),
        }
    }

    /// Use custom rendering options
    #[must_use]
    pub fn with_render_config(mut self, config: RenderConfig) -> Self {
        self.renderer = ComparisonRenderer::new(config);
        self
    }

    /// Use custom SSIM options
    #[must_use]
    pub fn with_ssim_config(mut self, config: SsimConfig) -> Self {
        self.scorer = SimilarityScorer::new(config);
        self
    }

    /// Baseline store
    #[must_use]
    pub const fn baselines(&self) -> &B {
        &self.baselines
    }

    /// Mutable baseline store
    pub fn baselines_mut(&mut self) -> &mut B {
        &mut self.baselines
    }

    /// Artifact store
    #[must_use]
    pub const fn artifacts(&self) -> &A {
        &self.artifacts
    }

    /// Take the stores back
    #[must_use]
    pub fn into_parts(self) -> (B, A) {
        (self.baselines, self.artifacts)
    }

    /// Compare `current` against the baseline for `id`
    pub fn compare(
        &mut self,
        id: &TestIdentity,
        current: &Bitmap,
        threshold: f64,
    ) -> ComparisonResult {
        let result = self
            .try_compare(id, current, threshold)
            .unwrap_or_else(|e| ComparisonResult::error(id.as_str(), threshold, e.to_string()));
        log_outcome(&result);
        result
    }

    /// Capture `target` and compare it against the baseline for `id`
    ///
    /// A capture failure yields `ERROR` and leaves the baseline store
    /// untouched.
    pub fn run<C: Capture + ?Sized>(
        &mut self,
        capture: &mut C,
        target: &str,
        id: &TestIdentity,
        threshold: f64,
    ) -> ComparisonResult {
        match capture.capture(target) {
            Ok(current) => self.compare(id, &current, threshold),
            Err(e) => {
                let result = ComparisonResult::error(id.as_str(), threshold, e.to_string());
                log_outcome(&result);
                result
            }
        }
    }

    fn try_compare(
        &mut self,
        id: &TestIdentity,
        current: &Bitmap,
        threshold: f64,
    ) -> VistaResult<ComparisonResult> {
        let threshold = validate_threshold(threshold)?;
        bitmap::ensure_non_empty(current, "current")?;

        if !self.baselines.exists(id) {
            self.baselines.create(id, current)?;
            return Ok(ComparisonResult::baseline_created(id, threshold));
        }

        let baseline = self.baselines.load(id)?;
        let pair = normalize(baseline, current.clone())?;
        let report = self.scorer.score(&pair.baseline, &pair.current)?;
        tracing::debug!(
            identity = %id,
            score = report.score,
            threshold,
            resized = pair.resized,
            "scored comparison"
        );

        if report.score >= threshold {
            return Ok(ComparisonResult::passed(id, report.score, threshold));
        }

        let regions = extract_regions(&report.map);
        let artifact = self
            .renderer
            .render(&pair.baseline, &pair.current, &regions)?;
        let generated_at = Local::now();
        let reference = self.artifacts.store(id, generated_at, &artifact)?;

        Ok(ComparisonResult::failed(
            id,
            report.score,
            threshold,
            regions,
            reference,
            generated_at,
        ))
    }
}

fn log_outcome(result: &ComparisonResult) {
    match result.status {
        ComparisonStatus::Error => tracing::warn!(
            identity = %result.test_name,
            error = result.error.as_deref().unwrap_or_default(),
            "comparison error"
        ),
        ComparisonStatus::Failed => tracing::info!(
            identity = %result.test_name,
            status = %result.status,
            score = result.similarity_score.unwrap_or_default(),
            regions = result.regions.len(),
            changed_area = result.changed_area(),
            "comparison finished"
        ),
        _ => tracing::info!(
            identity = %result.test_name,
            status = %result.status,
            score = result.similarity_score.unwrap_or_default(),
            "comparison finished"
        ),
    }
}
