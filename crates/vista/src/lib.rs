//! Vista: SSIM-based visual regression engine
//!
//! Vista compares freshly captured screenshots against stored baselines and
//! classifies each comparison as `BASELINE_CREATED`, `PASSED`, `FAILED` or
//! `ERROR`. Failing comparisons produce a side-by-side artifact with the
//! changed regions boxed.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌────────────┐   ┌──────────┐
//! │ Capture  │──►│ Baseline  │──►│ Normalizer │──►│  SSIM    │
//! │          │   │ Store     │   │            │   │  Scorer  │
//! └──────────┘   └───────────┘   └────────────┘   └────┬─────┘
//!                                                      │ score < t
//!                ┌───────────┐   ┌────────────┐   ┌────▼─────┐
//!                │ Artifact  │◄──│  Renderer  │◄──│ Regions  │
//!                │ Store     │   │            │   │          │
//!                └───────────┘   └────────────┘   └──────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use vista::{
//!     Bitmap, ComparisonStatus, MemoryArtifactStore, MemoryBaselineStore, TestIdentity,
//!     VisualComparator,
//! };
//!
//! let mut comparator =
//!     VisualComparator::new(MemoryBaselineStore::new(), MemoryArtifactStore::new());
//! let id = TestIdentity::new("landing").unwrap();
//! let shot = Bitmap::from_pixel(64, 64, image::Rgb([255, 255, 255]));
//!
//! let first = comparator.compare(&id, &shot, 0.95);
//! assert_eq!(first.status, ComparisonStatus::BaselineCreated);
//!
//! let second = comparator.compare(&id, &shot, 0.95);
//! assert_eq!(second.status, ComparisonStatus::Passed);
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod artifacts;
pub mod baseline;
pub mod bitmap;
pub mod capture;
pub mod comparator;
pub mod comparison;
pub mod config;
pub mod identity;
pub mod normalize;
pub mod regions;
pub mod render;
pub mod report;
mod result;
pub mod similarity;
pub mod suite;

pub use artifacts::{ArtifactStore, FsArtifactStore, MemoryArtifactStore};
pub use baseline::{BaselineStore, FsBaselineStore, MemoryBaselineStore};
pub use bitmap::Bitmap;
pub use capture::{Capture, FileCapture};
pub use comparator::VisualComparator;
pub use comparison::{ComparisonResult, ComparisonStatus};
pub use config::{VistaConfig, DEFAULT_THRESHOLD};
pub use identity::TestIdentity;
pub use normalize::{normalize, NormalizedPair};
pub use regions::{extract_regions, DiffRegion, MIN_REGION_AREA};
pub use render::{ComparisonRenderer, RenderConfig};
pub use report::{Report, ReportAggregator};
pub use result::{VistaError, VistaResult};
pub use similarity::{SimilarityMap, SimilarityReport, SimilarityScorer, SsimConfig};
pub use suite::{Suite, SuiteEntry};

/// Fold results into a run report
#[must_use]
pub fn aggregate(results: impl IntoIterator<Item = ComparisonResult>) -> Report {
    Report::from_results(results)
}
