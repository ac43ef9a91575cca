//! Image normalization: make two bitmaps directly comparable.
//!
//! Mismatched pairs are stretched, never cropped or padded: both images are
//! resampled to `(max(w1, w2), max(h1, h2))`, including an image that already
//! has the target size on one or both axes.

use crate::bitmap::{ensure_non_empty, Bitmap};
use crate::result::VistaResult;
use image::imageops::{self, FilterType};

/// Interpolation used for stretching
pub const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// Two bitmaps with identical dimensions
#[derive(Debug, Clone)]
pub struct NormalizedPair {
    /// Baseline, possibly resampled
    pub baseline: Bitmap,
    /// Current capture, possibly resampled
    pub current: Bitmap,
    /// Whether resampling happened
    pub resized: bool,
}

impl NormalizedPair {
    /// Common `(width, height)`
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.baseline.dimensions()
    }
}

/// Target dimensions for a pair: the per-axis maximum.
#[must_use]
pub fn target_dimensions(a: (u32, u32), b: (u32, u32)) -> (u32, u32) {
    (a.0.max(b.0), a.1.max(b.1))
}

/// Reconcile `baseline` and `current` into a same-size pair.
///
/// # Errors
///
/// Returns [`VistaError::InvalidImage`](crate::VistaError::InvalidImage) if
/// either input has a zero dimension.
pub fn normalize(baseline: Bitmap, current: Bitmap) -> VistaResult<NormalizedPair> {
    ensure_non_empty(&baseline, "baseline")?;
    ensure_non_empty(&current, "current")?;

    if baseline.dimensions() == current.dimensions() {
        return Ok(NormalizedPair {
            baseline,
            current,
            resized: false,
        });
    }

    let (width, height) = target_dimensions(baseline.dimensions(), current.dimensions());
    tracing::debug!(
        baseline = ?baseline.dimensions(),
        current = ?current.dimensions(),
        target = ?(width, height),
        "resizing pair to common dimensions"
    );

    Ok(NormalizedPair {
        baseline: imageops::resize(&baseline, width, height, RESIZE_FILTER),
        current: imageops::resize(&current, width, height, RESIZE_FILTER),
        resized: true,
    })
}
