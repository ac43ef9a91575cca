//! Structural similarity (SSIM) scoring.
//!
//! Both images are reduced to 8-bit luma, then compared over a 7x7 uniform
//! window:
//!
//! ```text
//!            (2·μx·μy + C1) · (2·σxy + C2)
//! SSIM = ─────────────────────────────────────
//!        (μx² + μy² + C1) · (σx² + σy² + C2)
//! ```
//!
//! with `C1 = (K1·L)²`, `C2 = (K2·L)²`, `L = 255`. Local statistics use
//! mirrored borders and sample (N-1) covariance. The scalar score is the mean
//! of the local map away from the border, where the window is fully inside
//! the image.

use crate::bitmap::Bitmap;
use crate::result::{VistaError, VistaResult};
use image::{GrayImage, Luma};

/// Default sliding-window side length
pub const DEFAULT_WINDOW: usize = 7;

/// SSIM parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SsimConfig {
    /// Window side length (odd, >= 3)
    pub window: usize,
    /// Luminance stabilizer
    pub k1: f64,
    /// Contrast stabilizer
    pub k2: f64,
    /// Dynamic range of pixel values
    pub data_range: f64,
}

impl Default for SsimConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            k1: 0.01,
            k2: 0.03,
            data_range: 255.0,
        }
    }
}

impl SsimConfig {
    /// Set window size
    #[must_use]
    pub const fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    fn validate(&self) -> VistaResult<()> {
        if self.window < 3 || self.window % 2 == 0 {
            return Err(VistaError::config(format!(
                "SSIM window must be odd and at least 3, got {}",
                self.window
            )));
        }
        Ok(())
    }
}

/// Per-pixel local similarity, row-major, same size as the inputs
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMap {
    width: u32,
    height: u32,
    values: Vec<f64>,
}

impl SimilarityMap {
    /// Build from raw values
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::InvalidImage`] if `values.len() != width * height`.
    pub fn from_values(width: u32, height: u32, values: Vec<f64>) -> VistaResult<Self> {
        if values.len() != width as usize * height as usize {
            return Err(VistaError::invalid_image(format!(
                "similarity map of {}x{} needs {} values, got {}",
                width,
                height,
                width as usize * height as usize,
                values.len()
            )));
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Local similarity at `(x, y)`
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// All values, row-major
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Rescale [0, 1] to 8-bit intensity; out-of-range values are clamped
    #[must_use]
    pub fn to_intensity(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([(self.get(x, y).clamp(0.0, 1.0) * 255.0) as u8])
        })
    }
}

/// Output of one scoring pass
#[derive(Debug, Clone)]
pub struct SimilarityReport {
    /// Aggregate score in [0.0, 1.0]
    pub score: f64,
    /// Local similarity map
    pub map: SimilarityMap,
}

/// Convert to 8-bit luma with BT.601 weights (0.299, 0.587, 0.114).
#[must_use]
pub fn to_luma(bitmap: &Bitmap) -> GrayImage {
    GrayImage::from_fn(bitmap.width(), bitmap.height(), |x, y| {
        let [r, g, b] = bitmap.get_pixel(x, y).0;
        let luma = 0.114f64.mul_add(
            f64::from(b),
            0.299f64.mul_add(f64::from(r), 0.587 * f64::from(g)),
        );
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

/// SSIM scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer {
    config: SsimConfig,
}

impl SimilarityScorer {
    /// Create a scorer
    #[must_use]
    pub const fn new(config: SsimConfig) -> Self {
        Self { config }
    }

    /// Configuration
    #[must_use]
    pub const fn config(&self) -> &SsimConfig {
        &self.config
    }

    /// Score two same-size color bitmaps
    ///
    /// # Errors
    ///
    /// See [`SimilarityScorer::score_luma`].
    pub fn score(&self, a: &Bitmap, b: &Bitmap) -> VistaResult<SimilarityReport> {
        self.score_luma(&to_luma(a), &to_luma(b))
    }

    /// Score two same-size grayscale images
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::InvalidImage`] if the sizes differ or either
    /// side is smaller than the window.
    pub fn score_luma(&self, a: &GrayImage, b: &GrayImage) -> VistaResult<SimilarityReport> {
        self.config.validate()?;

        if a.dimensions() != b.dimensions() {
            return Err(VistaError::invalid_image(format!(
                "cannot score images of different sizes: {:?} vs {:?}",
                a.dimensions(),
                b.dimensions()
            )));
        }

        let (width, height) = a.dimensions();
        let (w, h) = (width as usize, height as usize);
        let win = self.config.window;
        if w < win || h < win {
            return Err(VistaError::invalid_image(format!(
                "image {width}x{height} is smaller than the {win}x{win} SSIM window"
            )));
        }

        let x: Vec<f64> = a.as_raw().iter().map(|&v| f64::from(v)).collect();
        let y: Vec<f64> = b.as_raw().iter().map(|&v| f64::from(v)).collect();
        let xx: Vec<f64> = x.iter().map(|v| v * v).collect();
        let yy: Vec<f64> = y.iter().map(|v| v * v).collect();
        let xy: Vec<f64> = x.iter().zip(&y).map(|(p, q)| p * q).collect();

        let radius = win / 2;
        let ux = box_filter(&x, w, h, radius);
        let uy = box_filter(&y, w, h, radius);
        let uxx = box_filter(&xx, w, h, radius);
        let uyy = box_filter(&yy, w, h, radius);
        let uxy = box_filter(&xy, w, h, radius);

        let np = (win * win) as f64;
        let cov_norm = np / (np - 1.0);
        let c1 = (self.config.k1 * self.config.data_range).powi(2);
        let c2 = (self.config.k2 * self.config.data_range).powi(2);

        let values: Vec<f64> = (0..w * h)
            .map(|i| {
                let vx = cov_norm * (uxx[i] - ux[i] * ux[i]);
                let vy = cov_norm * (uyy[i] - uy[i] * uy[i]);
                let vxy = cov_norm * (uxy[i] - ux[i] * uy[i]);

                let num = (2.0 * ux[i] * uy[i] + c1) * (2.0 * vxy + c2);
                let den = (ux[i] * ux[i] + uy[i] * uy[i] + c1) * (vx + vy + c2);
                num / den
            })
            .collect();

        let mut sum = 0.0;
        let mut count = 0usize;
        for row in radius..h - radius {
            for col in radius..w - radius {
                sum += values[row * w + col];
                count += 1;
            }
        }
        let score = (sum / count as f64).clamp(0.0, 1.0);

        Ok(SimilarityReport {
            score,
            map: SimilarityMap::from_values(width, height, values)?,
        })
    }
}

/// Mirror an out-of-range index back into `0..n` (`d c b a | a b c d`).
fn reflect(i: isize, n: usize) -> usize {
    let n = n as isize;
    let mut i = i;
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - i - 1;
        } else {
            return i as usize;
        }
    }
}

/// Separable mean filter over a `(2r+1)²` window with mirrored borders.
fn box_filter(src: &[f64], w: usize, h: usize, radius: usize) -> Vec<f64> {
    let taps = (2 * radius + 1) as f64;
    let r = radius as isize;

    let mut horizontal = vec![0.0; w * h];
    for row in 0..h {
        let line = &src[row * w..(row + 1) * w];
        for col in 0..w {
            let c = col as isize;
            let sum: f64 = (c - r..=c + r).map(|k| line[reflect(k, w)]).sum();
            horizontal[row * w + col] = sum / taps;
        }
    }

    let mut out = vec![0.0; w * h];
    for row in 0..h {
        let rr = row as isize;
        for col in 0..w {
            let sum: f64 = (rr - r..=rr + r)
                .map(|k| horizontal[reflect(k, h) * w + col])
                .sum();
            out[row * w + col] = sum / taps;
        }
    }
    out
}
