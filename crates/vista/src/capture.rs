//! Capture collaborators.
//!
//! A capture turns a target description into a bitmap. Browsers and
//! screenshot tools live outside this crate; [`FileCapture`] reads images
//! that some other process already rendered to disk.

use crate::bitmap::{self, Bitmap};
use crate::result::{VistaError, VistaResult};
use std::path::{Path, PathBuf};

/// Produces the current bitmap for a target
pub trait Capture {
    /// Capture `target`
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::CaptureFailure`] when no usable bitmap can be
    /// produced.
    fn capture(&mut self, target: &str) -> VistaResult<Bitmap>;
}

/// Loads targets as image files
#[derive(Debug, Clone, Default)]
pub struct FileCapture {
    root: Option<PathBuf>,
}

impl FileCapture {
    /// Resolve targets against the working directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative targets against `root`
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Path a target resolves to
    #[must_use]
    pub fn resolve(&self, target: &str) -> PathBuf {
        let path = Path::new(target);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Capture for FileCapture {
    fn capture(&mut self, target: &str) -> VistaResult<Bitmap> {
        let path = self.resolve(target);
        let image = bitmap::load(&path)
            .map_err(|e| VistaError::capture(format!("{}: {e}", path.display())))?;
        bitmap::ensure_non_empty(&image, "captured")
            .map_err(|e| VistaError::capture(e.to_string()))?;
        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "captured image from file"
        );
        Ok(image)
    }
}

impl<F> Capture for F
where
    F: FnMut(&str) -> VistaResult<Bitmap>,
{
    fn capture(&mut self, target: &str) -> VistaResult<Bitmap> {
        self(target)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    #[test]
    fn test_file_capture_reads_png() {
        let dir = TempDir::new().unwrap();
        let img = Bitmap::from_pixel(8, 6, Rgb([10, 20, 30]));
        img.save(dir.path().join("shot.png")).unwrap();

        let mut capture = FileCapture::new().with_root(dir.path());
        assert_eq!(capture.capture("shot.png").unwrap(), img);
    }

    #[test]
    fn test_absolute_target_ignores_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("abs.png");
        Bitmap::from_pixel(3, 3, Rgb([0, 0, 0])).save(&path).unwrap();

        let capture = FileCapture::new().with_root("/nonexistent-root");
        assert_eq!(capture.resolve(path.to_str().unwrap()), path);
    }

    #[test]
    fn test_missing_file_is_capture_failure() {
        let dir = TempDir::new().unwrap();
        let mut capture = FileCapture::new().with_root(dir.path());
        let err = capture.capture("missing.png").unwrap_err();
        assert!(matches!(err, VistaError::CaptureFailure { .. }));
        assert!(err.to_string().contains("missing.png"));
    }

    #[test]
    fn test_undecodable_file_is_capture_failure() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("junk.png"), b"not an image").unwrap();
        let mut capture = FileCapture::new().with_root(dir.path());
        assert!(matches!(
            capture.capture("junk.png"),
            Err(VistaError::CaptureFailure { .. })
        ));
    }

    #[test]
    fn test_closure_capture() {
        let mut calls = 0;
        let mut capture = |target: &str| {
            calls += 1;
            if target == "ok" {
                Ok(Bitmap::new(2, 2))
            } else {
                Err(VistaError::capture("browser crashed"))
            }
        };
        assert!(Capture::capture(&mut capture, "ok").is_ok());
        assert!(Capture::capture(&mut capture, "boom").is_err());
        assert_eq!(calls, 2);
    }
}
