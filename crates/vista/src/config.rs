//! Engine configuration.

use crate::render::RenderConfig;
use crate::result::{VistaError, VistaResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Similarity a comparison must reach to pass when nothing else is given
pub const DEFAULT_THRESHOLD: f64 = 0.95;

/// Check that a threshold is usable
///
/// # Errors
///
/// Returns [`VistaError::InvalidThreshold`] for NaN or values outside
/// `[0.0, 1.0]`.
pub fn validate_threshold(threshold: f64) -> VistaResult<f64> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(VistaError::InvalidThreshold { threshold })
    }
}

/// Configuration for a Vista run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VistaConfig {
    /// Default pass threshold
    pub threshold: f64,
    /// Where baselines live
    pub baselines_dir: PathBuf,
    /// Where diff artifacts and reports are written
    pub results_dir: PathBuf,
    /// Artifact rendering options
    pub render: RenderConfig,
}

impl Default for VistaConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            baselines_dir: PathBuf::from("baselines"),
            results_dir: PathBuf::from("results"),
            render: RenderConfig::default(),
        }
    }
}

impl VistaConfig {
    /// Parse from YAML; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the threshold is out of
    /// range.
    pub fn from_yaml_str(yaml: &str) -> VistaResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_yaml_file(path: &Path) -> VistaResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
            .map_err(|e| VistaError::config(format!("{}: {e}", path.display())))
    }

    /// Set the default threshold
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the baseline directory
    #[must_use]
    pub fn with_baselines_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.baselines_dir = dir.into();
        self
    }

    /// Set the results directory
    #[must_use]
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// Set rendering options
    #[must_use]
    pub const fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    fn validate(&self) -> VistaResult<()> {
        validate_threshold(self.threshold)?;
        if self.render.stroke_width == 0 {
            return Err(VistaError::config("render.stroke_width must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VistaConfig::default();
        assert!((config.threshold - 0.95).abs() < f64::EPSILON);
        assert_eq!(config.baselines_dir, PathBuf::from("baselines"));
        assert_eq!(config.results_dir, PathBuf::from("results"));
        assert_eq!(config.render.stroke_width, 2);
    }

    #[test]
    fn test_builder() {
        let config = VistaConfig::default()
            .with_threshold(0.9)
            .with_baselines_dir("b")
            .with_results_dir("r")
            .with_render(RenderConfig::default().with_stroke_width(3));
        assert!((config.threshold - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.baselines_dir, PathBuf::from("b"));
        assert_eq!(config.results_dir, PathBuf::from("r"));
        assert_eq!(config.render.stroke_width, 3);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = VistaConfig::from_yaml_str("threshold: 0.8\nrender:\n  label_scale: 2\n").unwrap();
        assert!((config.threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.render.label_scale, 2);
        assert_eq!(config.render.stroke_width, 2);
        assert_eq!(config.baselines_dir, PathBuf::from("baselines"));
    }

    #[test]
    fn test_yaml_rejects_bad_threshold() {
        let err = VistaConfig::from_yaml_str("threshold: 1.5").unwrap_err();
        assert!(matches!(err, VistaError::InvalidThreshold { .. }));
    }

    #[test]
    fn test_yaml_rejects_zero_stroke() {
        let err = VistaConfig::from_yaml_str("render:\n  stroke_width: 0").unwrap_err();
        assert!(matches!(err, VistaError::Config { .. }));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            VistaConfig::from_yaml_str("threshold: [").unwrap_err(),
            VistaError::Yaml(_)
        ));
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("vista.yaml");
        std::fs::write(&path, "results_dir: out\n").unwrap();
        let config = VistaConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.results_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(validate_threshold(-0.01).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }
}
