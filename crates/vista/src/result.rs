//! Result and error types for Vista.

use thiserror::Error;

/// Result type for Vista operations
pub type VistaResult<T> = Result<T, VistaError>;

/// Errors that can occur while comparing, storing or reporting
#[derive(Debug, Error)]
pub enum VistaError {
    /// The capture collaborator could not produce a bitmap
    #[error("Capture failed: {reason}")]
    CaptureFailure {
        /// Why the capture failed
        reason: String,
    },

    /// A bitmap is empty, corrupt or otherwise unusable
    #[error("Invalid image: {message}")]
    InvalidImage {
        /// Error message
        message: String,
    },

    /// A baseline already exists for this identity
    #[error("Baseline already exists for '{identity}'")]
    AlreadyExists {
        /// Test identity
        identity: String,
    },

    /// No baseline is stored for this identity
    #[error("No baseline found for '{identity}'")]
    NotFound {
        /// Test identity
        identity: String,
    },

    /// Test identity cannot be used as a key
    #[error("Invalid test name '{identity}': {reason}")]
    InvalidIdentity {
        /// Rejected name
        identity: String,
        /// Why it was rejected
        reason: String,
    },

    /// Threshold outside [0.0, 1.0]
    #[error("Invalid threshold {threshold}: expected a value in [0.0, 1.0]")]
    InvalidThreshold {
        /// Rejected threshold
        threshold: f64,
    },

    /// Image processing error (decoding, encoding, etc.)
    #[error("Image processing failed: {message}")]
    ImageProcessing {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl VistaError {
    /// Create a capture failure
    #[must_use]
    pub fn capture(reason: impl Into<String>) -> Self {
        Self::CaptureFailure {
            reason: reason.into(),
        }
    }

    /// Create an invalid image error
    #[must_use]
    pub fn invalid_image(message: impl Into<String>) -> Self {
        Self::InvalidImage {
            message: message.into(),
        }
    }

    /// Create an image processing error
    #[must_use]
    pub fn image_processing(message: impl Into<String>) -> Self {
        Self::ImageProcessing {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
