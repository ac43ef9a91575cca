//! Test identities: the stable names that key baselines and results.

use crate::result::{VistaError, VistaResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted identity length
pub const MAX_IDENTITY_LEN: usize = 128;

/// Stable name scoping one baseline/result series.
///
/// Identities double as file-name stems in [`FsBaselineStore`](crate::FsBaselineStore),
/// so only ASCII alphanumerics, `-`, `_` and `.` are accepted, and the name
/// may not start with `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TestIdentity(String);

impl TestIdentity {
    /// Validate and wrap a test name
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::InvalidIdentity`] for empty, overlong or
    /// non file-safe names.
    pub fn new(name: impl Into<String>) -> VistaResult<Self> {
        let name = name.into();
        let reject = |reason: &str| VistaError::InvalidIdentity {
            identity: name.clone(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(reject("name is empty"));
        }
        if name.len() > MAX_IDENTITY_LEN {
            return Err(reject("name is longer than 128 characters"));
        }
        if name.starts_with('.') {
            return Err(reject("name may not start with '.'"));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(reject(&format!("character {bad:?} is not allowed")));
        }

        Ok(Self(name))
    }

    /// Borrow the name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TestIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TestIdentity {
    type Error = VistaError;

    fn try_from(value: String) -> VistaResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TestIdentity {
    type Error = VistaError;

    fn try_from(value: &str) -> VistaResult<Self> {
        Self::new(value)
    }
}

impl From<TestIdentity> for String {
    fn from(id: TestIdentity) -> Self {
        id.0
    }
}
