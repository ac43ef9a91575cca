//! Command handlers - extracted from main.rs for testability
//!
//! Each handler returns an [`Outcome`]; only `main` turns it into an exit
//! code.

pub mod baseline;
pub mod compare;
pub mod run;

pub use baseline::execute_baseline;
pub use compare::execute_compare;
pub use run::execute_run;

use crate::commands::StoreArgs;
use crate::error::CliResult;
use std::path::Path;
use vista::{FsArtifactStore, FsBaselineStore, VisualComparator, VistaConfig};

/// Whether a command left anything for the user to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing failed
    Success,
    /// At least one comparison failed or errored
    Problems,
}

impl Outcome {
    /// Outcome for a set of results
    #[must_use]
    pub const fn from_problems(has_problems: bool) -> Self {
        if has_problems {
            Self::Problems
        } else {
            Self::Success
        }
    }
}

/// Load the configuration file, or defaults when none is given
pub fn load_config(path: Option<&Path>) -> CliResult<VistaConfig> {
    match path {
        Some(path) => Ok(VistaConfig::from_yaml_file(path)?),
        None => Ok(VistaConfig::default()),
    }
}

/// Apply directory flags on top of the loaded configuration
#[must_use]
pub fn apply_store_overrides(mut config: VistaConfig, stores: &StoreArgs) -> VistaConfig {
    if let Some(ref dir) = stores.baselines {
        config = config.with_baselines_dir(dir);
    }
    if let Some(ref dir) = stores.results {
        config = config.with_results_dir(dir);
    }
    config
}

/// File-backed comparator for `config`
pub fn open_comparator(
    config: &VistaConfig,
) -> CliResult<VisualComparator<FsBaselineStore, FsArtifactStore>> {
    let baselines = FsBaselineStore::open(&config.baselines_dir)?;
    let artifacts = FsArtifactStore::open(&config.results_dir)?;
    Ok(VisualComparator::new(baselines, artifacts).with_render_config(config.render.clone()))
}
