//! Durable storage for rendered comparison artifacts.
//!
//! Every failing comparison produces its own file; an existing artifact is
//! never overwritten.

use crate::bitmap::{self, Bitmap};
use crate::identity::TestIdentity;
use crate::result::{VistaError, VistaResult};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Timestamp layout used in artifact and report file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Give up after this many name collisions within one second
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Sink for rendered diff artifacts
pub trait ArtifactStore {
    /// Persist `artifact` for `id`, returning a reference to it
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be written.
    fn store(
        &mut self,
        id: &TestIdentity,
        generated_at: DateTime<Local>,
        artifact: &Bitmap,
    ) -> VistaResult<String>;
}

/// Artifacts written as `<dir>/<id>_diff_<YYYYmmdd_HHMMSS>[_<n>].png`
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    /// Open (and create if needed) a results directory
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> VistaResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Results directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn candidate(&self, id: &TestIdentity, stamp: &str, attempt: u32) -> PathBuf {
        if attempt == 0 {
            self.dir.join(format!("{id}_diff_{stamp}.png"))
        } else {
            self.dir.join(format!("{id}_diff_{stamp}_{attempt}.png"))
        }
    }
}

impl ArtifactStore for FsArtifactStore {
    fn store(
        &mut self,
        id: &TestIdentity,
        generated_at: DateTime<Local>,
        artifact: &Bitmap,
    ) -> VistaResult<String> {
        let stamp = generated_at.format(FILE_TIMESTAMP_FORMAT).to_string();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.candidate(id, &stamp, attempt);
            let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            let mut writer = BufWriter::new(file);
            bitmap::write_png(artifact, &mut writer)?;
            writer.flush()?;

            tracing::debug!(identity = %id, path = %path.display(), "diff artifact written");
            return Ok(path.display().to_string());
        }

        Err(VistaError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free artifact name for '{id}' at {stamp}"),
        )))
    }
}

/// Artifacts kept in memory, referenced as `memory://<id>/<n>`
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactStore {
    artifacts: Vec<(String, Bitmap)>,
}

impl MemoryArtifactStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored artifacts in insertion order
    #[must_use]
    pub fn artifacts(&self) -> &[(String, Bitmap)] {
        &self.artifacts
    }

    /// Look an artifact up by reference
    #[must_use]
    pub fn get(&self, reference: &str) -> Option<&Bitmap> {
        self.artifacts
            .iter()
            .find(|(r, _)| r == reference)
            .map(|(_, img)| img)
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn store(
        &mut self,
        id: &TestIdentity,
        _generated_at: DateTime<Local>,
        artifact: &Bitmap,
    ) -> VistaResult<String> {
        let reference = format!("memory://{id}/{}", self.artifacts.len());
        self.artifacts.push((reference.clone(), artifact.clone()));
        Ok(reference)
    }
}

impl<S: ArtifactStore + ?Sized> ArtifactStore for Box<S> {
    fn store(
        &mut self,
        id: &TestIdentity,
        generated_at: DateTime<Local>,
        artifact: &Bitmap,
    ) -> VistaResult<String> {
        (**self).store(id, generated_at, artifact)
    }
}
