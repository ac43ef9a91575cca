//! Baseline storage: one reference bitmap per test identity.
//!
//! Stores never overwrite. A baseline is created once by the first comparison
//! for an identity; replacing it means calling [`BaselineStore::remove`]
//! explicitly and letting the next comparison create a fresh one.

use crate::bitmap::{self, Bitmap};
use crate::identity::TestIdentity;
use crate::result::{VistaError, VistaResult};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File-name suffix for baselines written by [`FsBaselineStore`]
pub const BASELINE_SUFFIX: &str = "_baseline.png";

/// Key-value store of baseline bitmaps.
pub trait BaselineStore {
    /// Whether a baseline exists for `id`
    fn exists(&self, id: &TestIdentity) -> bool;

    /// Load the baseline for `id`
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::NotFound`] when no baseline is stored.
    fn load(&self, id: &TestIdentity) -> VistaResult<Bitmap>;

    /// Store `bitmap` as the baseline for `id`
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::AlreadyExists`] when a baseline is already stored.
    fn create(&mut self, id: &TestIdentity, bitmap: &Bitmap) -> VistaResult<()>;

    /// Delete the baseline for `id`
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::NotFound`] when no baseline is stored.
    fn remove(&mut self, id: &TestIdentity) -> VistaResult<()>;

    /// All stored identities, sorted
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be listed.
    fn identities(&self) -> VistaResult<Vec<TestIdentity>>;
}

/// Baselines stored as lossless PNG files, `<dir>/<id>_baseline.png`.
#[derive(Debug, Clone)]
pub struct FsBaselineStore {
    dir: PathBuf,
}

impl FsBaselineStore {
    /// Open (and create if needed) a baseline directory
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> VistaResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Baseline directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the baseline for `id` lives at
    #[must_use]
    pub fn path_for(&self, id: &TestIdentity) -> PathBuf {
        self.dir.join(format!("{id}{BASELINE_SUFFIX}"))
    }
}

impl BaselineStore for FsBaselineStore {
    fn exists(&self, id: &TestIdentity) -> bool {
        self.path_for(id).is_file()
    }

    fn load(&self, id: &TestIdentity) -> VistaResult<Bitmap> {
        let path = self.path_for(id);
        match std::fs::read(&path) {
            Ok(bytes) => bitmap::decode(&bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(VistaError::NotFound {
                identity: id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn create(&mut self, id: &TestIdentity, bitmap: &Bitmap) -> VistaResult<()> {
        let path = self.path_for(id);

        // create_new makes check-and-create a single atomic step
        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(VistaError::AlreadyExists {
                    identity: id.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut writer = BufWriter::new(file);
        let written = bitmap::write_png(bitmap, &mut writer)
            .and_then(|()| writer.flush().map_err(VistaError::from));
        if let Err(e) = written {
            // A half-written baseline would poison every later run
            let _ = std::fs::remove_file(&path);
            return Err(e);
        }

        tracing::debug!(identity = %id, path = %path.display(), "baseline written");
        Ok(())
    }

    fn remove(&mut self, id: &TestIdentity) -> VistaResult<()> {
        match std::fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(VistaError::NotFound {
                identity: id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn identities(&self) -> VistaResult<Vec<TestIdentity>> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(BASELINE_SUFFIX)) else {
                continue;
            };
            if let Ok(id) = TestIdentity::new(stem) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// In-memory baseline store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBaselineStore {
    baselines: BTreeMap<TestIdentity, Bitmap>,
}

impl MemoryBaselineStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored baselines
    #[must_use]
    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }
}

impl BaselineStore for MemoryBaselineStore {
    fn exists(&self, id: &TestIdentity) -> bool {
        self.baselines.contains_key(id)
    }

    fn load(&self, id: &TestIdentity) -> VistaResult<Bitmap> {
        self.baselines
            .get(id)
            .cloned()
            .ok_or_else(|| VistaError::NotFound {
                identity: id.to_string(),
            })
    }

    fn create(&mut self, id: &TestIdentity, bitmap: &Bitmap) -> VistaResult<()> {
        if self.baselines.contains_key(id) {
            return Err(VistaError::AlreadyExists {
                identity: id.to_string(),
            });
        }
        self.baselines.insert(id.clone(), bitmap.clone());
        Ok(())
    }

    fn remove(&mut self, id: &TestIdentity) -> VistaResult<()> {
        self.baselines
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| VistaError::NotFound {
                identity: id.to_string(),
            })
    }

    fn identities(&self) -> VistaResult<Vec<TestIdentity>> {
        Ok(self.baselines.keys().cloned().collect())
    }
}

impl<S: BaselineStore + ?Sized> BaselineStore for Box<S> {
    fn exists(&self, id: &TestIdentity) -> bool {
        (**self).exists(id)
    }

    fn load(&self, id: &TestIdentity) -> VistaResult<Bitmap> {
        (**self).load(id)
    }

    fn create(&mut self, id: &TestIdentity, bitmap: &Bitmap) -> VistaResult<()> {
        (**self).create(id, bitmap)
    }

    fn remove(&mut self, id: &TestIdentity) -> VistaResult<()> {
        (**self).remove(id)
    }

    fn identities(&self) -> VistaResult<Vec<TestIdentity>> {
        (**self).identities()
    }
}
