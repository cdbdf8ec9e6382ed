//! Volume registry.
//!
//! Tracks which directory under the data root backs each named volume and
//! keeps the state file in step with memory.
//!
//! # Design
//!
//! - **Shared ownership**: Cloneable via `Arc`, one registry handed to every handler
//! - **Single lock**: Every operation, including lookups, holds one mutex for its full duration
//! - **Persist-first**: A mutation is rolled back in memory if the state file write fails
//! - **Copies out**: Callers get `Volume` values, never references into the map

pub mod constants;
pub mod path;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use localpersist_shared::errors::{PersistError, PersistResult};
use localpersist_shared::types::{Capabilities, CreateOptions, Volume};

use crate::store::{StateStore, VolumeMap, VolumeRecord};
use crate::util::ensure_dir;
use constants::perms;

/// Thread-safe registry of volumes backed by a state file.
#[derive(Clone)]
pub struct VolumeRegistry {
    inner: Arc<Mutex<RegistryInner>>,
    data_root: Arc<PathBuf>,
}

struct RegistryInner {
    volumes: VolumeMap,
    store: StateStore,
}

impl std::fmt::Debug for VolumeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeRegistry")
            .field("data_root", &self.data_root)
            .finish()
    }
}

impl VolumeRegistry {
    /// Create a registry over already loaded contents.
    ///
    /// `data_root` is cleaned to an absolute path. A loaded mountpoint outside
    /// it is `CorruptState`.
    pub fn new(data_root: &Path, store: StateStore, volumes: VolumeMap) -> PersistResult<Self> {
        let data_root = path::clean_path(data_root)?;
        for (name, record) in &volumes {
            if !path::is_strict_descendant(&data_root, &record.mountpoint)? {
                return Err(PersistError::CorruptState(format!(
                    "mountpoint {} of volume {} is outside data root {}",
                    record.mountpoint.display(),
                    name,
                    data_root.display()
                )));
            }
        }
        Ok(Self {
            inner: Arc::new(Mutex::new(RegistryInner { volumes, store })),
            data_root: Arc::new(data_root),
        })
    }

    /// Load contents from `store` and create a registry over them.
    pub fn open(data_root: &Path, store: StateStore) -> PersistResult<Self> {
        let volumes = store.load()?;
        Self::new(data_root, store, volumes)
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn len(&self) -> usize {
        self.inner.lock().volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register a new volume and create its directory.
    ///
    /// The mountpoint is `data_root/<options.mountpoint>` or `data_root/<name>`.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the name is taken (nothing is touched)
    /// - `InvalidPath` if the mountpoint escapes the data root (nothing is touched)
    /// - `Io` if the directory or the state file cannot be written
    pub fn create(&self, name: &str, options: &CreateOptions) -> PersistResult<Volume> {
        tracing::debug!(volume = %name, "Create called");
        let mut inner = self.inner.lock();

        if inner.volumes.contains_key(name) {
            return Err(PersistError::AlreadyExists(name.to_string()));
        }

        let mountpoint =
            path::resolve_mountpoint(&self.data_root, name, options.mountpoint.as_deref())?;
        ensure_dir(&mountpoint, perms::DATA_DIR_MODE)?;

        let record = VolumeRecord::new(mountpoint);
        inner.volumes.insert(name.to_string(), record.clone());

        let RegistryInner { volumes, store } = &mut *inner;
        if let Err(e) = store.save(volumes) {
            volumes.remove(name);
            tracing::error!(volume = %name, error = %e, "Failed to persist new volume");
            return Err(e);
        }

        tracing::info!(
            volume = %name,
            mountpoint = %record.mountpoint.display(),
            "Created volume"
        );
        Ok(to_volume(name, &record))
    }

    /// Look up a volume by name.
    pub fn get(&self, name: &str) -> PersistResult<Volume> {
        tracing::debug!(volume = %name, "Get called");
        let inner = self.inner.lock();

        inner
            .volumes
            .get(name)
            .map(|record| to_volume(name, record))
            .ok_or_else(|| PersistError::NotFound(name.to_string()))
    }

    /// All volumes, in no particular order.
    pub fn list(&self) -> Vec<Volume> {
        tracing::debug!("List called");
        let inner = self.inner.lock();

        let volumes: Vec<Volume> = inner
            .volumes
            .iter()
            .map(|(name, record)| to_volume(name, record))
            .collect();
        tracing::debug!(count = volumes.len(), "Listed volumes");
        volumes
    }

    /// Forget a volume. Its directory stays on disk.
    pub fn remove(&self, name: &str) -> PersistResult<()> {
        tracing::debug!(volume = %name, "Remove called");
        let mut inner = self.inner.lock();

        let RegistryInner { volumes, store } = &mut *inner;
        let record = volumes
            .remove(name)
            .ok_or_else(|| PersistError::NotFound(name.to_string()))?;

        if let Err(e) = store.save(volumes) {
            volumes.insert(name.to_string(), record);
            tracing::error!(volume = %name, error = %e, "Failed to persist volume removal");
            return Err(e);
        }

        tracing::info!(
            volume = %name,
            mountpoint = %record.mountpoint.display(),
            "Removed volume"
        );
        Ok(())
    }

    /// Return the mountpoint after checking it is still a directory.
    ///
    /// Never creates the directory.
    pub fn mount(&self, name: &str) -> PersistResult<PathBuf> {
        tracing::debug!(volume = %name, "Mount called");
        let inner = self.inner.lock();

        let mountpoint = inner
            .volumes
            .get(name)
            .map(|record| record.mountpoint.clone())
            .ok_or_else(|| PersistError::NotFound(name.to_string()))?;

        match std::fs::metadata(&mountpoint) {
            Ok(meta) if meta.is_dir() => {
                tracing::debug!(volume = %name, mountpoint = %mountpoint.display(), "Mounted");
                Ok(mountpoint)
            }
            Ok(_) => Err(PersistError::PathIsFile {
                name: name.to_string(),
                path: mountpoint,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PersistError::PathMissing {
                name: name.to_string(),
                path: mountpoint,
            }),
            Err(e) => Err(PersistError::Io(format!(
                "Failed to stat {} for volume {}: {}",
                mountpoint.display(),
                name,
                e
            ))),
        }
    }

    /// Recorded mountpoint, without touching the disk.
    pub fn path(&self, name: &str) -> PersistResult<PathBuf> {
        tracing::debug!(volume = %name, "Path called");
        let inner = self.inner.lock();

        inner
            .volumes
            .get(name)
            .map(|record| record.mountpoint.clone())
            .ok_or_else(|| PersistError::NotFound(name.to_string()))
    }

    /// Acknowledge an unmount. Only checks the name exists.
    pub fn unmount(&self, name: &str) -> PersistResult<()> {
        tracing::debug!(volume = %name, "Unmount called");
        let inner = self.inner.lock();

        if !inner.volumes.contains_key(name) {
            return Err(PersistError::NotFound(name.to_string()));
        }

        tracing::info!(volume = %name, "Unmounted");
        Ok(())
    }

    pub fn capabilities(&self) -> Capabilities {
        tracing::debug!("Capabilities called");
        let _inner = self.inner.lock();
        Capabilities::local()
    }
}

fn to_volume(name: &str, record: &VolumeRecord) -> Volume {
    Volume {
        name: name.to_string(),
        mountpoint: record.mountpoint.clone(),
        created_at: record.created_at,
    }
}
