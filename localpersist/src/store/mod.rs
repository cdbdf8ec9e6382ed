//! State file persistence.
//!
//! The whole registry is written on every mutation:
//! - Write to a temp file in the state directory
//! - fsync, then rename over the state file
//!
//! A crash mid-write leaves the previous state file intact.

pub mod schema;

use std::io::Write;
use std::path::{Path, PathBuf};

use localpersist_shared::errors::{PersistError, PersistResult};

use crate::util::set_mode;
use crate::volumes::constants::{perms, state};

pub use schema::{VolumeMap, VolumeRecord};

/// Loads and saves registry contents to a single JSON state file.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store backed by the standard file name inside `state_dir`.
    pub fn new(state_dir: &Path) -> Self {
        Self::at(state_dir.join(state::FILE_NAME))
    }

    /// Store backed by an explicit file path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the registry from disk.
    ///
    /// A missing file is an empty registry. Anything unreadable or
    /// unparseable is an error; the caller must not continue with a guess.
    pub fn load(&self) -> PersistResult<VolumeMap> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No state file, starting empty");
                return Ok(VolumeMap::new());
            }
            Err(e) => {
                return Err(PersistError::Io(format!(
                    "Failed to read state file {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let decoded = schema::decode(&bytes).map_err(|e| match e {
            PersistError::CorruptState(msg) => {
                PersistError::CorruptState(format!("{}: {}", self.path.display(), msg))
            }
            other => other,
        })?;

        if decoded.was_migrated() {
            tracing::warn!(
                path = %self.path.display(),
                from_version = decoded.version,
                to_version = state::SCHEMA_VERSION,
                volumes = decoded.volumes.len(),
                "Migrating state file from older schema; it will be rewritten on next change"
            );
        }

        Ok(decoded.volumes)
    }

    /// Replace the state file with `volumes`.
    pub fn save(&self, volumes: &VolumeMap) -> PersistResult<()> {
        let dir = self.path.parent().ok_or_else(|| {
            PersistError::Internal(format!(
                "state file {} has no parent directory",
                self.path.display()
            ))
        })?;
        let data = schema::encode(volumes)?;

        let io_err = |e: std::io::Error| {
            PersistError::Io(format!(
                "Failed to write state file {}: {}",
                self.path.display(),
                e
            ))
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(".local-persist")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(io_err)?;
        tmp.write_all(&data).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        set_mode(tmp.path(), perms::STATE_FILE_MODE)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        tracing::trace!(
            path = %self.path.display(),
            volumes = volumes.len(),
            bytes = data.len(),
            "Saved state file"
        );
        Ok(())
    }
}
