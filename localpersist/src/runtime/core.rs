//! Runtime bootstrap.

use std::sync::Arc;

use localpersist_shared::errors::{PersistError, PersistResult};

use crate::runtime::layout::FilesystemLayout;
use crate::runtime::options::RuntimeOptions;
use crate::store::StateStore;
use crate::volumes::VolumeRegistry;

/// Owns the registry for the lifetime of the process.
///
/// **Prepare Before Execute**: directories exist and prior state is loaded
/// before `new` returns. There is no partially initialized runtime.
///
/// **Cloning**: cheap via `Arc`; clones share the same registry.
#[derive(Clone)]
pub struct LocalPersistRuntime {
    inner: Arc<RuntimeInner>,
}

struct RuntimeInner {
    layout: FilesystemLayout,
    registry: VolumeRegistry,
}

impl LocalPersistRuntime {
    /// Prepare directories, load the state file, and build the registry.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if either directory is not absolute
    /// - `Io` if a directory cannot be created or the state file cannot be read
    /// - `CorruptState` if the state file exists but cannot be parsed
    pub fn new(options: RuntimeOptions) -> PersistResult<Self> {
        // Validate Early: Check preconditions before touching the filesystem
        for (label, dir) in [("state_dir", &options.state_dir), ("data_dir", &options.data_dir)] {
            if !dir.is_absolute() {
                return Err(PersistError::InvalidArgument(format!(
                    "{} must be absolute path, got: {}",
                    label,
                    dir.display()
                )));
            }
        }

        let layout = FilesystemLayout::new(options.state_dir, options.data_dir);
        layout.prepare()?;

        let store = StateStore::at(layout.state_file());
        let registry = VolumeRegistry::open(layout.data_dir(), store).inspect_err(|e| {
            tracing::error!(
                state_file = %layout.state_file().display(),
                error = %e,
                "Failed to load volume state"
            );
        })?;

        tracing::info!(
            state_dir = %layout.state_dir().display(),
            data_dir = %layout.data_dir().display(),
            "Found {} volumes on startup",
            registry.len()
        );

        Ok(Self {
            inner: Arc::new(RuntimeInner { layout, registry }),
        })
    }

    pub fn registry(&self) -> &VolumeRegistry {
        &self.inner.registry
    }

    pub fn layout(&self) -> &FilesystemLayout {
        &self.inner.layout
    }
}

impl std::fmt::Debug for LocalPersistRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalPersistRuntime")
            .field("state_dir", &self.inner.layout.state_dir())
            .field("data_dir", &self.inner.layout.data_dir())
            .finish()
    }
}
