use std::path::PathBuf;

use super::constants::dirs;

/// Configuration for [`LocalPersistRuntime`](super::LocalPersistRuntime).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Directory holding the state file. Created with mode 0700.
    pub state_dir: PathBuf,
    /// Root for all volume mountpoints. Created with mode 0755.
    pub data_dir: PathBuf,
}

impl RuntimeOptions {
    pub fn new(state_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            data_dir: data_dir.into(),
        }
    }
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self::new(dirs::DEFAULT_STATE_DIR, dirs::DEFAULT_DATA_DIR)
    }
}
