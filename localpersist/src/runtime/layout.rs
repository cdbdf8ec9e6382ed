//! Directory layout of a runtime.

use std::path::{Path, PathBuf};

use localpersist_shared::errors::PersistResult;

use crate::util::ensure_dir;
use crate::volumes::constants::{perms, state};

/// State and data directories used by one runtime.
#[derive(Debug, Clone)]
pub struct FilesystemLayout {
    state_dir: PathBuf,
    data_dir: PathBuf,
}

impl FilesystemLayout {
    pub fn new(state_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            state_dir,
            data_dir,
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn state_file(&self) -> PathBuf {
        self.state_dir.join(state::FILE_NAME)
    }

    /// Create both directories if missing.
    pub fn prepare(&self) -> PersistResult<()> {
        ensure_dir(&self.state_dir, perms::STATE_DIR_MODE)?;
        ensure_dir(&self.data_dir, perms::DATA_DIR_MODE)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let layout = FilesystemLayout::new(
            temp_dir.path().join("state"),
            temp_dir.path().join("nested/data"),
        );

        layout.prepare().unwrap();

        assert!(layout.state_dir().is_dir());
        assert!(layout.data_dir().is_dir());
        assert_eq!(
            layout.state_file(),
            temp_dir.path().join("state").join(state::FILE_NAME)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_modes() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let layout =
            FilesystemLayout::new(temp_dir.path().join("state"), temp_dir.path().join("data"));
        layout.prepare().unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(layout.state_dir()), 0o700);
        assert_eq!(mode(layout.data_dir()), 0o755);
    }
}
