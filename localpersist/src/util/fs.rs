//! Directory creation with explicit permissions.

use std::path::Path;

use localpersist_shared::errors::{PersistError, PersistResult};

/// Create `path` and any missing parents with `mode`.
///
/// The created leaf gets exactly `mode` regardless of the umask. Existing
/// directories are left untouched, including their permissions.
/// An existing non-directory at `path` is an error.
pub fn ensure_dir(path: &Path, mode: u32) -> PersistResult<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(PersistError::Io(format!(
                "{} exists and is not a directory",
                path.display()
            )));
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(PersistError::Io(format!(
                "Failed to stat {}: {}",
                path.display(),
                e
            )));
        }
    }

    tracing::debug!(path = %path.display(), mode = %format!("{:o}", mode), "Creating directory");

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }

    builder.create(path).map_err(|e| {
        PersistError::Io(format!(
            "Failed to create directory {}: {}",
            path.display(),
            e
        ))
    })?;
    set_mode(path, mode)
}

/// Set unix permission bits on `path`. No-op elsewhere.
pub fn set_mode(path: &Path, mode: u32) -> PersistResult<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|e| {
            PersistError::Io(format!(
                "Failed to set permissions on {}: {}",
                path.display(),
                e
            ))
        })?;
    }
    #[cfg(not(unix))]
    let _ = (path, mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_creates_nested() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a/b/c");

        ensure_dir(&nested, 0o755).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("vol");

        ensure_dir(&dir, 0o755).unwrap();
        std::fs::write(dir.join("keep"), b"data").unwrap();
        ensure_dir(&dir, 0o755).unwrap();

        assert!(dir.join("keep").exists());
    }

    #[test]
    fn test_ensure_dir_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();

        let err = ensure_dir(&file, 0o755).unwrap_err();
        assert!(matches!(err, PersistError::Io(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_dir_mode_ignores_umask() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        for mode in [0o700, 0o755] {
            let dir = temp_dir.path().join(format!("d{:o}", mode));
            ensure_dir(&dir, mode).unwrap();
            let actual = std::fs::metadata(&dir).unwrap().permissions().mode();
            assert_eq!(actual & 0o777, mode);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_dir_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("existing");
        ensure_dir(&dir, 0o700).unwrap();
        ensure_dir(&dir, 0o755).unwrap();

        let actual = std::fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(actual & 0o777, 0o700);
    }

    #[cfg(unix)]
    #[test]
    fn test_set_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("private");
        ensure_dir(&dir, 0o755).unwrap();
        set_mode(&dir, 0o700).unwrap();

        let mode = std::fs::metadata(&dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }
}
