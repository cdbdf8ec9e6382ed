//! Mountpoint containment checks.
//!
//! Paths are compared lexically, component by component. Nothing here touches
//! the filesystem apart from reading the current directory for relative input,
//! so a symlink inside the data root is not followed.

use std::path::{Component, Path, PathBuf};

use localpersist_shared::errors::{PersistError, PersistResult};

/// Make `path` absolute and remove `.` and `..` segments without consulting the filesystem.
///
/// `..` at the root stays at the root.
pub fn clean_path(path: &Path) -> PersistResult<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(prefix) => cleaned.push(prefix.as_os_str()),
            Component::RootDir => cleaned.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            Component::Normal(part) => cleaned.push(part),
        }
    }
    Ok(cleaned)
}

/// Whether `target` lies strictly below `base`.
///
/// Equal paths are not descendants, and `/data2` is not below `/data`.
pub fn is_strict_descendant(base: &Path, target: &Path) -> PersistResult<bool> {
    let base = clean_path(base)?;
    let target = clean_path(target)?;
    Ok(contains(&base, &target))
}

/// Check containment and return the cleaned `target`.
///
/// Fails with [`PersistError::InvalidPath`] naming both cleaned paths.
pub fn ensure_contained(base: &Path, target: &Path) -> PersistResult<PathBuf> {
    let base = clean_path(base)?;
    let target = clean_path(target)?;

    let contained = contains(&base, &target);
    tracing::debug!(
        base = %base.display(),
        target = %target.display(),
        contained,
        "Checked mountpoint containment"
    );

    if contained {
        Ok(target)
    } else {
        Err(PersistError::InvalidPath { base, target })
    }
}

// Both paths must already be cleaned.
fn contains(base: &Path, target: &Path) -> bool {
    target != base && target.starts_with(base)
}

/// Compute the mountpoint for a new volume.
///
/// The hint is taken relative to `data_root` even when it starts with `/`.
/// An absent or empty hint falls back to the volume name.
pub fn resolve_mountpoint(
    data_root: &Path,
    name: &str,
    hint: Option<&str>,
) -> PersistResult<PathBuf> {
    let hint = hint.filter(|h| !h.is_empty()).unwrap_or(name);

    let mut joined = data_root.to_path_buf();
    for component in Path::new(hint).components() {
        match component {
            Component::RootDir | Component::Prefix(_) => {}
            other => joined.push(other.as_os_str()),
        }
    }

    ensure_contained(data_root, &joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path_resolves_dots() {
        let cleaned = clean_path(Path::new("/data/./a/../b")).unwrap();
        assert_eq!(cleaned, PathBuf::from("/data/b"));
    }

    #[test]
    fn test_clean_path_parent_of_root_is_root() {
        let cleaned = clean_path(Path::new("/../../etc")).unwrap();
        assert_eq!(cleaned, PathBuf::from("/etc"));
    }

    #[test]
    fn test_clean_path_relative_becomes_absolute() {
        let cleaned = clean_path(Path::new("some/dir")).unwrap();
        assert!(cleaned.is_absolute());
        assert!(cleaned.ends_with("some/dir"));
    }

    #[test]
    fn test_child_is_descendant() {
        assert!(is_strict_descendant(Path::new("/data"), Path::new("/data/vol1")).unwrap());
        assert!(is_strict_descendant(Path::new("/data"), Path::new("/data/a/b/c")).unwrap());
    }

    #[test]
    fn test_same_path_is_not_descendant() {
        assert!(!is_strict_descendant(Path::new("/data"), Path::new("/data")).unwrap());
        assert!(!is_strict_descendant(Path::new("/data"), Path::new("/data/")).unwrap());
        assert!(!is_strict_descendant(Path::new("/data"), Path::new("/data/x/..")).unwrap());
    }

    #[test]
    fn test_sibling_with_shared_prefix_is_not_descendant() {
        assert!(!is_strict_descendant(Path::new("/data"), Path::new("/data-other")).unwrap());
        assert!(!is_strict_descendant(Path::new("/data"), Path::new("/data2/vol")).unwrap());
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        assert!(!is_strict_descendant(Path::new("/data"), Path::new("/Data/vol")).unwrap());
    }

    #[test]
    fn test_ensure_contained_error_names_both_paths() {
        let err = ensure_contained(Path::new("/data"), Path::new("/data/../etc")).unwrap_err();
        match err {
            PersistError::InvalidPath { base, target } => {
                assert_eq!(base, PathBuf::from("/data"));
                assert_eq!(target, PathBuf::from("/etc"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_defaults_to_name() {
        let mountpoint = resolve_mountpoint(Path::new("/data"), "vol1", None).unwrap();
        assert_eq!(mountpoint, PathBuf::from("/data/vol1"));

        let mountpoint = resolve_mountpoint(Path::new("/data"), "vol1", Some("")).unwrap();
        assert_eq!(mountpoint, PathBuf::from("/data/vol1"));
    }

    #[test]
    fn test_resolve_uses_hint() {
        let mountpoint = resolve_mountpoint(Path::new("/data"), "vol1", Some("custom")).unwrap();
        assert_eq!(mountpoint, PathBuf::from("/data/custom"));
    }

    #[test]
    fn test_resolve_absolute_hint_stays_under_root() {
        let mountpoint =
            resolve_mountpoint(Path::new("/data"), "vol1", Some("/my/directory")).unwrap();
        assert_eq!(mountpoint, PathBuf::from("/data/my/directory"));
    }

    #[test]
    fn test_resolve_rejects_escape() {
        let err = resolve_mountpoint(Path::new("/data"), "vol1", Some("../../etc")).unwrap_err();
        assert!(matches!(err, PersistError::InvalidPath { .. }));
    }

    #[test]
    fn test_resolve_rejects_data_root_itself() {
        let err = resolve_mountpoint(Path::new("/data"), "vol1", Some(".")).unwrap_err();
        assert!(matches!(err, PersistError::InvalidPath { .. }));

        let err = resolve_mountpoint(Path::new("/data"), "..", None).unwrap_err();
        assert!(matches!(err, PersistError::InvalidPath { .. }));
    }
}
