//! Source and replica root checks done once at startup

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{ConfigError, Result};

/// Check that the two roots can be mirrored safely
///
/// The source must be an existing directory. The replica may not exist yet,
/// but neither root may contain the other: mirroring into a subdirectory of
/// the source would copy the replica into itself on every pass.
///
/// # Errors
///
/// Returns [`ConfigError::Root`] describing the first problem found.
pub fn validate_roots(source: &Path, replica: &Path) -> Result<()> {
    if !source.is_dir() {
        return Err(ConfigError::Root {
            path: source.to_path_buf(),
            reason: "source must be an existing directory".to_string(),
        });
    }
    if replica.exists() && !replica.is_dir() {
        return Err(ConfigError::Root {
            path: replica.to_path_buf(),
            reason: "replica exists but is not a directory".to_string(),
        });
    }

    let source_canonical = canonical(source)?;
    let replica_canonical = canonical_or_lexical(replica)?;

    if source_canonical == replica_canonical {
        return Err(ConfigError::Root {
            path: replica.to_path_buf(),
            reason: "source and replica are the same directory".to_string(),
        });
    }
    if replica_canonical.starts_with(&source_canonical) {
        return Err(ConfigError::Root {
            path: replica.to_path_buf(),
            reason: "replica is inside the source tree".to_string(),
        });
    }
    if source_canonical.starts_with(&replica_canonical) {
        return Err(ConfigError::Root {
            path: source.to_path_buf(),
            reason: "source is inside the replica tree".to_string(),
        });
    }

    Ok(())
}

/// Check that the log file lives outside both trees
///
/// A log inside the replica would be deleted by the first pass, and a log
/// inside the source would change after every scan and be copied forever.
/// Call after [`validate_roots`].
///
/// # Errors
///
/// Returns [`ConfigError::Root`] if `log_path` resolves inside either root.
pub fn validate_log_path(log_path: &Path, source: &Path, replica: &Path) -> Result<()> {
    let log_canonical = canonical_or_lexical(log_path)?;

    for (root, name) in [(source, "source"), (replica, "replica")] {
        if log_canonical.starts_with(canonical_or_lexical(root)?) {
            return Err(ConfigError::Root {
                path: log_path.to_path_buf(),
                reason: format!("log file is inside the {name} tree"),
            });
        }
    }

    Ok(())
}

/// Create the replica root as an empty directory if it does not exist
///
/// # Errors
///
/// Returns [`ConfigError::Root`] if the directory cannot be created.
pub fn prepare_replica_root(replica: &Path) -> Result<()> {
    if replica.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(replica).map_err(|e| ConfigError::Root {
        path: replica.to_path_buf(),
        reason: format!("cannot create replica directory: {e}"),
    })?;
    info!(path = %replica.display(), "created replica directory");
    Ok(())
}

fn canonical(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path).map_err(|e| ConfigError::Root {
        path: path.to_path_buf(),
        reason: format!("cannot resolve path: {e}"),
    })
}

/// Canonicalize the nearest existing ancestor and re-append the rest
fn canonical_or_lexical(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return canonical(path);
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| ConfigError::Root {
                path: path.to_path_buf(),
                reason: format!("cannot resolve working directory: {e}"),
            })?
            .join(path)
    };

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = canonical(existing)?;
    for name in missing.into_iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_valid_sibling_roots() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        fs::create_dir(&source).unwrap();

        assert!(validate_roots(&source, &tmp.path().join("replica")).is_ok());
    }

    #[test]
    fn test_missing_source() {
        let tmp = TempDir::new().unwrap();

        let err = validate_roots(&tmp.path().join("nope"), &tmp.path().join("replica"))
            .unwrap_err();

        assert!(err.to_string().contains("existing directory"));
    }

    #[test]
    fn test_same_directory() {
        let tmp = TempDir::new().unwrap();

        let err = validate_roots(tmp.path(), &tmp.path().join(".")).unwrap_err();

        assert!(err.to_string().contains("same directory"));
    }

    #[test]
    fn test_replica_inside_source() {
        let tmp = TempDir::new().unwrap();

        let err = validate_roots(tmp.path(), &tmp.path().join("backup/replica")).unwrap_err();

        assert!(err.to_string().contains("inside the source"));
    }

    #[test]
    fn test_source_inside_replica() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("inner");
        fs::create_dir(&source).unwrap();

        let err = validate_roots(&source, tmp.path()).unwrap_err();

        assert!(err.to_string().contains("inside the replica"));
    }

    #[test]
    fn test_replica_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        fs::create_dir(&source).unwrap();
        let replica = tmp.path().join("replica");
        fs::write(&replica, "not a dir").unwrap();

        assert!(validate_roots(&source, &replica).is_err());
    }

    #[test]
    fn test_log_path_outside_both_roots() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        fs::create_dir(&source).unwrap();

        assert!(
            validate_log_path(
                &tmp.path().join("logs/sync.log"),
                &source,
                &tmp.path().join("replica")
            )
            .is_ok()
        );
    }

    #[test]
    fn test_log_path_inside_source() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        fs::create_dir(&source).unwrap();

        let err = validate_log_path(
            &source.join("sync.log"),
            &source,
            &tmp.path().join("replica"),
        )
        .unwrap_err();

        assert!(err.to_string().contains("inside the source"));
    }

    #[test]
    fn test_log_path_inside_missing_replica() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        fs::create_dir(&source).unwrap();
        let replica = tmp.path().join("replica");

        let err = validate_log_path(&replica.join("logs/sync.log"), &source, &replica)
            .unwrap_err();

        assert!(err.to_string().contains("inside the replica"));
    }

    #[test]
    fn test_log_path_resolved_through_dot_dot() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        let other = tmp.path().join("other");
        fs::create_dir(&source).unwrap();
        fs::create_dir(&other).unwrap();

        let err = validate_log_path(
            &other.join("../source/sync.log"),
            &source,
            &tmp.path().join("replica"),
        )
        .unwrap_err();

        assert!(err.to_string().contains("inside the source"));
    }

    #[test]
    fn test_prepare_replica_root_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let replica = tmp.path().join("a/b/replica");

        prepare_replica_root(&replica).unwrap();

        assert!(replica.is_dir());
        assert_eq!(fs::read_dir(&replica).unwrap().count(), 0);
        // Idempotent
        prepare_replica_root(&replica).unwrap();
    }
}
