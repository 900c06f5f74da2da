//! Root-relative paths and per-tree snapshots

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::comparison::Fingerprint;
use crate::error::ScanError;

/// Path of a file relative to its tree root
///
/// Always `/`-separated regardless of platform, so the same file position
/// under two different roots yields equal values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// Build the relative path of `path` below `root`
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NonUtf8Path`] if any component is not valid UTF-8.
    pub fn from_root(root: &Path, path: &Path) -> Result<Self, ScanError> {
        let rel = path.strip_prefix(root).unwrap_or(path);
        let mut parts = Vec::new();

        for component in rel.components() {
            if let Component::Normal(part) = component {
                let part = part.to_str().ok_or_else(|| ScanError::NonUtf8Path {
                    path: path.to_path_buf(),
                })?;
                parts.push(part);
            }
        }

        Ok(Self(parts.join("/")))
    }

    /// The normalized string form
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve this path below `root` using native separators
    #[must_use]
    pub fn to_native(&self, root: &Path) -> PathBuf {
        self.0
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(root.to_path_buf(), |acc, part| acc.join(part))
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RelativePath {
    fn from(value: &str) -> Self {
        Self(value.replace('\\', "/").trim_matches('/').to_string())
    }
}

/// Content fingerprints of every regular file under one root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSnapshot {
    files: BTreeMap<RelativePath, Fingerprint>,
}

impl TreeSnapshot {
    /// Create an empty snapshot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file; returns the previous fingerprint if the path was present
    pub fn insert(&mut self, path: RelativePath, fingerprint: Fingerprint) -> Option<Fingerprint> {
        self.files.insert(path, fingerprint)
    }

    /// Fingerprint recorded for `path`
    #[must_use]
    pub fn get(&self, path: &RelativePath) -> Option<&Fingerprint> {
        self.files.get(path)
    }

    /// Whether `path` is present
    #[must_use]
    pub fn contains(&self, path: &RelativePath) -> bool {
        self.files.contains_key(path)
    }

    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the tree holds no files
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate records in relative-path order
    pub fn iter(&self) -> btree_map::Iter<'_, RelativePath, Fingerprint> {
        self.files.iter()
    }

    /// Iterate relative paths in order
    pub fn paths(&self) -> btree_map::Keys<'_, RelativePath, Fingerprint> {
        self.files.keys()
    }
}

impl FromIterator<(RelativePath, Fingerprint)> for TreeSnapshot {
    fn from_iter<I: IntoIterator<Item = (RelativePath, Fingerprint)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TreeSnapshot {
    type Item = (&'a RelativePath, &'a Fingerprint);
    type IntoIter = btree_map::Iter<'a, RelativePath, Fingerprint>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_from_root() {
        let root = Path::new("/data/source");
        let file = root.join("sub").join("nested.txt");

        let rel = RelativePath::from_root(root, &file).unwrap();
        assert_eq!(rel.as_str(), "sub/nested.txt");
    }

    #[test]
    fn test_relative_path_equal_across_roots() {
        let a = RelativePath::from_root(Path::new("/one"), Path::new("/one/x/y.bin")).unwrap();
        let b = RelativePath::from_root(Path::new("/two/deep"), Path::new("/two/deep/x/y.bin"))
            .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_relative_path_to_native() {
        let rel = RelativePath::from("a/b/c.txt");
        let native = rel.to_native(Path::new("/replica"));

        assert_eq!(native, Path::new("/replica").join("a").join("b").join("c.txt"));
    }

    #[test]
    fn test_relative_path_from_str_normalizes_separators() {
        assert_eq!(RelativePath::from("a\\b.txt").as_str(), "a/b.txt");
        assert_eq!(RelativePath::from("/a/b.txt/").as_str(), "a/b.txt");
    }

    #[test]
    fn test_relative_path_ordering() {
        let mut paths = vec![
            RelativePath::from("b.txt"),
            RelativePath::from("a/z.txt"),
            RelativePath::from("a.txt"),
        ];
        paths.sort();

        let names: Vec<_> = paths.iter().map(RelativePath::as_str).collect();
        assert_eq!(names, ["a.txt", "a/z.txt", "b.txt"]);
    }

    #[test]
    fn test_snapshot_insert_and_lookup() {
        let mut snapshot = TreeSnapshot::new();
        assert!(snapshot.is_empty());

        let fp = Fingerprint::of_bytes(b"hello");
        assert!(snapshot.insert(RelativePath::from("a.txt"), fp).is_none());

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains(&RelativePath::from("a.txt")));
        assert_eq!(snapshot.get(&RelativePath::from("a.txt")), Some(&fp));
        assert!(snapshot.get(&RelativePath::from("b.txt")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_path_rejects_non_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = Path::new("/root");
        let file = root.join(OsStr::from_bytes(b"bad\xff.txt"));

        let err = RelativePath::from_root(root, &file).unwrap_err();
        assert!(matches!(err, ScanError::NonUtf8Path { .. }));
    }
}
