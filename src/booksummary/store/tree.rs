//! Access to a user-granted shared directory tree.
//!
//! The handle is obtained outside this crate (typically through a directory
//! picker) and is treated as opaque: only a [`DocumentTree`] knows how to turn
//! it into entries.

use crate::error::{Result, SummaryError};
use log::warn;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";

/// Authorization handle for a granted document tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SharedRoot(String);

impl SharedRoot {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self(format!("{}{}", FILE_SCHEME, path.as_ref().display()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SharedRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One child of a granted tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub is_file: bool,
    /// Document reference used to open the entry.
    pub uri: String,
}

pub trait DocumentTree {
    /// Direct children of the tree behind `root`.
    ///
    /// `PermissionDenied` if the handle does not resolve to a directory.
    fn list(&self, root: &SharedRoot) -> Result<Vec<TreeEntry>>;

    /// Reads an entry's content as text.
    fn read_text(&self, entry: &TreeEntry) -> Result<String>;
}

/// Tree access over the local filesystem. Handles are directory paths,
/// optionally prefixed with `file://`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentTree;

impl FsDocumentTree {
    fn resolve(root: &SharedRoot) -> PathBuf {
        let raw = root.as_str();
        PathBuf::from(raw.strip_prefix(FILE_SCHEME).unwrap_or(raw))
    }
}

impl DocumentTree for FsDocumentTree {
    fn list(&self, root: &SharedRoot) -> Result<Vec<TreeEntry>> {
        let dir = Self::resolve(root);
        if !dir.is_dir() {
            warn!(
                "event=tree_list module=tree status=denied handle={} reason=not_a_directory",
                root
            );
            return Err(SummaryError::PermissionDenied(format!(
                "{} does not represent a valid directory",
                root
            )));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir).map_err(SummaryError::Io)? {
            let path = entry.map_err(SummaryError::Io)?.path();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            entries.push(TreeEntry {
                name,
                is_file: path.is_file(),
                uri: path.to_string_lossy().into_owned(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read_text(&self, entry: &TreeEntry) -> Result<String> {
        super::fs::read_text(Path::new(&entry.uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_files_and_directories() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();

        let entries = FsDocumentTree
            .list(&SharedRoot::from_path(temp.path()))
            .unwrap();
        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.name.as_str(), e.is_file))
            .collect();
        assert_eq!(summary, vec![("a.txt", true), ("b.txt", true), ("sub", false)]);
    }

    #[test]
    fn plain_path_handles_are_accepted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "alpha").unwrap();

        let root = SharedRoot::new(temp.path().to_string_lossy());
        let entries = FsDocumentTree.list(&root).unwrap();
        assert_eq!(FsDocumentTree.read_text(&entries[0]).unwrap(), "alpha");
    }

    #[test]
    fn revoked_handle_is_denied() {
        let temp = TempDir::new().unwrap();
        let root = SharedRoot::from_path(temp.path().join("gone"));

        let err = FsDocumentTree.list(&root).unwrap_err();
        assert!(matches!(err, SummaryError::PermissionDenied(_)));
    }
}
