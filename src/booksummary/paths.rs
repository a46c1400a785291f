//! # Path Resolution
//!
//! Maps the tiers onto concrete directories. Every tier keeps its summaries in
//! a subdirectory named [`DIRECTORY`]:
//!
//! ```text
//! <internal>/Book Summary/            Internal
//! <external>/Book Summary/            PrivateExternal
//! <public>/Download/Book Summary/     Shared (legacy directory)
//! <public>/Documents/Book Summary/    Shared (catalog collection)
//! ```
//!
//! Directories are created lazily, on first access, including missing parents.

use crate::error::{Result, SummaryError};
use directories::{ProjectDirs, UserDirs};
use std::fs;
use std::path::{Path, PathBuf};

pub const DIRECTORY: &str = "Book Summary";
pub const DOWNLOADS_DIR: &str = "Download";
pub const DOCUMENTS_DIR: &str = "Documents";

const CATALOG_INDEX_FILENAME: &str = "catalog.json";

/// The storage roots of one installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRoots {
    /// App-private internal root.
    pub internal: PathBuf,
    /// App-private external root, `None` when the platform has none.
    pub external: Option<PathBuf>,
    /// Root of the shared volume.
    pub public: PathBuf,
    /// Where the catalog keeps its entry index.
    pub catalog_index: PathBuf,
}

impl StorageRoots {
    /// Lays out every root below a single base directory.
    pub fn under<P: AsRef<Path>>(base: P) -> Self {
        let base = base.as_ref();
        Self {
            internal: base.join("files"),
            external: Some(base.join("external")),
            public: base.join("public"),
            catalog_index: base.join(CATALOG_INDEX_FILENAME),
        }
    }

    /// Uses the platform's per-user directories.
    pub fn from_system() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "booksummary", "booksummary").ok_or_else(
            || SummaryError::Config("Could not determine application directories".to_string()),
        )?;
        let user_dirs = UserDirs::new()
            .ok_or_else(|| SummaryError::Config("Could not determine home directory".into()))?;

        Ok(Self {
            internal: proj_dirs.data_dir().to_path_buf(),
            external: Some(proj_dirs.data_local_dir().join("external")),
            public: user_dirs.home_dir().to_path_buf(),
            catalog_index: proj_dirs.data_dir().join(CATALOG_INDEX_FILENAME),
        })
    }
}

/// Relative path of the catalog collection holding shared summaries.
pub fn catalog_relative_path() -> String {
    format!("{}/{}", DOCUMENTS_DIR, DIRECTORY)
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    roots: StorageRoots,
    external_mounted: bool,
}

impl PathResolver {
    pub fn new(roots: StorageRoots, external_mounted: bool) -> Self {
        Self {
            roots,
            external_mounted,
        }
    }

    pub fn external_mounted(&self) -> bool {
        self.external_mounted
    }

    pub fn internal_dir(&self) -> Result<PathBuf> {
        let dir = self.roots.internal.join(DIRECTORY);
        ensure_dir(&dir)?;
        Ok(dir)
    }

    pub fn private_external_dir(&self) -> Result<PathBuf> {
        let root = match (&self.roots.external, self.external_mounted) {
            (Some(root), true) => root,
            _ => {
                return Err(SummaryError::Unavailable(
                    "external storage is not mounted".to_string(),
                ))
            }
        };
        let dir = root.join(DIRECTORY);
        ensure_dir(&dir)?;
        Ok(dir)
    }

    /// Legacy public directory. Not created here; writers create it on demand.
    pub fn public_dir(&self) -> PathBuf {
        self.roots.public.join(DOWNLOADS_DIR).join(DIRECTORY)
    }
}

pub(crate) fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(SummaryError::Io)?;
    }
    Ok(())
}
