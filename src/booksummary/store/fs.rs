use super::TierBackend;
use crate::error::{Result, SummaryError};
use crate::model::{is_valid_entry_name, Record, Tier};
use crate::paths::{ensure_dir, PathResolver};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Which directory a [`DirBackend`] is rooted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirLocation {
    Internal,
    PrivateExternal,
    /// Public downloads directory used by the legacy shared strategy.
    PublicDownloads,
}

impl DirLocation {
    fn tier(&self) -> Tier {
        match self {
            DirLocation::Internal => Tier::Internal,
            DirLocation::PrivateExternal => Tier::PrivateExternal,
            DirLocation::PublicDownloads => Tier::Shared,
        }
    }
}

/// A tier stored as a flat directory of text files named by record name.
#[derive(Debug, Clone)]
pub struct DirBackend {
    resolver: PathResolver,
    location: DirLocation,
}

impl DirBackend {
    pub fn new(resolver: PathResolver, location: DirLocation) -> Self {
        Self { resolver, location }
    }

    pub fn internal(resolver: PathResolver) -> Self {
        Self::new(resolver, DirLocation::Internal)
    }

    pub fn private_external(resolver: PathResolver) -> Self {
        Self::new(resolver, DirLocation::PrivateExternal)
    }

    pub fn public_downloads(resolver: PathResolver) -> Self {
        Self::new(resolver, DirLocation::PublicDownloads)
    }

    /// Resolves the backing directory, creating it where the location allows.
    pub fn dir(&self) -> Result<PathBuf> {
        match self.location {
            DirLocation::Internal => self.resolver.internal_dir(),
            DirLocation::PrivateExternal => self.resolver.private_external_dir(),
            DirLocation::PublicDownloads => Ok(self.resolver.public_dir()),
        }
    }

    /// Path of the file called `name` inside the backing directory, if there
    /// is one. Names that would leave the directory never match.
    fn existing_file(&self, name: &str) -> Result<Option<PathBuf>> {
        if !is_valid_entry_name(name) {
            return Ok(None);
        }
        let path = self.dir()?.join(name);
        Ok(path.is_file().then_some(path))
    }
}

impl TierBackend for DirBackend {
    fn tier(&self) -> Tier {
        self.location.tier()
    }

    fn create(&self, record: &Record) -> Result<()> {
        let file_name = record.file_name();
        if !is_valid_entry_name(&file_name) {
            return Err(SummaryError::Store(format!(
                "invalid summary name {:?}",
                record.name
            )));
        }

        let dir = match self.location {
            DirLocation::PublicDownloads => {
                if !self.resolver.external_mounted() {
                    return Err(SummaryError::Unavailable(
                        "external storage is not mounted".to_string(),
                    ));
                }
                let dir = self.resolver.public_dir();
                ensure_dir(&dir)?;
                dir
            }
            _ => self.dir()?,
        };

        let path = dir.join(file_name);
        fs::write(&path, &record.body).map_err(SummaryError::Io)?;
        debug!(
            "event=summary_create module=store tier={} path={}",
            self.tier(),
            path.display()
        );
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Record>> {
        let dir = self.dir()?;
        read_records(&dir, self.tier())
    }

    fn update(&self, record: &Record) -> Result<()> {
        let path = self
            .existing_file(&record.name)?
            .ok_or_else(|| SummaryError::not_found(self.tier(), &record.name))?;
        fs::write(&path, &record.body).map_err(SummaryError::Io)?;
        debug!(
            "event=summary_update module=store tier={} name={}",
            self.tier(),
            record.name
        );
        Ok(())
    }

    fn delete(&self, record: &Record) -> Result<()> {
        let path = self
            .existing_file(&record.name)?
            .ok_or_else(|| SummaryError::not_found(self.tier(), &record.name))?;
        fs::remove_file(&path).map_err(SummaryError::Io)?;
        debug!(
            "event=summary_delete module=store tier={} name={}",
            self.tier(),
            record.name
        );
        Ok(())
    }
}

/// Reads every regular file directly inside `dir` as a record of `tier`.
///
/// A missing directory reads as empty. A file that cannot be read is logged
/// and left out. Entries are sorted by name so the listing is stable across
/// platforms.
pub(crate) fn read_records(dir: &Path, tier: Tier) -> Result<Vec<Record>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(SummaryError::Io)? {
        let path = entry.map_err(SummaryError::Io)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let mut records = Vec::with_capacity(files.len());
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match read_text(&path) {
            Ok(body) => records.push(Record { name, body, tier }),
            Err(err) => warn!(
                "event=summary_read module=store tier={} status=skipped path={} detail={}",
                tier,
                path.display(),
                err
            ),
        }
    }
    Ok(records)
}

/// Reads a file as text, replacing invalid UTF-8 sequences.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(SummaryError::Io)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
