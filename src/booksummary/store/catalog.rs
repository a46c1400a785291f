//! # Content Catalog
//!
//! An indexed registry of shared files. Callers never build paths into the
//! shared volume themselves: they insert an entry describing the file
//! (display name, MIME type, relative path), receive a numeric id, and do all
//! further I/O through that id.
//!
//! An entry is keyed by its relative path and display name: inserting the
//! same pair again hands back the existing id with its content emptied, so a
//! file is never registered twice. Lookups by display name alone return the
//! first match in id order.

use crate::error::{Result, SummaryError};
use crate::model::is_valid_entry_name;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

pub type CatalogId = u64;

pub const MIME_TEXT_PLAIN: &str = "text/plain";

/// Column values supplied when inserting a file into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub display_name: String,
    pub mime_type: String,
    pub relative_path: String,
}

impl CatalogEntry {
    pub fn text(display_name: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            mime_type: MIME_TEXT_PLAIN.to_string(),
            relative_path: relative_path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub id: CatalogId,
    #[serde(flatten)]
    pub entry: CatalogEntry,
}

pub trait Catalog {
    /// Registers an entry, or reuses the one already registered for the same
    /// relative path and display name. `Ok(None)` when the catalog refuses it.
    fn insert(&self, entry: &CatalogEntry) -> Result<Option<CatalogId>>;

    /// Id of the first entry whose display name equals `name` exactly.
    fn find_by_display_name(&self, name: &str) -> Result<Option<CatalogId>>;

    /// Opens a truncating writer on the entry's content.
    fn open_writer(&self, id: CatalogId) -> Result<Box<dyn Write>>;

    /// Removes an entry. Returns `false` if no entry had that id.
    fn delete(&self, id: CatalogId) -> Result<bool>;

    /// All entries in id order.
    fn rows(&self) -> Result<Vec<CatalogRow>>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogIndex {
    next_id: CatalogId,
    rows: Vec<CatalogRow>,
}

/// Catalog whose index is a JSON file and whose content lives under a volume
/// root at `<volume>/<relative_path>/<display_name>`.
#[derive(Debug, Clone)]
pub struct FsCatalog {
    volume_root: PathBuf,
    index_path: PathBuf,
}

impl FsCatalog {
    pub fn new(volume_root: PathBuf, index_path: PathBuf) -> Self {
        Self {
            volume_root,
            index_path,
        }
    }

    /// Where the content of an entry lives on the volume.
    pub fn content_path(&self, entry: &CatalogEntry) -> PathBuf {
        self.volume_root
            .join(&entry.relative_path)
            .join(&entry.display_name)
    }

    fn load_index(&self) -> Result<CatalogIndex> {
        if !self.index_path.exists() {
            return Ok(CatalogIndex {
                next_id: 1,
                rows: Vec::new(),
            });
        }
        let content = fs::read_to_string(&self.index_path).map_err(SummaryError::Io)?;
        let index = serde_json::from_str(&content).map_err(SummaryError::Serialization)?;
        Ok(index)
    }

    fn save_index(&self, index: &CatalogIndex) -> Result<()> {
        if let Some(parent) = self.index_path.parent() {
            fs::create_dir_all(parent).map_err(SummaryError::Io)?;
        }
        let content = serde_json::to_string_pretty(index).map_err(SummaryError::Serialization)?;
        fs::write(&self.index_path, content).map_err(SummaryError::Io)?;
        Ok(())
    }

    fn row(&self, id: CatalogId) -> Result<CatalogRow> {
        self.load_index()?
            .rows
            .into_iter()
            .find(|row| row.id == id)
            .ok_or_else(|| SummaryError::Store(format!("no catalog entry with id {}", id)))
    }
}

/// Relative paths are joined onto the volume root, so they may only descend.
fn is_relative_dir(path: &str) -> bool {
    Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

impl Catalog for FsCatalog {
    fn insert(&self, entry: &CatalogEntry) -> Result<Option<CatalogId>> {
        if !is_valid_entry_name(&entry.display_name) || !is_relative_dir(&entry.relative_path) {
            debug!(
                "event=catalog_insert module=catalog status=refused display_name={:?}",
                entry.display_name
            );
            return Ok(None);
        }

        let path = self.content_path(entry);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(SummaryError::Io)?;
        }
        File::create(&path).map_err(SummaryError::Io)?;

        let mut index = self.load_index()?;
        if let Some(existing) = index.rows.iter().find(|row| {
            row.entry.relative_path == entry.relative_path
                && row.entry.display_name == entry.display_name
        }) {
            debug!(
                "event=catalog_insert module=catalog status=reused id={} path={}",
                existing.id,
                path.display()
            );
            return Ok(Some(existing.id));
        }

        let id = index.next_id.max(1);
        index.next_id = id + 1;
        index.rows.push(CatalogRow {
            id,
            entry: entry.clone(),
        });
        self.save_index(&index)?;

        debug!(
            "event=catalog_insert module=catalog status=ok id={} path={}",
            id,
            path.display()
        );
        Ok(Some(id))
    }

    fn find_by_display_name(&self, name: &str) -> Result<Option<CatalogId>> {
        Ok(self
            .load_index()?
            .rows
            .iter()
            .find(|row| row.entry.display_name == name)
            .map(|row| row.id))
    }

    fn open_writer(&self, id: CatalogId) -> Result<Box<dyn Write>> {
        let row = self.row(id)?;
        let file = File::create(self.content_path(&row.entry)).map_err(SummaryError::Io)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn delete(&self, id: CatalogId) -> Result<bool> {
        let mut index = self.load_index()?;
        let Some(pos) = index.rows.iter().position(|row| row.id == id) else {
            return Ok(false);
        };
        let removed = index.rows.remove(pos);
        // Older indexes may hold several rows for one file; none may outlive it.
        index.rows.retain(|row| {
            row.entry.relative_path != removed.entry.relative_path
                || row.entry.display_name != removed.entry.display_name
        });
        self.save_index(&index)?;

        let path = self.content_path(&removed.entry);
        if path.exists() {
            fs::remove_file(&path).map_err(SummaryError::Io)?;
        }

        debug!("event=catalog_delete module=catalog status=ok id={}", id);
        Ok(true)
    }

    fn rows(&self) -> Result<Vec<CatalogRow>> {
        Ok(self.load_index()?.rows)
    }
}
