//! The shared tier.
//!
//! Newer platforms forbid building paths into public storage, so records go
//! through the content [`Catalog`] and are listed through a granted
//! [`DocumentTree`]. Older platforms write plain files into the public
//! downloads directory. The variant is fixed when the backend is built.

use super::catalog::{Catalog, CatalogEntry};
use super::fs::DirBackend;
use super::tree::{DocumentTree, SharedRoot};
use super::TierBackend;
use crate::error::{Result, SummaryError};
use crate::model::{Record, Tier};
use crate::paths::{catalog_relative_path, PathResolver};
use crate::platform::{Platform, SharedStrategy};
use log::{debug, warn};
use std::io::Write;

/// Shared tier backed by a content catalog.
pub struct CatalogBackend {
    catalog: Box<dyn Catalog>,
    tree: Box<dyn DocumentTree>,
    root: Option<SharedRoot>,
}

impl CatalogBackend {
    pub fn new(catalog: Box<dyn Catalog>, tree: Box<dyn DocumentTree>) -> Self {
        Self {
            catalog,
            tree,
            root: None,
        }
    }

    pub fn set_shared_root(&mut self, root: Option<SharedRoot>) {
        self.root = root;
    }

    fn write_body(&self, id: u64, body: &str) -> Result<()> {
        let mut writer = self.catalog.open_writer(id)?;
        writer.write_all(body.as_bytes()).map_err(SummaryError::Io)?;
        writer.flush().map_err(SummaryError::Io)?;
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<u64> {
        self.catalog
            .find_by_display_name(name)?
            .ok_or_else(|| SummaryError::not_found(Tier::Shared, name))
    }
}

impl TierBackend for CatalogBackend {
    fn tier(&self) -> Tier {
        Tier::Shared
    }

    fn create(&self, record: &Record) -> Result<()> {
        let entry = CatalogEntry::text(record.file_name(), catalog_relative_path());
        let id = self.catalog.insert(&entry)?.ok_or_else(|| {
            SummaryError::CatalogInsertFailed(format!(
                "catalog returned no entry for {}",
                entry.display_name
            ))
        })?;
        self.write_body(id, &record.body)?;
        debug!(
            "event=summary_create module=shared strategy=catalog id={} name={}",
            id, entry.display_name
        );
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Record>> {
        let root = self.root.as_ref().ok_or_else(|| {
            SummaryError::PermissionDenied("no shared directory has been granted".to_string())
        })?;

        let mut records = Vec::new();
        for entry in self.tree.list(root)?.into_iter().filter(|e| e.is_file) {
            match self.tree.read_text(&entry) {
                Ok(body) => records.push(Record {
                    name: entry.name,
                    body,
                    tier: Tier::Shared,
                }),
                Err(err) => warn!(
                    "event=summary_read module=shared status=skipped uri={} detail={}",
                    entry.uri, err
                ),
            }
        }
        Ok(records)
    }

    fn update(&self, record: &Record) -> Result<()> {
        let id = self.lookup(&record.name)?;
        self.write_body(id, &record.body)?;
        debug!(
            "event=summary_update module=shared strategy=catalog id={} name={}",
            id, record.name
        );
        Ok(())
    }

    fn delete(&self, record: &Record) -> Result<()> {
        let id = self.lookup(&record.name)?;
        if !self.catalog.delete(id)? {
            return Err(SummaryError::not_found(Tier::Shared, &record.name));
        }
        debug!(
            "event=summary_delete module=shared strategy=catalog id={} name={}",
            id, record.name
        );
        Ok(())
    }
}

pub enum SharedBackend {
    Catalog(CatalogBackend),
    LegacyDirectory(DirBackend),
}

impl SharedBackend {
    /// Picks the variant the platform supports.
    pub fn for_platform(
        platform: Platform,
        resolver: PathResolver,
        catalog: Box<dyn Catalog>,
        tree: Box<dyn DocumentTree>,
    ) -> Self {
        match platform.shared_strategy() {
            SharedStrategy::Catalog => SharedBackend::Catalog(CatalogBackend::new(catalog, tree)),
            SharedStrategy::LegacyDirectory => {
                SharedBackend::LegacyDirectory(DirBackend::public_downloads(resolver))
            }
        }
    }

    pub fn strategy(&self) -> SharedStrategy {
        match self {
            SharedBackend::Catalog(_) => SharedStrategy::Catalog,
            SharedBackend::LegacyDirectory(_) => SharedStrategy::LegacyDirectory,
        }
    }

    /// Only the catalog variant uses the handle; the legacy variant ignores it.
    pub fn set_shared_root(&mut self, root: Option<SharedRoot>) {
        match self {
            SharedBackend::Catalog(backend) => backend.set_shared_root(root),
            SharedBackend::LegacyDirectory(_) => {
                debug!("event=set_shared_root module=shared strategy=legacy status=ignored");
            }
        }
    }

    fn inner(&self) -> &dyn TierBackend {
        match self {
            SharedBackend::Catalog(backend) => backend as &dyn TierBackend,
            SharedBackend::LegacyDirectory(backend) => backend as &dyn TierBackend,
        }
    }
}

impl TierBackend for SharedBackend {
    fn tier(&self) -> Tier {
        Tier::Shared
    }

    fn create(&self, record: &Record) -> Result<()> {
        self.inner().create(record)
    }

    fn read_all(&self) -> Result<Vec<Record>> {
        self.inner().read_all()
    }

    fn update(&self, record: &Record) -> Result<()> {
        self.inner().update(record)
    }

    fn delete(&self, record: &Record) -> Result<()> {
        self.inner().delete(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{StorageRoots, DIRECTORY, DOCUMENTS_DIR};
    use crate::store::catalog::{CatalogId, CatalogRow, FsCatalog};
    use crate::store::tree::{FsDocumentTree, TreeEntry};
    use std::fs;
    use tempfile::TempDir;

    /// Catalog that refuses every insert.
    struct RefusingCatalog;

    impl Catalog for RefusingCatalog {
        fn insert(&self, _entry: &CatalogEntry) -> Result<Option<CatalogId>> {
            Ok(None)
        }

        fn find_by_display_name(&self, _name: &str) -> Result<Option<CatalogId>> {
            Ok(None)
        }

        fn open_writer(&self, id: CatalogId) -> Result<Box<dyn Write>> {
            Err(SummaryError::Store(format!("no entry {}", id)))
        }

        fn delete(&self, _id: CatalogId) -> Result<bool> {
            Ok(false)
        }

        fn rows(&self) -> Result<Vec<CatalogRow>> {
            Ok(Vec::new())
        }
    }

    /// Tree with two files, one of which cannot be read.
    struct HalfReadableTree;

    impl DocumentTree for HalfReadableTree {
        fn list(&self, _root: &SharedRoot) -> Result<Vec<TreeEntry>> {
            Ok(["A.txt", "Gone.txt"]
                .into_iter()
                .map(|name| TreeEntry {
                    name: name.to_string(),
                    is_file: true,
                    uri: format!("file:///tree/{}", name),
                })
                .collect())
        }

        fn read_text(&self, entry: &TreeEntry) -> Result<String> {
            match entry.name.as_str() {
                "A.txt" => Ok("b".to_string()),
                _ => Err(SummaryError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "removed after listing",
                ))),
            }
        }
    }

    fn catalog_backend(temp: &TempDir) -> CatalogBackend {
        let roots = StorageRoots::under(temp.path());
        let catalog = FsCatalog::new(roots.public.clone(), roots.catalog_index.clone());
        CatalogBackend::new(Box::new(catalog), Box::new(FsDocumentTree))
    }

    fn collection_dir(temp: &TempDir) -> std::path::PathBuf {
        temp.path()
            .join("public")
            .join(DOCUMENTS_DIR)
            .join(DIRECTORY)
    }

    #[test]
    fn catalog_create_writes_into_documents_collection() {
        let temp = TempDir::new().unwrap();
        let backend = catalog_backend(&temp);

        backend
            .create(&Record::new(Tier::Shared, "Dune", "Desert planet"))
            .unwrap();

        let path = collection_dir(&temp).join("Dune.txt");
        assert_eq!(fs::read_to_string(path).unwrap(), "Desert planet");
    }

    #[test]
    fn catalog_list_requires_granted_root() {
        let temp = TempDir::new().unwrap();
        let mut backend = catalog_backend(&temp);
        backend
            .create(&Record::new(Tier::Shared, "A", "b"))
            .unwrap();

        let err = backend.read_all().unwrap_err();
        assert!(matches!(err, SummaryError::PermissionDenied(_)));

        backend.set_shared_root(Some(SharedRoot::from_path(collection_dir(&temp))));
        assert_eq!(
            backend.read_all().unwrap(),
            vec![Record::new(Tier::Shared, "A.txt", "b")]
        );
    }

    #[test]
    fn catalog_list_skips_unreadable_entries() {
        let mut backend =
            CatalogBackend::new(Box::new(RefusingCatalog), Box::new(HalfReadableTree));
        backend.set_shared_root(Some(SharedRoot::new("file:///tree")));

        assert_eq!(
            backend.read_all().unwrap(),
            vec![Record::new(Tier::Shared, "A.txt", "b")]
        );
    }

    #[test]
    fn catalog_resave_then_delete_removes_record() {
        let temp = TempDir::new().unwrap();
        let mut backend = catalog_backend(&temp);
        backend.set_shared_root(Some(SharedRoot::from_path(collection_dir(&temp))));

        backend
            .create(&Record::new(Tier::Shared, "Dune", "first"))
            .unwrap();
        backend
            .create(&Record::new(Tier::Shared, "Dune", "second"))
            .unwrap();
        assert_eq!(
            backend.read_all().unwrap(),
            vec![Record::new(Tier::Shared, "Dune.txt", "second")]
        );

        backend
            .delete(&Record::new(Tier::Shared, "Dune.txt", ""))
            .unwrap();
        assert!(backend.read_all().unwrap().is_empty());
        let err = backend
            .delete(&Record::new(Tier::Shared, "Dune.txt", ""))
            .unwrap_err();
        assert!(matches!(err, SummaryError::NotFound { .. }));
    }

    #[test]
    fn catalog_update_and_delete_use_exact_display_name() {
        let temp = TempDir::new().unwrap();
        let backend = catalog_backend(&temp);
        backend
            .create(&Record::new(Tier::Shared, "Foo", "v1"))
            .unwrap();

        let err = backend
            .update(&Record::new(Tier::Shared, "Foo", "v2"))
            .unwrap_err();
        assert!(matches!(err, SummaryError::NotFound { .. }));

        backend
            .update(&Record::new(Tier::Shared, "Foo.txt", "v2"))
            .unwrap();
        let path = collection_dir(&temp).join("Foo.txt");
        assert_eq!(fs::read_to_string(&path).unwrap(), "v2");

        assert!(backend
            .delete(&Record::new(Tier::Shared, "Foo", ""))
            .is_err());
        backend
            .delete(&Record::new(Tier::Shared, "Foo.txt", ""))
            .unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn refused_insert_skips_write() {
        let backend = CatalogBackend::new(Box::new(RefusingCatalog), Box::new(FsDocumentTree));

        let err = backend
            .create(&Record::new(Tier::Shared, "A", "b"))
            .unwrap_err();
        assert!(matches!(err, SummaryError::CatalogInsertFailed(_)));
    }

    #[test]
    fn strategy_follows_platform_level() {
        let temp = TempDir::new().unwrap();
        let roots = StorageRoots::under(temp.path());
        let build = |level| {
            SharedBackend::for_platform(
                Platform::new(level, true),
                PathResolver::new(roots.clone(), true),
                Box::new(FsCatalog::new(roots.public.clone(), roots.catalog_index.clone())),
                Box::new(FsDocumentTree),
            )
        };

        assert_eq!(build(33).strategy(), SharedStrategy::Catalog);
        assert_eq!(build(29).strategy(), SharedStrategy::LegacyDirectory);
    }

    #[test]
    fn legacy_variant_ignores_shared_root() {
        let temp = TempDir::new().unwrap();
        let roots = StorageRoots::under(temp.path());
        let mut backend = SharedBackend::for_platform(
            Platform::new(28, true),
            PathResolver::new(roots.clone(), true),
            Box::new(FsCatalog::new(roots.public.clone(), roots.catalog_index.clone())),
            Box::new(FsDocumentTree),
        );

        backend.create(&Record::new(Tier::Shared, "A", "b")).unwrap();
        backend.set_shared_root(Some(SharedRoot::new("/nowhere")));

        assert_eq!(
            backend.read_all().unwrap(),
            vec![Record::new(Tier::Shared, "A.txt", "b")]
        );
        assert!(temp.path().join("public/Download/Book Summary/A.txt").exists());
    }
}
