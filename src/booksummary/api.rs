//! # API Facade
//!
//! [`SummaryApi`] is the single entry point for every storage operation,
//! whatever UI sits on top of it.
//!
//! ## Routing
//!
//! Mutations are routed by the record's tier to exactly one backend. Listing
//! fans out over all three tiers in a fixed order (Internal, PrivateExternal,
//! Shared) and concatenates the results. Order within a tier is the backend's
//! own; order across tiers carries no meaning.
//!
//! ## Every mutation returns the listing
//!
//! `save`, `update` and `delete` return the full aggregated listing read back
//! from the stores after the write. Callers never need a separate refresh,
//! and nothing is cached between calls.
//!
//! ## Failure policy
//!
//! The plain methods never fail. A missing update/delete target, unmounted
//! external storage, a missing or revoked shared-tree grant or a refused
//! catalog insert all leave the stores as they were; callers notice only by
//! the listing. The `try_*` variants run the same operations but return the
//! backend's error, which is what tests and diagnostics should use.

use crate::error::{Result, SummaryError};
use crate::model::{Record, Tier};
use crate::notify::Subscription;
use crate::paths::{PathResolver, StorageRoots};
use crate::platform::{Platform, SharedStrategy};
use crate::store::catalog::{Catalog, FsCatalog};
use crate::store::fs::DirBackend;
use crate::store::shared::SharedBackend;
use crate::store::tree::{DocumentTree, FsDocumentTree, SharedRoot};
use crate::store::TierBackend;
use log::{debug, warn};

pub struct SummaryApi {
    internal: DirBackend,
    private_external: DirBackend,
    shared: SharedBackend,
}

impl SummaryApi {
    /// Builds the facade. The shared strategy is fixed here from `platform`.
    pub fn new(
        platform: Platform,
        roots: StorageRoots,
        catalog: Box<dyn Catalog>,
        tree: Box<dyn DocumentTree>,
    ) -> Self {
        let resolver = PathResolver::new(roots, platform.external_mounted);
        let shared = SharedBackend::for_platform(platform, resolver.clone(), catalog, tree);
        debug!(
            "event=api_init module=api api_level={} strategy={:?} external_mounted={}",
            platform.api_level,
            shared.strategy(),
            platform.external_mounted
        );
        Self {
            internal: DirBackend::internal(resolver.clone()),
            private_external: DirBackend::private_external(resolver),
            shared,
        }
    }

    /// Facade over the local filesystem: [`FsCatalog`] rooted at the public
    /// volume and [`FsDocumentTree`] for granted trees.
    pub fn with_filesystem(platform: Platform, roots: StorageRoots) -> Self {
        let catalog = FsCatalog::new(roots.public.clone(), roots.catalog_index.clone());
        Self::new(platform, roots, Box::new(catalog), Box::new(FsDocumentTree))
    }

    pub fn shared_strategy(&self) -> SharedStrategy {
        self.shared.strategy()
    }

    /// Supplies (or clears) the authorization handle for the shared tree.
    pub fn set_shared_root(&mut self, root: Option<SharedRoot>) {
        debug!(
            "event=set_shared_root module=api granted={}",
            root.is_some()
        );
        self.shared.set_shared_root(root);
    }

    pub fn save(&self, record: &Record) -> Vec<Record> {
        self.absorb("save", record, self.try_save(record))
    }

    pub fn update(&self, record: &Record) -> Vec<Record> {
        self.absorb("update", record, self.try_update(record))
    }

    pub fn delete(&self, record: &Record) -> Vec<Record> {
        self.absorb("delete", record, self.try_delete(record))
    }

    pub fn try_save(&self, record: &Record) -> Result<Vec<Record>> {
        self.backend(record.tier).create(record)?;
        Ok(self.list())
    }

    pub fn try_update(&self, record: &Record) -> Result<Vec<Record>> {
        self.backend(record.tier).update(record)?;
        Ok(self.list())
    }

    pub fn try_delete(&self, record: &Record) -> Result<Vec<Record>> {
        self.backend(record.tier).delete(record)?;
        Ok(self.list())
    }

    /// All records across all tiers. A tier that cannot be read contributes
    /// nothing.
    pub fn list(&self) -> Vec<Record> {
        let mut records = Vec::new();
        for tier in Tier::ALL {
            match self.list_tier(tier) {
                Ok(found) => records.extend(found),
                Err(err) => log_absorbed("list", tier, &err),
            }
        }
        records
    }

    /// Records of a single tier, with read failures reported.
    pub fn list_tier(&self, tier: Tier) -> Result<Vec<Record>> {
        self.backend(tier).read_all()
    }

    /// Opens a subscription carrying the current listing.
    pub fn subscribe(&self) -> Subscription {
        Subscription::emit_once(self.list())
    }

    fn backend(&self, tier: Tier) -> &dyn TierBackend {
        match tier {
            Tier::Internal => &self.internal as &dyn TierBackend,
            Tier::PrivateExternal => &self.private_external as &dyn TierBackend,
            Tier::Shared => &self.shared as &dyn TierBackend,
        }
    }

    fn absorb(&self, op: &str, record: &Record, result: Result<Vec<Record>>) -> Vec<Record> {
        match result {
            Ok(listing) => listing,
            Err(err) => {
                log_absorbed(op, record.tier, &err);
                self.list()
            }
        }
    }
}

fn log_absorbed(op: &str, tier: Tier, err: &SummaryError) {
    match err {
        SummaryError::NotFound { .. } | SummaryError::PermissionDenied(_) => debug!(
            "event={} module=api tier={} status=skipped kind={} detail={}",
            op,
            tier,
            err.kind(),
            err
        ),
        _ => warn!(
            "event={} module=api tier={} status=skipped kind={} detail={}",
            op,
            tier,
            err.kind(),
            err
        ),
    }
}
