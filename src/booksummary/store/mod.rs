//! # Storage Layer
//!
//! Each tier is served by a [`TierBackend`]. Backends report every failure
//! through [`Result`]; deciding which failures are harmless is left to the
//! facade in [`crate::api`].
//!
//! ## Implementations
//!
//! - [`fs::DirBackend`]: flat directory of text files. Serves `Internal`,
//!   `PrivateExternal` and the legacy variant of `Shared`.
//! - [`shared::SharedBackend`]: the `Shared` tier, either catalog-backed or
//!   directory-backed depending on the platform capability level.
//!
//! Catalog and document-tree access are abstracted in [`catalog`] and [`tree`]
//! so the shared tier can run against any registry implementation.
//!
//! ## Failure kinds
//!
//! | Situation                          | Error                |
//! |------------------------------------|----------------------|
//! | update/delete target absent        | `NotFound`           |
//! | external storage unmounted         | `Unavailable`        |
//! | tree handle missing or revoked     | `PermissionDenied`   |
//! | catalog returned no id on insert   | `CatalogInsertFailed`|

use crate::error::Result;
use crate::model::{Record, Tier};

pub mod catalog;
pub mod fs;
pub mod shared;
pub mod tree;

/// Abstract interface for one storage tier.
pub trait TierBackend {
    /// The tier every record produced by this backend is tagged with.
    fn tier(&self) -> Tier;

    /// Write a new record, overwriting any record with the same normalized name.
    fn create(&self, record: &Record) -> Result<()>;

    /// Read every record in the tier.
    fn read_all(&self) -> Result<Vec<Record>>;

    /// Overwrite the body of an existing record. `NotFound` if absent.
    fn update(&self, record: &Record) -> Result<()>;

    /// Remove an existing record. `NotFound` if absent.
    fn delete(&self, record: &Record) -> Result<()>;
}
