use crate::model::Tier;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Summary not found in {tier}: {name}")]
    NotFound { tier: Tier, name: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Catalog refused entry: {0}")]
    CatalogInsertFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl SummaryError {
    pub fn not_found(tier: Tier, name: impl Into<String>) -> Self {
        SummaryError::NotFound {
            tier,
            name: name.into(),
        }
    }

    /// Short kind label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            SummaryError::NotFound { .. } => "not_found",
            SummaryError::Unavailable(_) => "unavailable",
            SummaryError::PermissionDenied(_) => "permission_denied",
            SummaryError::CatalogInsertFailed(_) => "catalog_insert_failed",
            SummaryError::Io(_) => "io",
            SummaryError::Serialization(_) => "serialization",
            SummaryError::Store(_) => "store",
            SummaryError::Config(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;
