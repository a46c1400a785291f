//! Capability probe supplied by the host environment.
//!
//! The shared tier has two mutually exclusive implementations. Which one is
//! used depends on the platform capability level, read once when the
//! [`crate::api::SummaryApi`] is built.

use serde::{Deserialize, Serialize};

/// First capability level at which direct public paths are disallowed and the
/// indexed catalog must be used.
pub const CATALOG_MIN_API_LEVEL: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SharedStrategy {
    /// Indexed content catalog plus a granted document tree for listing.
    Catalog,
    /// Plain files in the public downloads directory.
    LegacyDirectory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub api_level: u32,
    pub external_mounted: bool,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            api_level: CATALOG_MIN_API_LEVEL,
            external_mounted: true,
        }
    }
}

impl Platform {
    pub fn new(api_level: u32, external_mounted: bool) -> Self {
        Self {
            api_level,
            external_mounted,
        }
    }

    pub fn shared_strategy(&self) -> SharedStrategy {
        if self.api_level >= CATALOG_MIN_API_LEVEL {
            SharedStrategy::Catalog
        } else {
            SharedStrategy::LegacyDirectory
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modern_levels_use_catalog() {
        assert_eq!(Platform::new(30, true).shared_strategy(), SharedStrategy::Catalog);
        assert_eq!(Platform::new(34, false).shared_strategy(), SharedStrategy::Catalog);
    }

    #[test]
    fn older_levels_use_legacy_directory() {
        assert_eq!(
            Platform::new(29, true).shared_strategy(),
            SharedStrategy::LegacyDirectory
        );
    }
}
