use crate::error::{Result, SummaryError};
use crate::platform::{Platform, CATALOG_MIN_API_LEVEL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for booksummary, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Capability level the platform reports
    #[serde(default = "default_api_level")]
    pub api_level: u32,

    /// Whether external storage is currently mounted
    #[serde(default = "default_external_mounted")]
    pub external_mounted: bool,

    /// Authorization handle for the shared document tree, once granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_root: Option<String>,
}

fn default_api_level() -> u32 {
    CATALOG_MIN_API_LEVEL
}

fn default_external_mounted() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_level: default_api_level(),
            external_mounted: default_external_mounted(),
            shared_root: None,
        }
    }
}

impl AppConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(SummaryError::Io)?;
        let config: AppConfig =
            serde_json::from_str(&content).map_err(SummaryError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(SummaryError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(SummaryError::Serialization)?;
        fs::write(config_path, content).map_err(SummaryError::Io)?;
        Ok(())
    }

    pub fn platform(&self) -> Platform {
        Platform::new(self.api_level, self.external_mounted)
    }

    /// Sets or clears the shared tree handle. Blank handles count as cleared.
    pub fn set_shared_root(&mut self, handle: Option<&str>) {
        self.shared_root = handle
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string);
    }
}
