//! Serializable dashboard configuration, loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradedash_core::pagination::DEFAULT_PAGE_SIZE;
use tradedash_core::sort::SortMode;

use crate::data_loader::default_candidates;
use crate::logging::LoggingConfig;

/// Errors from loading or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration. Every section is optional in the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataConfig,
    pub view: ViewConfig,
    pub vault: VaultConfig,
    pub logging: LoggingConfig,
}

/// Where to look for the trading history CSV.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// Tried in order; the first readable file with data wins.
    pub candidates: Vec<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    pub page_size: usize,
    pub default_sort: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_sort: SortMode::default().as_str().to_string(),
        }
    }
}

/// Vault API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VaultConfig {
    pub address: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            address: "0x914434e8a235cb608a94a5f70ab8c40927152a24".into(),
            endpoint: "https://api.hyperliquid.xyz/info".into(),
            timeout_secs: 15,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.view.page_size == 0 {
            return Err(ConfigError::Invalid("view.page_size must be at least 1".into()));
        }
        if self.data.candidates.is_empty() {
            return Err(ConfigError::Invalid(
                "data.candidates must name at least one path".into(),
            ));
        }
        let sort = SortMode::parse(&self.view.default_sort);
        if sort == SortMode::Unsorted && self.view.default_sort.trim() != "unsorted" {
            return Err(ConfigError::Invalid(format!(
                "unknown view.default_sort '{}'",
                self.view.default_sort
            )));
        }
        if self.vault.timeout_secs == 0 {
            return Err(ConfigError::Invalid("vault.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn default_sort(&self) -> SortMode {
        SortMode::parse(&self.view.default_sort)
    }
}
