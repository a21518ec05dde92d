//! Dashboard configuration: TOML file, environment fallback, built-in defaults.
//!
//! Every field is optional. A file only needs the keys it wants to change:
//!
//! ```toml
//! [dashboard]
//! ticker = "MSFT"
//! start = "2023-01-01"
//!
//! [provider]
//! requests_per_second = 1
//! ```
//!
//! Unknown keys are rejected so that typos fail loudly instead of silently
//! falling back to a default.
//!
//! Lookup order for the file itself: `--config`, then the
//! [`CONFIG_ENV_VAR`] environment variable, then no file at all.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use market_data_loader::providers::yahoo::YahooConfig;
use serde::{Deserialize, Serialize};
use shared_utils::env::get_optional_env_var;
use thiserror::Error;

/// Environment variable consulted when no `--config` flag is given.
pub const CONFIG_ENV_VAR: &str = "STOCK_DASHBOARD_CONFIG";

/// Errors related to loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// What to show.
    pub dashboard: DashboardSection,

    /// Where the bars come from.
    pub provider: YahooConfig,
}

/// Default request parameters and display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardSection {
    pub ticker: String,
    pub start: NaiveDate,
    /// Exclusive; `None` means "today".
    pub end: Option<NaiveDate>,
    pub show_ma20: bool,
    pub show_ma50: bool,
    /// Rows in the trailing table preview.
    pub preview_rows: usize,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            ticker: "AAPL".to_string(),
            start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or(NaiveDate::MIN),
            end: None,
            show_ma20: true,
            show_ma50: true,
            preview_rows: 50,
        }
    }
}

impl DashboardConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the file picked by [`resolve_path`], or the defaults when there is none.
    pub fn load_or_default(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        match resolve_path(explicit) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Picks the config file: the explicit path if given, else [`CONFIG_ENV_VAR`].
pub fn resolve_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| get_optional_env_var(CONFIG_ENV_VAR).map(PathBuf::from))
}
