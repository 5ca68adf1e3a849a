//! Runtime configuration
//!
//! Defaults, overridden by an optional TOML file, overridden by the
//! `BRAPI_*` environment variables. The resulting [`Config`] is handed
//! explicitly to the quote client and the screener.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, ScreenerError};

pub const DEFAULT_BASE_URL: &str = "https://brapi.dev/api";

pub const ENV_TOKEN: &str = "BRAPI_API_TOKEN";
pub const ENV_BASE_URL: &str = "BRAPI_BASE_URL";
pub const ENV_CONFIG_PATH: &str = "SCREENER_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub base_url: String,
    /// API token sent as the `token` query parameter; not validated locally
    pub token: Option<String>,
    /// Maximum number of detail fetches per calculation
    pub candidate_cap: usize,
    pub top_range: usize,
    pub top_budget: usize,
    pub bucket_size: usize,
    /// `limit` used when loading the full catalog
    pub catalog_limit: usize,
    /// Drop catalog entries that have no logo
    pub require_logo: bool,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            candidate_cap: 150,
            top_range: 30,
            top_budget: 100,
            bucket_size: 10,
            catalog_limit: 5000,
            require_logo: false,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from the default file location and the process environment
    pub fn load() -> Result<Self> {
        Self::load_from(
            std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from),
            default_config_path(),
            |key| std::env::var(key).ok(),
        )
    }

    /// An explicit path must exist; the default location is optional
    fn load_from<F>(
        explicit: Option<PathBuf>,
        fallback: Option<PathBuf>,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match (explicit, fallback) {
            (Some(path), _) => {
                if !path.exists() {
                    return Err(ScreenerError::Config(format!(
                        "config file {} set by {} does not exist",
                        path.display(),
                        ENV_CONFIG_PATH
                    ))
                    .into());
                }
                Self::from_file(&path)?
            }
            (None, Some(path)) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration from {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(text).map_err(|e| ScreenerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay environment values; `lookup` is injectable for tests
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_TOKEN).filter(|t| !t.is_empty()) {
            self.token = Some(token);
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.is_empty()) {
            self.base_url = url;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ScreenerError::Config("base_url must not be empty".into()).into());
        }
        for (key, value) in [
            ("candidate_cap", self.candidate_cap),
            ("top_range", self.top_range),
            ("top_budget", self.top_budget),
            ("bucket_size", self.bucket_size),
        ] {
            if value == 0 {
                return Err(ScreenerError::Config(format!("{} must be at least 1", key)).into());
            }
        }
        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join("screener").join("config.toml"))
}
