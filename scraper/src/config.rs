use crate::error::ConfigError;
use crate::profile::SelectorProfile;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://internshala.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Scraper settings. Every key is optional in the TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_factor_secs: f64,
    pub backoff_max_secs: f64,
    pub cooldown_secs: f64,
    pub max_pages: u32,
    pub selectors: SelectorProfile,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            max_retries: 3,
            backoff_factor_secs: 1.0,
            backoff_max_secs: 120.0,
            cooldown_secs: 2.0,
            max_pages: 1,
            selectors: SelectorProfile::default(),
        }
    }
}

impl ScraperConfig {
    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cooldown(&self) -> Duration {
        secs(self.cooldown_secs)
    }

    pub fn backoff_factor(&self) -> Duration {
        secs(self.backoff_factor_secs)
    }

    pub fn backoff_max(&self) -> Duration {
        secs(self.backoff_max_secs)
    }
}

// Negative or NaN values from a hand-edited file mean "no wait".
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}
