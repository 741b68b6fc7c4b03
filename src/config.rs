use crate::constants::{default_sources, DEFAULT_BATCH_SIZE, DEFAULT_RUN_NAME};
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

const ENV_DB_PATH: &str = "SCHOLARSHIP_DB_PATH";
const ENV_BATCH_SIZE: &str = "SCHOLARSHIP_BATCH_SIZE";
const ENV_HTTP_TIMEOUT: &str = "SCHOLARSHIP_HTTP_TIMEOUT_SECS";
const ENV_PAGES_DIR: &str = "SCHOLARSHIP_PAGES_DIR";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_path: String,
    pub batch_size: usize,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub run_name: String,
    /// Read saved pages from this directory instead of fetching over HTTP
    pub pages_dir: Option<PathBuf>,
    pub log_dir: String,
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceConfig {
    pub source_id: String,
    pub url: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl SourceConfig {
    pub fn new(source_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            url: url.into(),
            enabled: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "data/scholarships.db".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            http_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (compatible; ScholarshipScraper/0.1)".to_string(),
            run_name: DEFAULT_RUN_NAME.to_string(),
            pages_dir: None,
            log_dir: "logs".to_string(),
            sources: default_sources()
                .into_iter()
                .map(|(id, url)| SourceConfig::new(id, url))
                .collect(),
        }
    }
}

impl Config {
    /// Load from TOML when the file exists, otherwise start from defaults.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                ScraperError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            info!("Loaded configuration from {}", path.display());
            Self::from_toml(&content)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Overlay values from the environment, looked up through `get`
    pub fn apply_env_overrides<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = get(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            self.database_path = path;
        }
        if let Some(size) = get(ENV_BATCH_SIZE) {
            self.batch_size = parse_env(ENV_BATCH_SIZE, &size)?;
        }
        if let Some(secs) = get(ENV_HTTP_TIMEOUT) {
            self.http_timeout_secs = parse_env(ENV_HTTP_TIMEOUT, &secs)?;
        }
        if let Some(dir) = get(ENV_PAGES_DIR).filter(|v| !v.trim().is_empty()) {
            self.pages_dir = Some(PathBuf::from(dir));
        }
        if self.batch_size == 0 {
            return Err(ScraperError::Config("batch_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Enabled sources, narrowed to `only` when given
    pub fn selected_sources(&self, only: Option<&[String]>) -> Vec<SourceConfig> {
        self.sources
            .iter()
            .filter(|s| s.enabled)
            .filter(|s| only.map_or(true, |ids| ids.iter().any(|id| id == &s.source_id)))
            .cloned()
            .collect()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ScraperError::Config(format!("{key} has an invalid value '{value}'")))
}
