//! Configuration management
//!
//! Default config location: ./scout.toml, falling back to ~/.scout/config.toml

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,
    #[serde(default)]
    pub indices: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ElasticsearchConfig {
    /// Base URL of the cluster. Override with SCOUT_ES_URL env var
    #[serde(default = "default_es_url")]
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Encoded API key, sent as `Authorization: ApiKey <key>`
    #[serde(default)]
    pub api_key: Option<String>,
    /// Whole-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_es_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            url: default_es_url(),
            username: None,
            password: None,
            api_key: None,
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    #[serde(default = "default_job_index")]
    pub job: String,
    #[serde(default = "default_tech_blog_index")]
    pub tech_blog: String,
    #[serde(default = "default_community_post_index")]
    pub community_post: String,
}

fn default_job_index() -> String {
    "jobs".to_string()
}

fn default_tech_blog_index() -> String {
    "tech_blogs".to_string()
}

fn default_community_post_index() -> String {
    "community_posts".to_string()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            job: default_job_index(),
            tech_blog: default_tech_blog_index(),
            community_post: default_community_post_index(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Page size used when a request gives no upper bound
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

fn default_page_size() -> usize {
    30
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log output format: "pretty" or "json"
    /// Override with LOG_FORMAT env var
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter string
    /// Override with RUST_LOG env var
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_level() -> String {
    "info,scout=debug".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

/// Expand tilde in path
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let s = path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
        Ok(home.join(rest))
    } else if s == "~" {
        dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))
    } else {
        Ok(path.to_path_buf())
    }
}

/// `~/.scout/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".scout").join("config.toml"))
}

impl Config {
    /// Load config from a file, or defaults when it does not exist.
    /// Environment overrides are applied either way.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        let config_path = expand_tilde(config_path)?;
        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else {
            tracing::debug!(path = %config_path.display(), "Config file not found, using defaults");
            Config::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// First existing of `./scout.toml` and `~/.scout/config.toml`.
    pub fn discover() -> Result<Self> {
        Self::load_first(&Self::search_paths())
    }

    /// Candidate config files in lookup order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("scout.toml")];
        paths.extend(default_config_path());
        paths
    }

    /// Load the first path that exists, or defaults when none does.
    pub fn load_first(paths: &[PathBuf]) -> Result<Self> {
        for path in paths {
            if expand_tilde(path)?.exists() {
                tracing::debug!(path = %path.display(), "Using config file");
                return Self::load_or_default(path);
            }
        }
        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SCOUT_ES_URL") {
            self.elasticsearch.url = url;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Ok(level) = std::env::var("RUST_LOG") {
            self.observability.log_level = level;
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}
