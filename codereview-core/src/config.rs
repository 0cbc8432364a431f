//! Configuration management for codereview
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (CODEREVIEW_*)
//! 3. Config file (~/.config/codereview/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default time-to-live for both memoization points
const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to bind
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// GitHub contents API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Base URL of the REST API
    pub api_url: String,

    /// Accept header sent with every request
    pub accept: String,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            accept: "application/vnd.github.v3+json".to_string(),
            user_agent: "codereview".to_string(),
        }
    }
}

/// Inference backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Model identifier sent with each completion request
    pub model: String,

    /// Chat completions endpoint
    pub api_url: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo".to_string(),
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
        }
    }
}

/// Memoization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Redis endpoint; an in-process store is used when unset
    pub url: Option<String>,

    /// How long a fetched repository payload is reused
    #[serde(with = "humantime_serde")]
    pub repository_ttl: Duration,

    /// How long an analysis result is reused
    #[serde(with = "humantime_serde")]
    pub analysis_ttl: Duration,

    /// Maximum number of entries held in memory
    pub max_entries: u64,

    /// Include the repository in the analysis cache key
    pub scope_analysis_to_repository: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: None,
            repository_ttl: DEFAULT_TTL,
            analysis_ttl: DEFAULT_TTL,
            max_entries: 10_000,
            scope_analysis_to_repository: false,
        }
    }
}

/// Content fetching configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// File downloads in flight at once per request
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub github: GitHubConfig,
    pub inference: InferenceConfig,
    pub cache: CacheConfig,
    pub fetch: FetchConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/codereview/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("codereview").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - CODEREVIEW_HOST / CODEREVIEW_PORT: server bind address
    /// - CODEREVIEW_MODEL: inference model
    /// - CODEREVIEW_GITHUB_API_URL: GitHub REST API base URL
    /// - CODEREVIEW_CACHE_URL (or REDIS_URL): Redis cache endpoint
    /// - CODEREVIEW_CACHE_TTL: TTL for both caches (e.g. "10m")
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(host) = var("CODEREVIEW_HOST") {
            self.server.host = host;
        }

        if let Some(port) = var("CODEREVIEW_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid CODEREVIEW_PORT: {}", port)))?;
        }

        if let Some(model) = var("CODEREVIEW_MODEL") {
            self.inference.model = model;
        }

        if let Some(url) = var("CODEREVIEW_GITHUB_API_URL") {
            self.github.api_url = url;
        }

        if let Some(url) = var("CODEREVIEW_CACHE_URL").or_else(|| var("REDIS_URL")) {
            self.cache.url = Some(url);
        }

        if let Some(ttl) = var("CODEREVIEW_CACHE_TTL") {
            let ttl = humantime_serde::re::humantime::parse_duration(&ttl)
                .map_err(|e| Error::Config(format!("Invalid CODEREVIEW_CACHE_TTL: {}", e)))?;
            self.cache.repository_ttl = ttl;
            self.cache.analysis_ttl = ttl;
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, model: Option<String>, concurrency: Option<usize>) -> Self {
        if let Some(m) = model {
            self.inference.model = m;
        }

        if let Some(n) = concurrency {
            self.fetch.concurrency = n;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(model: Option<String>, concurrency: Option<usize>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(model, concurrency))
    }
}
