//! Secrets management for codereview
//!
//! Secrets are stored separately from configuration to avoid accidental sharing.
//! The secrets file is located at `~/.config/codereview/secrets.toml` and must have
//! restrictive permissions (0600 on Unix).
//!
//! Loading priority:
//! 1. Environment variables (GITHUB_API_TOKEN / GITHUB_TOKEN, OPENAI_API_KEY)
//! 2. Secrets file (~/.config/codereview/secrets.toml)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Environment variables checked for the GitHub token, in order
const GITHUB_TOKEN_VARS: &[&str] = &["GITHUB_API_TOKEN", "GITHUB_TOKEN"];

/// Environment variable checked for the OpenAI key
const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Secrets structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    /// GitHub configuration
    pub github: GitHubSecrets,

    /// OpenAI configuration
    pub openai: OpenAiSecrets,
}

/// GitHub-related secrets
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubSecrets {
    /// GitHub Personal Access Token
    pub token: Option<String>,
}

/// OpenAI-related secrets
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OpenAiSecrets {
    /// API key for the chat completions endpoint
    pub api_key: Option<String>,
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_secrets_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &Path) -> Result<Self> {
        // Check file permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = std::fs::metadata(path)?;
            let mode = metadata.permissions().mode();

            // Check if file is readable by group or others (mode & 0o077)
            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }

            debug!(path = %path.display(), mode = format!("{:o}", mode & 0o777), "Secrets file permissions OK");
        }

        let contents = std::fs::read_to_string(path)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        trim(&mut secrets.github.token);
        trim(&mut secrets.openai.api_key);

        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/codereview/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("codereview").join("secrets.toml"))
    }

    /// Get GitHub token with environment variable override
    pub fn github_token(&self) -> Option<String> {
        GITHUB_TOKEN_VARS
            .iter()
            .find_map(|var| from_env(var))
            .or_else(|| non_empty(&self.github.token))
    }

    /// Get OpenAI API key with environment variable override
    pub fn openai_api_key(&self) -> Option<String> {
        from_env(OPENAI_KEY_VAR).or_else(|| non_empty(&self.openai.api_key))
    }
}

fn trim(value: &mut Option<String>) {
    if let Some(ref mut v) = value {
        *v = v.trim().to_string();
    }
}

fn from_env(var: &str) -> Option<String> {
    let value = std::env::var(var).ok()?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    debug!(var, "Using secret from environment variable");
    Some(value.to_string())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
