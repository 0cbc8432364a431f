//! GitHub contents API client

use async_trait::async_trait;
use codereview_core::{ContentSource, GitHubConfig, RepositoryReference, Secrets, TreeEntry};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{Error, Result};

/// One item of a contents API directory listing
#[derive(Debug, Deserialize)]
struct ContentItem {
    #[serde(rename = "type")]
    kind: String,
    path: String,
    url: String,
    download_url: Option<String>,
}

impl ContentItem {
    /// Convert to a tree entry, skipping nodes we cannot download
    fn into_entry(self) -> Option<TreeEntry> {
        match self.kind.as_str() {
            "file" => match self.download_url {
                Some(download_url) => Some(TreeEntry::file(self.path, download_url)),
                None => {
                    warn!(path = %self.path, "Skipping file without download URL");
                    None
                }
            },
            "dir" => Some(TreeEntry::directory(self.path, self.url)),
            other => {
                warn!(path = %self.path, kind = other, "Skipping unsupported entry");
                None
            }
        }
    }
}

/// Parse a listing body into tree entries, preserving order
fn parse_listing(body: &str) -> Result<Vec<TreeEntry>> {
    let items: Vec<ContentItem> = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("Failed to parse contents listing: {}", e)))?;
    Ok(items
        .into_iter()
        .filter_map(ContentItem::into_entry)
        .collect())
}

/// GitHub client serving repository listings and raw file contents
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
}

impl GitHubClient {
    /// Create a new GitHub client authenticated with `token`
    ///
    /// Every request carries the token plus the configured Accept and User-Agent
    /// headers.
    pub fn new(config: &GitHubConfig, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::Auth("GitHub token contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept)
                .map_err(|e| Error::Parse(format!("Invalid Accept header: {}", e)))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::Parse(format!("Invalid User-Agent header: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let api_url = config.api_url.trim_end_matches('/').to_string();
        info!(api_url = %api_url, "Created GitHub client");

        Ok(Self { client, api_url })
    }

    /// Create a client using the token from secrets
    ///
    /// Token is loaded from (in priority order):
    /// 1. GITHUB_API_TOKEN or GITHUB_TOKEN environment variable
    /// 2. ~/.config/codereview/secrets.toml
    pub fn from_secrets(config: &GitHubConfig, secrets: &Secrets) -> Result<Self> {
        let token = secrets.github_token().ok_or_else(|| {
            Error::Auth(
                "GitHub token not found. Set GITHUB_API_TOKEN environment variable \
                 or add token to ~/.config/codereview/secrets.toml"
                    .to_string(),
            )
        })?;
        Self::new(config, &token)
    }

    /// Get the REST API base URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Issue a GET and return the body of a successful response
    async fn get_text(&self, url: &str) -> codereview_core::Result<String> {
        debug!(url, "GitHub request");

        let response = self.client.get(url).send().await.map_err(Error::Http)?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            return Err(codereview_core::Error::from_status(
                status.as_u16(),
                format!("GET {} returned {}: {}", url, status, text),
            ));
        }

        Ok(response.text().await.map_err(Error::Http)?)
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ContentSource for GitHubClient {
    fn name(&self) -> &'static str {
        "github"
    }

    fn root_locator(&self, repo: &RepositoryReference) -> String {
        format!(
            "{}/repos/{}/{}/contents",
            self.api_url,
            repo.owner(),
            repo.name()
        )
    }

    async fn list(&self, locator: &str) -> codereview_core::Result<Vec<TreeEntry>> {
        let body = self.get_text(locator).await?;
        let entries = parse_listing(&body)?;
        debug!(locator, entries = entries.len(), "Listed directory");
        Ok(entries)
    }

    async fn fetch(&self, locator: &str) -> codereview_core::Result<String> {
        self.get_text(locator).await
    }
}
