//! CLI command implementations

pub mod review;
pub mod serve;

pub use review::ReviewArgs;
pub use serve::ServeArgs;

use std::sync::Arc;

use anyhow::Context;
use codereview_core::{Cache, Config, OpenAiBackend, ReviewOrchestrator, Secrets};
use codereview_github::GitHubClient;

/// Wire the GitHub source, OpenAI backend and configured cache into an orchestrator
pub async fn build_orchestrator(config: &Config) -> anyhow::Result<ReviewOrchestrator> {
    let secrets = Secrets::load()?;

    let source = GitHubClient::from_secrets(&config.github, &secrets)?;

    let api_key = secrets.openai_api_key().context(
        "OpenAI API key not found. Set OPENAI_API_KEY environment variable \
         or add api_key to ~/.config/codereview/secrets.toml",
    )?;
    let backend = OpenAiBackend::new(&config.inference, api_key);

    let cache = Cache::from_config(&config.cache).await?;

    Ok(ReviewOrchestrator::new(
        Arc::new(source),
        Arc::new(backend),
        cache,
        config,
    ))
}
