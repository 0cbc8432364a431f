//! Review orchestration

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::{AnalysisRequester, InferenceBackend};
use crate::cache::{build_key, Cache, REPOSITORY_NAMESPACE};
use crate::config::Config;
use crate::source::{aggregate, list_tree, AggregatedPayload, ContentSource, RepositoryReference};
use crate::Result;

/// Heading placed between the file listing and the analysis
pub const RESULT_HEADING: &str = "Review Result:";

/// A code review request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// What the candidate was asked to build
    pub assignment_description: String,
    /// Repository to review, as a URL or owner/name
    pub github_repo_url: String,
    /// Seniority the candidate is assessed against
    pub candidate_level: String,
}

/// Join the file listing and the analysis into the response text
pub fn format_response(listing: &str, analysis: &str) -> String {
    format!("{}\n\n\n{}\n{}", listing, RESULT_HEADING, analysis)
}

/// Sequences tree fetch, aggregation and analysis for one review
#[derive(Clone)]
pub struct ReviewOrchestrator {
    source: Arc<dyn ContentSource>,
    analyzer: AnalysisRequester,
    cache: Cache,
    repository_ttl: Duration,
    concurrency: usize,
}

impl ReviewOrchestrator {
    /// Create an orchestrator from its collaborators and configuration
    pub fn new(
        source: Arc<dyn ContentSource>,
        backend: Arc<dyn InferenceBackend>,
        cache: Cache,
        config: &Config,
    ) -> Self {
        Self {
            source,
            analyzer: AnalysisRequester::with_config(backend, cache.clone(), &config.cache),
            cache,
            repository_ttl: config.cache.repository_ttl,
            concurrency: config.fetch.concurrency,
        }
    }

    /// Run a review and return the formatted response
    ///
    /// The repository reference is validated before any remote call. Any stage
    /// failure aborts the review and nothing from the failed stage is cached.
    pub async fn review(&self, request: &ReviewRequest) -> Result<String> {
        let repo = RepositoryReference::parse(&request.github_repo_url)?;
        info!(repo = %repo, level = %request.candidate_level, "Starting review");

        let payload = self.repository_payload(&repo).await?;

        let analysis = self
            .analyzer
            .analyze(
                &repo,
                &payload.content,
                &request.assignment_description,
                &request.candidate_level,
            )
            .await?;

        info!(repo = %repo, "Review complete");
        Ok(format_response(&payload.listing, &analysis.text))
    }

    /// Fetch and aggregate a repository, reusing a cached payload when present
    pub async fn repository_payload(&self, repo: &RepositoryReference) -> Result<AggregatedPayload> {
        let key = build_key(REPOSITORY_NAMESPACE, &[repo.owner(), repo.name()]);

        if let Some(payload) = self.cache.get_json::<AggregatedPayload>(&key).await? {
            info!(repo = %repo, "Repository cache hit");
            return Ok(payload);
        }
        debug!(repo = %repo, source = self.source.name(), "Repository cache miss");

        let entries = list_tree(self.source.as_ref(), repo).await?;
        let payload = aggregate(self.source.as_ref(), &entries, self.concurrency).await?;

        self.cache
            .set_json(&key, &payload, self.repository_ttl)
            .await?;
        Ok(payload)
    }
}

impl std::fmt::Debug for ReviewOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewOrchestrator")
            .field("source", &self.source.name())
            .field("analyzer", &self.analyzer)
            .field("repository_ttl", &self.repository_ttl)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}
