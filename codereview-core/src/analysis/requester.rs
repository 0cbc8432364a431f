//! Memoized analysis requests

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::backends::InferenceBackend;
use super::prompt::{render_review_prompt, PromptInputs};
use crate::cache::{build_key, Cache, ANALYSIS_NAMESPACE};
use crate::config::CacheConfig;
use crate::source::RepositoryReference;
use crate::{Error, Result};

/// Text produced by the inference backend for one review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult {
    pub text: String,
}

/// Builds review prompts and invokes the inference backend at most once per
/// cache window
///
/// By default results are keyed on the assignment description and candidate level
/// only, so two repositories reviewed under the same pair within the TTL share one
/// analysis. Enable `scope_to_repository` to add the repository to the key.
#[derive(Clone)]
pub struct AnalysisRequester {
    backend: Arc<dyn InferenceBackend>,
    cache: Cache,
    ttl: Duration,
    scope_to_repository: bool,
}

impl AnalysisRequester {
    /// Create a requester with the default 10 minute TTL and unscoped keys
    pub fn new(backend: Arc<dyn InferenceBackend>, cache: Cache) -> Self {
        Self::with_config(backend, cache, &CacheConfig::default())
    }

    /// Create a requester using the TTL and key scope from `config`
    pub fn with_config(
        backend: Arc<dyn InferenceBackend>,
        cache: Cache,
        config: &CacheConfig,
    ) -> Self {
        Self {
            backend,
            cache,
            ttl: config.analysis_ttl,
            scope_to_repository: config.scope_analysis_to_repository,
        }
    }

    /// Cache key for an analysis
    pub fn cache_key(
        &self,
        repo: &RepositoryReference,
        assignment: &str,
        candidate_level: &str,
    ) -> String {
        if self.scope_to_repository {
            build_key(
                ANALYSIS_NAMESPACE,
                &[repo.owner(), repo.name(), assignment, candidate_level],
            )
        } else {
            build_key(ANALYSIS_NAMESPACE, &[assignment, candidate_level])
        }
    }

    /// Review `content`, returning a cached analysis when one exists
    pub async fn analyze(
        &self,
        repo: &RepositoryReference,
        content: &str,
        assignment: &str,
        candidate_level: &str,
    ) -> Result<AnalysisResult> {
        let key = self.cache_key(repo, assignment, candidate_level);

        if let Some(cached) = self.cache.get_json::<AnalysisResult>(&key).await? {
            info!(repo = %repo, "Analysis cache hit");
            return Ok(cached);
        }
        debug!(repo = %repo, backend = self.backend.name(), "Analysis cache miss");

        let prompt = render_review_prompt(&PromptInputs {
            code: content,
            assignment,
            candidate_level,
        });

        let text = self.backend.complete(&prompt).await.map_err(|e| match e {
            Error::Backend(_) => e,
            other => Error::Backend(other.to_string()),
        })?;

        let result = AnalysisResult { text };
        self.cache.set_json(&key, &result, self.ttl).await?;
        Ok(result)
    }
}

impl std::fmt::Debug for AnalysisRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisRequester")
            .field("backend", &self.backend.name())
            .field("ttl", &self.ttl)
            .field("scope_to_repository", &self.scope_to_repository)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;

    fn repo(name: &str) -> RepositoryReference {
        RepositoryReference::new("acme", name).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_returns_backend_text() {
        let backend = Arc::new(MockBackend::new().with_response("Rating: 3"));
        let requester = AnalysisRequester::new(backend.clone(), Cache::in_memory(16));

        let result = requester
            .analyze(&repo("calc"), "print(1+1)", "Build a calculator", "Junior")
            .await
            .unwrap();
        assert_eq!(result.text, "Rating: 3");
        assert_eq!(backend.call_count(), 1);

        let prompt = backend.prompts().pop().unwrap();
        assert!(prompt.contains("print(1+1)"));
        assert!(prompt.contains("Build a calculator"));
        assert!(prompt.contains("Junior"));
    }

    #[tokio::test]
    async fn test_same_pair_reuses_cached_text_across_content() {
        let backend = Arc::new(
            MockBackend::new()
                .with_response("first review")
                .with_response("second review"),
        );
        let requester = AnalysisRequester::new(backend.clone(), Cache::in_memory(16));

        let first = requester
            .analyze(&repo("calc"), "content one", "Build a calculator", "Junior")
            .await
            .unwrap();
        let second = requester
            .analyze(&repo("other"), "content two", "Build a calculator", "Junior")
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(second.text, "first review");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_different_level_misses_cache() {
        let backend = Arc::new(MockBackend::new().with_response("a").with_response("b"));
        let requester = AnalysisRequester::new(backend.clone(), Cache::in_memory(16));

        requester
            .analyze(&repo("calc"), "c", "Build a calculator", "Junior")
            .await
            .unwrap();
        let senior = requester
            .analyze(&repo("calc"), "c", "Build a calculator", "Senior")
            .await
            .unwrap();

        assert_eq!(senior.text, "b");
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_repository_scoped_keys() {
        let backend = Arc::new(MockBackend::new().with_response("a").with_response("b"));
        let config = CacheConfig {
            scope_analysis_to_repository: true,
            ..CacheConfig::default()
        };
        let requester =
            AnalysisRequester::with_config(backend.clone(), Cache::in_memory(16), &config);

        let first = requester
            .analyze(&repo("calc"), "c", "Build a calculator", "Junior")
            .await
            .unwrap();
        let second = requester
            .analyze(&repo("other"), "c", "Build a calculator", "Junior")
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_backend_failure_is_backend_error_and_not_cached() {
        let backend = Arc::new(
            MockBackend::new()
                .with_failure("OpenAI API error")
                .with_response("recovered"),
        );
        let cache = Cache::in_memory(16);
        let requester = AnalysisRequester::new(backend.clone(), cache.clone());

        let err = requester
            .analyze(&repo("calc"), "c", "Build a calculator", "Junior")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
        assert!(err.to_string().contains("OpenAI API error"));

        let key = requester.cache_key(&repo("calc"), "Build a calculator", "Junior");
        let cached: Option<AnalysisResult> = cache.get_json(&key).await.unwrap();
        assert!(cached.is_none());

        let retry = requester
            .analyze(&repo("calc"), "c", "Build a calculator", "Junior")
            .await
            .unwrap();
        assert_eq!(retry.text, "recovered");
    }

    #[tokio::test]
    async fn test_cached_analysis_expires() {
        let backend = Arc::new(MockBackend::new().with_response("a").with_response("b"));
        let config = CacheConfig {
            analysis_ttl: Duration::from_millis(100),
            ..CacheConfig::default()
        };
        let requester =
            AnalysisRequester::with_config(backend.clone(), Cache::in_memory(16), &config);

        requester
            .analyze(&repo("calc"), "c", "Build a calculator", "Junior")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        let later = requester
            .analyze(&repo("calc"), "c", "Build a calculator", "Junior")
            .await
            .unwrap();

        assert_eq!(later.text, "b");
        assert_eq!(backend.call_count(), 2);
    }

    #[test]
    fn test_scoped_key_leads_with_repository() {
        let config = CacheConfig {
            scope_analysis_to_repository: true,
            ..CacheConfig::default()
        };
        let requester = AnalysisRequester::with_config(
            Arc::new(MockBackend::new()),
            Cache::in_memory(1),
            &config,
        );
        assert_eq!(
            requester.cache_key(&repo("calc"), "Build a calculator", "Junior"),
            "openai_analysis:acme|calc|Build a calculator|Junior"
        );
    }

    #[test]
    fn test_unscoped_key_ignores_repository() {
        let requester = AnalysisRequester::new(Arc::new(MockBackend::new()), Cache::in_memory(1));
        assert_eq!(
            requester.cache_key(&repo("calc"), "Build a calculator", "Junior"),
            requester.cache_key(&repo("other"), "Build a calculator", "Junior")
        );
    }
}
