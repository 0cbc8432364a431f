//! Inference backend abstraction

use async_trait::async_trait;

use crate::Result;

mod openai;

pub use openai::OpenAiBackend;

/// Trait for language-model inference backends
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Get the name of this backend
    fn name(&self) -> &'static str;

    /// Send one user message and return the primary response text
    async fn complete(&self, prompt: &str) -> Result<String>;
}
