//! Code analysis via a language-model backend

pub mod backends;
mod prompt;
mod requester;

pub use backends::{InferenceBackend, OpenAiBackend};
pub use prompt::{render_review_prompt, PromptInputs};
pub use requester::{AnalysisRequester, AnalysisResult};
