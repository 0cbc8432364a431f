//! End-to-end review pipeline
//!
//! Resolves the repository, fetches and aggregates its content, requests an
//! analysis and formats the response. Both remote stages are memoized.

mod orchestrator;

pub use orchestrator::{format_response, ReviewOrchestrator, ReviewRequest, RESULT_HEADING};
