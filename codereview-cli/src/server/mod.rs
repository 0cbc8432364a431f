//! HTTP surface
//!
//! A single `POST /review` route accepting a JSON [`ReviewRequest`] and answering
//! with the formatted review as a JSON string.

mod error;

pub use error::ApiError;

use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest, HttpResponse};
use codereview_core::{ReviewOrchestrator, ReviewRequest};
use tracing::warn;

/// Application state shared across handlers
pub struct AppState {
    pub orchestrator: ReviewOrchestrator,
}

/// Register the review routes
pub fn configure_review_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/review", web::post().to(review_code));
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(err.to_string()).into()
}

/// POST /review
///
/// Fetch the repository, analyze it against the assignment and return the
/// file listing followed by the review text.
pub async fn review_code(
    state: web::Data<AppState>,
    body: web::Json<ReviewRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    let review = state.orchestrator.review(&request).await.map_err(|e| {
        warn!(repo = %request.github_repo_url, error = %e, "Review failed");
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(review))
}
