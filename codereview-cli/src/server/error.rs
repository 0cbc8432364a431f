//! HTTP error responses

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Error returned from request handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// The review pipeline failed
    #[error(transparent)]
    Review(#[from] codereview_core::Error),

    /// The request body did not match the expected shape
    #[error("{0}")]
    Validation(String),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Review(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Review(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.to_string(),
        })
    }
}
