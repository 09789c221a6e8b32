// Route exports
pub mod categories;
pub mod health;
pub mod skills;

use actix_web::{error, http::StatusCode, web, HttpResponse, ResponseError};
use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::Matcher;
use crate::models::ErrorResponse;
use crate::services::{SnapshotCache, UserStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub cache: Arc<SnapshotCache>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

/// Failure rendered as `{ "success": false, "error": { "message": ... } }`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

/// Handle query string errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid query: {}", err)).into()
}

/// Reject a request whose query fails its validation rules
pub(crate) fn validate_query<T: Validate>(query: &T) -> Result<(), ApiError> {
    query.validate().map_err(|errors| {
        tracing::info!("Validation failed: field_errors={:?}", errors);
        ApiError::BadRequest(format!("Validation failed: {}", errors))
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(categories::configure)
            .configure(skills::configure),
    );
}
