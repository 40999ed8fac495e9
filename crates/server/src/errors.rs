use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const PRODUCT_EXISTS: &str = "A product with the same name and description already exists.";

/// Status plus a fixed, user-facing message rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn product_not_found() -> Self { Self::new(StatusCode::NOT_FOUND, PRODUCT_NOT_FOUND) }

    pub fn product_exists() -> Self { Self::new(StatusCode::CONFLICT, PRODUCT_EXISTS) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::DuplicateProduct => Self::product_exists(),
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            // row vanished between fetch and save
            ServiceError::NotFound(_) => Self::product_not_found(),
            ServiceError::Db(msg) => {
                error!(error = %msg, "storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::new(StatusCode::BAD_REQUEST, e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        assert_eq!(ApiError::from(ServiceError::DuplicateProduct).status, StatusCode::CONFLICT);
        assert_eq!(ApiError::from(ServiceError::Validation("x".into())).status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(ServiceError::not_found("product")).status, StatusCode::NOT_FOUND);
        let db = ApiError::from(ServiceError::Db("connection refused".into()));
        assert_eq!(db.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!db.message.contains("connection refused"));
    }

    #[test]
    fn conflict_uses_fixed_message() {
        assert_eq!(ApiError::product_exists().message, PRODUCT_EXISTS);
    }
}
