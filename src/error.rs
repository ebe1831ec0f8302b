use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AppError {
    /// Scopes the error to the operation that raised it. Anything but
    /// `NotFound` is reported to the client as `failure`.
    pub fn during(self, failure: &'static str) -> ApiError {
        ApiError {
            error: self,
            failure,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::StoreUnavailable(e.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::ValidationFailed(format!("password could not be hashed: {}", e))
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::ValidationFailed(e.body_text())
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub failure: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.error {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationFailed(_) | AppError::StoreUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self.error {
            AppError::NotFound(_) => self.error.to_string(),
            _ => {
                tracing::error!("{}: {}", self.failure, self.error);
                self.failure.to_string()
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_with_entity_message() {
        let err = AppError::NotFound("Book").during("Failed to fetch book");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.error.to_string(), "Book not found");
    }

    #[test]
    fn other_failures_map_to_500() {
        let validation = AppError::ValidationFailed("bookName is required".into());
        assert_eq!(
            validation.during("Failed to create book").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let store = AppError::StoreUnavailable("connection refused".into());
        assert_eq!(
            store.during("Failed to fetch books").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
