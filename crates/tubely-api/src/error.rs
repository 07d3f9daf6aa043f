//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Every layer's error type converts into it,
//! so status, body shape and logging are decided in exactly one place.

use axum::{
    extract::multipart::MultipartRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tubely_core::{AppError, ContentError, ErrorMetadata, LogLevel};
use tubely_storage::StorageError;
use utoipa::ToSchema;

use crate::auth::AuthError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from tubely-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

/// Marks an upload stream that was cut off by the request body limit.
///
/// Wrapped inside the `io::Error` handed to the materializers so the read failure can be
/// told apart from a client disconnect once it comes back as `StorageError::SourceRead`.
#[derive(Debug, thiserror::Error)]
#[error("request body exceeds the configured limit")]
pub struct BodyLimitExceeded;

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let is_production = is_production_env();

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details never leave the process in production or for sensitive errors.
        let (details, error_type) = if is_production || app_error.is_sensitive() {
            (None, None)
        } else {
            (
                Some(app_error.detailed_message()),
                Some(app_error.error_type().to_string()),
            )
        };

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            details,
            error_type,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        });

        (status, body).into_response()
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::TooLarge { limit } => {
                AppError::PayloadTooLarge(format!("upload exceeds max {} bytes", limit))
            }
            StorageError::SourceRead(io_err) => {
                let limit_hit = io_err
                    .get_ref()
                    .is_some_and(|inner| inner.is::<BodyLimitExceeded>());
                if limit_hit {
                    AppError::PayloadTooLarge(io_err.to_string())
                } else {
                    AppError::BadRequest(format!("Failed to read upload: {}", io_err))
                }
            }
            StorageError::InvalidKey(msg) => AppError::BadRequest(msg),
            StorageError::UploadFailed(msg) => AppError::Storage(msg),
            StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::ConfigError(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
        };
        HttpAppError(app)
    }
}

impl From<ContentError> for HttpAppError {
    fn from(err: ContentError) -> Self {
        let app = match err {
            ContentError::MalformedMediaType(_) => AppError::BadRequest(err.to_string()),
            ContentError::UnsupportedMediaType { .. } => {
                AppError::UnsupportedMediaType(err.to_string())
            }
        };
        HttpAppError(app)
    }
}

impl From<AuthError> for HttpAppError {
    fn from(err: AuthError) -> Self {
        HttpAppError(AppError::Unauthorized(err.to_string()))
    }
}

impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::BadRequest(format!(
            "Expected a multipart/form-data body: {}",
            rejection.body_text()
        )))
    }
}
