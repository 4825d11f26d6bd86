//! Error types shared across layers.
//!
//! [`StoreError`] is what the Link Store reports. [`AppError`] is what handlers
//! return: it renders the JSON envelope `{ok, message, content}` and keeps the
//! diagnostic `details` out of the response body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::api::dto::envelope::Envelope;
use crate::utils::db_error::is_unique_violation_on_id;

/// Failures reported by a Link Store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A link with this id already exists.
    #[error("link {0} already exists")]
    Duplicate(i64),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Classifies a sqlx error raised while writing link `id`.
    pub fn from_insert(id: i64, e: sqlx::Error) -> Self {
        if is_unique_violation_on_id(&e) {
            Self::Duplicate(id)
        } else {
            Self::Database(e)
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest { message: String, details: Value },

    #[error("{message}")]
    Forbidden { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::BadRequest {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Diagnostic context. Logged, never sent to clients.
    pub fn details(&self) -> &Value {
        match self {
            AppError::BadRequest { details, .. }
            | AppError::Forbidden { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::Internal { details, .. } => details,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::internal("error", json!({ "store": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = errors.field_errors().keys().map(|f| f.to_string()).collect();
        AppError::bad_request("bad field(s)", json!({ "fields": fields }))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Internal { message, details } => {
                tracing::error!(%message, %details, "request failed");
            }
            other => {
                tracing::debug!(status = status.as_u16(), details = %other.details(), "request rejected");
            }
        }

        (status, Json(Envelope::failure(self.to_string()))).into_response()
    }
}
