use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures surfaced by the store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value for unique field `{0}`")]
    Duplicate(&'static str),
    #[error("referenced `{0}` does not exist")]
    MissingReference(&'static str),
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return StoreError::Duplicate(unique_field(db.constraint()));
            }
            if db.is_foreign_key_violation() {
                return StoreError::MissingReference(referenced_table(db.constraint()));
            }
        }
        StoreError::Database(e)
    }
}

fn unique_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.contains("email") => "email",
        _ => "key",
    }
}

fn referenced_table(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.contains("hotel") => "hotel",
        Some(c) if c.contains("user") => "user",
        _ => "row",
    }
}

/// Why an authentication attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// Email unknown or password mismatch. Deliberately one case.
    Credentials,
    MissingToken,
    /// Bad signature, malformed, expired, wrong issuer or audience.
    InvalidToken,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("authentication failed: {0:?}")]
    Authentication(AuthFailure),
    #[error("{0}")]
    NotFound(String),
    #[error("{context}: {cause:#}")]
    Internal {
        context: &'static str,
        cause: anyhow::Error,
    },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn internal(context: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        AppError::Internal {
            context,
            cause: cause.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(AuthFailure::Credentials) => StatusCode::UNAUTHORIZED,
            AppError::Authentication(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Never includes the internal cause.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(m) | AppError::Conflict(m) | AppError::NotFound(m) => m.clone(),
            AppError::Authentication(AuthFailure::Credentials) => {
                "Email or password is incorrect".into()
            }
            AppError::Authentication(AuthFailure::MissingToken) => "No token provided".into(),
            AppError::Authentication(AuthFailure::InvalidToken) => {
                "Failed to authenticate token".into()
            }
            AppError::Internal { context, .. } => format!("An error occurred while {context}"),
        }
    }

    /// Maps a store failure using the wording of the operation that hit it.
    pub fn from_store(e: StoreError, context: &'static str) -> Self {
        match e {
            StoreError::Duplicate("email") => AppError::Conflict("Email is already taken".into()),
            StoreError::Duplicate(field) => AppError::Conflict(format!("{field} is already taken")),
            StoreError::MissingReference("hotel") => AppError::not_found("Hotel not found"),
            StoreError::MissingReference("user") => AppError::not_found("User not found"),
            StoreError::MissingReference(_) => AppError::not_found("Referenced record not found"),
            StoreError::Database(db) => AppError::internal(context, db),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal { context, cause } = &self {
            error!(error = %cause, context, "request failed");
        }
        let status = self.status();
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
