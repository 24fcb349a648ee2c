use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::utils::validation::field_messages;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("User {0} could not be resolved")]
    UserNotFound(i64),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid body at {field}: {message}")]
    InvalidBody { field: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Error::NotFound(format!("{} {} not found", entity, id))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_failed",
                    "fields": field_messages(&errors),
                }),
            ),
            Error::InvalidBody { field, message } => {
                let mut fields = serde_json::Map::new();
                fields.insert(field, json!([message]));
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "validation_failed", "fields": fields }),
                )
            }
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            Error::UserNotFound(user_id) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("User {} could not be resolved", user_id) }),
            ),
            Error::Database(err) => {
                tracing::error!(error = %err, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Storage failure" }),
                )
            }
            Error::Storage(msg) => {
                tracing::error!(error = %msg, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Storage failure" }),
                )
            }
            other => {
                tracing::error!(error = %other, "unhandled error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An unexpected error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
