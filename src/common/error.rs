use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Application-wide error type. Every handler returns `Result<_, AppError>` and
// the `IntoResponse` impl below decides the status code and JSON body.
#[derive(Debug, Error)]
pub enum AppError {
    // The reporting endpoints refuse to run without a date range.
    #[error("Please provide startDate and endDate (YYYY-MM-DD)")]
    MissingDateRange,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid hours filter '{0}', expected comma-separated hours (e.g. 9,10,11)")]
    InvalidHours(String),

    #[error("Invalid pagination ({0}), limit and offset must not be negative")]
    InvalidPagination(String),

    #[error("Validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("This e-mail is already registered")]
    EmailAlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or missing authentication token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    // The driver message is passed through to the client on purpose; the
    // dashboard operators use it to spot schema drift after data imports.
    #[error("{0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Password hashing error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Return every field problem, not only the first one.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::MissingDateRange
            | AppError::InvalidDate(_)
            | AppError::InvalidHours(_)
            | AppError::InvalidPagination(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, self.to_string()),
            AppError::InvalidCredentials | AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::UserNotFound => (StatusCode::NOT_FOUND, self.to_string()),

            AppError::DatabaseError(ref e) => {
                tracing::error!("query failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }

            ref e => {
                tracing::error!("internal server error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
