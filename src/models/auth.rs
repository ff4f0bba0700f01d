use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A row of the `users` table.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub email: String,

    // Never serialized back to clients.
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String,

    /// Either "admin" or "user".
    pub role: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(email(message = "The e-mail address is invalid."))]
    pub email: String,
    #[validate(length(min = 6, message = "The password must be at least 6 characters."))]
    pub password: String,
    /// Defaults to "user" when omitted.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "The e-mail address is invalid."))]
    pub email: String,
    #[validate(length(min = 1, message = "The password is required."))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

/// JWT claims: subject (user id), role, and the standard timestamps.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}
