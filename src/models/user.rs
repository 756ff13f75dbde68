// src/models/user.rs

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "app_role", rename_all = "lowercase")]
pub enum AppRole {
    Admin,
    User,
}

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,

    /// Unique login email.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub hashed_password: String,

    pub is_active: bool,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A user together with its profile name and role assignments.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub full_name: Option<String>,
    pub roles: Vec<AppRole>,
}

/// Fields needed to create a user, its profile and its default role.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "normalized_email")]
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password length must be between 6 and 128 characters."
    ))]
    pub password: String,
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
}

/// OAuth2 password-grant form. `username` carries the email.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginForm {
    #[serde(deserialize_with = "normalized_email")]
    #[validate(length(min = 1, max = 254))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Identity view for the current user.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub full_name: String,
    pub roles: Vec<AppRole>,
    pub is_admin: bool,
}

/// Row shape for the admin user listing.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct AdminUserView {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Emails are compared trimmed and lowercased everywhere, so they are
/// normalised before validation sees them.
fn normalized_email<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_lowercase())
}
