// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{LoginForm, MeResponse, NewUser, RegisterRequest, TokenResponse},
    state::AppState,
    utils::{
        extract::{AppForm, AppJson},
        guard::CurrentUser,
        hash::{hash_password_blocking, verify_password_blocking},
        jwt::sign_jwt,
    },
};

/// Registers a new user.
///
/// Creates user, profile and default role in one transaction, then issues a token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hashed_password = hash_password_blocking(payload.password).await?;

    let record = state
        .users
        .create_user(NewUser {
            email: payload.email,
            hashed_password,
            full_name: payload.full_name,
        })
        .await?;

    tracing::info!("Registered user {}", record.user.id);

    let token = sign_jwt(
        &record.user.email,
        &state.config.jwt_secret,
        Some(state.config.jwt_expiration_minutes),
    )?;

    Ok((StatusCode::CREATED, Json(TokenResponse::bearer(token))))
}

/// Authenticates a user (OAuth2 password grant form) and returns a JWT.
///
/// Unknown email and wrong password produce the same error.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, description = "Incorrect email or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    AppForm(payload): AppForm<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let record = state
        .users
        .find_by_email(&payload.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid =
        verify_password_blocking(payload.password, record.user.hashed_password.clone()).await?;

    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let token = sign_jwt(
        &record.user.email,
        &state.config.jwt_secret,
        Some(state.config.jwt_expiration_minutes),
    )?;

    Ok(Json(TokenResponse::bearer(token)))
}

/// Returns the authenticated user's identity, profile name and roles.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(user: CurrentUser) -> Result<impl IntoResponse, AppError> {
    let is_admin = user.is_admin();
    let full_name = user.full_name.unwrap_or_else(|| user.email.clone());

    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        is_active: user.is_active,
        created_at: user.created_at,
        full_name,
        roles: user.roles,
        is_admin,
    }))
}
