// src/utils/guard.rs

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{HeaderMap, Request, header, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::user::{AppRole, UserRecord},
    state::AppState,
    store::CredentialStore,
    utils::jwt::verify_jwt,
};

/// The resolved identity of an authenticated request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub full_name: Option<String>,
    pub roles: Vec<AppRole>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&AppRole::Admin)
    }
}

impl From<UserRecord> for CurrentUser {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.user.id,
            email: record.user.email,
            is_active: record.user.is_active,
            created_at: record.user.created_at,
            full_name: record.full_name,
            roles: record.roles,
        }
    }
}

fn unauthenticated() -> AppError {
    AppError::AuthError("Could not validate credentials".to_string())
}

/// Resolves a bearer token to a user.
///
/// An unknown subject fails exactly like a bad token.
pub async fn authenticate(
    store: &dyn CredentialStore,
    secret: &str,
    token: &str,
) -> Result<CurrentUser, AppError> {
    let claims = verify_jwt(token, secret)?;

    let record = store
        .find_by_email(&claims.sub)
        .await?
        .ok_or_else(unauthenticated)?;

    Ok(CurrentUser::from(record))
}

pub fn authorize_active(user: CurrentUser) -> Result<CurrentUser, AppError> {
    if !user.is_active {
        return Err(AppError::InactiveAccount);
    }
    Ok(user)
}

pub fn authorize_admin(user: CurrentUser) -> Result<CurrentUser, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(user)
}

/// Token from `Authorization: <scheme> <token>`; the scheme matches `bearer` in any case.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Axum Middleware: Authentication.
///
/// Validates 'Authorization: Bearer <token>', resolves the user and rejects
/// inactive accounts. On success injects `CurrentUser` into the request
/// extensions for handlers and `admin_middleware`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or_else(unauthenticated)?.to_owned();

    let user = authenticate(state.users.as_ref(), &state.config.jwt_secret, &token).await?;
    let user = authorize_active(user)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Axum Middleware: Admin Authorization.
///
/// Must be layered inside `auth_middleware`. Without an injected `CurrentUser`
/// the request is treated as unauthenticated.
pub async fn admin_middleware(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .cloned()
        .ok_or_else(unauthenticated)?;

    authorize_admin(user)?;

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(unauthenticated)
    }
}

/// Extractor for handlers that need admin rights on routes otherwise open to
/// any active user.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        authorize_admin(user).map(AdminUser)
    }
}
