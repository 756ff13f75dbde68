// src/store.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::{AppError, is_unique_violation},
    models::user::{AppRole, NewUser, User, UserRecord},
};

/// Persistence of user identities, password digests, profiles and roles.
///
/// The access guard and the auth handlers only go through this trait.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Looks a user up by email, with roles and profile name loaded.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    /// Creates the user, its profile and the default `user` role as one unit.
    ///
    /// Fails with `DuplicateEmail` if the email is taken.
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, AppError>;
}

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, hashed_password, is_active, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user: {:?}", e);
            AppError::from(e)
        })?;

        let Some(user) = user else {
            return Ok(None);
        };

        let roles = sqlx::query_scalar::<_, AppRole>(
            "SELECT role FROM user_roles WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await?;

        let full_name = sqlx::query_scalar::<_, Option<String>>(
            "SELECT full_name FROM profiles WHERE id = $1",
        )
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await?
        .flatten();

        Ok(Some(UserRecord {
            user,
            full_name,
            roles,
        }))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_scalar::<_, uuid::Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(&new_user.email)
            .fetch_optional(&mut *tx)
            .await?;

        if existing.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        // A concurrent registration can still win the race; the unique index decides.
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, hashed_password)
            VALUES ($1, $2)
            RETURNING id, email, hashed_password, is_active, created_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.hashed_password)
        .fetch_one(&mut *tx)
        .await
        .map_err(user_insert_error)?;

        let full_name = new_user
            .full_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| user.email.clone());

        sqlx::query("INSERT INTO profiles (id, email, full_name) VALUES ($1, $2, $3)")
            .bind(user.id)
            .bind(&user.email)
            .bind(&full_name)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
            .bind(user.id)
            .bind(AppRole::User)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(UserRecord {
            user,
            full_name: Some(full_name),
            roles: vec![AppRole::User],
        })
    }
}

/// Losing a registration race surfaces as a unique violation on `users.email`.
fn user_insert_error(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::DuplicateEmail
    } else {
        tracing::error!("Failed to register user: {:?}", e);
        AppError::from(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::test_support::db_error;

    #[test]
    fn test_unique_violation_is_duplicate_email() {
        assert!(matches!(
            user_insert_error(db_error("23505")),
            AppError::DuplicateEmail
        ));
    }

    #[test]
    fn test_other_insert_failure_is_internal() {
        assert!(matches!(
            user_insert_error(sqlx::Error::PoolTimedOut),
            AppError::InternalServerError(_)
        ));
    }
}
