// src/handlers/progress.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, is_foreign_key_violation},
    models::progress::{UpsertProgressRequest, UserProgress},
    utils::{
        extract::{AppJson, AppPath},
        guard::CurrentUser,
    },
};

/// Lists the caller's progress rows.
#[utoipa::path(
    get,
    path = "/api/progress",
    responses((status = 200, description = "Caller's progress", body = [UserProgress])),
    security(("bearer" = [])),
    tag = "progress"
)]
pub async fn list_progress(
    State(pool): State<PgPool>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = sqlx::query_as::<_, UserProgress>(
        r#"
        SELECT id, user_id, roadmap_step_id, is_completed, created_at
        FROM user_progress
        WHERE user_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(user.id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(rows))
}

/// Marks a roadmap step for the caller. Repeating the call updates the same row.
#[utoipa::path(
    post,
    path = "/api/progress",
    request_body = UpsertProgressRequest,
    responses(
        (status = 200, description = "Stored progress", body = UserProgress),
        (status = 404, description = "Roadmap step not found")
    ),
    security(("bearer" = [])),
    tag = "progress"
)]
pub async fn upsert_progress(
    State(pool): State<PgPool>,
    user: CurrentUser,
    AppJson(payload): AppJson<UpsertProgressRequest>,
) -> Result<impl IntoResponse, AppError> {
    let row = sqlx::query_as::<_, UserProgress>(
        r#"
        INSERT INTO user_progress (user_id, roadmap_step_id, is_completed)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, roadmap_step_id)
        DO UPDATE SET is_completed = EXCLUDED.is_completed
        RETURNING id, user_id, roadmap_step_id, is_completed, created_at
        "#,
    )
    .bind(user.id)
    .bind(payload.roadmap_step_id)
    .bind(payload.is_completed)
    .fetch_one(&pool)
    .await
    .map_err(progress_write_error)?;

    Ok(Json(row))
}

/// Clears the caller's progress on a step. Idempotent.
#[utoipa::path(
    delete,
    path = "/api/progress/{roadmap_step_id}",
    params(("roadmap_step_id" = Uuid, Path, description = "Roadmap step id")),
    responses((status = 204, description = "Cleared")),
    security(("bearer" = [])),
    tag = "progress"
)]
pub async fn delete_progress(
    State(pool): State<PgPool>,
    user: CurrentUser,
    AppPath(roadmap_step_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    sqlx::query("DELETE FROM user_progress WHERE user_id = $1 AND roadmap_step_id = $2")
        .bind(user.id)
        .bind(roadmap_step_id)
        .execute(&pool)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// The roadmap step reference is enforced by the foreign key; a missing step is a 404.
fn progress_write_error(e: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&e) {
        AppError::NotFound("Roadmap step not found".to_string())
    } else {
        tracing::error!("Failed to upsert progress: {:?}", e);
        AppError::from(e)
    }
}
