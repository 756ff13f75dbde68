// src/handlers/content.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::content::{
        ContentFilter, CreateResourceRequest, CreateRoadmapRequest, Resource, RoadmapStep,
    },
    utils::{
        extract::{AppJson, AppPath, AppQuery},
        guard::AdminUser,
        html::clean_html,
    },
};

/// Lists roadmap steps, optionally restricted to one domain, in step order.
#[utoipa::path(
    get,
    path = "/api/content/roadmaps",
    params(ContentFilter),
    responses((status = 200, description = "Roadmap steps", body = [RoadmapStep])),
    security(("bearer" = [])),
    tag = "content"
)]
pub async fn list_roadmaps(
    State(pool): State<PgPool>,
    AppQuery(filter): AppQuery<ContentFilter>,
) -> Result<impl IntoResponse, AppError> {
    let steps = sqlx::query_as::<_, RoadmapStep>(
        r#"
        SELECT id, domain, step_number, title, description, created_at
        FROM roadmaps
        WHERE ($1::quiz_domain IS NULL OR domain = $1)
        ORDER BY domain, step_number
        "#,
    )
    .bind(filter.domain)
    .fetch_all(&pool)
    .await?;

    Ok(Json(steps))
}

/// Admin only.
#[utoipa::path(
    post,
    path = "/api/content/roadmaps",
    request_body = CreateRoadmapRequest,
    responses(
        (status = 201, description = "Created", body = RoadmapStep),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer" = [])),
    tag = "content"
)]
pub async fn create_roadmap(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    AppJson(payload): AppJson<CreateRoadmapRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let step = sqlx::query_as::<_, RoadmapStep>(
        r#"
        INSERT INTO roadmaps (domain, step_number, title, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, domain, step_number, title, description, created_at
        "#,
    )
    .bind(payload.domain)
    .bind(payload.step_number)
    .bind(clean_html(&payload.title))
    .bind(clean_html(&payload.description))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create roadmap step: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(step)))
}

/// Admin only. Progress rows pointing at the step go with it.
#[utoipa::path(
    delete,
    path = "/api/content/roadmaps/{id}",
    params(("id" = Uuid, Path, description = "Roadmap step id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Roadmap step not found")
    ),
    security(("bearer" = [])),
    tag = "content"
)]
pub async fn delete_roadmap(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM roadmaps WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Roadmap step not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Lists learning resources, optionally restricted to one domain.
#[utoipa::path(
    get,
    path = "/api/content/resources",
    params(ContentFilter),
    responses((status = 200, description = "Resources", body = [Resource])),
    security(("bearer" = [])),
    tag = "content"
)]
pub async fn list_resources(
    State(pool): State<PgPool>,
    AppQuery(filter): AppQuery<ContentFilter>,
) -> Result<impl IntoResponse, AppError> {
    let resources = sqlx::query_as::<_, Resource>(
        r#"
        SELECT id, domain, title, link, type, created_at
        FROM resources
        WHERE ($1::quiz_domain IS NULL OR domain = $1)
        ORDER BY domain, created_at
        "#,
    )
    .bind(filter.domain)
    .fetch_all(&pool)
    .await?;

    Ok(Json(resources))
}

/// Admin only.
#[utoipa::path(
    post,
    path = "/api/content/resources",
    request_body = CreateResourceRequest,
    responses(
        (status = 201, description = "Created", body = Resource),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer" = [])),
    tag = "content"
)]
pub async fn create_resource(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    AppJson(payload): AppJson<CreateResourceRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // Link is validated as a URL, not sanitized.
    let resource = sqlx::query_as::<_, Resource>(
        r#"
        INSERT INTO resources (domain, title, link, type)
        VALUES ($1, $2, $3, $4)
        RETURNING id, domain, title, link, type, created_at
        "#,
    )
    .bind(payload.domain)
    .bind(clean_html(&payload.title))
    .bind(payload.link.trim())
    .bind(clean_html(&payload.resource_type))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create resource: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(resource)))
}

/// Admin only.
#[utoipa::path(
    delete,
    path = "/api/content/resources/{id}",
    params(("id" = Uuid, Path, description = "Resource id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Resource not found")
    ),
    security(("bearer" = [])),
    tag = "content"
)]
pub async fn delete_resource(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM resources WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Resource not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
