// src/handlers/admin.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        attempt::QuizAttempt,
        question::{CreateQuestionRequest, Question, UpdateQuestionRequest},
        user::AdminUserView,
    },
    utils::{
        extract::{AppJson, AppPath},
        html::clean_html,
    },
};

const QUESTION_COLUMNS: &str = "id, question_text, option_1, option_2, option_3, option_4, \
     correct_answer, domain, difficulty, created_at, updated_at";

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStats {
    #[serde(rename = "totalQuestions")]
    pub total_questions: i64,
    #[serde(rename = "totalUsers")]
    pub total_users: i64,
    #[serde(rename = "assessmentsTaken")]
    pub assessments_taken: i64,
}

/// Returns question, user and attempt totals.
/// Admin only.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses((status = 200, description = "Totals", body = AdminStats)),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn get_stats(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let (total_questions, total_users, assessments_taken) =
        sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM questions),
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM quiz_attempts)
            "#,
        )
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute admin stats: {:?}", e);
            AppError::from(e)
        })?;

    Ok(Json(AdminStats {
        total_questions,
        total_users,
        assessments_taken,
    }))
}

/// Lists every question including its answer key.
/// Admin only.
#[utoipa::path(
    get,
    path = "/api/admin/questions",
    responses((status = 200, description = "All questions", body = [Question])),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn list_questions(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let questions = sqlx::query_as::<_, Question>(&format!(
        "SELECT {} FROM questions ORDER BY domain, created_at DESC",
        QUESTION_COLUMNS
    ))
    .fetch_all(&pool)
    .await?;

    Ok(Json(questions))
}

/// Creates a new quiz question.
/// Admin only.
#[utoipa::path(
    post,
    path = "/api/admin/questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Created", body = Question),
        (status = 400, description = "Validation error")
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn create_question(
    State(pool): State<PgPool>,
    AppJson(payload): AppJson<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let question = sqlx::query_as::<_, Question>(&format!(
        r#"
        INSERT INTO questions
        (question_text, option_1, option_2, option_3, option_4, correct_answer, domain, difficulty)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        QUESTION_COLUMNS
    ))
    .bind(clean_html(&payload.question_text))
    .bind(clean_html(&payload.option_1))
    .bind(clean_html(&payload.option_2))
    .bind(clean_html(&payload.option_3))
    .bind(clean_html(&payload.option_4))
    .bind(payload.correct_answer)
    .bind(payload.domain)
    .bind(payload.difficulty)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// Updates a question by ID. Only the provided fields change.
/// Admin only.
#[utoipa::path(
    put,
    path = "/api/admin/questions/{id}",
    params(("id" = Uuid, Path, description = "Question id")),
    request_body = UpdateQuestionRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Question not found")
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn update_question(
    State(pool): State<PgPool>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.is_empty() {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM questions WHERE id = $1)")
                .bind(id)
                .fetch_one(&pool)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Question not found".to_string()));
        }
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE questions SET ");
    let mut separated = builder.separated(", ");

    if let Some(text) = payload.question_text {
        separated.push("question_text = ");
        separated.push_bind_unseparated(clean_html(&text));
    }

    let options = [
        ("option_1 = ", payload.option_1),
        ("option_2 = ", payload.option_2),
        ("option_3 = ", payload.option_3),
        ("option_4 = ", payload.option_4),
    ];
    for (column, value) in options {
        if let Some(value) = value {
            separated.push(column);
            separated.push_bind_unseparated(clean_html(&value));
        }
    }

    if let Some(correct_answer) = payload.correct_answer {
        separated.push("correct_answer = ");
        separated.push_bind_unseparated(correct_answer);
    }

    if let Some(domain) = payload.domain {
        separated.push("domain = ");
        separated.push_bind_unseparated(domain);
    }

    if let Some(difficulty) = payload.difficulty {
        separated.push("difficulty = ");
        separated.push_bind_unseparated(difficulty);
    }

    separated.push("updated_at = NOW()");

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update question: {:?}", e);
        AppError::from(e)
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a quiz question by ID.
/// Admin only. Stored responses keep their question id.
#[utoipa::path(
    delete,
    path = "/api/admin/questions/{id}",
    params(("id" = Uuid, Path, description = "Question id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Question not found")
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn delete_question(
    State(pool): State<PgPool>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete question: {:?}", e);
            AppError::from(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Lists all users in the system.
/// Admin only.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses((status = 200, description = "All users", body = [AdminUserView])),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn list_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, AdminUserView>(
        r#"
        SELECT id, email, is_active, created_at
        FROM users
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(users))
}

/// Lists every attempt, newest first.
/// Admin only.
#[utoipa::path(
    get,
    path = "/api/admin/attempts/all",
    responses((status = 200, description = "All attempts", body = [QuizAttempt])),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn list_all_attempts(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let attempts = sqlx::query_as::<_, QuizAttempt>(
        r#"
        SELECT id, user_id, recommended_domain,
               programmer_score, analytics_score, tester_score, total_score,
               share_id, completed_at
        FROM quiz_attempts
        ORDER BY completed_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(attempts))
}
