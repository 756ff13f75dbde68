// src/handlers/quiz.rs

use std::collections::HashMap;

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
    config::Config,
    error::AppError,
    models::{
        attempt::{PublicAttempt, QuizAttempt, SubmitAttemptRequest},
        guidance::GuidanceDocument,
        question::PublicQuestion,
    },
    services::scoring::{self, AnswerKey},
    state::AppState,
    utils::{
        extract::{AppJson, AppPath},
        guard::CurrentUser,
    },
};

/// Serves a random sample of questions with the answer key withheld.
#[utoipa::path(
    get,
    path = "/api/quiz/questions",
    responses((status = 200, description = "Random question sample", body = [PublicQuestion])),
    security(("bearer" = [])),
    tag = "quiz"
)]
pub async fn get_questions(
    State(pool): State<PgPool>,
    State(config): State<Config>,
) -> Result<impl IntoResponse, AppError> {
    let questions = sqlx::query_as::<_, PublicQuestion>(
        r#"
        SELECT
            id, question_text,
            option_1, option_2, option_3, option_4,
            domain, difficulty
        FROM questions
        ORDER BY RANDOM()
        LIMIT $1
        "#,
    )
    .bind(config.quiz_question_count)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch quiz questions: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(questions))
}

/// Lists the caller's own attempts, newest first.
#[utoipa::path(
    get,
    path = "/api/quiz/attempts",
    responses((status = 200, description = "Caller's attempts", body = [QuizAttempt])),
    security(("bearer" = [])),
    tag = "quiz"
)]
pub async fn list_my_attempts(
    State(pool): State<PgPool>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let attempts = sqlx::query_as::<_, QuizAttempt>(
        r#"
        SELECT id, user_id, recommended_domain,
               programmer_score, analytics_score, tester_score, total_score,
               share_id, completed_at
        FROM quiz_attempts
        WHERE user_id = $1
        ORDER BY completed_at DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(attempts))
}

/// Scores a submission and stores the attempt with its responses.
///
/// * Correctness is always recomputed from the stored answer key.
/// * Unknown question ids are dropped, never an error.
/// * Attempt and responses are written in one transaction.
#[utoipa::path(
    post,
    path = "/api/quiz/attempts",
    request_body = SubmitAttemptRequest,
    responses(
        (status = 201, description = "Scored attempt", body = QuizAttempt),
        (status = 400, description = "Malformed submission")
    ),
    security(("bearer" = [])),
    tag = "quiz"
)]
pub async fn create_attempt(
    State(pool): State<PgPool>,
    user: CurrentUser,
    AppJson(req): AppJson<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let question_ids: Vec<Uuid> = req.responses.iter().map(|r| r.question_id).collect();

    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!("Failed to open attempt transaction: {:?}", e);
        AppError::from(e)
    })?;

    let bank: HashMap<Uuid, AnswerKey> = sqlx::query_as::<_, AnswerKey>(
        "SELECT id, correct_answer, domain FROM questions WHERE id = ANY($1)",
    )
    .bind(&question_ids)
    .fetch_all(&mut *tx)
    .await?
    .into_iter()
    .map(|k| (k.id, k))
    .collect();

    let scored = scoring::score(&req.responses, &bank);

    let dropped = req.responses.len() - scored.responses.len();
    if dropped > 0 {
        tracing::debug!("Dropped {} responses with unknown question ids", dropped);
    }

    let attempt = sqlx::query_as::<_, QuizAttempt>(
        r#"
        INSERT INTO quiz_attempts
            (user_id, recommended_domain, programmer_score, analytics_score,
             tester_score, total_score, share_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, recommended_domain,
                  programmer_score, analytics_score, tester_score, total_score,
                  share_id, completed_at
        "#,
    )
    .bind(user.id)
    .bind(scored.recommended_domain)
    .bind(scored.scores.programmer)
    .bind(scored.scores.analytics)
    .bind(scored.scores.tester)
    .bind(scored.total_score)
    .bind(Uuid::new_v4())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert quiz attempt: {:?}", e);
        AppError::from(e)
    })?;

    if !scored.responses.is_empty() {
        let mut builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "INSERT INTO quiz_responses (attempt_id, question_id, selected_answer, is_correct) ",
        );
        builder.push_values(&scored.responses, |mut row, response| {
            row.push_bind(attempt.id)
                .push_bind(response.question_id)
                .push_bind(response.selected_answer)
                .push_bind(response.is_correct);
        });

        builder.build().execute(&mut *tx).await.map_err(|e| {
            tracing::error!("Failed to insert quiz responses: {:?}", e);
            AppError::from(e)
        })?;
    }

    tx.commit().await?;

    tracing::info!(
        "Attempt {} stored for user {}: total {} -> {}",
        attempt.id,
        user.id,
        attempt.total_score,
        attempt.recommended_domain.as_str()
    );

    Ok((StatusCode::CREATED, Json(attempt)))
}

/// Forwards a committed attempt's scores to the guidance provider.
///
/// Only the attempt's owner may ask. Provider failures never touch the attempt.
#[utoipa::path(
    get,
    path = "/api/quiz/attempts/{id}/ai-guidance",
    params(("id" = Uuid, Path, description = "Attempt id")),
    responses(
        (status = 200, description = "Guidance document", body = GuidanceDocument),
        (status = 404, description = "Attempt not found"),
        (status = 500, description = "Guidance provider failed")
    ),
    security(("bearer" = [])),
    tag = "quiz"
)]
pub async fn get_guidance(
    State(state): State<AppState>,
    user: CurrentUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = sqlx::query_as::<_, QuizAttempt>(
        r#"
        SELECT id, user_id, recommended_domain,
               programmer_score, analytics_score, tester_score, total_score,
               share_id, completed_at
        FROM quiz_attempts
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user.id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("Attempt not found".to_string()))?;

    let guidance = state.guidance.career_guidance(&attempt).await?;

    Ok(Json(guidance))
}

/// Public, unauthenticated view of an attempt addressed by its share id.
#[utoipa::path(
    get,
    path = "/api/quiz/public/attempts/{share_id}",
    params(("share_id" = Uuid, Path, description = "Public share id")),
    responses(
        (status = 200, description = "Shared attempt", body = PublicAttempt),
        (status = 404, description = "Attempt not found")
    ),
    tag = "quiz"
)]
pub async fn get_public_attempt(
    State(pool): State<PgPool>,
    AppPath(share_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = sqlx::query_as::<_, PublicAttempt>(
        r#"
        SELECT share_id, recommended_domain,
               programmer_score, analytics_score, tester_score, total_score,
               completed_at
        FROM quiz_attempts
        WHERE share_id = $1
        "#,
    )
    .bind(share_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Attempt not found".to_string()))?;

    Ok(Json(attempt))
}
