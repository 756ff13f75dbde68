// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::question::Domain;

/// Represents the 'quiz_attempts' table. Rows are never updated.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct QuizAttempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recommended_domain: Domain,
    pub programmer_score: i32,
    pub analytics_score: i32,
    pub tester_score: i32,
    pub total_score: i32,
    pub share_id: Uuid,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// Attempt view served by share link: no owner, no internal id.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct PublicAttempt {
    pub share_id: Uuid,
    pub recommended_domain: Domain,
    pub programmer_score: i32,
    pub analytics_score: i32,
    pub tester_score: i32,
    pub total_score: i32,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

/// One (question, selected option) pair as sent by the client.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct SubmittedResponse {
    pub question_id: Uuid,
    pub selected_answer: i32,
}

/// DTO for submitting a quiz attempt. Order of `responses` is preserved.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitAttemptRequest {
    #[validate(length(max = 500, message = "Too many responses in one attempt."))]
    pub responses: Vec<SubmittedResponse>,
}
