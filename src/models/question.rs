// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Career track a question, score, roadmap step or resource belongs to.
///
/// Declaration order is significant: it is the tie-break order used when
/// recommending a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "quiz_domain", rename_all = "lowercase")]
pub enum Domain {
    Programmer,
    Analytics,
    Tester,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Programmer, Domain::Analytics, Domain::Tester];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Programmer => "programmer",
            Domain::Analytics => "analytics",
            Domain::Tester => "tester",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "difficulty_level", rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub id: Uuid,

    pub question_text: String,

    pub option_1: String,
    pub option_2: String,
    pub option_3: String,
    pub option_4: String,

    /// 1-indexed number of the correct option.
    pub correct_answer: i32,

    pub domain: Domain,

    pub difficulty: Difficulty,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for sending a question to quiz takers (answer key withheld).
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct PublicQuestion {
    pub id: Uuid,
    pub question_text: String,
    pub option_1: String,
    pub option_2: String,
    pub option_3: String,
    pub option_4: String,
    pub domain: Domain,
    pub difficulty: Difficulty,
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub question_text: String,
    #[validate(length(min = 1, max = 500))]
    pub option_1: String,
    #[validate(length(min = 1, max = 500))]
    pub option_2: String,
    #[validate(length(min = 1, max = 500))]
    pub option_3: String,
    #[validate(length(min = 1, max = 500))]
    pub option_4: String,
    #[validate(range(min = 1, max = 4, message = "correct_answer must be between 1 and 4."))]
    pub correct_answer: i32,
    pub domain: Domain,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// DTO for updating a question. Fields are optional.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub question_text: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub option_1: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub option_2: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub option_3: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub option_4: Option<String>,
    #[validate(range(min = 1, max = 4))]
    pub correct_answer: Option<i32>,
    pub domain: Option<Domain>,
    pub difficulty: Option<Difficulty>,
}

impl UpdateQuestionRequest {
    pub fn is_empty(&self) -> bool {
        self.question_text.is_none()
            && self.option_1.is_none()
            && self.option_2.is_none()
            && self.option_3.is_none()
            && self.option_4.is_none()
            && self.correct_answer.is_none()
            && self.domain.is_none()
            && self.difficulty.is_none()
    }
}
