use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Represents the 'user_progress' table. At most one row per (user, step).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct UserProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub roadmap_step_id: Uuid,
    pub is_completed: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertProgressRequest {
    pub roadmap_step_id: Uuid,
    #[serde(default)]
    pub is_completed: bool,
}
