// src/handlers/docs.rs

use axum::Json;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    handlers::{admin, auth, content, progress, quiz},
    models::{attempt, content as content_models, guidance, progress as progress_models, question, user},
};

/// Generated OpenAPI document for every route under `/api`.
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register, auth::login, auth::me,
        quiz::get_questions, quiz::list_my_attempts, quiz::create_attempt,
        quiz::get_guidance, quiz::get_public_attempt,
        admin::get_stats, admin::list_questions, admin::create_question,
        admin::update_question, admin::delete_question, admin::list_users,
        admin::list_all_attempts,
        content::list_roadmaps, content::create_roadmap, content::delete_roadmap,
        content::list_resources, content::create_resource, content::delete_resource,
        progress::list_progress, progress::upsert_progress, progress::delete_progress
    ),
    components(
        schemas(
            user::AppRole, user::RegisterRequest, user::LoginForm, user::TokenResponse,
            user::MeResponse, user::AdminUserView,
            question::Domain, question::Difficulty, question::Question,
            question::PublicQuestion, question::CreateQuestionRequest,
            question::UpdateQuestionRequest,
            attempt::QuizAttempt, attempt::PublicAttempt, attempt::SubmittedResponse,
            attempt::SubmitAttemptRequest,
            guidance::GuidanceDocument, guidance::JobProfile, guidance::SkillFocus,
            guidance::LearningStep, guidance::LearningResource,
            content_models::RoadmapStep, content_models::CreateRoadmapRequest,
            content_models::Resource, content_models::CreateResourceRequest,
            progress_models::UserProgress, progress_models::UpsertProgressRequest,
            admin::AdminStats,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and identity"),
        (name = "quiz", description = "Assessment questions, scoring and guidance"),
        (name = "admin", description = "Question bank and platform overview"),
        (name = "content", description = "Roadmaps and learning resources"),
        (name = "progress", description = "Per-user roadmap progress")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serves the OpenAPI document as JSON.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
