// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, content, docs, progress, quiz},
    state::AppState,
    utils::guard::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public: register, login, shared attempt view, OpenAPI document.
/// * Everything else requires an active user; `/api/admin` also requires the admin role.
/// * Content writes are gated per handler by the `AdminUser` extractor.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let require_user = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .layer(require_user()),
        );

    let quiz_routes = Router::new()
        .route("/public/attempts/{share_id}", get(quiz::get_public_attempt))
        .merge(
            Router::new()
                .route("/questions", get(quiz::get_questions))
                .route(
                    "/attempts",
                    get(quiz::list_my_attempts).post(quiz::create_attempt),
                )
                .route("/attempts/{id}/ai-guidance", get(quiz::get_guidance))
                .layer(require_user()),
        );

    let admin_routes = Router::new()
        .route("/stats", get(admin::get_stats))
        .route(
            "/questions",
            get(admin::list_questions).post(admin::create_question),
        )
        .route(
            "/questions/{id}",
            put(admin::update_question).delete(admin::delete_question),
        )
        .route("/users", get(admin::list_users))
        .route("/attempts/all", get(admin::list_all_attempts))
        // Auth first, then the admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(require_user());

    let content_routes = Router::new()
        .route(
            "/roadmaps",
            get(content::list_roadmaps).post(content::create_roadmap),
        )
        .route("/roadmaps/{id}", delete(content::delete_roadmap))
        .route(
            "/resources",
            get(content::list_resources).post(content::create_resource),
        )
        .route("/resources/{id}", delete(content::delete_resource))
        .layer(require_user());

    let progress_routes = Router::new()
        .route(
            "/",
            get(progress::list_progress).post(progress::upsert_progress),
        )
        .route("/{roadmap_step_id}", delete(progress::delete_progress))
        .layer(require_user());

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/quiz", quiz_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/content", content_routes)
        .nest("/api/progress", progress_routes)
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
