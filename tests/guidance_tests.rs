// tests/guidance_tests.rs
//
// GeminiClient against a local stand-in for the generateContent endpoint.

use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use career_backend::{
    error::AppError,
    models::{attempt::QuizAttempt, question::Domain},
    services::guidance::{GeminiClient, GuidanceProvider},
};
use serde_json::{Value, json};
use uuid::Uuid;

const MODEL: &str = "test-model";

const DOCUMENT: &str = r#"{
    "description": "You answered testing questions most accurately.",
    "job_profiles": [{"title": "QA Engineer", "demand": "High", "growth": "+18%"}],
    "skills_to_improve": [{"skill": "Test automation", "priority": "High"}],
    "learning_roadmap": [{"step": 1, "title": "Testing basics", "description": "Levels and types", "duration": "1 month"}],
    "resources": [{"title": "ISTQB syllabus", "source": "istqb.org", "link": "https://www.istqb.org/", "type": "Guide"}],
    "future_scope": "Quality engineering keeps growing."
}"#;

fn reply_with_text(text: &str) -> Value {
    json!({
        "candidates": [
            {"content": {"parts": [{"text": text}], "role": "model"}}
        ]
    })
}

/// Spawns a mock server answering every generateContent call with `reply`.
async fn spawn_mock(status: StatusCode, reply: Value) -> String {
    let handler = move |headers: HeaderMap, uri: axum::http::Uri, Json(body): Json<Value>| {
        let reply = reply.clone();
        async move {
            let key = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok());
            if key != Some("test-key") || uri.query().is_some() {
                return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"}))).into_response();
            }
            let has_prompt = body["contents"][0]["parts"][0]["text"]
                .as_str()
                .is_some_and(|text| text.contains("Testing: 6"));
            if !has_prompt {
                return (StatusCode::BAD_REQUEST, Json(json!({"error": "no prompt"}))).into_response();
            }
            (status, Json(reply)).into_response()
        }
    };

    let app = Router::new().route(
        &format!("/v1beta/models/{}:generateContent", MODEL),
        post(handler),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

fn client(base_url: &str) -> GeminiClient {
    GeminiClient::new(
        Some("test-key".to_string()),
        base_url,
        MODEL,
        Duration::from_secs(5),
    )
    .unwrap()
}

fn tester_attempt() -> QuizAttempt {
    QuizAttempt {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        recommended_domain: Domain::Tester,
        programmer_score: 2,
        analytics_score: 3,
        tester_score: 6,
        total_score: 11,
        share_id: Uuid::new_v4(),
        completed_at: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn plain_json_reply_is_parsed() {
    let base = spawn_mock(StatusCode::OK, reply_with_text(DOCUMENT)).await;

    let doc = client(&base)
        .career_guidance(&tester_attempt())
        .await
        .unwrap();

    assert_eq!(doc.job_profiles[0].title, "QA Engineer");
    assert_eq!(doc.resources[0].resource_type, "Guide");
}

#[tokio::test]
async fn fenced_reply_is_parsed() {
    let fenced = format!("```json\n{}\n```", DOCUMENT);
    let base = spawn_mock(StatusCode::OK, reply_with_text(&fenced)).await;

    let doc = client(&base)
        .career_guidance(&tester_attempt())
        .await
        .unwrap();

    assert_eq!(doc.learning_roadmap.len(), 1);
}

#[tokio::test]
async fn provider_error_status_is_adapter_failure() {
    let base = spawn_mock(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": {"message": "overloaded"}}),
    )
    .await;

    let err = client(&base)
        .career_guidance(&tester_attempt())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AdapterFailure(_)));
}

#[tokio::test]
async fn non_json_text_is_adapter_failure() {
    let base = spawn_mock(
        StatusCode::OK,
        reply_with_text("I'd be happy to help with your career!"),
    )
    .await;

    let err = client(&base)
        .career_guidance(&tester_attempt())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AdapterFailure(_)));
}

#[tokio::test]
async fn empty_candidates_is_adapter_failure() {
    let base = spawn_mock(StatusCode::OK, json!({"candidates": []})).await;

    let err = client(&base)
        .career_guidance(&tester_attempt())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AdapterFailure(_)));
}

#[tokio::test]
async fn unreachable_provider_is_adapter_failure() {
    // Nothing listens on port 9 locally.
    let err = client("http://127.0.0.1:9")
        .career_guidance(&tester_attempt())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AdapterFailure(_)));
}

#[tokio::test]
async fn api_key_never_appears_in_adapter_errors() {
    let secret = "SUPERSECRETKEY";

    let unreachable = GeminiClient::new(
        Some(secret.to_string()),
        "http://127.0.0.1:9",
        MODEL,
        Duration::from_secs(1),
    )
    .unwrap();
    match unreachable.career_guidance(&tester_attempt()).await {
        Err(AppError::AdapterFailure(message)) => assert!(!message.contains(secret)),
        other => panic!("expected adapter failure, got {:?}", other),
    }

    let base = spawn_mock(StatusCode::OK, reply_with_text(DOCUMENT)).await;
    let wrong_key = GeminiClient::new(
        Some(secret.to_string()),
        base.as_str(),
        MODEL,
        Duration::from_secs(5),
    )
    .unwrap();
    match wrong_key.career_guidance(&tester_attempt()).await {
        Err(AppError::AdapterFailure(message)) => assert!(!message.contains(secret)),
        other => panic!("expected adapter failure, got {:?}", other),
    }
}
