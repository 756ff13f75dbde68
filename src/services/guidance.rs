//! Career guidance via an external generative model.
//!
//! The adapter is only ever called against an attempt that is already committed;
//! nothing here writes to the database.

use std::{sync::LazyLock, time::Duration};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::AppError,
    models::{attempt::QuizAttempt, guidance::GuidanceDocument},
};

/// Source of guidance documents for a scored attempt.
#[async_trait]
pub trait GuidanceProvider: Send + Sync {
    async fn career_guidance(&self, attempt: &QuizAttempt) -> Result<GuidanceDocument, AppError>;
}

/// Matches a whole reply wrapped in a markdown code fence, optionally tagged `json`.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```(?:json|JSON)?\s*(.*?)\s*```\s*$").expect("static regex is valid")
});

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_base_url.clone(),
            config.gemini_model.clone(),
            Duration::from_secs(config.guidance_timeout_secs),
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl GuidanceProvider for GeminiClient {
    async fn career_guidance(&self, attempt: &QuizAttempt) -> Result<GuidanceDocument, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::AdapterFailure("GEMINI_API_KEY is not configured".to_string()))?;

        let prompt = build_prompt(attempt);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::AdapterFailure(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::AdapterFailure(format!(
                "provider returned status {}",
                status
            )));
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| {
                AppError::AdapterFailure(format!("unreadable provider reply: {}", e.without_url()))
            })?;

        let text = reply
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .ok_or_else(|| AppError::AdapterFailure("provider reply had no text".to_string()))?;

        parse_guidance(&text)
    }
}

/// Parses the model's reply, tolerating a surrounding markdown code fence.
pub fn parse_guidance(raw: &str) -> Result<GuidanceDocument, AppError> {
    let json = match CODE_FENCE.captures(raw) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => raw.trim(),
    };

    serde_json::from_str(json).map_err(|e| {
        tracing::warn!("Guidance reply was not valid JSON: {}", e);
        AppError::AdapterFailure(format!("failed to parse guidance JSON: {}", e))
    })
}

pub fn build_prompt(attempt: &QuizAttempt) -> String {
    format!(
        r#"You are a career counsellor for technology careers.
A candidate completed a multiple-choice career assessment. Correct answers per track:
- Programming: {programmer}
- Analytics: {analytics}
- Testing: {tester}
- Total correct: {total}
Recommended track: {domain}

Write personalised guidance for this candidate as a single JSON object with exactly these keys:
{{
  "description": "2-3 sentences on why the recommended track fits this score pattern",
  "job_profiles": [{{"title": "...", "demand": "High | Very High | Medium", "growth": "+NN%"}}],
  "skills_to_improve": [{{"skill": "...", "priority": "High | Medium"}}],
  "learning_roadmap": [{{"step": 1, "title": "...", "description": "...", "duration": "N-M months"}}],
  "resources": [{{"title": "...", "source": "platform name", "link": "https://...", "type": "Course | Guide | Practice | Book"}}],
  "future_scope": "4-5 sentences on prospects, trends and growth in this track"
}}
Give 4-6 job profiles, 3-4 skills, 5-7 roadmap steps and 6-8 resources with real URLs.
Reply with the JSON object only."#,
        programmer = attempt.programmer_score,
        analytics = attempt.analytics_score,
        tester = attempt.tester_score,
        total = attempt.total_score,
        domain = attempt.recommended_domain.as_str(),
    )
}
