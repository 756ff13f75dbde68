// src/models/content.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::question::Domain;

/// Represents the 'roadmaps' table: one step of a domain's learning path.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct RoadmapStep {
    pub id: Uuid,
    pub domain: Domain,
    pub step_number: i32,
    pub title: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoadmapRequest {
    pub domain: Domain,
    #[validate(range(min = 1, max = 1000))]
    pub step_number: i32,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
}

/// Represents the 'resources' table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Resource {
    pub id: Uuid,
    pub domain: Domain,
    pub title: String,
    pub link: String,
    /// Kind of material, e.g. "Course", "Guide", "Book".
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub resource_type: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateResourceRequest {
    pub domain: Domain,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 500), custom(function = validate_url_string))]
    pub link: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub resource_type: String,
}

/// Optional domain filter for content listings.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContentFilter {
    pub domain: Option<Domain>,
}

/// Validates that a string is an absolute http(s) URL.
fn validate_url_string(link: &str) -> Result<(), validator::ValidationError> {
    match Url::parse(link) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_url")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(link: &str) -> CreateResourceRequest {
        serde_json::from_value(serde_json::json!({
            "domain": "tester",
            "title": "Testing fundamentals",
            "link": link,
            "type": "Course"
        }))
        .unwrap()
    }

    #[test]
    fn test_resource_link_must_be_http_url() {
        assert!(resource("https://example.com/course").validate().is_ok());
        assert!(resource("not a url").validate().is_err());
        assert!(resource("javascript:alert(1)").validate().is_err());
    }

    #[test]
    fn test_step_number_must_be_positive() {
        let req: CreateRoadmapRequest = serde_json::from_value(serde_json::json!({
            "domain": "analytics",
            "step_number": 0,
            "title": "SQL basics",
            "description": "Select, join, group by."
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }
}
