use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Structured career advice produced by the guidance provider.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GuidanceDocument {
    pub description: String,
    #[serde(default)]
    pub job_profiles: Vec<JobProfile>,
    #[serde(default)]
    pub skills_to_improve: Vec<SkillFocus>,
    #[serde(default)]
    pub learning_roadmap: Vec<LearningStep>,
    #[serde(default)]
    pub resources: Vec<LearningResource>,
    pub future_scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobProfile {
    pub title: String,
    #[serde(default)]
    pub demand: String,
    #[serde(default)]
    pub growth: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkillFocus {
    pub skill: String,
    #[serde(default)]
    pub priority: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LearningStep {
    pub step: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LearningResource {
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub link: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
}
