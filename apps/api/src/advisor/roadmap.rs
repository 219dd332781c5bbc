//! Roadmap generation: prompt, call, and tolerant parsing of the reply.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::prompts::{roadmap_prompt, ROADMAP_SYSTEM};
use crate::llm_client::prompts::json_only;
use crate::llm_client::{parse_json_reply, ChatCompletion, ChatMessage, CompletionRequest, LlmError};

pub const DEFAULT_TITLE: &str = "Career Roadmap";
pub const DEFAULT_TIMELINE: &str = "3-6 months";
const ROADMAP_MAX_TOKENS: u32 = 2000;
const ROADMAP_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, Deserialize)]
pub struct RoadmapQuery {
    pub query: String,
    #[serde(default)]
    pub current_role: Option<String>,
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub current_skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadmapStep {
    pub title: String,
    pub duration: String,
    pub description: String,
    pub tasks: Vec<String>,
    pub skills: Vec<String>,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapSummary {
    pub title: String,
    pub description: String,
    pub timeline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapResponse {
    pub roadmap: RoadmapSummary,
    pub steps: Vec<RoadmapStep>,
    /// Overall estimate; falls back to a default when the model gives none.
    pub timeline: String,
}

#[derive(Debug, Deserialize)]
struct RawRoadmap {
    title: Option<String>,
    description: Option<String>,
    timeline: Option<String>,
    #[serde(default)]
    steps: Vec<RoadmapStep>,
}

/// Parses a model reply into a roadmap, filling documented defaults.
pub fn parse_roadmap(reply: &str) -> Result<RoadmapResponse, LlmError> {
    let raw: RawRoadmap = parse_json_reply(reply)?;
    let timeline = raw.timeline.filter(|t| !t.trim().is_empty());
    Ok(RoadmapResponse {
        roadmap: RoadmapSummary {
            title: raw.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: raw.description.unwrap_or_default(),
            timeline: timeline.clone().unwrap_or_default(),
        },
        steps: raw.steps,
        timeline: timeline.unwrap_or_else(|| DEFAULT_TIMELINE.to_string()),
    })
}

pub async fn generate_roadmap(
    llm: &dyn ChatCompletion,
    query: &RoadmapQuery,
) -> Result<RoadmapResponse, LlmError> {
    let request = CompletionRequest {
        messages: vec![
            ChatMessage::system(json_only(ROADMAP_SYSTEM)),
            ChatMessage::user(roadmap_prompt(query)),
        ],
        temperature: 0.7,
        max_tokens: ROADMAP_MAX_TOKENS,
        json_response: true,
        timeout: Some(ROADMAP_TIMEOUT),
    };
    let reply = llm.complete(request).await?;
    let roadmap = parse_roadmap(&reply)?;
    info!(steps = roadmap.steps.len(), "roadmap generated");
    Ok(roadmap)
}
