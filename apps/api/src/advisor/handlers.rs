//! Axum route handlers for the advisor API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::chat::{chat, ChatTurn};
use super::roadmap::{generate_roadmap, RoadmapQuery, RoadmapResponse};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }
    let llm = state.llm()?;
    let reply = chat(llm, &request.message, &request.conversation_history).await?;
    Ok(Json(ChatResponse { reply }))
}

/// POST /api/roadmap-search
pub async fn handle_roadmap_search(
    State(state): State<AppState>,
    Json(request): Json<RoadmapQuery>,
) -> Result<Json<RoadmapResponse>, AppError> {
    if request.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }
    let llm = state.llm()?;
    let roadmap = generate_roadmap(llm, &request).await?;
    Ok(Json(roadmap))
}
