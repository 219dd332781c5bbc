pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::advisor::handlers as advisor;
use crate::inference::handlers as inference;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Classical-ML inference
        .route("/predict-career", post(inference::handle_predict_career))
        .route("/skill-gap", post(inference::handle_skill_gap))
        .route("/resume-match", post(inference::handle_resume_match))
        .route("/skill-readiness", post(inference::handle_skill_readiness))
        // Advisor (remote completion service)
        .route("/api/chat", post(advisor::handle_chat))
        .route("/api/roadmap-search", post(advisor::handle_roadmap_search))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
