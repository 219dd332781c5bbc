use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::inference::ModelBundle;
use crate::llm_client::ChatCompletion;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Everything here is read-only after startup; requests share the bundle
/// without locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` until a trained bundle has been loaded.
    pub bundle: Option<Arc<ModelBundle>>,
    /// `None` when no completion API key is configured.
    pub llm: Option<Arc<dyn ChatCompletion>>,
}

impl AppState {
    pub fn bundle(&self) -> Result<&ModelBundle, AppError> {
        self.bundle.as_deref().ok_or(AppError::ModelNotReady)
    }

    pub fn llm(&self) -> Result<&dyn ChatCompletion, AppError> {
        self.llm.as_deref().ok_or(AppError::LlmNotConfigured)
    }
}
