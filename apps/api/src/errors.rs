use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::ml::MlError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Model not ready")]
    ModelNotReady,

    #[error("LLM not configured")]
    LlmNotConfigured,

    /// The completion service failed outright (down, timed out, rate limited).
    #[error("External service failure: {0}")]
    ExternalServiceFailure(LlmError),

    /// The completion service answered, but not in the expected format.
    #[error("Malformed external response: {0}")]
    MalformedExternalResponse(LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        if err.is_malformed() {
            AppError::MalformedExternalResponse(err)
        } else {
            AppError::ExternalServiceFailure(err)
        }
    }
}

impl From<MlError> for AppError {
    fn from(err: MlError) -> Self {
        match err {
            MlError::UnknownCategory { .. } | MlError::UnknownRole(_) | MlError::UnknownLabel(_) => {
                AppError::Validation(err.to_string())
            }
            other => AppError::Internal(other.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ModelNotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "MODEL_NOT_READY",
                "Models are not loaded. Please train models first.".to_string(),
            ),
            AppError::LlmNotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "LLM_NOT_CONFIGURED",
                "OpenRouter API is not configured. Please set OPENROUTER_API_KEY.".to_string(),
            ),
            AppError::ExternalServiceFailure(e) => {
                tracing::error!("LLM error: {e}");
                match e {
                    LlmError::Timeout(_) => (
                        StatusCode::GATEWAY_TIMEOUT,
                        "LLM_TIMEOUT",
                        "The AI service is taking too long to respond.".to_string(),
                    ),
                    LlmError::RateLimited { .. } => (
                        StatusCode::TOO_MANY_REQUESTS,
                        "LLM_RATE_LIMITED",
                        "API rate limit exceeded. Please wait a moment and try again.".to_string(),
                    ),
                    LlmError::Unauthorized => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "LLM_UNAUTHORIZED",
                        "OpenRouter API key is invalid.".to_string(),
                    ),
                    _ => (
                        StatusCode::BAD_GATEWAY,
                        "LLM_ERROR",
                        "The AI service failed. Please try again.".to_string(),
                    ),
                }
            }
            AppError::MalformedExternalResponse(e) => {
                tracing::error!("Malformed LLM response: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_MALFORMED_RESPONSE",
                    "The AI service returned an unusable response. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::ModelNotReady, StatusCode::SERVICE_UNAVAILABLE),
            (AppError::LlmNotConfigured, StatusCode::SERVICE_UNAVAILABLE),
            (
                LlmError::Timeout(Duration::from_secs(60)).into(),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                LlmError::RateLimited { retries: 3 }.into(),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (LlmError::EmptyContent.into(), StatusCode::BAD_GATEWAY),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_malformed_is_distinct_from_failure() {
        assert!(matches!(
            AppError::from(LlmError::Malformed("x".into())),
            AppError::MalformedExternalResponse(_)
        ));
        assert!(matches!(
            AppError::from(LlmError::Unauthorized),
            AppError::ExternalServiceFailure(_)
        ));
    }

    #[test]
    fn test_unknown_category_is_a_validation_error() {
        let err = AppError::from(MlError::UnknownCategory {
            field: "education".into(),
            value: "PhD".into(),
        });
        assert!(matches!(err, AppError::Validation(_)));
        let err = AppError::from(MlError::NotFitted("career classifier"));
        assert!(matches!(err, AppError::Internal(_)));
    }
}
