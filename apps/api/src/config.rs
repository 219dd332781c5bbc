use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::ml::forest::ForestParams;
use crate::ml::text::TfidfParams;
use crate::training::pipeline::PipelineParams;

pub const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-4o-mini";

/// Tracing targets of the library and both binaries.
pub const LOG_TARGETS: [&str; 3] = ["skillence", "api", "train"];

/// Fallback `EnvFilter` directive when `RUST_LOG` is unset.
pub fn default_log_filter(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub models_dir: PathBuf,
    /// Absent key disables the chat and roadmap endpoints.
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub llm_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", 8000).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            models_dir: PathBuf::from(
                std::env::var("MODELS_DIR").unwrap_or_else(|_| "models".to_string()),
            ),
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            openrouter_model: std::env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_MODEL.to_string()),
            llm_timeout_secs: env_or("LLM_TIMEOUT_SECS", 60)
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
        })
    }
}

/// Training-run configuration.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub rust_log: String,
    pub train_data_path: PathBuf,
    pub test_data_path: PathBuf,
    pub models_dir: PathBuf,
    pub random_seed: u64,
    pub forest_trees: usize,
    pub tfidf_max_features: usize,
}

impl TrainingConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(TrainingConfig {
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            train_data_path: env_path("TRAIN_DATA_PATH", "data/career_train.csv"),
            test_data_path: env_path("TEST_DATA_PATH", "data/career_test.csv"),
            models_dir: env_path("MODELS_DIR", "models"),
            random_seed: env_or("RANDOM_SEED", 42).context("RANDOM_SEED must be an integer")?,
            forest_trees: env_or("FOREST_TREES", 200).context("FOREST_TREES must be an integer")?,
            tfidf_max_features: env_or("TFIDF_MAX_FEATURES", 500)
                .context("TFIDF_MAX_FEATURES must be an integer")?,
        })
    }

    pub fn pipeline_params(&self) -> PipelineParams {
        PipelineParams {
            forest: ForestParams {
                n_estimators: self.forest_trees,
                seed: self.random_seed,
                ..ForestParams::default()
            },
            tfidf: TfidfParams {
                max_features: Some(self.tfidf_max_features),
                ..TfidfParams::default()
            },
            ..PipelineParams::default()
        }
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    PathBuf::from(std::env::var(key).unwrap_or_else(|_| default.to_string()))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value '{raw}' for {key}")),
        Err(_) => Ok(default),
    }
}
