#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use skillence::config::{Config, TrainingConfig, DEFAULT_OPENROUTER_MODEL};
use skillence::inference::ModelBundle;
use skillence::llm_client::ChatCompletion;
use skillence::state::AppState;

pub fn training_config(dir: &Path) -> TrainingConfig {
    TrainingConfig {
        rust_log: "info".to_string(),
        train_data_path: dir.join("career_train.csv"),
        test_data_path: dir.join("career_test.csv"),
        models_dir: dir.join("models"),
        random_seed: 42,
        forest_trees: 20,
        tfidf_max_features: 500,
    }
}

pub fn service_config(models_dir: &Path) -> Config {
    Config {
        port: 0,
        rust_log: "info".to_string(),
        models_dir: models_dir.to_path_buf(),
        openrouter_api_key: None,
        openrouter_model: DEFAULT_OPENROUTER_MODEL.to_string(),
        llm_timeout_secs: 5,
    }
}

pub fn state(
    models_dir: &Path,
    bundle: Option<ModelBundle>,
    llm: Option<Arc<dyn ChatCompletion>>,
) -> AppState {
    AppState {
        config: service_config(models_dir),
        bundle: bundle.map(Arc::new),
        llm,
    }
}
