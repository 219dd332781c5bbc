//! Batch training entry point. Reads the train/test CSVs, fits every model,
//! and publishes a new bundle under `MODELS_DIR`.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skillence::config::{default_log_filter, TrainingConfig};
use skillence::training::pipeline;

fn main() -> Result<()> {
    let config = TrainingConfig::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(default_log_filter(&config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        train = %config.train_data_path.display(),
        test = %config.test_data_path.display(),
        models_dir = %config.models_dir.display(),
        "Starting training run"
    );

    let report = pipeline::run(&config).context("training run failed")?;

    info!(
        bundle_id = %report.bundle_id,
        career_test_accuracy = report.career.test.accuracy,
        skills_test_exact_match = report.skills.test.exact_match_accuracy,
        "Training complete"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to render training report")?
    );
    Ok(())
}
