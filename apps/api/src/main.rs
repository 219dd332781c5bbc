use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skillence::artifacts::ArtifactStore;
use skillence::config::{default_log_filter, Config};
use skillence::llm_client::{ChatCompletion, OpenRouterClient};
use skillence::routes::build_router;
use skillence::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(default_log_filter(&config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skillence API v{}", env!("CARGO_PKG_VERSION"));

    // A missing or partial bundle is not fatal: ML endpoints answer 503 until
    // the next restart after a successful training run.
    let store = ArtifactStore::new(&config.models_dir);
    let bundle = match store.load() {
        Ok(bundle) => {
            info!(
                bundle_id = %bundle.manifest().bundle_id,
                trained_at = %bundle.manifest().trained_at,
                "Model bundle loaded"
            );
            Some(Arc::new(bundle))
        }
        Err(e) => {
            warn!(error = %e, dir = %store.root().display(), "No usable model bundle; ML endpoints disabled");
            None
        }
    };

    let llm: Option<Arc<dyn ChatCompletion>> = match &config.openrouter_api_key {
        Some(key) => {
            let client = OpenRouterClient::new(
                key.clone(),
                config.openrouter_model.clone(),
                Duration::from_secs(config.llm_timeout_secs),
            )?;
            info!("LLM client initialized (model: {})", client.model());
            let client: Arc<dyn ChatCompletion> = Arc::new(client);
            Some(client)
        }
        None => {
            warn!("OPENROUTER_API_KEY not set; advisor endpoints disabled");
            None
        }
    };

    let state = AppState {
        config: config.clone(),
        bundle,
        llm,
    };
    let app = build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
