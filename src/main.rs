use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use coworking::config::AppConfig;
use coworking::db;
use coworking::db::store::SqliteStore;
use coworking::handlers;
use coworking::services::ai::gemini::GeminiProvider;
use coworking::services::ai::offline::OfflineProvider;
use coworking::services::ai::ollama::OllamaProvider;
use coworking::services::ai::{GenerationService, Interpreter};
use coworking::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let db = Arc::new(Mutex::new(conn));

    let generator: Arc<dyn GenerationService> = match config.llm_provider.as_str() {
        "gemini" => {
            anyhow::ensure!(
                !config.gemini_api_key.is_empty(),
                "GEMINI_API_KEY must be set when LLM_PROVIDER=gemini"
            );
            tracing::info!("using Gemini generation provider (model: {})", config.gemini_model);
            Arc::new(GeminiProvider::new(config.gemini_api_key.clone()))
        }
        "ollama" => {
            tracing::info!(
                "using Ollama generation provider (url: {}, model: {})",
                config.ollama_url,
                config.ollama_model
            );
            Arc::new(OllamaProvider::new(config.ollama_url.clone()))
        }
        other => {
            tracing::warn!(provider = other, "no generation provider, using keyword heuristics only");
            Arc::new(OfflineProvider)
        }
    };

    let interpreter =
        Interpreter::new(generator, config.model_id()).with_timeout(config.llm_timeout);
    let store = Arc::new(SqliteStore::new(db.clone()));

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        interpreter,
        catalog: store.clone(),
        bookings: store,
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
