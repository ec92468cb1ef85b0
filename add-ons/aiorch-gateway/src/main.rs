//! Axum-based gateway: hosts the prompt orchestrator and the sample information APIs.
//! Config-driven via CoreConfig.

mod handlers;

use aiorch_core::{AiMode, ComposerRegistry, CoreConfig, Intent, Orchestrator, ResultEnvelope};
use aiorch_skills::{AgentComposer, OllamaComposer, SampleApiClient};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) orchestrator: Arc<Orchestrator>,
}

/// Wires the provider client and both composers from config.
fn build_orchestrator(config: &CoreConfig) -> Orchestrator {
    let info = Arc::new(SampleApiClient::new(&config.provider));
    let mut registry = ComposerRegistry::new();
    registry.register(
        AiMode::Ollama,
        Arc::new(OllamaComposer::new(config.ollama.clone(), config.language)),
    );
    registry.register(AiMode::Agent, Arc::new(AgentComposer::new(config.language)));
    tracing::info!(target: "aiorch::gateway", modes = ?registry.modes(), "Composers registered");
    Orchestrator::new(info, Arc::new(registry))
}

fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/process", post(handlers::process::process))
        .route("/api/ai/process", post(handlers::process::process))
        .route("/api/sample/weather", get(handlers::sample::weather))
        .route("/api/sample/stock", get(handlers::sample::stock))
        .route("/api/sample/news", get(handlers::sample::news))
        .route("/api/v1/health", get(health))
        .route("/v1/status", get(status))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

/// Turns a handler panic into a 500 carrying a failure envelope.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(target: "aiorch::gateway", %detail, "Request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ResultEnvelope::failure(
            Intent::None.api_name(),
            format!("internal server error: {}", detail),
        )),
    )
        .into_response()
}

/// GET /api/v1/health – liveness check.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /v1/status – app identity and backend settings from config.
async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "app_name": state.config.app_name,
        "port": state.config.port,
        "language": state.config.language,
        "model": state.config.ollama.model,
        "backend_url": state.config.ollama.base_url,
        "provider_url": state.config.provider.base_url,
    }))
}

/// Pre-flight check: config loads, backend answers, port is free.
async fn run_verify() -> Result<(), String> {
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;
    println!("Config loaded: {} (model {})", config.app_name, config.ollama.model);

    print!("Checking Ollama at {}... ", config.ollama.base_url);
    let ollama = OllamaComposer::new(config.ollama.clone(), config.language);
    if ollama.is_available().await {
        println!("OK");
    } else {
        println!("UNREACHABLE");
        return Err(format!(
            "Ollama is not reachable at {}; Ollama mode will fail until it is started",
            config.ollama.base_url
        ));
    }

    let addr = format!("{}:{}", config.host, config.port);
    print!("Checking {}... ", addr);
    match std::net::TcpListener::bind(&addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => return Err(format!("{} BLOCKED: {}", addr, e)),
    }

    println!("\n✅ SUCCESS: All systems GO. Ready to start gateway.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[aiorch-gateway] .env not loaded: {} (using system environment)", e);
    }

    if std::env::args().any(|a| a == "--verify") {
        match run_verify().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("❌ PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(CoreConfig::load()?);
    tracing::info!(
        target: "aiorch::gateway",
        backend = %config.ollama.base_url,
        model = %config.ollama.model,
        provider = %config.provider.base_url,
        "Configuration loaded"
    );

    let orchestrator = Arc::new(build_orchestrator(&config));
    let app = build_app(AppState {
        config: Arc::clone(&config),
        orchestrator,
    });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("{} listening on {}", config.app_name, addr);
    axum::serve(listener, app).await?;
    Ok(())
}
