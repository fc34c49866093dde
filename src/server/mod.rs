//! HTTP surface
//!
//! - `POST /process` runs one agent loop per request
//! - `GET /ping` liveness probe
//!
//! Handler panics are caught and answered with the generic 500 body, so one
//! failing request never takes the process or the shared index down.

pub mod handlers;
pub mod response;

use crate::agent::ModelRequester;
use crate::config::ServerConfig;
use crate::errors::{AgentError, Result};
use crate::models::ChatClient;
use crate::steamdb::{OllamaEmbedder, SteamDbManager};
use crate::tools::{implementations, ToolsDispatcher};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use std::any::Any;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

/// State shared by every request
pub struct AppContext {
    pub requester: ModelRequester,
}

impl AppContext {
    pub fn new(requester: ModelRequester) -> Self {
        Self { requester }
    }
}

/// Router limits and tracing options
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    pub connection_limit: usize,
    pub debug: bool,
}

impl RouterOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            connection_limit: config.connection_limit,
            debug: config.debug,
        }
    }
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            connection_limit: 64,
            debug: false,
        }
    }
}

/// Build the application router
pub fn router(ctx: Arc<AppContext>, options: RouterOptions) -> Router {
    let level = if options.debug { Level::DEBUG } else { Level::INFO };

    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/process", post(handlers::process))
        .fallback(handlers::not_found)
        .with_state(ctx)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(GlobalConcurrencyLimitLayer::new(options.connection_limit.max(1)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(level))
                .on_response(DefaultOnResponse::new().level(level)),
        )
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "Request handler panicked");
    response::internal_error()
}

/// Load the catalog index, tool catalog and model client
pub async fn build_context(config: &ServerConfig) -> Result<AppContext> {
    let steamdb = Arc::new(load_steamdb(config).await?);

    let tools = implementations::builtin(
        Arc::clone(&steamdb),
        &config.steam_store_url,
        config.request_timeout,
    )?;
    let dispatcher = ToolsDispatcher::from_config(&config.tools_config_path, tools)?;
    info!(tools = ?dispatcher.registry().tool_names(), "Tools dispatcher ready");

    let model = ChatClient::new(
        &config.url,
        &config.model,
        &config.api_token,
        config.request_timeout,
    )?;
    let requester = ModelRequester::new(Arc::new(model), Arc::new(dispatcher))
        .with_max_iterations(config.max_iterations);

    Ok(AppContext::new(requester))
}

/// Load (or build) the embedding index from the configured paths
pub async fn load_steamdb(config: &ServerConfig) -> Result<SteamDbManager> {
    let embedder = OllamaEmbedder::with_config(
        &config.ollama_host,
        &config.index_model_name,
        config.request_timeout,
    )?;
    SteamDbManager::from_config(config, Arc::new(embedder)).await
}

/// Serve until Ctrl-C
pub async fn serve(config: &ServerConfig) -> Result<()> {
    let ctx = Arc::new(build_context(config).await?);
    let app = router(ctx, RouterOptions::from_config(config));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AgentError::ConfigError(format!("Failed to bind {}: {}", addr, e)))?;
    info!(
        addr = %addr,
        threads = config.threads,
        connection_limit = config.connection_limit,
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
