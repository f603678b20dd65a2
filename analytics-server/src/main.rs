//! pNode Analytics Server
//!
//! REST backend over the synthetic pNode history.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PNODE ANALYTICS                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────┐  ┌──────────────────────┐ │
//! │  │  API      │  │  Input       │  │  Chat Agent          │ │
//! │  │  (Axum)   │  │  Validator   │  │  (Groq / offline)    │ │
//! │  └─────┬─────┘  └──────┬───────┘  └──────────┬───────────┘ │
//! │        └───────────────┼─────────────────────┘             │
//! │                        ▼                                    │
//! │       ┌────────────────────────────────────┐               │
//! │       │ ServiceContext (dataset + models)  │               │
//! │       └────────────────────────────────────┘               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;
mod state;


use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
    services::{ServeDir, ServeFile},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};
pub use state::{AppState, ServiceContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "pnode_analytics_server=debug,pnode_analytics_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env().context("Invalid configuration")?;
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        "{} v{} starting...",
        pnode_analytics_core::constants::APP_NAME,
        pnode_analytics_core::constants::APP_VERSION
    );

    let context = ServiceContext::initialize(&config).await;
    let app = create_router(AppState::new(context), &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Create the main router with all routes
fn create_router(state: AppState, config: &config::Config) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict/rewards", post(handlers::predict::rewards))
        .route("/analyze/anomalies", post(handlers::analyze::anomalies))
        .route("/chat", post(handlers::chat::ask));

    // Frontend build, only when explicitly configured (validated at startup)
    let api = match &config.static_dir {
        Some(dir) => {
            tracing::info!("Serving static assets from {}", dir.display());
            let index = ServeFile::new(dir.join("index.html"));
            api.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => {
            tracing::info!("STATIC_DIR not set, no static assets served");
            api
        }
    };

    api
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
