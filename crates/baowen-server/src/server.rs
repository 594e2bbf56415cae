//! HTTP server for baowen

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use baowen_core::{AppConfig, Generator};

use crate::routes;

/// Application state shared across handlers
pub struct AppState {
    pub generator: Generator,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            generator: Generator::new(config),
        }
    }
}

/// Run the HTTP server
pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let state = Arc::new(AppState::new(&config));

    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
