//! Web server for the launch dashboard
//!
//! Provides an HTTP server using Axum to serve the dashboard UI
//! and JSON API endpoints.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::dataset::LaunchDataset;
use crate::session::SessionRegistry;
use crate::view::DashboardLayout;

use super::routes;

/// Shared application state
///
/// The dataset and layout are read-only after startup; sessions carry the
/// only mutable state.
pub struct AppState {
    pub dataset: LaunchDataset,
    pub layout: DashboardLayout,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(dataset: LaunchDataset, layout: DashboardLayout, max_sessions: usize) -> Self {
        Self {
            dataset,
            layout,
            sessions: SessionRegistry::new(max_sessions),
        }
    }
}

/// Configuration for the web server
pub struct ServerConfig {
    pub port: u16,
    pub open_browser: bool,
    pub allow_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8050,
            open_browser: true,
            allow_cors: false,
        }
    }
}

/// Build the router for the given state
pub fn router(state: Arc<AppState>, allow_cors: bool) -> Router {
    let app = Router::new()
        .merge(routes::api_routes())
        .merge(routes::static_routes())
        .with_state(state);

    if allow_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Start the web server and serve the dashboard
pub async fn start_server(
    state: AppState,
    config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(Arc::new(state), config.allow_cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;

    let url = format!("http://localhost:{}", config.port);
    info!("Dashboard running at {}", url);

    if config.open_browser {
        info!("Opening browser...");
        if let Err(e) = open::that(&url) {
            warn!("Could not open browser: {}", e);
            warn!("Please open {} manually", url);
        }
    }

    eprintln!("Press Ctrl+C to stop the server");

    axum::serve(listener, app).await?;

    Ok(())
}
