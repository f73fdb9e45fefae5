//! Local web server for food web visualization.
//!
//! Provides a browser-based single-page UI using Sigma.js (WebGL renderer)
//! and Graphology (graph data structure) with a ForceAtlas2 layout to
//! explore who eats whom in the park.
//!
//! # Module Structure
//!
//! - `handlers` - HTTP route handlers
//! - `models` - API response types (DTOs)
//! - `graph` - FoodWeb to Sigma graph conversion and styling
//! - `templates` - HTML/CSS/JS template rendering

mod graph;
mod handlers;
mod models;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use color_eyre::eyre::Result;
use tower_http::cors::{Any, CorsLayer};

use econet_core::FoodWeb;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state for the server.
pub struct AppState {
    /// The finished food web. Read-only once served.
    pub graph: FoodWeb,
    /// Page title.
    pub title: String,
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Configuration for the visualization server.
pub struct ServeConfig {
    /// Port to listen on.
    pub port: u16,
    /// Whether to open the browser automatically.
    pub open_browser: bool,
    /// Title shown in the page header.
    pub title: String,
}

/// Build the router for a finished graph.
pub fn router(graph: FoodWeb, title: String) -> Router {
    let state = Arc::new(AppState { graph, title });

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/graph", get(handlers::api_graph))
        .route("/api/node/{id}", get(handlers::api_node))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

// =============================================================================
// Server Entry Point
// =============================================================================

/// Serve the visualization until interrupted.
pub async fn start_server(graph: FoodWeb, config: ServeConfig) -> Result<()> {
    let app = router(graph, config.title);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let url = format!("http://localhost:{}", config.port);

    println!("Starting econet visualization server...");
    println!("Food web: {}", url);
    println!("Press Ctrl+C to stop\n");

    if config.open_browser {
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
