//! HTTP route handlers for the visualization server.
//!
//! Handlers are kept thin, delegating to the `graph` module.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};

use super::graph::{node_details, to_graph_data};
use super::models::{GraphData, NodeDetails};
use super::templates;
use super::AppState;

/// GET `/` - Main page with Sigma.js graph visualization.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(templates::render_graph_page(&state.title))
}

/// GET `/api/graph` - Returns the food web for Sigma.js/Graphology.
///
/// Response format:
/// ```json
/// {
///   "nodes": [{"key": "canis lupus", "attributes": {...}}],
///   "edges": [{"source": "canis lupus", "target": "odocoileus hemionus", "attributes": {...}}]
/// }
/// ```
pub async fn api_graph(State(state): State<Arc<AppState>>) -> Json<GraphData> {
    Json(to_graph_data(&state.graph))
}

/// GET `/api/node/{id}` - Prey and predators of one species.
pub async fn api_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<Option<NodeDetails>> {
    Json(node_details(&state.graph, &id))
}
