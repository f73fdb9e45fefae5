//! API response models for the graph visualization server.
//!
//! These are Data Transfer Objects (DTOs) that define the shape of
//! JSON responses sent to the frontend.

use serde::Serialize;

// =============================================================================
// Graph Data Models (for Sigma.js/Graphology)
// =============================================================================

/// Full graph data response for `/api/graph`.
#[derive(Debug, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// A node in the graph visualization.
#[derive(Debug, Serialize)]
pub struct GraphNode {
    /// Canonical species identifier.
    pub key: String,
    /// Visual and metadata attributes.
    pub attributes: NodeAttributes,
}

/// Node attributes for rendering and display.
#[derive(Debug, Serialize)]
pub struct NodeAttributes {
    /// Display label (common name or identifier).
    pub label: String,
    /// Iconic taxon name, or "unknown".
    pub category: String,
    /// Hex color for rendering.
    pub color: String,
    /// Node size in pixels.
    pub size: u32,
}

/// A predation edge in the graph visualization.
#[derive(Debug, Serialize)]
pub struct GraphEdge {
    /// Predator node key.
    pub source: String,
    /// Prey node key.
    pub target: String,
    pub attributes: EdgeAttributes,
}

/// Edge attributes for rendering.
#[derive(Debug, Serialize)]
pub struct EdgeAttributes {
    /// "X eats Y".
    pub description: String,
}

// =============================================================================
// Node Details Model (for `/api/node/{id}`)
// =============================================================================

/// Detailed information about a single species.
#[derive(Debug, Serialize)]
pub struct NodeDetails {
    pub key: String,
    pub label: String,
    pub category: String,
    /// Species this one eats (keys).
    pub prey: Vec<String>,
    /// Species that eat this one (keys).
    pub predators: Vec<String>,
}
