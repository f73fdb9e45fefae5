//! Conversion from [`FoodWeb`] to the graph format expected by
//! Sigma.js/Graphology.

use econet_core::{FoodWeb, SpeciesNode};

use super::models::{EdgeAttributes, GraphData, GraphEdge, GraphNode, NodeAttributes, NodeDetails};

// =============================================================================
// Node Styling
// =============================================================================

/// Get the hex color for an iconic taxon.
fn get_category_color(category: &str) -> &'static str {
    match category {
        "Mammalia" => "#cf222e",                  // Red
        "Aves" => "#0969da",                      // Blue
        "Reptilia" | "Amphibia" => "#9a6700",     // Yellow/Orange
        "Actinopterygii" => "#1b7c83",            // Teal
        "Insecta" | "Arachnida" => "#8250df",     // Purple
        "Mollusca" | "Animalia" => "#bf3989",     // Pink
        "Plantae" => "#1a7f37",                   // Green
        "Fungi" | "Chromista" | "Protozoa" => "#953800", // Brown
        _ => "#57606a",                           // Gray (unknown)
    }
}

const BASE_SIZE: u32 = 6;
const SIZE_PER_PREY: u32 = 2;
const MAX_SIZE: u32 = 30;

/// Pixel size from the node's degree hint.
fn node_size(degree_hint: u32) -> u32 {
    BASE_SIZE
        .saturating_add(degree_hint.saturating_mul(SIZE_PER_PREY))
        .min(MAX_SIZE)
}

// =============================================================================
// Conversion
// =============================================================================

fn to_graph_node(node: &SpeciesNode) -> GraphNode {
    GraphNode {
        key: node.id.clone(),
        attributes: NodeAttributes {
            label: node.label.clone(),
            category: node.category.clone(),
            color: get_category_color(&node.category).to_string(),
            size: node_size(node.degree_hint),
        },
    }
}

/// Convert a food web for `/api/graph`.
pub fn to_graph_data(web: &FoodWeb) -> GraphData {
    GraphData {
        nodes: web.nodes().map(to_graph_node).collect(),
        edges: web
            .edges()
            .map(|e| GraphEdge {
                source: e.predator.clone(),
                target: e.prey.clone(),
                attributes: EdgeAttributes {
                    description: e.description.clone(),
                },
            })
            .collect(),
    }
}

/// Details for one species, or `None` if it is not in the graph.
pub fn node_details(web: &FoodWeb, id: &str) -> Option<NodeDetails> {
    let node = web.node(id)?;
    Some(NodeDetails {
        key: node.id.clone(),
        label: node.label.clone(),
        category: node.category.clone(),
        prey: web.prey_of(id).map(str::to_string).collect(),
        predators: web.predators_of(id).map(str::to_string).collect(),
    })
}
