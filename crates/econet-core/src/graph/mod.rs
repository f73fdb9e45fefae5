//! The food web graph.
//!
//! Nodes are species keyed by canonical identifier, edges point from
//! predator to prey. There is at most one edge per ordered pair; adding an
//! existing edge replaces its attributes. Nodes and edges keep insertion
//! order, so two builds over the same inputs produce the same serialization.
//!
//! # Components
//!
//! - [`FoodWeb`] - the graph value handed to renderers
//! - [`GraphBuilder`] - runs lookups for a subject list and fills a `FoodWeb`
//! - [`BuildSummary`] - what was skipped or unavailable during a build

mod builder;

pub use builder::{BuildSummary, GraphBuilder};

use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::metadata::SpeciesMetadata;

/// Graph mutation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    MissingNode(String),
}

/// A species in the food web.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeciesNode {
    /// Canonical species identifier.
    pub id: String,
    /// Common name if one is known, else the identifier.
    pub label: String,
    /// Iconic taxon, or `"unknown"`.
    pub category: String,
    /// Rendering size hint; the node's out-degree.
    pub degree_hint: u32,
}

impl SpeciesNode {
    /// Node decorated from resolved metadata.
    pub fn from_metadata(id: impl Into<String>, metadata: &SpeciesMetadata) -> Self {
        let id = id.into();
        Self {
            label: metadata.label_for(&id),
            category: metadata.category_or_unknown(),
            degree_hint: 0,
            id,
        }
    }

    /// Undecorated node.
    pub fn bare(id: impl Into<String>) -> Self {
        Self::from_metadata(id, &SpeciesMetadata::default())
    }
}

/// "predator eats prey".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredationEdge {
    pub predator: String,
    pub prey: String,
    /// Human-readable title built from both endpoint labels.
    pub description: String,
}

/// Directed predator → prey graph.
#[derive(Debug, Clone, Default)]
pub struct FoodWeb {
    nodes: IndexMap<String, SpeciesNode>,
    edges: IndexMap<(String, String), PredationEdge>,
}

impl FoodWeb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node unless one with the same id exists. Returns true if
    /// inserted.
    pub fn add_node(&mut self, node: SpeciesNode) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        self.nodes.insert(node.id.clone(), node);
        true
    }

    /// Add or replace the edge `predator → prey`.
    ///
    /// Both endpoints must already be nodes. Returns true if the edge is new.
    pub fn add_edge(&mut self, predator: &str, prey: &str) -> Result<bool, GraphError> {
        let predator_label = &self
            .nodes
            .get(predator)
            .ok_or_else(|| GraphError::MissingNode(predator.to_string()))?
            .label;
        let prey_label = &self
            .nodes
            .get(prey)
            .ok_or_else(|| GraphError::MissingNode(prey.to_string()))?
            .label;

        let edge = PredationEdge {
            predator: predator.to_string(),
            prey: prey.to_string(),
            description: format!("{} eats {}", predator_label, prey_label),
        };
        let previous = self
            .edges
            .insert((predator.to_string(), prey.to_string()), edge);
        Ok(previous.is_none())
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn contains_edge(&self, predator: &str, prey: &str) -> bool {
        self.edge(predator, prey).is_some()
    }

    pub fn node(&self, id: &str) -> Option<&SpeciesNode> {
        self.nodes.get(id)
    }

    pub fn edge(&self, predator: &str, prey: &str) -> Option<&PredationEdge> {
        self.edges.get(&(predator.to_string(), prey.to_string()))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SpeciesNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &PredationEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// What `id` eats.
    pub fn prey_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .values()
            .filter(move |e| e.predator == id)
            .map(|e| e.prey.as_str())
    }

    /// What eats `id`.
    pub fn predators_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .values()
            .filter(move |e| e.prey == id)
            .map(|e| e.predator.as_str())
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.prey_of(id).count()
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.predators_of(id).count()
    }

    /// Set a node's size hint from its current out-degree.
    pub fn refresh_degree_hint(&mut self, id: &str) {
        let degree = u32::try_from(self.out_degree(id)).unwrap_or(u32::MAX);
        if let Some(node) = self.nodes.get_mut(id) {
            node.degree_hint = degree;
        }
    }

    /// Refresh every node's size hint.
    pub fn refresh_degree_hints(&mut self) {
        let ids: Vec<String> = self.nodes.keys().cloned().collect();
        for id in ids {
            self.refresh_degree_hint(&id);
        }
    }
}

impl Serialize for FoodWeb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes: Vec<&SpeciesNode> = self.nodes.values().collect();
        let edges: Vec<&PredationEdge> = self.edges.values().collect();

        let mut state = serializer.serialize_struct("FoodWeb", 2)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &edges)?;
        state.end()
    }
}
