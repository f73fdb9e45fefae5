pub mod config;
pub mod error;
pub mod graph;
pub mod interactions;
pub mod metadata;
pub mod pipeline;
pub mod roster;
pub mod species;

#[cfg(test)]
mod test_support;

pub use config::{Config, ConfigError, GraphConfig, InteractionsConfig, MetadataConfig, RosterConfig};
pub use error::EconetError;
pub use graph::{BuildSummary, FoodWeb, GraphBuilder, PredationEdge, SpeciesNode};
pub use interactions::{GlobiClient, InteractionSource, LookupError, SubjectFilter};
pub use metadata::{Credential, INaturalistClient, MetadataError, MetadataSource, NoMetadata, SpeciesMetadata};
pub use pipeline::Pipeline;
pub use roster::{Roster, RosterError};
pub use species::normalize;
