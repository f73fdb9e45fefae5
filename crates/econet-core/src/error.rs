use thiserror::Error;

use crate::config::ConfigError;
use crate::interactions::LookupError;
use crate::metadata::MetadataError;
use crate::roster::RosterError;

/// Errors that stop a run before any graph is built.
///
/// Failures of individual lookups during a build never surface here; they
/// degrade the graph instead.
#[derive(Debug, Error)]
pub enum EconetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load roster: {0}")]
    Roster(#[from] RosterError),

    #[error("Failed to set up interaction client: {0}")]
    Interactions(#[from] LookupError),

    #[error("Failed to set up metadata client: {0}")]
    Metadata(#[from] MetadataError),
}
