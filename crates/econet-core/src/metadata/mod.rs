//! Species decoration: common names and taxonomic category.
//!
//! Metadata is cosmetic. A [`MetadataSource`] never fails from the caller's
//! point of view; when the service is unreachable, rate limited, or knows
//! nothing about a species, the caller gets [`SpeciesMetadata::default`] and
//! the node falls back to its canonical identifier.

mod credential;
mod inaturalist;
mod throttle;

pub use credential::{Credential, EnvToken, StaticToken, TokenSource};
pub use inaturalist::{parse_taxa_response, INaturalistClient};
pub use throttle::Throttle;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::UNKNOWN_CATEGORY;

/// Errors from the taxonomy service. Logged, then degraded to empty metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Missing credential: set {0}")]
    MissingCredential(String),

    #[error("Unauthorized after credential refresh")]
    Unauthorized,

    #[error("Rate limited by taxonomy service")]
    RateLimited,

    #[error("API returned status {status}")]
    Status { status: u16 },

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for MetadataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MetadataError::Timeout
        } else if err.is_decode() {
            MetadataError::ParseError(err.to_string())
        } else {
            MetadataError::Network(err.to_string())
        }
    }
}

/// Descriptive attributes of a species.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesMetadata {
    /// Preferred common names, best first.
    pub common_names: Vec<String>,
    /// Iconic taxon (Mammalia, Aves, Plantae, ...), if known.
    pub category: Option<String>,
}

impl SpeciesMetadata {
    /// Display label: the first common name, else the canonical identifier.
    pub fn label_for(&self, species: &str) -> String {
        self.common_names
            .iter()
            .find(|n| !n.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| species.to_string())
    }

    /// Category, or `"unknown"`.
    pub fn category_or_unknown(&self) -> String {
        self.category
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.common_names.is_empty() && self.category.is_none()
    }
}

/// Source of species decoration.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Best-effort metadata for a canonical species identifier.
    async fn resolve(&self, species: &str) -> SpeciesMetadata;
}

#[async_trait]
impl<T: MetadataSource + ?Sized> MetadataSource for Box<T> {
    async fn resolve(&self, species: &str) -> SpeciesMetadata {
        (**self).resolve(species).await
    }
}

/// Metadata source that knows nothing. Used when decoration is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

#[async_trait]
impl MetadataSource for NoMetadata {
    async fn resolve(&self, _species: &str) -> SpeciesMetadata {
        SpeciesMetadata::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_prefers_common_name() {
        let meta = SpeciesMetadata {
            common_names: vec!["Gray Wolf".to_string(), "Timber Wolf".to_string()],
            category: Some("Mammalia".to_string()),
        };
        assert_eq!(meta.label_for("canis lupus"), "Gray Wolf");
        assert_eq!(meta.category_or_unknown(), "Mammalia");
    }

    #[test]
    fn test_label_falls_back_to_identifier() {
        let meta = SpeciesMetadata::default();
        assert_eq!(meta.label_for("canis lupus"), "canis lupus");
        assert_eq!(meta.category_or_unknown(), UNKNOWN_CATEGORY);
        assert!(meta.is_empty());
    }

    #[test]
    fn test_blank_names_are_skipped() {
        let meta = SpeciesMetadata {
            common_names: vec!["  ".to_string()],
            category: Some(String::new()),
        };
        assert_eq!(meta.label_for("lynx rufus"), "lynx rufus");
        assert_eq!(meta.category_or_unknown(), UNKNOWN_CATEGORY);
    }

    #[tokio::test]
    async fn test_no_metadata() {
        assert!(NoMetadata.resolve("canis lupus").await.is_empty());
    }
}
