//! Biotic interaction lookups.
//!
//! An [`InteractionSource`] answers two questions about a species: what does
//! it eat, and what eats it. The production implementation is
//! [`GlobiClient`]; tests substitute in-memory sources.
//!
//! Raw API rows are `(subject, interaction type, objects)` triples. They are
//! parsed into [`InteractionRecord`]s, filtered against the consumes
//! vocabulary for the direction being asked, and flattened into canonical
//! species identifiers.

mod error;
mod globi;

pub use error::LookupError;
pub use globi::{parse_response, GlobiClient, InteractionRecord};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::species::{names_match, normalize};

/// Interaction vocabulary understood by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationType {
    Eats,
    PreysOn,
    EatenBy,
    PreyedUponBy,
    /// Any other interaction (pollinates, parasiteOf, ...). Never consumed.
    Other(String),
}

impl RelationType {
    /// Parse an API interaction type name.
    pub fn parse(name: &str) -> Self {
        match name {
            "eats" => RelationType::Eats,
            "preysOn" => RelationType::PreysOn,
            "eatenBy" => RelationType::EatenBy,
            "preyedUponBy" => RelationType::PreyedUponBy,
            other => RelationType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RelationType::Eats => "eats",
            RelationType::PreysOn => "preysOn",
            RelationType::EatenBy => "eatenBy",
            RelationType::PreyedUponBy => "preyedUponBy",
            RelationType::Other(name) => name,
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the predation relation a lookup asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// What the species eats (`/eats`).
    Prey,
    /// What eats the species (`/preyedUponBy`).
    Predators,
}

impl Direction {
    /// Path segment for the interaction endpoint.
    pub fn endpoint(self) -> &'static str {
        match self {
            Direction::Prey => "eats",
            Direction::Predators => "preyedUponBy",
        }
    }

    /// The (unconditional, subject-checked) vocabulary pair for this direction.
    fn vocabulary(self) -> (RelationType, RelationType) {
        match self {
            Direction::Prey => (RelationType::Eats, RelationType::PreysOn),
            Direction::Predators => (RelationType::EatenBy, RelationType::PreyedUponBy),
        }
    }
}

/// How record subjects are checked against the queried species.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectFilter {
    /// Both vocabulary terms require the record subject to be the queried
    /// species.
    #[default]
    Strict,
    /// `eats`/`eatenBy` records are accepted whatever their subject; only
    /// `preysOn`/`preyedUponBy` records are subject-checked. Reproduces the
    /// historical behavior of the park graph scripts.
    Legacy,
}

impl SubjectFilter {
    /// Decide whether a record answers the lookup for `species`.
    pub fn accepts(self, record: &InteractionRecord, species: &str, direction: Direction) -> bool {
        let (primary, secondary) = direction.vocabulary();
        let subject_matches = names_match(&record.subject, species);
        match self {
            SubjectFilter::Strict => {
                (record.interaction == primary || record.interaction == secondary)
                    && subject_matches
            }
            SubjectFilter::Legacy => {
                record.interaction == primary
                    || (record.interaction == secondary && subject_matches)
            }
        }
    }
}

/// Filter records for `species` and flatten their objects into canonical
/// identifiers. Duplicates are kept.
pub fn select_objects(
    records: &[InteractionRecord],
    species: &str,
    direction: Direction,
    filter: SubjectFilter,
) -> Vec<String> {
    records
        .iter()
        .filter(|r| filter.accepts(r, species, direction))
        .flat_map(|r| r.objects.iter().map(|o| normalize(o)))
        .filter(|o| !o.is_empty())
        .collect()
}

/// Source of predator/prey relations.
///
/// Both operations return canonical species identifiers. An `Err` is the
/// "unavailable" signal; an empty `Ok` means the source knows of no
/// relations.
#[async_trait]
pub trait InteractionSource: Send + Sync {
    /// Species the given species eats.
    async fn fetch_prey(&self, species: &str) -> Result<Vec<String>, LookupError>;

    /// Species that eat the given species.
    async fn fetch_predators(&self, species: &str) -> Result<Vec<String>, LookupError>;
}

#[async_trait]
impl<T: InteractionSource + ?Sized> InteractionSource for Box<T> {
    async fn fetch_prey(&self, species: &str) -> Result<Vec<String>, LookupError> {
        (**self).fetch_prey(species).await
    }

    async fn fetch_predators(&self, species: &str) -> Result<Vec<String>, LookupError> {
        (**self).fetch_predators(species).await
    }
}
