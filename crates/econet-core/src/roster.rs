//! The park species roster.
//!
//! The roster is the closed universe of species a food web may mention. It is
//! loaded once per run from the park's CSV export; a run cannot proceed
//! without it.

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::RosterConfig;
use crate::species::normalize;

/// Errors that can occur while loading the roster.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed roster CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Roster contains no species")]
    Empty,
}

/// Ordered, deduplicated set of canonical species identifiers.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    species: Vec<String>,
    index: HashSet<String>,
}

impl Roster {
    /// Build a roster from raw names. Names are normalized; empties and
    /// repeats are dropped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::default();
        for name in names {
            roster.insert(name.as_ref());
        }
        roster
    }

    /// Load a roster from the file named in `config`.
    pub fn load(config: &RosterConfig) -> Result<Self, RosterError> {
        Self::from_path(&config.path, config)
    }

    /// Load a roster from a CSV file.
    pub fn from_path(path: impl AsRef<Path>, config: &RosterConfig) -> Result<Self, RosterError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let roster = Self::from_reader(file, config)?;
        tracing::info!(path = %path.display(), species = roster.len(), "loaded roster");
        Ok(roster)
    }

    /// Parse roster CSV from any reader.
    ///
    /// The first `header_rows` records are skipped, as are records too short
    /// to have a name column. Fails with [`RosterError::Empty`] if nothing
    /// usable remains.
    pub fn from_reader<R: Read>(reader: R, config: &RosterConfig) -> Result<Self, RosterError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut roster = Self::default();
        for record in csv_reader.records().skip(config.header_rows) {
            let record = record?;
            match record.get(config.name_column) {
                Some(name) => roster.insert(name),
                None => tracing::debug!(fields = record.len(), "skipping short roster row"),
            }
        }

        if roster.is_empty() {
            return Err(RosterError::Empty);
        }
        Ok(roster)
    }

    fn insert(&mut self, raw: &str) {
        let id = normalize(raw);
        if !id.is_empty() && self.index.insert(id.clone()) {
            self.species.push(id);
        }
    }

    /// Returns true if the canonical form of `species` is on the roster.
    pub fn contains(&self, species: &str) -> bool {
        self.index.contains(species) || self.index.contains(&normalize(species))
    }

    /// Species in roster order.
    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.species.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}
