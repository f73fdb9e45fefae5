//! Wires configuration, roster, and clients into one build.

use crate::config::Config;
use crate::error::EconetError;
use crate::graph::{BuildSummary, FoodWeb, GraphBuilder};
use crate::interactions::{GlobiClient, InteractionSource};
use crate::metadata::{INaturalistClient, MetadataSource, NoMetadata};
use crate::roster::Roster;
use crate::species::normalize_all;

/// Everything a run needs, set up from a [`Config`].
pub struct Pipeline {
    roster: Roster,
    interactions: Box<dyn InteractionSource>,
    metadata: Box<dyn MetadataSource>,
    subjects: Vec<String>,
    include_predators: bool,
}

impl Pipeline {
    /// Validate the config, load the roster, and construct the HTTP clients.
    ///
    /// Roster failures are fatal here, before any request is made.
    pub fn from_config(config: &Config) -> Result<Self, EconetError> {
        config.validate()?;

        let roster = Roster::load(&config.roster)?;
        let interactions = GlobiClient::from_config(&config.interactions)?;
        let metadata: Box<dyn MetadataSource> = if config.metadata.enabled {
            Box::new(INaturalistClient::from_config(&config.metadata)?)
        } else {
            Box::new(NoMetadata)
        };

        Ok(Self::with_sources(roster, Box::new(interactions), metadata)
            .with_subjects(config.graph.subjects.clone())
            .include_predators(config.graph.include_predators))
    }

    /// Assemble a pipeline from explicit parts.
    pub fn with_sources(
        roster: Roster,
        interactions: Box<dyn InteractionSource>,
        metadata: Box<dyn MetadataSource>,
    ) -> Self {
        Self {
            roster,
            interactions,
            metadata,
            subjects: Vec::new(),
            include_predators: false,
        }
    }

    /// Species to expand. Empty means the whole roster.
    pub fn with_subjects(mut self, subjects: Vec<String>) -> Self {
        self.subjects = subjects;
        self
    }

    pub fn include_predators(mut self, include: bool) -> Self {
        self.include_predators = include;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    /// Number of subjects a run will visit, after normalization and dedupe.
    pub fn subject_count(&self) -> usize {
        if self.subjects.is_empty() {
            self.roster.len()
        } else {
            normalize_all(&self.subjects).len()
        }
    }

    /// Run the build.
    pub async fn run(&self) -> (FoodWeb, BuildSummary) {
        self.run_with_progress(|_, _, _| {}).await
    }

    /// Run the build, reporting each subject before it is expanded.
    pub async fn run_with_progress<'a>(
        &'a self,
        progress: impl Fn(usize, usize, &str) + Send + Sync + 'a,
    ) -> (FoodWeb, BuildSummary) {
        GraphBuilder::new(&self.roster, self.interactions.as_ref(), self.metadata.as_ref())
            .include_predators(self.include_predators)
            .with_progress(progress)
            .build_with_summary(&self.subjects)
            .await
    }
}
