use crate::interactions::InteractionSource;
use crate::metadata::MetadataSource;
use crate::roster::Roster;
use crate::species::normalize_all;

use super::{FoodWeb, SpeciesNode};

/// What happened during a build, beyond the graph itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Subjects whose relations were expanded.
    pub subjects_processed: usize,
    /// Subjects ignored because they are not on the roster.
    pub subjects_not_in_roster: Vec<String>,
    /// Subjects whose prey (or predator) lookup was unavailable.
    pub lookups_unavailable: Vec<String>,
    /// Related species dropped because they are not on the roster.
    pub relations_outside_roster: usize,
}

type ProgressFn<'a> = Box<dyn Fn(usize, usize, &str) + Send + Sync + 'a>;

/// Builds a [`FoodWeb`] from a roster and the two external sources.
///
/// Subjects are processed one at a time, in order, awaiting each external
/// call before issuing the next. One failed lookup only costs that subject
/// its edges.
///
/// # Example
///
/// ```ignore
/// let roster = Roster::load(&config.roster)?;
/// let globi = GlobiClient::from_config(&config.interactions)?;
/// let graph = GraphBuilder::new(&roster, &globi, &NoMetadata)
///     .build(&["canis lupus".to_string()])
///     .await;
/// ```
pub struct GraphBuilder<'a, I: ?Sized, M: ?Sized> {
    roster: &'a Roster,
    interactions: &'a I,
    metadata: &'a M,
    include_predators: bool,
    progress: Option<ProgressFn<'a>>,
}

impl<'a, I, M> GraphBuilder<'a, I, M>
where
    I: InteractionSource + ?Sized,
    M: MetadataSource + ?Sized,
{
    pub fn new(roster: &'a Roster, interactions: &'a I, metadata: &'a M) -> Self {
        Self {
            roster,
            interactions,
            metadata,
            include_predators: false,
            progress: None,
        }
    }

    /// Also add `predator → subject` edges from predator lookups.
    pub fn include_predators(mut self, include: bool) -> Self {
        self.include_predators = include;
        self
    }

    /// Called with `(index, total, subject)` before each subject is expanded.
    pub fn with_progress(mut self, progress: impl Fn(usize, usize, &str) + Send + Sync + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Build the graph. An empty `subjects` list expands the whole roster.
    pub async fn build(&self, subjects: &[String]) -> FoodWeb {
        self.build_with_summary(subjects).await.0
    }

    /// Build the graph and report what was skipped.
    pub async fn build_with_summary(&self, subjects: &[String]) -> (FoodWeb, BuildSummary) {
        let subjects = if subjects.is_empty() {
            self.roster.species().to_vec()
        } else {
            normalize_all(subjects)
        };

        let mut graph = FoodWeb::new();
        let mut summary = BuildSummary::default();

        for (index, subject) in subjects.iter().enumerate() {
            if let Some(progress) = &self.progress {
                progress(index, subjects.len(), subject);
            }

            if !self.roster.contains(subject) {
                tracing::warn!(subject = %subject, "subject not in roster, skipping");
                summary.subjects_not_in_roster.push(subject.clone());
                continue;
            }

            self.ensure_node(&mut graph, subject).await;
            self.expand_prey(&mut graph, &mut summary, subject).await;
            if self.include_predators {
                self.expand_predators(&mut graph, &mut summary, subject).await;
            }
            graph.refresh_degree_hint(subject);
            summary.subjects_processed += 1;
        }

        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            subjects = summary.subjects_processed,
            unavailable = summary.lookups_unavailable.len(),
            outside_roster = summary.relations_outside_roster,
            "food web built"
        );

        (graph, summary)
    }

    async fn expand_prey(&self, graph: &mut FoodWeb, summary: &mut BuildSummary, subject: &str) {
        match self.interactions.fetch_prey(subject).await {
            Ok(prey) => {
                tracing::debug!(subject, count = prey.len(), "prey lookup");
                for prey in prey {
                    self.link(graph, summary, subject, &prey).await;
                }
            }
            Err(e) => {
                tracing::warn!(subject, error = %e, "prey lookup unavailable");
                summary.lookups_unavailable.push(subject.to_string());
            }
        }
    }

    async fn expand_predators(&self, graph: &mut FoodWeb, summary: &mut BuildSummary, subject: &str) {
        match self.interactions.fetch_predators(subject).await {
            Ok(predators) => {
                tracing::debug!(subject, count = predators.len(), "predator lookup");
                for predator in predators {
                    if self.link(graph, summary, &predator, subject).await {
                        graph.refresh_degree_hint(&predator);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(subject, error = %e, "predator lookup unavailable");
                if summary.lookups_unavailable.last().map(String::as_str) != Some(subject) {
                    summary.lookups_unavailable.push(subject.to_string());
                }
            }
        }
    }

    /// Add `predator → prey` if both are on the roster. Returns true if the
    /// edge is present afterwards.
    async fn link(&self, graph: &mut FoodWeb, summary: &mut BuildSummary, predator: &str, prey: &str) -> bool {
        for endpoint in [predator, prey] {
            if !self.roster.contains(endpoint) {
                tracing::trace!(species = endpoint, "not in roster");
                summary.relations_outside_roster += 1;
                return false;
            }
        }

        self.ensure_node(graph, predator).await;
        self.ensure_node(graph, prey).await;

        match graph.add_edge(predator, prey) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "edge endpoint missing after insert");
                false
            }
        }
    }

    /// Insert a decorated node for `species` if absent. Metadata is fetched
    /// only for new nodes, so each species costs at most one request.
    async fn ensure_node(&self, graph: &mut FoodWeb, species: &str) {
        if graph.contains_node(species) {
            return;
        }
        let metadata = self.metadata.resolve(species).await;
        graph.add_node(SpeciesNode::from_metadata(species, &metadata));
    }
}
