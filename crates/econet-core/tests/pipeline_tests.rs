use async_trait::async_trait;
use econet_core::{
    Config, EconetError, InteractionSource, LookupError, NoMetadata, Pipeline, Roster, RosterError,
};

struct WolfEatsDeer;

#[async_trait]
impl InteractionSource for WolfEatsDeer {
    async fn fetch_prey(&self, species: &str) -> Result<Vec<String>, LookupError> {
        match species {
            "canis lupus" => Ok(vec!["Odocoileus hemionus".to_string()]),
            _ => Ok(Vec::new()),
        }
    }

    async fn fetch_predators(&self, species: &str) -> Result<Vec<String>, LookupError> {
        match species {
            "odocoileus hemionus" => Ok(vec!["canis lupus".to_string()]),
            _ => Err(LookupError::Status { status: 500 }),
        }
    }
}

#[test]
fn test_missing_roster_aborts() {
    let mut config = Config::default();
    config.roster.path = "/no/such/roster.csv".into();

    let result = Pipeline::from_config(&config);
    assert!(matches!(
        result,
        Err(EconetError::Roster(RosterError::Io { .. }))
    ));
}

#[test]
fn test_invalid_config_aborts() {
    let mut config = Config::default();
    config.metadata.timeout_secs = 0;

    assert!(matches!(Pipeline::from_config(&config), Err(EconetError::Config(_))));
}

#[tokio::test]
async fn test_run_over_whole_roster() {
    let roster = Roster::from_names(["canis lupus", "odocoileus hemionus"]);
    let pipeline = Pipeline::with_sources(roster, Box::new(WolfEatsDeer), Box::new(NoMetadata));
    assert_eq!(pipeline.subject_count(), 2);

    let (graph, summary) = pipeline.run().await;

    assert_eq!(summary.subjects_processed, 2);
    assert!(graph.contains_edge("canis lupus", "odocoileus hemionus"));
    assert_eq!(graph.edge_count(), 1);
}

#[tokio::test]
async fn test_run_with_predators_and_subjects() {
    let roster = Roster::from_names(["canis lupus", "odocoileus hemionus"]);
    let pipeline = Pipeline::with_sources(roster, Box::new(WolfEatsDeer), Box::new(NoMetadata))
        .with_subjects(vec!["Odocoileus hemionus".to_string()])
        .include_predators(true);

    let (graph, summary) = pipeline.run().await;

    assert!(graph.contains_edge("canis lupus", "odocoileus hemionus"));
    assert_eq!(graph.node("canis lupus").unwrap().degree_hint, 1);
    assert!(summary.lookups_unavailable.is_empty());
}

#[tokio::test]
async fn test_subject_count_matches_visited_subjects() {
    let roster = Roster::from_names(["lynx rufus", "canis lupus"]);
    let pipeline = Pipeline::with_sources(roster, Box::new(WolfEatsDeer), Box::new(NoMetadata))
        .with_subjects(vec!["Lynx rufus".to_string(), "lynx rufus.".to_string()]);
    assert_eq!(pipeline.subject_count(), 1);

    let (_, summary) = pipeline.run().await;
    assert_eq!(summary.subjects_processed, pipeline.subject_count());
}
