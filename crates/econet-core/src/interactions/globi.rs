use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::config::{InteractionsConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

use super::{select_objects, Direction, InteractionSource, LookupError, RelationType, SubjectFilter};

/// One parsed row of an interaction response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRecord {
    /// Name of the species the row is about, as the API spelled it.
    pub subject: String,
    pub interaction: RelationType,
    /// Names of the species on the other end, as the API spelled them.
    pub objects: Vec<String>,
}

/// Global Biotic Interactions (GloBI) API client.
///
/// Issues exactly one GET per lookup. Any transport, status, or payload
/// problem comes back as a [`LookupError`].
pub struct GlobiClient {
    base_url: String,
    filter: SubjectFilter,
    client: Client,
}

impl GlobiClient {
    /// Creates a client for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, LookupError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with an explicit per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            filter: SubjectFilter::default(),
            client,
        })
    }

    /// Creates a client from configuration.
    pub fn from_config(config: &InteractionsConfig) -> Result<Self, LookupError> {
        Ok(Self::with_timeout(&config.base_url, config.timeout())?
            .with_subject_filter(config.subject_filter))
    }

    /// Sets how record subjects are checked.
    pub fn with_subject_filter(mut self, filter: SubjectFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Builds `{base}/taxon/{species}/{endpoint}` with the species name
    /// percent-encoded as a single path segment.
    pub fn endpoint_url(&self, species: &str, direction: Direction) -> Result<Url, LookupError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| LookupError::Network(format!("invalid base URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| LookupError::Network(format!("base URL cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["taxon", species, direction.endpoint()]);
        Ok(url)
    }

    async fn lookup(&self, species: &str, direction: Direction) -> Result<Vec<String>, LookupError> {
        let url = self.endpoint_url(species, direction)?;
        tracing::debug!(%url, "interaction lookup");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let records = parse_response(&body)?;
        Ok(select_objects(&records, species, direction, self.filter))
    }
}

#[async_trait]
impl InteractionSource for GlobiClient {
    async fn fetch_prey(&self, species: &str) -> Result<Vec<String>, LookupError> {
        self.lookup(species, Direction::Prey).await
    }

    async fn fetch_predators(&self, species: &str) -> Result<Vec<String>, LookupError> {
        self.lookup(species, Direction::Predators).await
    }
}

/// Parse an interaction response body.
///
/// Expects `{"data": [[subject, type, objects], ...]}` where `objects` is a
/// list of names or a single name. Rows with a null subject or type are
/// dropped; a missing `data` key or a row of the wrong shape is malformed.
pub fn parse_response(body: &str) -> Result<Vec<InteractionRecord>, LookupError> {
    let response: InteractionResponse = serde_json::from_str(body)?;

    Ok(response
        .data
        .into_iter()
        .filter_map(|RawRow(subject, interaction, objects)| {
            Some(InteractionRecord {
                subject: subject?,
                interaction: RelationType::parse(&interaction?),
                objects: objects.map(ObjectNames::into_vec).unwrap_or_default(),
            })
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct InteractionResponse {
    data: Vec<RawRow>,
}

#[derive(Debug, Deserialize)]
struct RawRow(Option<String>, Option<String>, Option<ObjectNames>);

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ObjectNames {
    Many(Vec<Option<String>>),
    One(String),
}

impl ObjectNames {
    fn into_vec(self) -> Vec<String> {
        match self {
            ObjectNames::Many(names) => names.into_iter().flatten().collect(),
            ObjectNames::One(name) => vec![name],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubServer;

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "columns": ["source_taxon_name", "interaction_type", "target_taxon_name"],
            "data": [
                ["Canis lupus", "eats", ["Odocoileus hemionus", "Cervus canadensis"]],
                ["Canis lupus", "preysOn", "Alces alces"],
                [null, "eats", ["Nobody"]]
            ]
        }"#;
        let records = parse_response(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].subject, "Canis lupus");
        assert_eq!(records[0].interaction, RelationType::Eats);
        assert_eq!(records[0].objects, vec!["Odocoileus hemionus", "Cervus canadensis"]);
        assert_eq!(records[1].interaction, RelationType::PreysOn);
        assert_eq!(records[1].objects, vec!["Alces alces"]);
    }

    #[test]
    fn test_parse_missing_data_is_malformed() {
        let result = parse_response(r#"{"columns": []}"#);
        assert!(matches!(result, Err(LookupError::Malformed(_))));
    }

    #[test]
    fn test_parse_wrong_row_shape_is_malformed() {
        let result = parse_response(r#"{"data": [["Canis lupus", "eats"]]}"#);
        assert!(matches!(result, Err(LookupError::Malformed(_))));
    }

    #[test]
    fn test_parse_not_json_is_malformed() {
        assert!(matches!(parse_response("<html>"), Err(LookupError::Malformed(_))));
    }

    #[test]
    fn test_parse_empty_data() {
        assert!(parse_response(r#"{"data": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_endpoint_url_encodes_species() {
        let client = GlobiClient::new("https://api.example.org/").unwrap();
        let url = client.endpoint_url("canis lupus", Direction::Prey).unwrap();
        assert_eq!(url.as_str(), "https://api.example.org/taxon/canis%20lupus/eats");

        let url = client.endpoint_url("canis lupus", Direction::Predators).unwrap();
        assert_eq!(url.as_str(), "https://api.example.org/taxon/canis%20lupus/preyedUponBy");
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let client = GlobiClient::new("http://localhost:8080/globi").unwrap();
        let url = client.endpoint_url("lynx rufus", Direction::Prey).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/globi/taxon/lynx%20rufus/eats");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_unavailable() {
        let client = GlobiClient::with_timeout("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let result = client.fetch_prey("canis lupus").await;
        assert!(matches!(result, Err(LookupError::Network(_) | LookupError::Timeout)));
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = StubServer::start(|_| (500, "oops".to_string())).await;
        let client = GlobiClient::new(&server.base_url).unwrap();

        let result = client.fetch_prey("canis lupus").await;
        assert!(matches!(result, Err(LookupError::Status { status: 500 })));
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_filters_and_normalizes() {
        let body = r#"{"data": [
            ["Canis lupus", "eats", ["Odocoileus hemionus", "CERVUS CANADENSIS."]],
            ["Canis latrans", "eats", ["Sylvilagus audubonii"]],
            ["Canis lupus", "pollinates", ["Pinus"]]
        ]}"#;
        let server = StubServer::start(move |_| (200, body.to_string())).await;
        let client = GlobiClient::new(&server.base_url).unwrap();

        let prey = client.fetch_prey("canis lupus").await.unwrap();
        assert_eq!(prey, vec!["odocoileus hemionus", "cervus canadensis"]);
        assert_eq!(server.requests()[0].path, "/taxon/canis%20lupus/eats");

        let legacy = GlobiClient::new(&server.base_url)
            .unwrap()
            .with_subject_filter(SubjectFilter::Legacy);
        let prey = legacy.fetch_prey("canis lupus").await.unwrap();
        assert_eq!(prey.len(), 3);
    }

    #[tokio::test]
    async fn test_predator_lookup_uses_preyed_upon_by() {
        let server = StubServer::start(|_| {
            (200, r#"{"data": [["Odocoileus hemionus", "preyedUponBy", "Puma concolor"]]}"#.to_string())
        })
        .await;
        let client = GlobiClient::new(&server.base_url).unwrap();

        let predators = client.fetch_predators("odocoileus hemionus").await.unwrap();
        assert_eq!(predators, vec!["puma concolor"]);
        assert_eq!(server.requests()[0].path, "/taxon/odocoileus%20hemionus/preyedUponBy");
    }

    #[tokio::test]
    async fn test_malformed_body_is_unavailable() {
        let server = StubServer::start(|_| (200, "<html>".to_string())).await;
        let client = GlobiClient::new(&server.base_url).unwrap();

        let result = client.fetch_prey("canis lupus").await;
        assert!(matches!(result, Err(LookupError::Malformed(_))));
    }
}
