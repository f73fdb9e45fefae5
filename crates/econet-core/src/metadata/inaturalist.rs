use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::config::{MetadataConfig, DEFAULT_METADATA_INTERVAL_MS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::species::names_match;

use super::{Credential, MetadataError, MetadataSource, SpeciesMetadata, Throttle};

/// iNaturalist taxa API client.
///
/// Every outbound request waits on the client's [`Throttle`] first. With a
/// [`Credential`] configured, requests carry a bearer token; a 401 answer
/// triggers one refresh and one re-send.
pub struct INaturalistClient {
    base_url: String,
    credential: Option<Credential>,
    throttle: Throttle,
    client: Client,
}

impl INaturalistClient {
    /// Creates an anonymous client with default timeout and request spacing.
    pub fn new(base_url: impl Into<String>) -> Result<Self, MetadataError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates an anonymous client with an explicit per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential: None,
            throttle: Throttle::new(Duration::from_millis(DEFAULT_METADATA_INTERVAL_MS)),
            client,
        })
    }

    /// Creates a client from configuration.
    ///
    /// A non-blank `api_token` from the config file wins; otherwise the
    /// `token_env` variable is used if it holds a token, and is re-read on
    /// every refresh; otherwise requests are anonymous.
    pub fn from_config(config: &MetadataConfig) -> Result<Self, MetadataError> {
        let client = Self::with_timeout(&config.base_url, config.timeout())?
            .with_throttle(Throttle::new(config.min_interval()));

        let token = config
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let env_has_token = std::env::var(&config.token_env)
            .is_ok_and(|t| !t.trim().is_empty());

        Ok(match token {
            Some(token) => client.with_credential(Credential::from_token(token)),
            None if env_has_token => client.with_credential(Credential::from_env(config.token_env.clone())),
            None => client,
        })
    }

    /// Sets the bearer credential.
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Sets the request spacing.
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Builds `{base}/v1/taxa?q={species}`.
    pub fn taxa_url(&self, species: &str) -> Result<Url, MetadataError> {
        let url = format!("{}/v1/taxa", self.base_url);
        Url::parse_with_params(&url, &[("q", species)])
            .map_err(|e| MetadataError::Network(format!("invalid base URL {}: {e}", self.base_url)))
    }

    async fn send(&self, url: &Url, token: Option<&str>) -> Result<Response, MetadataError> {
        self.throttle.wait().await;
        tracing::debug!(%url, "metadata lookup");

        let mut req = self.client.get(url.clone());
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Ok(req.send().await?)
    }

    /// Resolve metadata, reporting failures instead of degrading.
    pub async fn try_resolve(&self, species: &str) -> Result<SpeciesMetadata, MetadataError> {
        let url = self.taxa_url(species)?;

        let token = match &self.credential {
            Some(credential) => Some(credential.current().await?),
            None => None,
        };

        let mut response = self.send(&url, token.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let credential = self.credential.as_ref().ok_or(MetadataError::Unauthorized)?;
            let token = credential.refresh().await?;
            response = self.send(&url, Some(&token)).await?;
            if response.status() == StatusCode::UNAUTHORIZED {
                return Err(MetadataError::Unauthorized);
            }
        }

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MetadataError::RateLimited);
        }
        if !status.is_success() {
            return Err(MetadataError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_taxa_response(&body, species)
    }
}

#[async_trait]
impl MetadataSource for INaturalistClient {
    async fn resolve(&self, species: &str) -> SpeciesMetadata {
        match self.try_resolve(species).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(species, error = %e, "metadata unavailable");
                SpeciesMetadata::default()
            }
        }
    }
}

/// Parse a taxa search response for `species`.
///
/// Results whose scientific name matches `species` are preferred; if none
/// match, all results are used in the order returned.
pub fn parse_taxa_response(body: &str, species: &str) -> Result<SpeciesMetadata, MetadataError> {
    let response: TaxaResponse =
        serde_json::from_str(body).map_err(|e| MetadataError::ParseError(e.to_string()))?;

    let matching: Vec<&Taxon> = response
        .results
        .iter()
        .filter(|t| t.name.as_deref().is_some_and(|n| names_match(n, species)))
        .collect();
    let chosen: Vec<&Taxon> = if matching.is_empty() {
        response.results.iter().collect()
    } else {
        matching
    };

    let mut common_names: Vec<String> = Vec::new();
    for name in chosen.iter().filter_map(|t| t.preferred_common_name.as_ref()) {
        if !common_names.contains(name) {
            common_names.push(name.clone());
        }
    }

    Ok(SpeciesMetadata {
        common_names,
        category: chosen.iter().find_map(|t| t.iconic_taxon_name.clone()),
    })
}

#[derive(Debug, Deserialize)]
struct TaxaResponse {
    results: Vec<Taxon>,
}

#[derive(Debug, Deserialize)]
struct Taxon {
    name: Option<String>,
    preferred_common_name: Option<String>,
    iconic_taxon_name: Option<String>,
}
