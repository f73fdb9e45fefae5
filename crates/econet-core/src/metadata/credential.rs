//! Bearer credentials for the taxonomy service.
//!
//! A [`Credential`] caches the current token and knows how to obtain a new
//! one from its [`TokenSource`]. The metadata client asks for
//! [`Credential::current`] before each request and calls
//! [`Credential::refresh`] once when the service answers 401.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::MetadataError;

/// Where tokens come from.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<String, MetadataError>;
}

/// A fixed token. Refreshing yields the same value.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn fetch_token(&self) -> Result<String, MetadataError> {
        Ok(self.0.clone())
    }
}

/// Reads the token from an environment variable on every fetch, so an
/// externally rotated token is picked up on refresh.
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl TokenSource for EnvToken {
    async fn fetch_token(&self) -> Result<String, MetadataError> {
        match std::env::var(&self.var) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(MetadataError::MissingCredential(self.var.clone())),
        }
    }
}

/// Cached bearer token with an explicit refresh policy.
pub struct Credential {
    source: Box<dyn TokenSource>,
    cached: Mutex<Option<String>>,
}

impl Credential {
    pub fn new(source: impl TokenSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cached: Mutex::new(None),
        }
    }

    /// Credential holding a fixed token.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(StaticToken::new(token))
    }

    /// Credential read from an environment variable.
    pub fn from_env(var: impl Into<String>) -> Self {
        Self::new(EnvToken::new(var))
    }

    /// The cached token, fetching it on first use.
    pub async fn current(&self) -> Result<String, MetadataError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }
        let token = self.source.fetch_token().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Discard the cached token and fetch a new one.
    pub async fn refresh(&self) -> Result<String, MetadataError> {
        let mut cached = self.cached.lock().await;
        *cached = None;
        let token = self.source.fetch_token().await?;
        tracing::debug!("refreshed taxonomy API credential");
        *cached = Some(token.clone());
        Ok(token)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential").finish_non_exhaustive()
    }
}
