use thiserror::Error;

/// Why an interaction lookup produced no data.
///
/// Every variant means the same thing to the graph builder: this species'
/// relations are unavailable for the current run. The variants exist for
/// logging.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API returned status {status}")]
    Status { status: u16 },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout
        } else if err.is_decode() {
            LookupError::Malformed(err.to_string())
        } else {
            LookupError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Malformed(err.to_string())
    }
}
