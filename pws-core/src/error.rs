//! Failure taxonomy for one poll cycle.

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while fetching and decoding one
/// observation or forecast. The host scheduler treats any variant as a
/// failed cycle and simply tries again at the next interval; the core
/// never retries on its own.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("unexpected upstream status {0}")]
    UpstreamHttp(StatusCode),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("well-formed response contained no observations")]
    EmptyResult,

    #[error("no extraction strategy yielded any reading")]
    Extraction,
}

impl FetchError {
    /// Classify a transport-level reqwest failure, keeping timeouts
    /// distinct from other connection problems.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Network(err)
        }
    }
}
