//! Classified fetch failures and their HTTP status mapping.

use thiserror::Error;

const MAX_REASON_LEN: usize = 512;

/// Classified failure of a single statement fetch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("upstream rejected the request (status {status}): {reason}")]
    UpstreamRejected { status: u16, reason: String },

    #[error("upstream quota exceeded: {reason}")]
    QuotaExceeded { reason: String },

    #[error("malformed upstream response: {reason}")]
    MalformedUpstreamResponse { reason: String },

    #[error("transport failure: {reason}")]
    TransportFailure { reason: String },

    #[error("failed to parse upstream response: {reason}")]
    ParseFailure { reason: String },
}

impl FetchError {
    pub fn upstream_rejected(status: u16, reason: impl AsRef<str>) -> Self {
        FetchError::UpstreamRejected {
            status,
            reason: truncate(reason.as_ref()),
        }
    }

    pub fn quota_exceeded(reason: impl AsRef<str>) -> Self {
        FetchError::QuotaExceeded {
            reason: truncate(reason.as_ref()),
        }
    }

    pub fn malformed(reason: impl AsRef<str>) -> Self {
        FetchError::MalformedUpstreamResponse {
            reason: truncate(reason.as_ref()),
        }
    }

    pub fn transport(reason: impl AsRef<str>) -> Self {
        FetchError::TransportFailure {
            reason: truncate(reason.as_ref()),
        }
    }

    pub fn parse(reason: impl AsRef<str>) -> Self {
        FetchError::ParseFailure {
            reason: truncate(reason.as_ref()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::UpstreamRejected { .. } => "upstream_rejected",
            FetchError::QuotaExceeded { .. } => "quota_exceeded",
            FetchError::MalformedUpstreamResponse { .. } => "malformed_upstream_response",
            FetchError::TransportFailure { .. } => "transport_failure",
            FetchError::ParseFailure { .. } => "parse_failure",
        }
    }

    /// HTTP status the REST layer answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            FetchError::QuotaExceeded { .. } => 429,
            FetchError::TransportFailure { .. } => 504,
            FetchError::UpstreamRejected { .. }
            | FetchError::MalformedUpstreamResponse { .. }
            | FetchError::ParseFailure { .. } => 502,
        }
    }
}

fn truncate(text: &str) -> String {
    let text = text.trim();
    match text.char_indices().nth(MAX_REASON_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
