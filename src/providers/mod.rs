//! Upstream statement providers.

pub mod alphavantage;
pub mod financial;
pub mod http;

pub use http::{HttpClient, RawResponse};

use crate::core::error::FetchError;
use crate::core::statement::{Period, ProviderKind, StatementKind, Symbol};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;

/// One upstream statement API.
///
/// An adapter only builds the request and returns the raw response;
/// classification and normalization happen in the service.
#[async_trait]
pub trait StatementProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn statement_url(&self, kind: StatementKind, symbol: &Symbol, period: Period) -> Url;

    async fn fetch_statement(
        &self,
        kind: StatementKind,
        symbol: &Symbol,
        period: Period,
    ) -> Result<RawResponse, FetchError>;
}

/// Parses a configured base URL, rejecting ones that cannot take path segments.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url.trim_end_matches('/'))
        .with_context(|| format!("Invalid provider base URL: {base_url}"))?;
    if url.cannot_be_a_base() {
        return Err(anyhow!("Provider base URL cannot be a base: {}", base_url));
    }
    Ok(url)
}

/// Appends path segments to a base URL that passed [`parse_base_url`].
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url() {
        assert!(parse_base_url("https://example.com/api/v3/").is_ok());
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_join_segments() {
        let base = parse_base_url("https://example.com/api/v3/").unwrap();
        assert_eq!(
            join_segments(&base, &["balance-sheet-statement", "IBM"]).as_str(),
            "https://example.com/api/v3/balance-sheet-statement/IBM"
        );

        let root = parse_base_url("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            join_segments(&root, &["income-statement"]).as_str(),
            "http://127.0.0.1:8080/income-statement"
        );
    }
}
