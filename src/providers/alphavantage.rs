//! Alpha Vantage adapter. One `function` query per statement kind.

use super::{HttpClient, RawResponse, StatementProvider, parse_base_url};
use crate::core::config::AlphaVantageProviderConfig;
use crate::core::error::FetchError;
use crate::core::statement::{Period, ProviderKind, StatementKind, Symbol};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;
use tracing::instrument;

/// Alternate provider adapter. Endpoints are selected by the `function`
/// query parameter; one response carries both annual and quarterly reports,
/// so the period hint is ignored.
pub struct AlphaVantageProvider {
    base_url: Url,
    api_key: String,
    http: HttpClient,
}

impl AlphaVantageProvider {
    pub fn new(config: &AlphaVantageProviderConfig, http: HttpClient) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(&config.base_url)?,
            api_key: config.api_key.clone(),
            http,
        })
    }

    fn function(kind: StatementKind) -> &'static str {
        match kind {
            StatementKind::Income => "INCOME_STATEMENT",
            StatementKind::BalanceSheet => "BALANCE_SHEET",
            StatementKind::CashFlow => "CASH_FLOW",
        }
    }
}

#[async_trait]
impl StatementProvider for AlphaVantageProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AlphaVantage
    }

    fn statement_url(&self, kind: StatementKind, symbol: &Symbol, _period: Period) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("function", Self::function(kind))
            .append_pair("symbol", symbol.as_str())
            .append_pair("apikey", &self.api_key);
        url
    }

    #[instrument(name = "AlphaVantageStatementFetch", skip(self), fields(kind = %kind, symbol = %symbol))]
    async fn fetch_statement(
        &self,
        kind: StatementKind,
        symbol: &Symbol,
        period: Period,
    ) -> Result<RawResponse, FetchError> {
        let url = self.statement_url(kind, symbol, period);
        self.http.get(url).await
    }
}
