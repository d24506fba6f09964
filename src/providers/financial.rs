//! Primary provider adapter.

use super::{HttpClient, RawResponse, StatementProvider, join_segments, parse_base_url};
use crate::core::config::FinancialProviderConfig;
use crate::core::error::FetchError;
use crate::core::statement::{Period, ProviderKind, StatementKind, Symbol};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;
use tracing::instrument;

/// Primary provider adapter.
///
/// Balance sheets are addressed by path on the versioned API; income and
/// cash flow statements are addressed by query parameters on the stable API.
/// Every endpoint takes the period as a query parameter and answers with a
/// flat list.
pub struct FinancialProvider {
    base_url: Url,
    stable_base_url: Url,
    api_key: String,
    http: HttpClient,
}

impl FinancialProvider {
    pub fn new(config: &FinancialProviderConfig, http: HttpClient) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(&config.base_url)?,
            stable_base_url: parse_base_url(&config.stable_base_url)?,
            api_key: config.api_key.clone(),
            http,
        })
    }
}

#[async_trait]
impl StatementProvider for FinancialProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Financial
    }

    fn statement_url(&self, kind: StatementKind, symbol: &Symbol, period: Period) -> Url {
        let period = period.to_string();
        let mut url = match kind {
            StatementKind::BalanceSheet => {
                join_segments(&self.base_url, &["balance-sheet-statement", symbol.as_str()])
            }
            StatementKind::CashFlow => {
                let mut url = join_segments(&self.stable_base_url, &["cash-flow-statement"]);
                url.query_pairs_mut().append_pair("symbol", symbol.as_str());
                url
            }
            StatementKind::Income => {
                let mut url = join_segments(&self.stable_base_url, &["income-statement"]);
                url.query_pairs_mut().append_pair("symbol", symbol.as_str());
                url
            }
        };
        url.query_pairs_mut()
            .append_pair("period", &period)
            .append_pair("apikey", &self.api_key);
        url
    }

    #[instrument(name = "FinancialStatementFetch", skip(self), fields(kind = %kind, symbol = %symbol))]
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
