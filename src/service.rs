//! Aggregation facade over the upstream providers.

use crate::core::classifier::classify;
use crate::core::config::AppConfig;
use crate::core::error::FetchError;
use crate::core::model::Statements;
use crate::core::normalizer::normalize;
use crate::core::statement::{Period, ProviderKind, StatementKind, Symbol};
use crate::providers::alphavantage::AlphaVantageProvider;
use crate::providers::financial::FinancialProvider;
use crate::providers::{HttpClient, StatementProvider};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Single entry point for statement fetches.
///
/// One call issues exactly one upstream request: adapter, then classifier,
/// then normalizer. Failures are returned classified; there is no retry and
/// no fallback to the other provider.
#[derive(Clone)]
pub struct StatementService {
    financial: Arc<dyn StatementProvider>,
    alphavantage: Arc<dyn StatementProvider>,
}

impl StatementService {
    pub fn new(
        financial: Arc<dyn StatementProvider>,
        alphavantage: Arc<dyn StatementProvider>,
    ) -> Self {
        debug_assert_eq!(financial.kind(), ProviderKind::Financial);
        debug_assert_eq!(alphavantage.kind(), ProviderKind::AlphaVantage);
        Self {
            financial,
            alphavantage,
        }
    }

    /// Wires the real adapters around one shared HTTP client.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http = HttpClient::from_config(&config.http)?;
        let financial = FinancialProvider::new(&config.providers.financial, http.clone())?;
        let alphavantage = AlphaVantageProvider::new(&config.providers.alphavantage, http)?;
        Ok(Self::new(Arc::new(financial), Arc::new(alphavantage)))
    }

    fn provider(&self, provider: ProviderKind) -> &dyn StatementProvider {
        match provider {
            ProviderKind::Financial => self.financial.as_ref(),
            ProviderKind::AlphaVantage => self.alphavantage.as_ref(),
        }
    }

    #[instrument(name = "GetStatement", skip(self), fields(provider = %provider, kind = %kind, symbol = %symbol))]
    pub async fn get_statement(
        &self,
        provider: ProviderKind,
        kind: StatementKind,
        symbol: &Symbol,
        period: Period,
    ) -> Result<Statements, FetchError> {
        let result = async {
            let raw = self
                .provider(provider)
                .fetch_statement(kind, symbol, period)
                .await?;
            let payload = classify(provider, raw.status, &raw.body)?;
            normalize(provider, kind, &payload, symbol, period)
        }
        .await;

        match &result {
            Ok(statements) => info!(records = statements.len(), "Statement fetched"),
            Err(e) => warn!(error = %e, kind = e.kind(), "Statement fetch failed"),
        }
        result
    }
}
