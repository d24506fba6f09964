//! API route handlers

use super::{ApiError, AppState};
use crate::core::model::Statements;
use crate::core::statement::{Period, ProviderKind, StatementKind, Symbol};
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

fn parse<T: FromStr<Err = anyhow::Error>>(raw: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|e: anyhow::Error| ApiError::BadRequest(e.to_string()))
}

/// Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /api/financial/{kind}/{symbol}?period=annual|quarter`
pub async fn financial_statement(
    State(state): State<AppState>,
    Path((kind, symbol)): Path<(String, String)>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Statements>, ApiError> {
    let kind: StatementKind = parse(&kind)?;
    let symbol: Symbol = parse(&symbol)?;
    let period = match query.period.as_deref() {
        Some(raw) => parse(raw)?,
        None => Period::Annual,
    };

    let statements = state
        .service
        .get_statement(ProviderKind::Financial, kind, &symbol, period)
        .await?;
    Ok(Json(statements))
}

/// `GET /api/alphavantage/{kind}/{symbol}`
pub async fn alphavantage_statement(
    State(state): State<AppState>,
    Path((kind, symbol)): Path<(String, String)>,
) -> Result<Json<Statements>, ApiError> {
    let kind: StatementKind = parse(&kind)?;
    let symbol: Symbol = parse(&symbol)?;

    let statements = state
        .service
        .get_statement(ProviderKind::AlphaVantage, kind, &symbol, Period::Annual)
        .await?;
    Ok(Json(statements))
}

#[cfg(test)]
mod tests {
    use crate::api::router;
    use crate::core::config::AppConfig;
    use crate::service::StatementService;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(mock_server: &MockServer) -> axum::Router {
        let mut config = AppConfig::default();
        config.providers.financial.base_url = format!("{}/api/v3", mock_server.uri());
        config.providers.financial.stable_base_url = format!("{}/stable", mock_server.uri());
        config.providers.alphavantage.base_url = format!("{}/query", mock_server.uri());
        router(StatementService::from_config(&config).unwrap())
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let mock_server = MockServer::start().await;
        let (status, body) = get(app_for(&mock_server), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "alive");
    }

    #[tokio::test]
    async fn test_financial_statement_list() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/balance-sheet-statement/AAPL"))
            .and(query_param("period", "quarter"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"date": "2024-06-29", "symbol": "AAPL", "period": "Q3", "fillingDate": "2024-08-02", "calendarYear": "2024", "totalAssets": 331612000000}]"#,
            ))
            .mount(&mock_server)
            .await;

        let (status, body) = get(
            app_for(&mock_server),
            "/api/financial/balance-sheet/aapl?period=quarter",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["symbol"], "AAPL");
        assert_eq!(records[0]["date"], "2024-06-29");
        assert_eq!(records[0]["period"], "Q3");
        assert_eq!(records[0]["periodType"], "quarter");
        assert_eq!(records[0]["fillingDate"], "2024-08-02");
        assert_eq!(records[0]["calendarYear"], "2024");
        assert_eq!(records[0]["totalAssets"].as_f64(), Some(331612000000.0));
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_empty_list() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stable/income-statement"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&mock_server)
            .await;

        let (status, body) = get(app_for(&mock_server), "/api/financial/income-statement/ZZZZ").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Array(Vec::new()));
    }

    #[tokio::test]
    async fn test_alphavantage_envelope() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("function", "INCOME_STATEMENT"))
            .and(query_param("symbol", "IBM"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"symbol":"IBM","annualReports":[{"fiscalDateEnding":"2023-12-31","totalRevenue":"61860000000","netIncome":"7502000000"}],"quarterlyReports":[]}"#,
            ))
            .mount(&mock_server)
            .await;

        let (status, body) = get(app_for(&mock_server), "/api/alphavantage/income-statement/IBM").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symbol"], "IBM");
        assert_eq!(body["annualReports"][0]["fiscalDateEnding"], "2023-12-31");
        assert_eq!(
            body["annualReports"][0]["totalRevenue"].as_f64(),
            Some(61860000000.0)
        );
        assert_eq!(body["quarterlyReports"], Value::Array(Vec::new()));
    }

    #[tokio::test]
    async fn test_classified_errors_map_to_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("function", "CASH_FLOW"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#,
            ))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("function", "BALANCE_SHEET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&mock_server)
            .await;

        let (status, body) = get(app_for(&mock_server), "/api/alphavantage/cash-flow/IBM").await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "quota_exceeded");

        let (status, body) = get(app_for(&mock_server), "/api/alphavantage/balance-sheet/IBM").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "malformed_upstream_response");
    }

    #[tokio::test]
    async fn test_bad_requests() {
        let mock_server = MockServer::start().await;

        let (status, body) = get(app_for(&mock_server), "/api/financial/dividends/IBM").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");

        let (status, _) = get(
            app_for(&mock_server),
            "/api/financial/cash-flow/IBM?period=monthly",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(app_for(&mock_server), "/api/alphavantage/cash-flow/IB%24M").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
