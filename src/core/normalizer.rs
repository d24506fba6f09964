//! Turns classified upstream JSON into typed statement records.
//!
//! An entry without a usable period date makes the whole payload malformed.

use crate::core::error::FetchError;
use crate::core::model::{
    AvBalanceSheet, AvCashFlow, AvHeader, AvIncomeStatement, AvReports, BalanceSheet, CashFlow,
    FinancialHeader, Fields, IncomeStatement, Statements,
};
use crate::core::statement::{Period, ProviderKind, StatementKind, Symbol};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::debug;

/// Maps a classified upstream payload into canonical records.
///
/// The payload is only read. Lists come back most-recent-first; the sort is
/// stable so data already in that order is returned as delivered.
pub fn normalize(
    provider: ProviderKind,
    kind: StatementKind,
    payload: &Value,
    symbol: &Symbol,
    period: Period,
) -> Result<Statements, FetchError> {
    let statements = match provider {
        ProviderKind::Financial => {
            let items = payload
                .as_array()
                .ok_or_else(|| FetchError::malformed("expected a list of statements"))?;
            match kind {
                StatementKind::Income => Statements::Income(financial_records(
                    items,
                    symbol,
                    period,
                    IncomeStatement::from_fields,
                )?),
                StatementKind::BalanceSheet => Statements::BalanceSheet(financial_records(
                    items,
                    symbol,
                    period,
                    BalanceSheet::from_fields,
                )?),
                StatementKind::CashFlow => Statements::CashFlow(financial_records(
                    items,
                    symbol,
                    period,
                    CashFlow::from_fields,
                )?),
            }
        }
        ProviderKind::AlphaVantage => {
            let envelope = payload
                .as_object()
                .ok_or_else(|| FetchError::malformed("expected a report envelope"))?;
            match kind {
                StatementKind::Income => {
                    Statements::AvIncome(av_reports(envelope, AvIncomeStatement::from_fields)?)
                }
                StatementKind::BalanceSheet => {
                    Statements::AvBalanceSheet(av_reports(envelope, AvBalanceSheet::from_fields)?)
                }
                StatementKind::CashFlow => {
                    Statements::AvCashFlow(av_reports(envelope, AvCashFlow::from_fields)?)
                }
            }
        }
    };

    debug!(%provider, %kind, records = statements.len(), "Normalized statements");
    Ok(statements)
}

fn as_object(item: &Value, index: usize) -> Result<&Map<String, Value>, FetchError> {
    item.as_object()
        .ok_or_else(|| FetchError::malformed(format!("statement at index {index} is not an object")))
}

fn financial_records<T>(
    items: &[Value],
    symbol: &Symbol,
    period: Period,
    build: fn(FinancialHeader, &Fields<'_>) -> T,
) -> Result<Vec<T>, FetchError> {
    let dated = items
        .iter()
        .enumerate()
        .map(|(index, item)| -> Result<_, FetchError> {
            let fields = Fields::new(as_object(item, index)?);
            let date = fields.date("date").ok_or_else(|| {
                FetchError::malformed(format!("statement at index {index} has no valid date"))
            })?;
            let marker = fields.text("period");
            let header = FinancialHeader {
                symbol: fields
                    .text("symbol")
                    .unwrap_or_else(|| symbol.as_str().to_string()),
                date,
                period_type: marker
                    .as_deref()
                    .and_then(Period::from_marker)
                    .unwrap_or(period),
                period: marker.unwrap_or_else(|| period.to_string()),
                reported_currency: fields.text("reportedCurrency"),
                cik: fields.text("cik"),
                filing_date: fields.text("filingDate"),
                filling_date: fields.text("fillingDate"),
                accepted_date: fields.text("acceptedDate"),
                fiscal_year: fields.text("fiscalYear"),
                calendar_year: fields.text("calendarYear"),
            };
            Ok((date, build(header, &fields)))
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    Ok(most_recent_first(dated))
}

fn av_reports<T>(
    envelope: &Map<String, Value>,
    build: fn(AvHeader, &Fields<'_>) -> T,
) -> Result<AvReports<T>, FetchError> {
    let symbol = envelope
        .get("symbol")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| FetchError::malformed("missing symbol"))?
        .to_string();

    let list = |key: &str, period: Period| -> Result<Vec<T>, FetchError> {
        let items = match envelope.get(key) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(FetchError::malformed(format!("{key} is not a list"))),
        };
        let dated = items
            .iter()
            .enumerate()
            .map(|(index, item)| -> Result<_, FetchError> {
                let fields = Fields::new(as_object(item, index)?);
                let fiscal_date_ending = fields.date("fiscalDateEnding").ok_or_else(|| {
                    FetchError::malformed(format!(
                        "{key} entry at index {index} has no valid fiscalDateEnding"
                    ))
                })?;
                let header = AvHeader {
                    symbol: symbol.clone(),
                    fiscal_date_ending,
                    period,
                    reported_currency: fields.text("reportedCurrency"),
                };
                Ok((fiscal_date_ending, build(header, &fields)))
            })
            .collect::<Result<Vec<_>, FetchError>>()?;
        Ok(most_recent_first(dated))
    };

    let annual_reports = list("annualReports", Period::Annual)?;
    let quarterly_reports = list("quarterlyReports", Period::Quarter)?;

    Ok(AvReports {
        symbol,
        annual_reports,
        quarterly_reports,
    })
}

fn most_recent_first<T>(mut dated: Vec<(NaiveDate, T)>) -> Vec<T> {
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn ibm() -> Symbol {
        Symbol::parse("IBM").unwrap()
    }

    #[test]
    fn test_alternate_income_scenario() {
        let payload = json!({
            "symbol": "IBM",
            "annualReports": [{
                "fiscalDateEnding": "2023-12-31",
                "totalRevenue": "61860000000",
                "netIncome": "7502000000"
            }],
            "quarterlyReports": []
        });

        let statements = normalize(
            ProviderKind::AlphaVantage,
            StatementKind::Income,
            &payload,
            &ibm(),
            Period::Annual,
        )
        .unwrap();

        let Statements::AvIncome(reports) = statements else {
            panic!("Expected alternate income reports");
        };
        assert_eq!(reports.symbol, "IBM");
        assert_eq!(reports.annual_reports.len(), 1);
        assert!(reports.quarterly_reports.is_empty());

        let record = &reports.annual_reports[0];
        assert_eq!(
            record.header.fiscal_date_ending,
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
        assert_eq!(record.header.period, Period::Annual);
        assert_eq!(record.total_revenue, Some(Decimal::from(61_860_000_000i64)));
        assert_eq!(record.net_income, Some(Decimal::from(7_502_000_000i64)));
    }

    #[test]
    fn test_alternate_lists_stay_separate_and_ordered() {
        let payload = json!({
            "symbol": "IBM",
            "annualReports": [
                {"fiscalDateEnding": "2023-12-31", "totalAssets": "135241000000"},
                {"fiscalDateEnding": "2022-12-31", "totalAssets": "127243000000"}
            ],
            "quarterlyReports": [
                {"fiscalDateEnding": "2024-03-31", "totalAssets": "None"}
            ]
        });

        let Statements::AvBalanceSheet(reports) = normalize(
            ProviderKind::AlphaVantage,
            StatementKind::BalanceSheet,
            &payload,
            &ibm(),
            Period::Annual,
        )
        .unwrap() else {
            panic!("Expected alternate balance sheets");
        };

        assert_eq!(reports.annual_reports.len(), 2);
        assert_eq!(reports.annual_reports[0].header.fiscal_date_ending.to_string(), "2023-12-31");
        assert_eq!(reports.quarterly_reports.len(), 1);
        assert_eq!(reports.quarterly_reports[0].header.period, Period::Quarter);
        assert!(reports.quarterly_reports[0].total_assets.is_none());
    }

    #[test]
    fn test_primary_records_sorted_most_recent_first() {
        let payload = json!([
            {"date": "2022-09-24", "symbol": "AAPL", "period": "FY", "totalAssets": 352755000000i64},
            {"date": "2023-09-30", "symbol": "AAPL", "period": "FY", "totalAssets": 352583000000i64}
        ]);
        let Statements::BalanceSheet(records) = normalize(
            ProviderKind::Financial,
            StatementKind::BalanceSheet,
            &payload,
            &Symbol::parse("AAPL").unwrap(),
            Period::Annual,
        )
        .unwrap() else {
            panic!("Expected balance sheets");
        };

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].header.date.to_string(), "2023-09-30");
        assert_eq!(records[0].total_assets, Some(Decimal::from(352_583_000_000i64)));
        assert_eq!(records[1].header.date.to_string(), "2022-09-24");
    }

    #[test]
    fn test_primary_header_keeps_upstream_keys() {
        let payload = json!([{
            "date": "2024-06-29",
            "period": "Q3",
            "fillingDate": "2024-08-02",
            "calendarYear": "2024",
            "revenue": 85777000000i64,
            "eps": 1.40
        }]);
        let Statements::Income(records) = normalize(
            ProviderKind::Financial,
            StatementKind::Income,
            &payload,
            &Symbol::parse("aapl").unwrap(),
            Period::Annual,
        )
        .unwrap() else {
            panic!("Expected income statements");
        };

        let header = &records[0].header;
        assert_eq!(header.symbol, "AAPL");
        assert_eq!(header.period, "Q3");
        assert_eq!(header.period_type, Period::Quarter);
        assert_eq!(header.filling_date.as_deref(), Some("2024-08-02"));
        assert_eq!(header.calendar_year.as_deref(), Some("2024"));
        assert!(header.filing_date.is_none());
        assert!(header.fiscal_year.is_none());
        assert_eq!(records[0].eps, Some(Decimal::new(14, 1)));
        assert!(records[0].gross_profit.is_none());

        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["fillingDate"], "2024-08-02");
        assert_eq!(json["calendarYear"], "2024");
        assert_eq!(json["period"], "Q3");
        assert_eq!(json["periodType"], "quarter");
        assert!(json.get("filingDate").is_none());
        assert!(json.get("fiscalYear").is_none());
    }

    #[test]
    fn test_primary_period_marker_falls_back_to_request() {
        let payload = json!([
            {"date": "2024-03-30", "filingDate": "2024-05-03", "fiscalYear": "2024"},
            {"date": "2023-12-30", "period": "H2"}
        ]);
        let Statements::CashFlow(records) = normalize(
            ProviderKind::Financial,
            StatementKind::CashFlow,
            &payload,
            &ibm(),
            Period::Quarter,
        )
        .unwrap() else {
            panic!("Expected cash flow statements");
        };

        assert_eq!(records[0].header.period, "quarter");
        assert_eq!(records[0].header.period_type, Period::Quarter);
        assert_eq!(records[0].header.filing_date.as_deref(), Some("2024-05-03"));
        assert_eq!(records[0].header.fiscal_year.as_deref(), Some("2024"));
        // Unknown markers are kept verbatim
        assert_eq!(records[1].header.period, "H2");
        assert_eq!(records[1].header.period_type, Period::Quarter);
    }

    #[test]
    fn test_empty_lists_are_not_errors() {
        let primary = normalize(
            ProviderKind::Financial,
            StatementKind::CashFlow,
            &json!([]),
            &ibm(),
            Period::Quarter,
        )
        .unwrap();
        assert!(primary.is_empty());

        let alternate = normalize(
            ProviderKind::AlphaVantage,
            StatementKind::CashFlow,
            &json!({"symbol": "IBM", "annualReports": [], "quarterlyReports": []}),
            &ibm(),
            Period::Annual,
        )
        .unwrap();
        assert!(alternate.is_empty());
    }

    #[test]
    fn test_missing_dates_are_malformed() {
        let err = normalize(
            ProviderKind::Financial,
            StatementKind::Income,
            &json!([{"symbol": "IBM", "revenue": 1}]),
            &ibm(),
            Period::Annual,
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::MalformedUpstreamResponse { .. }));

        let err = normalize(
            ProviderKind::AlphaVantage,
            StatementKind::Income,
            &json!({"symbol": "IBM", "annualReports": [{"fiscalDateEnding": "soon"}]}),
            &ibm(),
            Period::Annual,
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::MalformedUpstreamResponse { .. }));
    }

    #[test]
    fn test_payload_is_not_mutated() {
        let payload = json!({
            "symbol": "IBM",
            "annualReports": [
                {"fiscalDateEnding": "2021-12-31"},
                {"fiscalDateEnding": "2023-12-31"}
            ]
        });
        let before = payload.clone();
        normalize(
            ProviderKind::AlphaVantage,
            StatementKind::CashFlow,
            &payload,
            &ibm(),
            Period::Annual,
        )
        .unwrap();
        assert_eq!(payload, before);
    }

    #[test]
    fn test_providers_agree_on_shared_fields() {
        let primary = json!([{
            "date": "2023-12-31",
            "symbol": "IBM",
            "period": "FY",
            "revenue": 61860000000i64,
            "netIncome": 7502000000i64,
            "operatingIncome": 8600000000i64
        }]);
        let alternate = json!({
            "symbol": "IBM",
            "annualReports": [{
                "fiscalDateEnding": "2023-12-31",
                "totalRevenue": "61860000000",
                "netIncome": "7502000000",
                "operatingIncome": "8600000000"
            }],
            "quarterlyReports": []
        });

        let Statements::Income(p) = normalize(
            ProviderKind::Financial,
            StatementKind::Income,
            &primary,
            &ibm(),
            Period::Annual,
        )
        .unwrap() else {
            panic!("Expected income statements");
        };
        let Statements::AvIncome(a) = normalize(
            ProviderKind::AlphaVantage,
            StatementKind::Income,
            &alternate,
            &ibm(),
            Period::Annual,
        )
        .unwrap() else {
            panic!("Expected alternate income reports");
        };

        let (p, a) = (&p[0], &a.annual_reports[0]);
        assert_eq!(p.header.date, a.header.fiscal_date_ending);
        assert_eq!(p.revenue, a.total_revenue);
        assert_eq!(p.net_income, a.net_income);
        assert_eq!(p.operating_income, a.operating_income);
    }
}
