//! Headline metrics and number formatting for statement charts.

use crate::core::model::{
    AvBalanceSheet, AvCashFlow, AvIncomeStatement, AvReports, BalanceSheet, CashFlow,
    IncomeStatement, Statements,
};
use crate::core::statement::StatementKind;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

const MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
const BILLION: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// One charted line and the field it reads from each provider's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metric {
    pub label: &'static str,
    pub financial_field: Option<&'static str>,
    pub alphavantage_field: Option<&'static str>,
}

const fn metric(
    label: &'static str,
    financial_field: Option<&'static str>,
    alphavantage_field: Option<&'static str>,
) -> Metric {
    Metric {
        label,
        financial_field,
        alphavantage_field,
    }
}

const INCOME_METRICS: &[Metric] = &[
    metric("Revenue", Some("revenue"), Some("totalRevenue")),
    metric("Gross Profit", Some("grossProfit"), Some("grossProfit")),
    metric("Operating Income", Some("operatingIncome"), Some("operatingIncome")),
    metric("Net Income", Some("netIncome"), Some("netIncome")),
];

const BALANCE_SHEET_METRICS: &[Metric] = &[
    metric("Total Assets", Some("totalAssets"), Some("totalAssets")),
    metric(
        "Total Current Assets",
        Some("totalCurrentAssets"),
        Some("totalCurrentAssets"),
    ),
    metric(
        "Cash",
        Some("cashAndCashEquivalents"),
        Some("cashAndCashEquivalentsAtCarryingValue"),
    ),
];

// The alternate provider reports no free cash flow.
const CASH_FLOW_METRICS: &[Metric] = &[
    metric(
        "Operating Cash Flow",
        Some("operatingCashFlow"),
        Some("operatingCashflow"),
    ),
    metric("Free Cash Flow", Some("freeCashFlow"), None),
    metric(
        "Capital Expenditure",
        Some("capitalExpenditure"),
        Some("capitalExpenditures"),
    ),
    metric("Net Income", Some("netIncome"), Some("netIncome")),
];

/// Headline metrics charted for a statement kind.
pub fn key_metrics(kind: StatementKind) -> &'static [Metric] {
    match kind {
        StatementKind::Income => INCOME_METRICS,
        StatementKind::BalanceSheet => BALANCE_SHEET_METRICS,
        StatementKind::CashFlow => CASH_FLOW_METRICS,
    }
}

/// Values of one metric across periods, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub points: Vec<(NaiveDate, Option<Decimal>)>,
}

trait Charted {
    fn period_end(&self) -> NaiveDate;
    fn value(&self, key: &str) -> Option<Decimal>;
}

macro_rules! charted {
    ($($record:ty => $date:ident),* $(,)?) => {
        $(
            impl Charted for $record {
                fn period_end(&self) -> NaiveDate {
                    self.header.$date
                }

                fn value(&self, key: &str) -> Option<Decimal> {
                    self.field(key)
                }
            }
        )*
    };
}

charted! {
    IncomeStatement => date,
    BalanceSheet => date,
    CashFlow => date,
    AvIncomeStatement => fiscal_date_ending,
    AvBalanceSheet => fiscal_date_ending,
    AvCashFlow => fiscal_date_ending,
}

fn build_series<T: Charted>(
    records: &[T],
    metrics: &[Metric],
    field: fn(&Metric) -> Option<&'static str>,
) -> Vec<Series> {
    let mut ordered: Vec<&T> = records.iter().collect();
    ordered.sort_by_key(|r| r.period_end());

    metrics
        .iter()
        .filter_map(|m| {
            let key = field(m)?;
            Some(Series {
                label: m.label,
                points: ordered
                    .iter()
                    .map(|r| (r.period_end(), r.value(key)))
                    .collect(),
            })
        })
        .collect()
}

// Annual reports are charted; quarterly ones only when no annual data exists.
fn av_series<T: Charted>(reports: &AvReports<T>, metrics: &[Metric]) -> Vec<Series> {
    let records = if reports.annual_reports.is_empty() {
        &reports.quarterly_reports
    } else {
        &reports.annual_reports
    };
    build_series(records, metrics, |m| m.alphavantage_field)
}

/// Extracts the headline metric series from normalized statements.
pub fn series(statements: &Statements) -> Vec<Series> {
    let financial = |m: &Metric| m.financial_field;
    match statements {
        Statements::Income(v) => build_series(v, INCOME_METRICS, financial),
        Statements::BalanceSheet(v) => build_series(v, BALANCE_SHEET_METRICS, financial),
        Statements::CashFlow(v) => build_series(v, CASH_FLOW_METRICS, financial),
        Statements::AvIncome(r) => av_series(r, INCOME_METRICS),
        Statements::AvBalanceSheet(r) => av_series(r, BALANCE_SHEET_METRICS),
        Statements::AvCashFlow(r) => av_series(r, CASH_FLOW_METRICS),
    }
}

/// Converts a raw currency amount to millions, rounded to two places.
pub fn to_millions(value: Decimal) -> Decimal {
    (value / MILLION).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as `$61.86B`, `$7.50M` or `$950.00`.
pub fn format_compact(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = value.abs();
    let (scaled, suffix) = if abs >= BILLION {
        (abs / BILLION, "B")
    } else if abs >= MILLION {
        (abs / MILLION, "M")
    } else {
        (abs, "")
    };
    let rounded = scaled.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{sign}${rounded:.2}{suffix}")
}
