//! Statement, period and provider vocabulary shared by every layer

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatementKind {
    Income,
    BalanceSheet,
    CashFlow,
}

impl StatementKind {
    pub const ALL: [StatementKind; 3] = [
        StatementKind::Income,
        StatementKind::BalanceSheet,
        StatementKind::CashFlow,
    ];

    /// Human readable title used by terminal output.
    pub fn title(&self) -> &'static str {
        match self {
            StatementKind::Income => "Income Statement",
            StatementKind::BalanceSheet => "Balance Sheet",
            StatementKind::CashFlow => "Cash Flow",
        }
    }
}

impl Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StatementKind::Income => "income-statement",
                StatementKind::BalanceSheet => "balance-sheet",
                StatementKind::CashFlow => "cash-flow",
            }
        )
    }
}

impl FromStr for StatementKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income-statement" | "income" => Ok(StatementKind::Income),
            "balance-sheet" | "balance" => Ok(StatementKind::BalanceSheet),
            "cash-flow" | "cashflow" => Ok(StatementKind::CashFlow),
            _ => Err(anyhow!("Invalid statement kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Annual,
    Quarter,
}

impl Period {
    /// Maps the primary provider's per-record period marker (`FY`, `Q1`..`Q4`).
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.trim().to_uppercase().as_str() {
            "FY" | "ANNUAL" => Some(Period::Annual),
            "Q1" | "Q2" | "Q3" | "Q4" | "QUARTER" => Some(Period::Quarter),
            _ => None,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Period::Annual => "annual",
                Period::Quarter => "quarter",
            }
        )
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "annual" => Ok(Period::Annual),
            "quarter" | "quarterly" => Ok(Period::Quarter),
            _ => Err(anyhow!("Invalid period: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Primary provider, flat statement lists with numeric fields
    Financial,
    /// Alternate provider, annual/quarterly envelopes with numeric-as-text fields
    AlphaVantage,
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ProviderKind::Financial => "financial",
                ProviderKind::AlphaVantage => "alphavantage",
            }
        )
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "financial" | "primary" => Ok(ProviderKind::Financial),
            "alphavantage" | "alternate" => Ok(ProviderKind::AlphaVantage),
            _ => Err(anyhow!("Invalid provider: {}", s)),
        }
    }
}

const MAX_SYMBOL_LEN: usize = 16;

/// A validated, upper-cased ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("Symbol cannot be empty"));
        }
        if trimmed.len() > MAX_SYMBOL_LEN {
            return Err(anyhow!(
                "Symbol length {} exceeds max {}",
                trimmed.len(),
                MAX_SYMBOL_LEN
            ));
        }
        if let Some(ch) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
        {
            return Err(anyhow!("Symbol contains invalid character '{}'", ch));
        }
        Ok(Symbol(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::parse(s)
    }
}
