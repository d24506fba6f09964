//! Canonical statement records.
//!
//! Both providers' records are kept as separate families. Every numeric
//! field is optional since either upstream may omit it for young or foreign
//! filers; only the identity header (symbol, date, period) is mandatory.

use crate::core::decimal::decimal_from_value;
use crate::core::statement::Period;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

/// Read-only, name-based view over one upstream JSON record.
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    pub fn decimal(&self, key: &str) -> Option<Decimal> {
        decimal_from_value(self.map.get(key))
    }

    /// Non-empty text value. Numbers are rendered as text.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.map.get(key)? {
            Value::String(s) if !s.trim().is_empty() && s != "None" => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Accepts `YYYY-MM-DD` and date-times starting with one.
    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        let text = self.text(key)?;
        let prefix = text.get(..10)?;
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }
}

macro_rules! statement_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            header: $header:ty,
            $($field:ident => $key:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        pub struct $name {
            #[serde(flatten)]
            pub header: $header,
            $(
                #[serde(rename = $key)]
                pub $field: Option<Decimal>,
            )*
        }

        impl $name {
            /// Upstream field names carried by this record.
            pub const FIELDS: &'static [&'static str] = &[$($key),*];

            pub fn from_fields(header: $header, fields: &Fields<'_>) -> Self {
                Self {
                    header,
                    $($field: fields.decimal($key),)*
                }
            }

            /// Looks a numeric field up by its upstream name.
            pub fn field(&self, key: &str) -> Option<Decimal> {
                match key {
                    $($key => self.$field,)*
                    _ => None,
                }
            }
        }
    };
}

/// Identity of a primary-provider record. Upstream keys keep their own
/// names: older endpoints send `fillingDate`/`calendarYear`, newer ones
/// `filingDate`/`fiscalYear`, and only the keys present are serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHeader {
    pub symbol: String,
    pub date: NaiveDate,
    /// Marker as sent (`FY`, `Q1`..`Q4`), or the requested period when absent.
    pub period: String,
    /// Reporting interval derived from `period`.
    pub period_type: Period,
    pub reported_currency: Option<String>,
    pub cik: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filing_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filling_date: Option<String>,
    pub accepted_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvHeader {
    pub symbol: String,
    pub fiscal_date_ending: NaiveDate,
    pub period: Period,
    pub reported_currency: Option<String>,
}

statement_record! {
    /// Balance sheet as reported by the primary provider.
    pub struct BalanceSheet {
        header: FinancialHeader,
        cash_and_cash_equivalents => "cashAndCashEquivalents",
        short_term_investments => "shortTermInvestments",
        cash_and_short_term_investments => "cashAndShortTermInvestments",
        net_receivables => "netReceivables",
        inventory => "inventory",
        other_current_assets => "otherCurrentAssets",
        total_current_assets => "totalCurrentAssets",
        property_plant_equipment_net => "propertyPlantEquipmentNet",
        goodwill => "goodwill",
        intangible_assets => "intangibleAssets",
        goodwill_and_intangible_assets => "goodwillAndIntangibleAssets",
        long_term_investments => "longTermInvestments",
        tax_assets => "taxAssets",
        other_non_current_assets => "otherNonCurrentAssets",
        total_non_current_assets => "totalNonCurrentAssets",
        other_assets => "otherAssets",
        total_assets => "totalAssets",
        account_payables => "accountPayables",
        short_term_debt => "shortTermDebt",
        tax_payables => "taxPayables",
        deferred_revenue => "deferredRevenue",
        other_current_liabilities => "otherCurrentLiabilities",
        total_current_liabilities => "totalCurrentLiabilities",
        long_term_debt => "longTermDebt",
        deferred_revenue_non_current => "deferredRevenueNonCurrent",
        deferred_tax_liabilities_non_current => "deferredTaxLiabilitiesNonCurrent",
        other_non_current_liabilities => "otherNonCurrentLiabilities",
        total_non_current_liabilities => "totalNonCurrentLiabilities",
        other_liabilities => "otherLiabilities",
        capital_lease_obligations => "capitalLeaseObligations",
        total_liabilities => "totalLiabilities",
        preferred_stock => "preferredStock",
        common_stock => "commonStock",
        retained_earnings => "retainedEarnings",
        accumulated_other_comprehensive_income_loss => "accumulatedOtherComprehensiveIncomeLoss",
        total_stockholders_equity => "totalStockholdersEquity",
        total_equity => "totalEquity",
        minority_interest => "minorityInterest",
        total_liabilities_and_total_equity => "totalLiabilitiesAndTotalEquity",
        total_investments => "totalInvestments",
        total_debt => "totalDebt",
        net_debt => "netDebt",
    }
}

statement_record! {
    /// Cash flow statement as reported by the primary provider.
    pub struct CashFlow {
        header: FinancialHeader,
        net_income => "netIncome",
        depreciation_and_amortization => "depreciationAndAmortization",
        deferred_income_tax => "deferredIncomeTax",
        stock_based_compensation => "stockBasedCompensation",
        change_in_working_capital => "changeInWorkingCapital",
        accounts_receivables => "accountsReceivables",
        inventory => "inventory",
        accounts_payables => "accountsPayables",
        other_working_capital => "otherWorkingCapital",
        other_non_cash_items => "otherNonCashItems",
        net_cash_provided_by_operating_activities => "netCashProvidedByOperatingActivities",
        investments_in_property_plant_and_equipment => "investmentsInPropertyPlantAndEquipment",
        acquisitions_net => "acquisitionsNet",
        purchases_of_investments => "purchasesOfInvestments",
        sales_maturities_of_investments => "salesMaturitiesOfInvestments",
        other_investing_activities => "otherInvestingActivities",
        net_cash_provided_by_investing_activities => "netCashProvidedByInvestingActivities",
        net_debt_issuance => "netDebtIssuance",
        long_term_net_debt_issuance => "longTermNetDebtIssuance",
        short_term_net_debt_issuance => "shortTermNetDebtIssuance",
        net_stock_issuance => "netStockIssuance",
        net_common_stock_issuance => "netCommonStockIssuance",
        common_stock_issuance => "commonStockIssuance",
        common_stock_repurchased => "commonStockRepurchased",
        net_preferred_stock_issuance => "netPreferredStockIssuance",
        net_dividends_paid => "netDividendsPaid",
        common_dividends_paid => "commonDividendsPaid",
        preferred_dividends_paid => "preferredDividendsPaid",
        other_financing_activities => "otherFinancingActivities",
        net_cash_provided_by_financing_activities => "netCashProvidedByFinancingActivities",
        effect_of_forex_changes_on_cash => "effectOfForexChangesOnCash",
        net_change_in_cash => "netChangeInCash",
        cash_at_end_of_period => "cashAtEndOfPeriod",
        cash_at_beginning_of_period => "cashAtBeginningOfPeriod",
        operating_cash_flow => "operatingCashFlow",
        capital_expenditure => "capitalExpenditure",
        free_cash_flow => "freeCashFlow",
        income_taxes_paid => "incomeTaxesPaid",
        interest_paid => "interestPaid",
    }
}

statement_record! {
    /// Income statement as reported by the primary provider.
    pub struct IncomeStatement {
        header: FinancialHeader,
        revenue => "revenue",
        cost_of_revenue => "costOfRevenue",
        gross_profit => "grossProfit",
        gross_profit_ratio => "grossProfitRatio",
        research_and_development_expenses => "researchAndDevelopmentExpenses",
        general_and_administrative_expenses => "generalAndAdministrativeExpenses",
        selling_and_marketing_expenses => "sellingAndMarketingExpenses",
        selling_general_and_administrative_expenses => "sellingGeneralAndAdministrativeExpenses",
        other_expenses => "otherExpenses",
        operating_expenses => "operatingExpenses",
        cost_and_expenses => "costAndExpenses",
        interest_income => "interestIncome",
        interest_expense => "interestExpense",
        depreciation_and_amortization => "depreciationAndAmortization",
        ebitda => "ebitda",
        ebitda_ratio => "ebitdaratio",
        operating_income => "operatingIncome",
        operating_income_ratio => "operatingIncomeRatio",
        total_other_income_expenses_net => "totalOtherIncomeExpensesNet",
        income_before_tax => "incomeBeforeTax",
        income_before_tax_ratio => "incomeBeforeTaxRatio",
        income_tax_expense => "incomeTaxExpense",
        net_income => "netIncome",
        net_income_ratio => "netIncomeRatio",
        eps => "eps",
        eps_diluted => "epsdiluted",
        weighted_average_shs_out => "weightedAverageShsOut",
        weighted_average_shs_out_dil => "weightedAverageShsOutDil",
    }
}

statement_record! {
    /// Income statement as reported by the alternate provider.
    pub struct AvIncomeStatement {
        header: AvHeader,
        gross_profit => "grossProfit",
        total_revenue => "totalRevenue",
        cost_of_revenue => "costOfRevenue",
        cost_of_goods_and_services_sold => "costofGoodsAndServicesSold",
        operating_income => "operatingIncome",
        selling_general_and_administrative => "sellingGeneralAndAdministrative",
        research_and_development => "researchAndDevelopment",
        operating_expenses => "operatingExpenses",
        investment_income_net => "investmentIncomeNet",
        net_interest_income => "netInterestIncome",
        interest_income => "interestIncome",
        interest_expense => "interestExpense",
        non_interest_income => "nonInterestIncome",
        other_non_operating_income => "otherNonOperatingIncome",
        depreciation => "depreciation",
        depreciation_and_amortization => "depreciationAndAmortization",
        income_before_tax => "incomeBeforeTax",
        income_tax_expense => "incomeTaxExpense",
        interest_and_debt_expense => "interestAndDebtExpense",
        net_income_from_continuing_operations => "netIncomeFromContinuingOperations",
        comprehensive_income_net_of_tax => "comprehensiveIncomeNetOfTax",
        ebit => "ebit",
        ebitda => "ebitda",
        net_income => "netIncome",
    }
}

statement_record! {
    /// Balance sheet as reported by the alternate provider.
    pub struct AvBalanceSheet {
        header: AvHeader,
        total_assets => "totalAssets",
        total_current_assets => "totalCurrentAssets",
        cash_and_cash_equivalents_at_carrying_value => "cashAndCashEquivalentsAtCarryingValue",
        cash_and_short_term_investments => "cashAndShortTermInvestments",
        inventory => "inventory",
        current_net_receivables => "currentNetReceivables",
        total_non_current_assets => "totalNonCurrentAssets",
        property_plant_equipment => "propertyPlantEquipment",
        accumulated_depreciation_amortization_ppe => "accumulatedDepreciationAmortizationPPE",
        intangible_assets => "intangibleAssets",
        intangible_assets_excluding_goodwill => "intangibleAssetsExcludingGoodwill",
        goodwill => "goodwill",
        investments => "investments",
        long_term_investments => "longTermInvestments",
        short_term_investments => "shortTermInvestments",
        other_current_assets => "otherCurrentAssets",
        other_non_current_assets => "otherNonCurrentAssets",
        total_liabilities => "totalLiabilities",
        total_current_liabilities => "totalCurrentLiabilities",
        current_accounts_payable => "currentAccountsPayable",
        deferred_revenue => "deferredRevenue",
        current_debt => "currentDebt",
        short_term_debt => "shortTermDebt",
        total_non_current_liabilities => "totalNonCurrentLiabilities",
        capital_lease_obligations => "capitalLeaseObligations",
        long_term_debt => "longTermDebt",
        current_long_term_debt => "currentLongTermDebt",
        long_term_debt_noncurrent => "longTermDebtNoncurrent",
        short_long_term_debt_total => "shortLongTermDebtTotal",
        other_current_liabilities => "otherCurrentLiabilities",
        other_non_current_liabilities => "otherNonCurrentLiabilities",
        total_shareholder_equity => "totalShareholderEquity",
        treasury_stock => "treasuryStock",
        retained_earnings => "retainedEarnings",
        common_stock => "commonStock",
        common_stock_shares_outstanding => "commonStockSharesOutstanding",
    }
}

statement_record! {
    /// Cash flow statement as reported by the alternate provider.
    pub struct AvCashFlow {
        header: AvHeader,
        operating_cashflow => "operatingCashflow",
        payments_for_operating_activities => "paymentsForOperatingActivities",
        proceeds_from_operating_activities => "proceedsFromOperatingActivities",
        change_in_operating_liabilities => "changeInOperatingLiabilities",
        change_in_operating_assets => "changeInOperatingAssets",
        depreciation_depletion_and_amortization => "depreciationDepletionAndAmortization",
        capital_expenditures => "capitalExpenditures",
        change_in_receivables => "changeInReceivables",
        change_in_inventory => "changeInInventory",
        profit_loss => "profitLoss",
        cashflow_from_investment => "cashflowFromInvestment",
        cashflow_from_financing => "cashflowFromFinancing",
        proceeds_from_repayments_of_short_term_debt => "proceedsFromRepaymentsOfShortTermDebt",
        payments_for_repurchase_of_common_stock => "paymentsForRepurchaseOfCommonStock",
        payments_for_repurchase_of_equity => "paymentsForRepurchaseOfEquity",
        payments_for_repurchase_of_preferred_stock => "paymentsForRepurchaseOfPreferredStock",
        dividend_payout => "dividendPayout",
        dividend_payout_common_stock => "dividendPayoutCommonStock",
        dividend_payout_preferred_stock => "dividendPayoutPreferredStock",
        proceeds_from_issuance_of_common_stock => "proceedsFromIssuanceOfCommonStock",
        proceeds_from_issuance_of_long_term_debt_and_capital_securities_net => "proceedsFromIssuanceOfLongTermDebtAndCapitalSecuritiesNet",
        proceeds_from_issuance_of_preferred_stock => "proceedsFromIssuanceOfPreferredStock",
        proceeds_from_repurchase_of_equity => "proceedsFromRepurchaseOfEquity",
        proceeds_from_sale_of_treasury_stock => "proceedsFromSaleOfTreasuryStock",
        change_in_cash_and_cash_equivalents => "changeInCashAndCashEquivalents",
        change_in_exchange_rate => "changeInExchangeRate",
        net_income => "netIncome",
    }
}

/// Alternate provider envelope; annual and quarterly lists stay separate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvReports<T> {
    pub symbol: String,
    pub annual_reports: Vec<T>,
    pub quarterly_reports: Vec<T>,
}

impl<T> AvReports<T> {
    pub fn is_empty(&self) -> bool {
        self.annual_reports.is_empty() && self.quarterly_reports.is_empty()
    }
}

/// Normalized output of one statement fetch.
///
/// Serializes untagged: primary lists as a JSON array, alternate reports as
/// the `{symbol, annualReports, quarterlyReports}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Statements {
    Income(Vec<IncomeStatement>),
    BalanceSheet(Vec<BalanceSheet>),
    CashFlow(Vec<CashFlow>),
    AvIncome(AvReports<AvIncomeStatement>),
    AvBalanceSheet(AvReports<AvBalanceSheet>),
    AvCashFlow(AvReports<AvCashFlow>),
}

impl Statements {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of records, both alternate lists included.
    pub fn len(&self) -> usize {
        match self {
            Statements::Income(v) => v.len(),
            Statements::BalanceSheet(v) => v.len(),
            Statements::CashFlow(v) => v.len(),
            Statements::AvIncome(r) => r.annual_reports.len() + r.quarterly_reports.len(),
            Statements::AvBalanceSheet(r) => r.annual_reports.len() + r.quarterly_reports.len(),
            Statements::AvCashFlow(r) => r.annual_reports.len() + r.quarterly_reports.len(),
        }
    }
}
