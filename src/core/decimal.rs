//! Text and JSON to decimal conversion.
//!
//! Every provider field goes through here. Malformed non-empty text is treated
//! as absent and logged, never propagated as an error.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

/// Placeholders upstreams use in place of a number.
const ABSENT_MARKERS: [&str; 4] = ["none", "null", "-", "n/a"];

pub fn parse_decimal(text: Option<&str>) -> Option<Decimal> {
    let trimmed = text?.trim();
    if trimmed.is_empty()
        || ABSENT_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        return None;
    }

    match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(value = %trimmed, error = %e, "Unparseable decimal treated as absent");
            None
        }
    }
}

pub fn decimal_from_value(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Null => None,
        Value::String(text) => parse_decimal(Some(text)),
        Value::Number(number) => {
            let parsed = if let Some(i) = number.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = number.as_u64() {
                Some(Decimal::from(u))
            } else {
                number.as_f64().and_then(Decimal::from_f64)
            };
            if parsed.is_none() {
                warn!(value = %number, "Numeric value out of decimal range treated as absent");
            }
            parsed
        }
        other => {
            warn!(value = %other, "Non-numeric value treated as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_inputs() {
        assert_eq!(parse_decimal(None), None);
        assert_eq!(parse_decimal(Some("")), None);
        assert_eq!(parse_decimal(Some("   ")), None);
        assert_eq!(parse_decimal(Some("None")), None);
        assert_eq!(parse_decimal(Some("null")), None);
        assert_eq!(parse_decimal(Some("-")), None);
    }

    #[test]
    fn test_plain_and_scientific_text() {
        assert_eq!(
            parse_decimal(Some("123.45")),
            Some(Decimal::from_str("123.45").unwrap())
        );
        assert_eq!(
            parse_decimal(Some("-7502000000")),
            Some(Decimal::from(-7_502_000_000i64))
        );
        assert_eq!(
            parse_decimal(Some("1.5E3")),
            Some(Decimal::from(1500))
        );
    }

    #[test]
    fn test_malformed_text_is_absent() {
        assert_eq!(parse_decimal(Some("12abc")), None);
        assert_eq!(parse_decimal(Some("1,000")), None);
    }

    #[test]
    fn test_json_values() {
        assert_eq!(decimal_from_value(None), None);
        assert_eq!(decimal_from_value(Some(&Value::Null)), None);
        assert_eq!(
            decimal_from_value(Some(&json!(61860000000i64))),
            Some(Decimal::from(61_860_000_000i64))
        );
        assert_eq!(
            decimal_from_value(Some(&json!("61860000000"))),
            Some(Decimal::from(61_860_000_000i64))
        );
        assert_eq!(
            decimal_from_value(Some(&json!(0.25))),
            Some(Decimal::from_str("0.25").unwrap())
        );
        assert_eq!(decimal_from_value(Some(&json!(true))), None);
        assert_eq!(decimal_from_value(Some(&json!(["1"]))), None);
    }
}
