//! Turns a raw upstream response into a parsed payload or a classified error.
//!
//! Both upstreams answer HTTP 200 for many logical failures (quota, unknown
//! function, bad key), so the body is always inspected, even on success
//! statuses.

use crate::core::error::FetchError;
use crate::core::statement::ProviderKind;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// In-band fields carrying an explicit error.
const ERROR_FIELDS: [&str; 2] = ["Error Message", "error"];
/// In-band fields carrying informational or quota notices.
const NOTICE_FIELDS: [&str; 2] = ["Note", "Information"];

const QUOTA_PHRASES: [&str; 4] = [
    "rate limit",
    "premium endpoint",
    "call frequency",
    "limit reach",
];
const REJECTION_PHRASES: [&str; 2] = ["invalid api call", "invalid api key"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phrase {
    Quota,
    Rejection,
}

fn find_phrase(text: &str) -> Option<Phrase> {
    let lower = text.to_lowercase();
    if REJECTION_PHRASES.iter().any(|p| lower.contains(p)) {
        Some(Phrase::Rejection)
    } else if QUOTA_PHRASES.iter().any(|p| lower.contains(p)) {
        Some(Phrase::Quota)
    } else {
        None
    }
}

fn phrase_error(phrase: Phrase, status: u16, text: &str) -> FetchError {
    match phrase {
        Phrase::Quota => FetchError::quota_exceeded(text),
        Phrase::Rejection => FetchError::upstream_rejected(status, text),
    }
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Matches the well-known in-band fields on the top-level object only.
fn in_band_error(status: u16, object: &Map<String, Value>) -> Option<FetchError> {
    if let Some(message) = ERROR_FIELDS.iter().find_map(|f| object.get(*f)) {
        return Some(FetchError::upstream_rejected(status, field_text(message)));
    }

    let notice = NOTICE_FIELDS.iter().find_map(|f| object.get(*f))?;
    let text = field_text(notice);
    match find_phrase(&text) {
        Some(Phrase::Rejection) => Some(FetchError::upstream_rejected(status, text)),
        _ => Some(FetchError::quota_exceeded(text)),
    }
}

/// Checks the identity shape each provider must deliver on success.
fn check_structure(provider: ProviderKind, payload: &Value) -> Result<(), String> {
    match provider {
        ProviderKind::Financial => {
            let items = payload
                .as_array()
                .ok_or_else(|| "expected a list of statements".to_string())?;
            if let Some(index) = items.iter().position(|item| !item.is_object()) {
                return Err(format!("statement at index {index} is not an object"));
            }
            Ok(())
        }
        ProviderKind::AlphaVantage => {
            let object = payload
                .as_object()
                .ok_or_else(|| "expected a report envelope".to_string())?;
            let has_symbol = object
                .get("symbol")
                .and_then(Value::as_str)
                .is_some_and(|s| !s.trim().is_empty());
            if !has_symbol {
                return Err("missing symbol".to_string());
            }
            let has_reports = ["annualReports", "quarterlyReports"]
                .iter()
                .any(|key| object.get(*key).is_some_and(Value::is_array));
            if !has_reports {
                return Err("missing annualReports and quarterlyReports".to_string());
            }
            Ok(())
        }
    }
}

pub fn classify(provider: ProviderKind, status: u16, body: &str) -> Result<Value, FetchError> {
    if !(200..300).contains(&status) {
        warn!(%provider, status, "Upstream returned an HTTP error");
        return Err(FetchError::upstream_rejected(status, body));
    }

    let payload: Value = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(e) => {
            if let Some(phrase) = find_phrase(body) {
                warn!(%provider, ?phrase, "Upstream returned a plain-text notice");
                return Err(phrase_error(phrase, status, body));
            }
            warn!(%provider, error = %e, "Upstream body is not valid JSON");
            return Err(FetchError::parse(e.to_string()));
        }
    };

    if let Some(err) = payload
        .as_object()
        .and_then(|object| in_band_error(status, object))
    {
        warn!(%provider, kind = err.kind(), "Upstream signalled an in-band error");
        return Err(err);
    }

    if let Err(reason) = check_structure(provider, &payload) {
        // Substring search only runs on payloads that are not statement data.
        if let Some(phrase) = find_phrase(body) {
            warn!(%provider, ?phrase, "Upstream notice found in unexpected payload");
            return Err(phrase_error(phrase, status, body));
        }
        warn!(%provider, %reason, "Upstream payload failed structural check");
        return Err(FetchError::malformed(reason));
    }

    debug!(%provider, "Upstream response classified as success");
    Ok(payload)
}
