//! Ordered field-name probing over loosely-typed upstream JSON.
//!
//! Each helper walks its candidate keys in order and stops at the first key
//! holding a usable value. "Usable" mirrors truthiness: empty strings, zero
//! and NaN fall through to the next candidate.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

pub fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(*key)
            && let Some(s) = as_string(v)
        {
            return Some(s);
        }
    }
    None
}

/// First candidate that is a non-zero number or numeric string.
pub fn pick_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    for key in keys {
        if let Some(v) = value.get(*key)
            && let Some(num) = as_f64(v)
            && num != 0.0
        {
            return Some(num);
        }
    }
    None
}

/// Only JSON numbers count; `"-3.5"` as a string is not a market line.
pub fn strict_f64(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
}

/// The first present candidate decides: an unparseable timestamp does not
/// fall through to later keys.
pub fn pick_timestamp(value: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    for key in keys {
        let Some(v) = value.get(*key) else {
            continue;
        };
        match v {
            Value::Null | Value::Bool(false) => continue,
            Value::String(s) if s.trim().is_empty() => continue,
            Value::Number(n) if n.as_f64() == Some(0.0) => continue,
            Value::String(s) => return parse_timestamp(s),
            Value::Number(n) => {
                return n
                    .as_i64()
                    .and_then(|ms| Utc.timestamp_millis_opt(ms).single());
            }
            _ => return None,
        }
    }
    None
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    let num = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    num.is_finite().then_some(num)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn pick_string_skips_empty_candidates() {
        let v = json!({ "team": "", "school": "Georgia" });
        assert_eq!(pick_string(&v, &["team", "school"]), Some("Georgia".to_string()));
        assert_eq!(pick_string(&v, &["name"]), None);
    }

    #[test]
    fn pick_f64_accepts_numeric_strings_and_skips_zero() {
        let v = json!({ "rank": 0, "current": "7" });
        assert_eq!(pick_f64(&v, &["rank", "current"]), Some(7.0));
        assert_eq!(pick_f64(&json!({ "rank": "n/a" }), &["rank"]), None);
    }

    #[test]
    fn strict_f64_rejects_strings() {
        let v = json!({ "spread": "-3.5", "total": 51.5 });
        assert_eq!(strict_f64(&v, "spread"), None);
        assert_eq!(strict_f64(&v, "total"), Some(51.5));
    }

    #[test]
    fn first_present_timestamp_wins_even_if_invalid() {
        let v = json!({ "start_date": "garbage", "startDate": "2025-09-06T16:00:00.000Z" });
        assert_eq!(pick_timestamp(&v, &["start_date", "startDate"]), None);

        let v = json!({ "start_date": null, "startDate": "2025-09-06T16:00:00.000Z" });
        let ts = pick_timestamp(&v, &["start_date", "startDate"]).expect("timestamp");
        assert_eq!(ts.timestamp(), 1_757_174_400);
    }
}
