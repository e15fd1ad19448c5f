//! Lenient accessors for vendor JSON.
//!
//! Both Erply and Voog are loose about number types: the same field can arrive as `12`, `12.0`, `"12"` or `null`
//! depending on the account and API version. These helpers accept all of them.
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Integers, or numbers with no fractional part
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        },
        _ => None,
    }
}

/// Rounds to the nearest whole number
pub fn as_rounded_i64(value: &Value) -> Option<i64> {
    as_f64(value).filter(|f| f.is_finite()).map(|f| f.round() as i64)
}

pub fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// `true`, `1` and `"1"` are true. Everything else is false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s.trim() == "1",
        _ => false,
    }
}

/// Non-blank strings only. Numbers are rendered as strings.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Converts a decimal to a JSON number, for APIs that reject numeric strings.
pub fn decimal_to_json(value: Decimal) -> Value {
    serde_json::Number::from_str(&value.normalize().to_string()).map(Value::Number).unwrap_or(Value::Null)
}
