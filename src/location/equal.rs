//! Structural equality for match results and other JSON-shaped values.
//!
//! `None` stands for an absent value, distinct from `Some(Value::Null)`.
//! Objects compare by key set and values, never by insertion order, so two
//! values built by different code paths with the same shape are equal.

use serde_json::{Number, Value};

/// Deep value equality between two optional values.
///
/// ```
/// use active_router::location::value_equal;
/// use serde_json::json;
///
/// assert!(value_equal(None, None));
/// assert!(!value_equal(None, Some(&json!(null))));
/// assert!(value_equal(Some(&json!([1, 2, 3])), Some(&json!([1, 2, 3]))));
/// ```
pub fn value_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => values_equal(a, b),
        _ => false,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, value)| b.get(key).is_some_and(|other| values_equal(value, other)))
        }
        _ => false,
    }
}

/// Numbers compare by value: `1` equals `1.0`.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
