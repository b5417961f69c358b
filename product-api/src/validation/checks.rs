//! Field predicates used by rule sets.
//!
//! Every check receives the raw JSON value of one field (`None` when the field
//! is absent) and answers whether the field passes. String-based checks read
//! the field as text first, see [`as_text`].

use serde_json::Value;
use validator::{ValidateLength, ValidateRange};

/// Signature shared by all checks.
pub type Check = fn(Option<&Value>) -> bool;

/// Reads a field the way a form value is read: absent and `null` become the
/// empty string, scalars become their JSON text.
pub fn as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Loose numeric coercion: absent is NaN, `null` is zero, booleans are 1/0 and
/// blank strings are zero.
pub fn as_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(flag)) => f64::from(u8::from(*flag)),
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                0.0
            } else {
                text.parse().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Array(_)) | Some(Value::Object(_)) => f64::NAN,
    }
}

/// Boolean forms accepted from a request: JSON booleans and the texts
/// `true`, `false`, `1`, `0`.
pub fn as_bool(value: Option<&Value>) -> Option<bool> {
    match value {
        Some(Value::Bool(flag)) => Some(*flag),
        Some(Value::Array(_)) | Some(Value::Object(_)) | Some(Value::Null) | None => None,
        Some(scalar) => match as_text(Some(scalar)).as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
    }
}

fn all_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

/// Signed integer without leading zeros that fits in an `i64`.
pub fn is_int(value: Option<&Value>) -> bool {
    let text = as_text(value);
    let digits = text.strip_prefix(['+', '-']).unwrap_or(&text);

    let well_formed = !digits.is_empty()
        && all_digits(digits)
        && (digits == "0" || !digits.starts_with('0'));

    well_formed && text.parse::<i64>().is_ok()
}

/// Decimal literal: optional sign, optional integer part, optional point, and
/// at least one trailing digit.
pub fn is_numeric(value: Option<&Value>) -> bool {
    let text = as_text(value);
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(&text);

    let (integer, fraction) = unsigned.split_once('.').unwrap_or(("", unsigned));

    !fraction.is_empty() && all_digits(integer) && all_digits(fraction)
}

pub fn not_empty(value: Option<&Value>) -> bool {
    as_text(value).validate_length(Some(1), None, None)
}

pub fn is_positive(value: Option<&Value>) -> bool {
    let number = as_number(value);
    number.is_finite() && number.validate_range(None, None, Some(0.0), None)
}

pub fn is_boolean(value: Option<&Value>) -> bool {
    as_bool(value).is_some()
}
