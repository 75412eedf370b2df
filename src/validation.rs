/// Client-side validation and coercion of raw form values.
///
/// Every value arrives as typed text. Before a prediction is requested the form
/// must have no blank field, and each value is converted to a number when it
/// reads as one.
use crate::models::{FeatureValue, PredictRequest};
use serde_json::Number;

/// Maximum number of missing feature names listed in the validation message.
pub const MAX_LISTED_MISSING: usize = 8;

/// Names of the features whose trimmed value is empty, in form order.
pub fn missing_features<'a, I>(fields: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    fields
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
}

/// Builds the message listing missing features, capped at `MAX_LISTED_MISSING`.
pub fn missing_values_message(missing: &[&str]) -> String {
    let listed = missing
        .iter()
        .take(MAX_LISTED_MISSING)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    let ellipsis = if missing.len() > MAX_LISTED_MISSING {
        "..."
    } else {
        ""
    };
    format!("Missing values for: {}{}", listed, ellipsis)
}

/// Parses `raw` as a finite number using numeric-string syntax.
///
/// Accepts optional sign, decimal digits with an optional leading or trailing
/// dot, an exponent, and unsigned `0x`/`0o`/`0b` integer literals. Blank input is
/// never numeric. Integral values that fit exactly in an `i64` are returned as
/// integers so they serialize without a fractional part.
pub fn parse_numeric(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(n) = parse_radix_literal(trimmed) {
        return Some(n);
    }

    // Rejects "inf", "nan" and friends, which f64::from_str would otherwise accept.
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }

    let value: f64 = trimmed.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(number_from_f64(value))
}

fn parse_radix_literal(s: &str) -> Option<Number> {
    let (radix, digits) = match s.get(..2)? {
        "0x" | "0X" => (16, &s[2..]),
        "0o" | "0O" => (8, &s[2..]),
        "0b" | "0B" => (2, &s[2..]),
        _ => return None,
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok().map(Number::from)
}

fn number_from_f64(value: f64) -> Number {
    // 2^53: every integer below it is exactly representable in an f64.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() < MAX_EXACT {
        return Number::from(value as i64);
    }
    // Finite by construction, so from_f64 cannot fail; fall back to zero all the same.
    Number::from_f64(value).unwrap_or_else(|| Number::from(0))
}

/// Whether `raw` would be sent as a number.
pub fn is_numeric_like(raw: &str) -> bool {
    parse_numeric(raw).is_some()
}

/// Coerces a raw form value: numbers become `FeatureValue::Number`, anything else
/// is kept verbatim (untrimmed) as `FeatureValue::Text`.
pub fn coerce_value(raw: &str) -> FeatureValue {
    match parse_numeric(raw) {
        Some(n) => FeatureValue::Number(n),
        None => FeatureValue::Text(raw.to_string()),
    }
}

/// Validates and coerces a whole form into a prediction request.
///
/// # Returns
///
/// * `Ok(PredictRequest)` when every field is filled.
/// * `Err(String)` with the missing-values message otherwise.
pub fn build_request<'a, I>(fields: I) -> Result<PredictRequest, String>
where
    I: IntoIterator<Item = (&'a str, &'a str)> + Clone,
{
    let missing = missing_features(fields.clone());
    if !missing.is_empty() {
        return Err(missing_values_message(&missing));
    }

    Ok(PredictRequest::new(
        fields
            .into_iter()
            .map(|(name, raw)| (name.to_string(), coerce_value(raw))),
    ))
}
