//! Label value parsing
//!
//! Extracts a `(magnitude, unit)` pair from free-form label text such as
//! `"5g"`, `"100 mg"` or `"80%"`. Unit conversion lives in [`super::units`].

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::units::{to_canonical, NutrientDimension};

/// Leading number (digits with at most one decimal point) and an optional
/// alphabetic or percent suffix. Anything after the first pair is ignored.
static QUANTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d*\.?\d+)\s*([A-Za-zµμ%]*)").expect("static regex")
});

/// A number and the unit suffix that followed it
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuantity {
    pub magnitude: f64,
    /// Raw suffix as written, possibly empty
    pub unit: String,
}

/// Parse the leading quantity out of `text`
///
/// Examples:
/// - "5g" -> ParsedQuantity { magnitude: 5.0, unit: "g" }
/// - " 100 mg " -> ParsedQuantity { magnitude: 100.0, unit: "mg" }
/// - "12.5" -> ParsedQuantity { magnitude: 12.5, unit: "" }
/// - "approx 5g" -> None
pub fn parse_quantity(text: &str) -> Option<ParsedQuantity> {
    let caps = QUANTITY_PATTERN.captures(text.trim())?;
    let magnitude = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let unit = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

    Some(ParsedQuantity {
        magnitude,
        unit: unit.to_string(),
    })
}

/// Read the quantity carried by a raw record value
///
/// Strings go through [`parse_quantity`]. Bare numbers are taken as-is with
/// no unit, except negative or non-finite ones. Everything else carries no
/// quantity.
pub fn raw_quantity(raw: &Value) -> Option<ParsedQuantity> {
    match raw {
        Value::String(s) => parse_quantity(s),
        Value::Number(n) => {
            let magnitude = n.as_f64().filter(|v| v.is_finite() && *v >= 0.0)?;
            Some(ParsedQuantity {
                magnitude,
                unit: String::new(),
            })
        }
        _ => None,
    }
}

/// Normalize a raw value into the canonical unit of `dimension`
///
/// Missing, empty and unparseable values all come back as `0.0`.
pub fn normalize(raw: Option<&Value>, dimension: NutrientDimension) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };

    match raw_quantity(raw) {
        Some(parsed) => to_canonical(parsed.magnitude, &parsed.unit, dimension),
        None => {
            tracing::trace!("No quantity in {} for {}, using 0", raw, dimension.as_str());
            0.0
        }
    }
}
