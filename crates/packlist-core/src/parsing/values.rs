use crate::catalog::schema::ValueTransform;
use crate::extraction::Cell;
use crate::model::Quantity;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static TRAILING_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d[\d.]*)\s*([A-Za-z]+\.?)\s*$").expect("valid trailing unit regex")
});

static HEADER_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(kgs?|kilograms?|kilos?|grams?|g)\b").expect("valid header unit regex")
});

/// Parse a decimal value as written in a packing list cell.
///
/// Handles formats like:
/// - "10" -> 10
/// - " 5.5 " -> 5.5
/// - "-2" -> -2 (sign is kept; negativity is a validation concern)
/// - "1e3" -> 1000
///
/// Anything else, including "5,5" and "10 kg", is not a number.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

/// A cell as a quantity: numeric cells stay numbers, text is kept verbatim.
pub fn to_quantity(cell: &Cell) -> Quantity {
    match cell {
        Cell::Number(n) => Quantity::Number(*n),
        Cell::Text(s) => Quantity::Text(s.clone()),
    }
}

/// Apply a field transform to a raw text value.
///
/// Returns the transformed value and, for `StripUnit`, the unit token that
/// was removed.
pub fn apply_transform(value: &str, transform: &ValueTransform) -> (String, Option<String>) {
    match transform {
        ValueTransform::StripUnit => match TRAILING_UNIT.captures(value) {
            Some(caps) => (
                caps[1].to_string(),
                Some(caps[2].trim_end_matches('.').to_string()),
            ),
            None => (value.to_string(), None),
        },
        ValueTransform::StripPrefix(prefix) => {
            let trimmed = value.trim_start();
            let stripped = if trimmed.len() >= prefix.len()
                && trimmed.is_char_boundary(prefix.len())
                && trimmed[..prefix.len()].eq_ignore_ascii_case(prefix)
            {
                trimmed[prefix.len()..].trim_start()
            } else {
                trimmed
            };
            (stripped.to_string(), None)
        }
    }
}

/// The weight unit named in a header cell, e.g. "Net Weight (KG)" -> "kg".
pub fn unit_from_header(header: &str) -> Option<String> {
    HEADER_UNIT
        .captures(header)
        .map(|caps| caps[1].to_ascii_lowercase())
}
