use crate::model::{CanonicalItem, Quantity};
use crate::validation::reasons::{FailureCategory, Failures};

/// No commodity code, and not both nature of products and treatment.
pub fn has_missing_identifier(item: &CanonicalItem) -> bool {
    item.commodity_code.is_none()
        && !(item.nature_of_products.is_some() && item.type_of_treatment.is_some())
}

/// Commodity code with whitespace removed, if it is all digits.
pub fn normalized_commodity_code(code: &str) -> Option<String> {
    let digits: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}

pub fn has_invalid_commodity_code(item: &CanonicalItem) -> bool {
    item.commodity_code
        .as_deref()
        .is_some_and(|c| normalized_commodity_code(c).is_none())
}

/// Present but not a non-negative number.
pub fn is_invalid_quantity(value: Option<&Quantity>) -> bool {
    match value {
        None => false,
        Some(q) => q.numeric().is_none_or(|n| n.is_sign_negative()),
    }
}

/// Per-item presence and type checks.
pub fn check_item(item: &CanonicalItem, unit_in_header: bool, failures: &mut Failures) {
    let loc = &item.row_location;

    if has_missing_identifier(item) {
        failures.record(FailureCategory::MissingIdentifier, loc);
    }
    if item.description.is_none() {
        failures.record(FailureCategory::MissingDescription, loc);
    }
    if item.number_of_packages.is_none() {
        failures.record(FailureCategory::MissingPackages, loc);
    }
    if item.total_net_weight_kg.is_none() {
        failures.record(FailureCategory::MissingNetWeight, loc);
    }
    if !unit_in_header && item.total_net_weight_unit.is_none() {
        failures.record(FailureCategory::MissingNetWeightUnit, loc);
    }

    if has_invalid_commodity_code(item) {
        failures.record(FailureCategory::InvalidCommodityCode, loc);
    }
    if is_invalid_quantity(item.number_of_packages.as_ref()) {
        failures.record(FailureCategory::InvalidPackages, loc);
    }
    if is_invalid_quantity(item.total_net_weight_kg.as_ref()) {
        failures.record(FailureCategory::InvalidNetWeight, loc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RowLocation;
    use rust_decimal_macros::dec;

    fn item() -> CanonicalItem {
        CanonicalItem {
            description: Some("Cheddar".into()),
            commodity_code: Some("0406 10 00".into()),
            number_of_packages: Some(Quantity::Number(dec!(3))),
            total_net_weight_kg: Some(Quantity::Text("12.5".into())),
            total_net_weight_unit: Some("kg".into()),
            ..CanonicalItem::new(RowLocation::sheet(None, 2))
        }
    }

    #[test]
    fn test_complete_item_passes() {
        let mut failures = Failures::default();
        check_item(&item(), false, &mut failures);
        assert!(failures.is_empty());
    }

    #[test]
    fn test_identifier_from_nature_and_treatment() {
        let mut i = item();
        i.commodity_code = None;
        assert!(has_missing_identifier(&i));
        i.nature_of_products = Some("Dairy".into());
        assert!(has_missing_identifier(&i));
        i.type_of_treatment = Some("Chilled".into());
        assert!(!has_missing_identifier(&i));
    }

    #[test]
    fn test_commodity_code_must_be_digits() {
        assert_eq!(normalized_commodity_code(" 0406 10 00 ").as_deref(), Some("04061000"));
        assert!(normalized_commodity_code("0406-10").is_none());
        assert!(normalized_commodity_code("  ").is_none());
    }

    #[test]
    fn test_invalid_quantities() {
        assert!(is_invalid_quantity(Some(&Quantity::Text("ten".into()))));
        assert!(is_invalid_quantity(Some(&Quantity::Number(dec!(-1)))));
        assert!(!is_invalid_quantity(Some(&Quantity::Number(dec!(0)))));
        assert!(!is_invalid_quantity(None));
    }

    #[test]
    fn test_unit_skipped_when_in_header() {
        let mut i = item();
        i.total_net_weight_unit = None;

        let mut failures = Failures::default();
        check_item(&i, true, &mut failures);
        assert!(failures.is_empty());

        check_item(&i, false, &mut failures);
        assert!(failures.contains(FailureCategory::MissingNetWeightUnit));
    }
}
