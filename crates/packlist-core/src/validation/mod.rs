pub mod columns;
pub mod origin;
pub mod reasons;

use crate::model::{BusinessChecks, CanonicalItem, ParsedPackingList, Quantity};
use crate::rules::RuleCatalog;
use reasons::{FailureCategory, Failures};

/// Collect every failure for a parsed packing list.
pub fn collect_failures(list: &ParsedPackingList, rules: &RuleCatalog) -> Failures {
    let mut failures = Failures::default();

    if list.registration_approval_number.is_none() {
        failures.flag(FailureCategory::MissingEstablishmentNumber);
    }
    if list.items.is_empty() {
        failures.flag(FailureCategory::NoItems);
    }
    if list.establishment_numbers.len() > 1 {
        failures.flag(FailureCategory::MultipleEstablishmentNumbers);
    }

    for item in &list.items {
        columns::check_item(item, list.unit_in_header, &mut failures);
        if list.validate_country_of_origin {
            origin::check_item(item, rules, &mut failures);
        }
    }

    failures
}

/// Business checks for a parsed packing list.
pub fn validate(list: &ParsedPackingList, rules: &RuleCatalog) -> BusinessChecks {
    let failures = collect_failures(list, rules);
    BusinessChecks {
        all_required_fields_present: failures.is_empty(),
        failure_reasons: failures.summarize(),
    }
}

/// Validate, store the result on the envelope, then clean the items.
pub fn validate_and_clean(list: &mut ParsedPackingList, rules: &RuleCatalog) {
    list.business_checks = validate(list, rules);
    remove_bad_data(&mut list.items);
    if !list.business_checks.all_required_fields_present {
        log::debug!(
            "{} failed validation: {:?}",
            list.parser_model,
            list.business_checks.failure_reasons
        );
    }
}

fn clean_quantity(value: Option<Quantity>) -> Option<Quantity> {
    let n = value?.numeric()?;
    if n.is_sign_negative() {
        None
    } else {
        Some(Quantity::Number(n))
    }
}

/// Turn parseable quantities into numbers and null the rest.
///
/// Runs after failure reasons are computed, so invalid values are still
/// reported before they are cleared.
pub fn remove_bad_data(items: &mut [CanonicalItem]) {
    for item in items {
        item.number_of_packages = clean_quantity(item.number_of_packages.take());
        item.total_net_weight_kg = clean_quantity(item.total_net_weight_kg.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParserModel, RowLocation};
    use rust_decimal_macros::dec;

    fn rules() -> RuleCatalog {
        RuleCatalog::builtin().unwrap()
    }

    fn item(row: usize) -> CanonicalItem {
        CanonicalItem {
            description: Some("Cheddar".into()),
            commodity_code: Some("04061000".into()),
            number_of_packages: Some(Quantity::Text("10".into())),
            total_net_weight_kg: Some(Quantity::Text("5.5".into())),
            total_net_weight_unit: Some("kg".into()),
            country_of_origin: Some("GB".into()),
            type_of_treatment: Some("Chilled".into()),
            nirms: Some("Non-NIRMS".into()),
            ..CanonicalItem::new(RowLocation::sheet(Some("Sheet1"), row))
        }
    }

    fn list(items: Vec<CanonicalItem>) -> ParsedPackingList {
        ParsedPackingList {
            registration_approval_number: Some("RMS-GB-000040-001".into()),
            items,
            business_checks: BusinessChecks::default(),
            parser_model: ParserModel::Model("KESTREL1".into()),
            establishment_numbers: vec!["RMS-GB-000040-001".into()],
            dispatch_location_number: None,
            unit_in_header: true,
            validate_country_of_origin: true,
        }
    }

    #[test]
    fn test_valid_list() {
        let checks = validate(&list(vec![item(2)]), &rules());
        assert!(checks.all_required_fields_present);
        assert!(checks.failure_reasons.is_none());
    }

    #[test]
    fn test_multiple_establishment_numbers_fail_valid_items() {
        let mut l = list(vec![item(2)]);
        l.establishment_numbers.push("RMS-GB-000040-002".into());
        let checks = validate(&l, &rules());
        assert!(!checks.all_required_fields_present);
        assert_eq!(
            checks.failure_reasons.as_deref(),
            Some("Multiple GB Place of Dispatch (Establishment) numbers found on packing list.\n")
        );
    }

    #[test]
    fn test_missing_number_and_empty_list() {
        let mut l = list(vec![]);
        l.registration_approval_number = None;
        l.establishment_numbers.clear();
        let reasons = validate(&l, &rules()).failure_reasons.unwrap();
        assert_eq!(
            reasons,
            "GB Place of Dispatch (Establishment) number is missing.\nNo product line data found.\n"
        );
    }

    #[test]
    fn test_origin_checks_only_when_enabled() {
        let mut bad = item(2);
        bad.nirms = None;
        let mut l = list(vec![bad]);
        assert!(validate(&l, &rules())
            .failure_reasons
            .unwrap()
            .contains("NIRMS/Non-NIRMS goods not specified"));

        l.validate_country_of_origin = false;
        assert!(validate(&l, &rules()).all_required_fields_present);
    }

    #[test]
    fn test_four_offending_rows_summarised() {
        let items: Vec<_> = (2..=5)
            .map(|row| {
                let mut i = item(row);
                i.description = None;
                i
            })
            .collect();
        let reasons = validate(&list(items), &rules()).failure_reasons.unwrap();
        assert_eq!(
            reasons,
            "Product description is missing in sheet \"Sheet1\" row 2, sheet \"Sheet1\" row 3, \
             sheet \"Sheet1\" row 4 in addition to 1 other locations.\n"
        );
    }

    #[test]
    fn test_remove_bad_data() {
        let mut items = vec![item(2), item(3), item(4)];
        items[1].number_of_packages = Some(Quantity::Text("ten".into()));
        items[2].total_net_weight_kg = Some(Quantity::Number(dec!(-1)));

        let mut l = list(items);
        validate_and_clean(&mut l, &rules());
        let reasons = l.business_checks.failure_reasons.unwrap();
        assert!(reasons.contains("No of packages is invalid in sheet \"Sheet1\" row 3."));
        assert!(reasons.contains("Total net weight is invalid in sheet \"Sheet1\" row 4."));

        assert_eq!(l.items[0].number_of_packages, Some(Quantity::Number(dec!(10))));
        assert_eq!(l.items[0].total_net_weight_kg, Some(Quantity::Number(dec!(5.5))));
        assert_eq!(l.items[1].number_of_packages, None);
        assert_eq!(l.items[2].total_net_weight_kg, None);
    }
}
