//! NIRMS, country of origin and ineligible-item checks.

use crate::model::CanonicalItem;
use crate::rules::RuleCatalog;
use crate::validation::columns::normalized_commodity_code;
use crate::validation::reasons::{FailureCategory, Failures};
use regex::Regex;
use std::sync::LazyLock;

static NIRMS_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(yes|nirms|green|y|g)$|^green lane").expect("valid NIRMS regex")
});

static NON_NIRMS_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(no|red|n|r)$|^red lane|^non[- ]?nirms").expect("valid non-NIRMS regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NirmsStatus {
    Nirms,
    NonNirms,
    Invalid,
}

pub fn nirms_status(value: &str) -> NirmsStatus {
    let value = value.trim();
    if NIRMS_VALUE.is_match(value) {
        NirmsStatus::Nirms
    } else if NON_NIRMS_VALUE.is_match(value) {
        NirmsStatus::NonNirms
    } else {
        NirmsStatus::Invalid
    }
}

/// "X" (origin not declared) is always accepted.
pub fn is_origin_placeholder(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("x")
}

/// Country codes of a comma-separated origin value, if every one is known.
pub fn origin_codes<'a>(value: &'a str, rules: &RuleCatalog) -> Option<Vec<&'a str>> {
    let codes: Vec<&str> = value.split(',').map(str::trim).collect();
    if codes.iter().all(|c| !c.is_empty() && rules.is_iso_code(c)) {
        Some(codes)
    } else {
        None
    }
}

fn same_treatment(expected: Option<&str>, actual: Option<&str>) -> bool {
    let expected = expected.map(str::trim).filter(|t| !t.is_empty());
    let actual = actual.map(str::trim).filter(|t| !t.is_empty());
    expected == actual
}

/// Whether an item with this origin, code and treatment is ineligible.
///
/// Exception rules ("!T") for the country and commodity take over from the
/// standard rules: the item is then ineligible unless its treatment is T.
/// Without exceptions, a standard rule with no treatment matches any
/// treatment; otherwise the treatment must be equal.
pub fn is_ineligible(
    rules: &RuleCatalog,
    country: &str,
    commodity_code: &str,
    treatment: Option<&str>,
) -> bool {
    let (exceptions, standard): (Vec<_>, Vec<_>) = rules
        .matching_rules(country, commodity_code)
        .partition(|r| r.is_exception());

    if !exceptions.is_empty() {
        return !exceptions
            .iter()
            .any(|r| same_treatment(r.exception(), treatment));
    }

    standard.iter().any(|r| match r.type_of_treatment.as_deref() {
        None => true,
        Some(t) => same_treatment(Some(t), treatment),
    })
}

/// Country of origin and NIRMS checks for one item.
pub fn check_item(item: &CanonicalItem, rules: &RuleCatalog, failures: &mut Failures) {
    let loc = &item.row_location;

    let status = match item.nirms.as_deref() {
        None => {
            failures.record(FailureCategory::MissingNirms, loc);
            return;
        }
        Some(value) => nirms_status(value),
    };
    match status {
        NirmsStatus::Invalid => {
            failures.record(FailureCategory::InvalidNirms, loc);
            return;
        }
        NirmsStatus::NonNirms => return,
        NirmsStatus::Nirms => {}
    }

    let Some(origin) = item.country_of_origin.as_deref() else {
        failures.record(FailureCategory::MissingCountryOfOrigin, loc);
        return;
    };
    if is_origin_placeholder(origin) {
        return;
    }
    let Some(countries) = origin_codes(origin, rules) else {
        failures.record(FailureCategory::InvalidCountryOfOrigin, loc);
        return;
    };

    let Some(code) = item
        .commodity_code
        .as_deref()
        .and_then(normalized_commodity_code)
    else {
        return;
    };
    let treatment = item.type_of_treatment.as_deref();
    if countries
        .iter()
        .any(|country| is_ineligible(rules, country, &code, treatment))
    {
        failures.record(FailureCategory::ProhibitedItem, loc);
    }
}
