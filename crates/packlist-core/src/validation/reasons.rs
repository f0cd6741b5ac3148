use crate::model::RowLocation;
use std::collections::BTreeMap;
use std::fmt::Write;

/// How many row locations a reason lists before summarising the rest.
pub const MAX_LISTED_LOCATIONS: usize = 3;

/// A failure category. Variant order is the order reasons are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureCategory {
    MissingEstablishmentNumber,
    NoItems,
    MultipleEstablishmentNumbers,
    MissingIdentifier,
    MissingDescription,
    MissingPackages,
    MissingNetWeight,
    MissingNetWeightUnit,
    InvalidCommodityCode,
    InvalidPackages,
    InvalidNetWeight,
    MissingNirms,
    InvalidNirms,
    MissingCountryOfOrigin,
    InvalidCountryOfOrigin,
    ProhibitedItem,
}

impl FailureCategory {
    pub fn message(&self) -> &'static str {
        match self {
            FailureCategory::MissingEstablishmentNumber => {
                "GB Place of Dispatch (Establishment) number is missing"
            }
            FailureCategory::NoItems => "No product line data found",
            FailureCategory::MultipleEstablishmentNumbers => {
                "Multiple GB Place of Dispatch (Establishment) numbers found on packing list"
            }
            FailureCategory::MissingIdentifier => "Identifier is missing",
            FailureCategory::MissingDescription => "Product description is missing",
            FailureCategory::MissingPackages => "No of packages is missing",
            FailureCategory::MissingNetWeight => "Total net weight is missing",
            FailureCategory::MissingNetWeightUnit => "Net Weight Unit of Measure (kg) not found",
            FailureCategory::InvalidCommodityCode => "Product code is invalid",
            FailureCategory::InvalidPackages => "No of packages is invalid",
            FailureCategory::InvalidNetWeight => "Total net weight is invalid",
            FailureCategory::MissingNirms => "NIRMS/Non-NIRMS goods not specified",
            FailureCategory::InvalidNirms => "Invalid entry for NIRMS/Non-NIRMS goods",
            FailureCategory::MissingCountryOfOrigin => "Missing Country of Origin",
            FailureCategory::InvalidCountryOfOrigin => "Invalid Country of Origin ISO Code",
            FailureCategory::ProhibitedItem => "Prohibited item identified on the packing list",
        }
    }
}

/// Failures collected while validating one packing list.
#[derive(Debug, Clone, Default)]
pub struct Failures {
    entries: BTreeMap<FailureCategory, Vec<RowLocation>>,
}

impl Failures {
    /// Record a list-level failure (no row location).
    pub fn flag(&mut self, category: FailureCategory) {
        self.entries.entry(category).or_default();
    }

    /// Record a failure at a row.
    pub fn record(&mut self, category: FailureCategory, location: &RowLocation) {
        self.entries
            .entry(category)
            .or_default()
            .push(location.clone());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, category: FailureCategory) -> bool {
        self.entries.contains_key(&category)
    }

    /// One line per category, in category order. `None` when nothing failed.
    pub fn summarize(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let mut out = String::new();
        for (category, locations) in &self.entries {
            if locations.is_empty() {
                let _ = writeln!(out, "{}.", category.message());
            } else {
                let _ = writeln!(
                    out,
                    "{} in {}.",
                    category.message(),
                    summarize_locations(locations)
                );
            }
        }
        Some(out)
    }
}

/// "a, b, c" for up to three locations; more become
/// "a, b, c in addition to N other locations".
pub fn summarize_locations(locations: &[RowLocation]) -> String {
    let listed = locations
        .iter()
        .take(MAX_LISTED_LOCATIONS)
        .map(RowLocation::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if locations.len() > MAX_LISTED_LOCATIONS {
        format!(
            "{listed} in addition to {} other locations",
            locations.len() - MAX_LISTED_LOCATIONS
        )
    } else {
        listed
    }
}
