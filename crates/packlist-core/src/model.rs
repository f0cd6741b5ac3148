use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A packages or weight value as read from the document.
///
/// Non-numeric text is kept until validation so it can be reported, then
/// cleared by `validation::remove_bad_data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(Decimal),
    Text(String),
}

impl Quantity {
    /// Numeric value, if the raw value is (or parses as) a number.
    pub fn numeric(&self) -> Option<Decimal> {
        match self {
            Quantity::Number(n) => Some(*n),
            Quantity::Text(s) => crate::parsing::values::parse_decimal(s),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.numeric().is_some_and(|n| n.is_zero())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Number(n) => write!(f, "{}", n.normalize()),
            Quantity::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Where an item came from: sheet (spreadsheet), page (PDF) or neither (CSV).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    /// 1-based.
    pub row_number: usize,
}

impl RowLocation {
    pub fn sheet(name: Option<&str>, row_number: usize) -> RowLocation {
        RowLocation {
            sheet: name.map(str::to_string),
            page: None,
            row_number,
        }
    }

    pub fn page(page: usize, row_number: usize) -> RowLocation {
        RowLocation {
            sheet: None,
            page: Some(page),
            row_number,
        }
    }
}

impl fmt::Display for RowLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.sheet, self.page) {
            (Some(sheet), _) => write!(f, "sheet \"{}\" row {}", sheet, self.row_number),
            (None, Some(page)) => write!(f, "page {} row {}", page, self.row_number),
            (None, None) => write!(f, "row {}", self.row_number),
        }
    }
}

/// One packing list line in the canonical schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalItem {
    pub description: Option<String>,
    pub commodity_code: Option<String>,
    pub number_of_packages: Option<Quantity>,
    pub total_net_weight_kg: Option<Quantity>,
    pub total_net_weight_unit: Option<String>,
    pub nature_of_products: Option<String>,
    pub type_of_treatment: Option<String>,
    pub country_of_origin: Option<String>,
    pub nirms: Option<String>,
    pub row_location: RowLocation,
}

impl CanonicalItem {
    pub fn new(row_location: RowLocation) -> CanonicalItem {
        CanonicalItem {
            row_location,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessChecks {
    pub all_required_fields_present: bool,
    pub failure_reasons: Option<String>,
}

/// The parser model that produced an envelope: a catalog model id or a
/// no-match sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParserModel {
    Model(String),
    /// No establishment number in a spreadsheet.
    NoRemos,
    NoRemosCsv,
    NoRemosPdf,
    /// The filename extension is not a supported format.
    Unrecognised,
    /// No model matched, or processing failed.
    NoMatch,
}

impl ParserModel {
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, ParserModel::Model(_))
    }
}

impl fmt::Display for ParserModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserModel::Model(id) => write!(f, "{id}"),
            ParserModel::NoRemos => write!(f, "NOREMOS"),
            ParserModel::NoRemosCsv => write!(f, "NOREMOSCSV"),
            ParserModel::NoRemosPdf => write!(f, "NOREMOSPDF"),
            ParserModel::Unrecognised => write!(f, "UNRECOGNISED"),
            ParserModel::NoMatch => write!(f, "NOMATCH"),
        }
    }
}

impl From<String> for ParserModel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "NOREMOS" => ParserModel::NoRemos,
            "NOREMOSCSV" => ParserModel::NoRemosCsv,
            "NOREMOSPDF" => ParserModel::NoRemosPdf,
            "UNRECOGNISED" => ParserModel::Unrecognised,
            "NOMATCH" => ParserModel::NoMatch,
            _ => ParserModel::Model(s),
        }
    }
}

impl From<ParserModel> for String {
    fn from(m: ParserModel) -> Self {
        m.to_string()
    }
}

/// The result envelope: one per processed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPackingList {
    pub registration_approval_number: Option<String>,
    pub items: Vec<CanonicalItem>,
    pub business_checks: BusinessChecks,
    #[serde(rename = "parserModel")]
    pub parser_model: ParserModel,
    pub establishment_numbers: Vec<String>,
    #[serde(rename = "dispatchLocationNumber")]
    pub dispatch_location_number: Option<String>,
    #[serde(rename = "unitInHeader", default)]
    pub unit_in_header: bool,
    #[serde(rename = "validateCountryOfOrigin", default)]
    pub validate_country_of_origin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_row_location_display() {
        assert_eq!(
            RowLocation::sheet(Some("Input Data"), 4).to_string(),
            "sheet \"Input Data\" row 4"
        );
        assert_eq!(RowLocation::page(2, 7).to_string(), "page 2 row 7");
        assert_eq!(RowLocation::sheet(None, 3).to_string(), "row 3");
    }

    #[test]
    fn test_new_item_only_carries_its_location() {
        let item = CanonicalItem::new(RowLocation::page(3, 12));
        assert_eq!(item.row_location, RowLocation::page(3, 12));
        assert!(item.description.is_none());
        assert!(item.number_of_packages.is_none());
        assert!(item.nirms.is_none());
        assert_eq!(RowLocation::default().to_string(), "row 0");
    }

    #[test]
    fn test_parser_model_round_trips_as_string() {
        let json = serde_json::to_string(&ParserModel::NoRemosCsv).unwrap();
        assert_eq!(json, "\"NOREMOSCSV\"");
        let back: ParserModel = serde_json::from_str("\"KESTREL1\"").unwrap();
        assert_eq!(back, ParserModel::Model("KESTREL1".into()));
        assert!(!back.is_sentinel());
    }

    #[test]
    fn test_quantity_numeric() {
        assert_eq!(Quantity::Text(" 5.5 ".into()).numeric(), Some(dec!(5.5)));
        assert_eq!(Quantity::Text("five".into()).numeric(), None);
        assert!(Quantity::Number(dec!(0)).is_zero());
        assert!(Quantity::Text("0".into()).is_zero());
    }
}
