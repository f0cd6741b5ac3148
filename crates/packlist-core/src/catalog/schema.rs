use crate::format::FileFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A model catalog as stored in JSON: the models plus their dispatch order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDef {
    pub name: String,
    pub version: String,
    /// Model ids in dispatch order. First match wins.
    pub priority: Vec<String>,
    pub models: Vec<ModelDef>,
}

/// One retailer layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDef {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub format: FileFormat,
    /// Regex for this retailer's establishment number (searched, not anchored).
    pub establishment_number: String,
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub validate_country_of_origin: bool,
    /// The net weight unit is in the weight column header, not in each row.
    #[serde(default)]
    pub find_unit_in_header: bool,
    #[serde(default)]
    pub blanket_nirms: Option<BlanketDef>,
    /// Sheets to ignore entirely (cover sheets, instructions).
    #[serde(default)]
    pub invalid_sheets: Vec<String>,
    /// Required for PDF models.
    #[serde(default)]
    pub geometry: Option<GeometryDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Description,
    CommodityCode,
    NumberOfPackages,
    TotalNetWeightKg,
    TotalNetWeightUnit,
    NatureOfProducts,
    TypeOfTreatment,
    CountryOfOrigin,
    Nirms,
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CanonicalField::Description => "description",
            CanonicalField::CommodityCode => "commodity_code",
            CanonicalField::NumberOfPackages => "number_of_packages",
            CanonicalField::TotalNetWeightKg => "total_net_weight_kg",
            CanonicalField::TotalNetWeightUnit => "total_net_weight_unit",
            CanonicalField::NatureOfProducts => "nature_of_products",
            CanonicalField::TypeOfTreatment => "type_of_treatment",
            CanonicalField::CountryOfOrigin => "country_of_origin",
            CanonicalField::Nirms => "nirms",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub field: CanonicalField,
    /// Regex the header cell must match (case-insensitive).
    pub header: String,
    /// Optional columns do not take part in header matching.
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub transform: Option<ValueTransform>,
    /// PDF only: horizontal band the column occupies.
    #[serde(default)]
    pub x_min: Option<f32>,
    #[serde(default)]
    pub x_max: Option<f32>,
    /// PDF only: fragments in the band must match this to be kept.
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTransform {
    /// "12.5 kg" -> "12.5"; the unit token is kept for the unit field.
    StripUnit,
    /// Remove a fixed leading label, e.g. "CoO: GB" -> "GB".
    StripPrefix(String),
}

/// A document-wide statement that stands in for a per-row NIRMS column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlanketDef {
    pub pattern: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeometryDef {
    pub min_headers_y: f32,
    pub max_headers_y: f32,
    /// Marks the end of the table; nothing after it is row data.
    #[serde(default)]
    pub footer: Option<String>,
    /// Marks continuation pages that carry no header band.
    #[serde(default)]
    pub page_marker: Option<String>,
    /// Rows with fewer fragments than this end the table on that page.
    pub min_row_cells: usize,
}
