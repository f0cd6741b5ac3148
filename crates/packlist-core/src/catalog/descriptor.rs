use crate::catalog::schema::{CanonicalField, ValueTransform};
use crate::format::FileFormat;
use regex::Regex;

/// A compiled, read-only model. Built once from a `ModelDef`.
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    pub id: String,
    pub description: Option<String>,
    pub format: FileFormat,
    pub establishment_number: Regex,
    pub fields: Vec<FieldSpec>,
    pub deprecated: bool,
    pub validate_country_of_origin: bool,
    pub find_unit_in_header: bool,
    pub blanket_nirms: Option<BlanketStatement>,
    pub invalid_sheets: Vec<String>,
    pub geometry: Option<PdfGeometry>,
}

impl ModelDescriptor {
    /// Fields that must all be found for the header test to pass.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| !f.optional)
    }

    pub fn field(&self, field: CanonicalField) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// Whether a sheet takes part in matching and mapping.
    pub fn accepts_sheet(&self, name: Option<&str>) -> bool {
        match name {
            Some(name) => !self
                .invalid_sheets
                .iter()
                .any(|s| s.trim().eq_ignore_ascii_case(name.trim())),
            None => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub field: CanonicalField,
    pub header: Regex,
    pub optional: bool,
    pub transform: Option<ValueTransform>,
    /// Inclusive x band (PDF only).
    pub x_range: Option<(f32, f32)>,
    pub value: Option<Regex>,
}

impl FieldSpec {
    pub fn contains_x(&self, x: f32) -> bool {
        match self.x_range {
            Some((min, max)) => x >= min && x <= max,
            None => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlanketStatement {
    pub pattern: Regex,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct PdfGeometry {
    pub min_headers_y: f32,
    pub max_headers_y: f32,
    pub footer: Option<Regex>,
    pub page_marker: Option<Regex>,
    pub min_row_cells: usize,
}

impl PdfGeometry {
    pub fn in_header_band(&self, y: f32) -> bool {
        y >= self.min_headers_y && y <= self.max_headers_y
    }
}

/// The ordered, immutable model registry.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    pub name: String,
    pub version: String,
    /// Already in dispatch priority order.
    pub(crate) models: Vec<ModelDescriptor>,
}

impl ModelCatalog {
    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    /// Non-deprecated models in priority order.
    pub fn dispatch_order(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter().filter(|m| !m.deprecated)
    }

    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.id == id)
    }
}
