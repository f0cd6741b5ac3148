pub mod builtin;
pub mod descriptor;
pub mod schema;

use crate::error::PacklistError;
use crate::format::FileFormat;
use descriptor::{BlanketStatement, FieldSpec, ModelCatalog, ModelDescriptor, PdfGeometry};
use regex::{Regex, RegexBuilder};
use schema::{CanonicalField, CatalogDef, FieldDef, GeometryDef, ModelDef};
use std::collections::HashSet;
use std::path::Path;

/// Load a model catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<ModelCatalog, PacklistError> {
    let content = std::fs::read_to_string(path).map_err(|e| PacklistError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let def: CatalogDef = serde_json::from_str(&content).map_err(|e| PacklistError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    compile_catalog(def)
}

/// Parse a model catalog from a JSON string (no file path context).
pub fn parse_catalog_str(json: &str) -> Result<ModelCatalog, PacklistError> {
    let def: CatalogDef = serde_json::from_str(json)?;
    compile_catalog(def)
}

/// Validate a catalog definition and compile its patterns.
pub fn compile_catalog(def: CatalogDef) -> Result<ModelCatalog, PacklistError> {
    if def.models.is_empty() {
        return Err(PacklistError::CatalogInvalid("models must not be empty".into()));
    }

    let mut ids = HashSet::new();
    for model in &def.models {
        if model.id.trim().is_empty() {
            return Err(PacklistError::CatalogInvalid("model id must not be empty".into()));
        }
        if !ids.insert(model.id.as_str()) {
            return Err(PacklistError::CatalogInvalid(format!(
                "duplicate model id '{}'",
                model.id
            )));
        }
    }

    let mut listed = HashSet::new();
    for id in &def.priority {
        if !ids.contains(id.as_str()) {
            return Err(PacklistError::CatalogInvalid(format!(
                "priority list names unknown model '{id}'"
            )));
        }
        if !listed.insert(id.as_str()) {
            return Err(PacklistError::CatalogInvalid(format!(
                "model '{id}' appears twice in the priority list"
            )));
        }
    }
    if let Some(missing) = def.models.iter().find(|m| !listed.contains(m.id.as_str())) {
        return Err(PacklistError::CatalogInvalid(format!(
            "model '{}' is missing from the priority list",
            missing.id
        )));
    }

    let mut models = Vec::with_capacity(def.models.len());
    for id in &def.priority {
        if let Some(model) = def.models.iter().find(|m| &m.id == id) {
            models.push(compile_model(model)?);
        }
    }

    Ok(ModelCatalog {
        name: def.name,
        version: def.version,
        models,
    })
}

fn compile_model(def: &ModelDef) -> Result<ModelDescriptor, PacklistError> {
    let invalid = |reason: String| PacklistError::CatalogInvalid(format!("model '{}': {reason}", def.id));

    if def.format == FileFormat::Unknown {
        return Err(invalid("format must be spreadsheet, csv or pdf".into()));
    }
    if def.fields.is_empty() {
        return Err(invalid("fields must not be empty".into()));
    }
    if def.fields.iter().all(|f| f.optional) {
        return Err(invalid("at least one field must be required".into()));
    }

    let mut seen = HashSet::new();
    for field in &def.fields {
        if !seen.insert(field.field) {
            return Err(invalid(format!("field '{}' is defined twice", field.field)));
        }
    }

    if def.find_unit_in_header && !seen.contains(&CanonicalField::TotalNetWeightKg) {
        return Err(invalid(
            "find_unit_in_header needs a total_net_weight_kg field".into(),
        ));
    }

    let is_pdf = def.format == FileFormat::Pdf;
    let geometry = match (&def.geometry, is_pdf) {
        (Some(g), true) => Some(compile_geometry(g).map_err(invalid)?),
        (None, true) => return Err(invalid("PDF models need a geometry block".into())),
        (Some(_), false) => return Err(invalid("geometry is only valid for PDF models".into())),
        (None, false) => None,
    };

    let fields = def
        .fields
        .iter()
        .map(|f| compile_field(f, is_pdf))
        .collect::<Result<Vec<_>, String>>()
        .map_err(invalid)?;

    let blanket_nirms = match &def.blanket_nirms {
        Some(b) => Some(BlanketStatement {
            pattern: compile_pattern(&b.pattern).map_err(invalid)?,
            value: b.value.clone(),
        }),
        None => None,
    };

    Ok(ModelDescriptor {
        id: def.id.clone(),
        description: def.description.clone(),
        format: def.format,
        establishment_number: compile_pattern(&def.establishment_number).map_err(invalid)?,
        fields,
        deprecated: def.deprecated,
        validate_country_of_origin: def.validate_country_of_origin,
        find_unit_in_header: def.find_unit_in_header,
        blanket_nirms,
        invalid_sheets: def.invalid_sheets.clone(),
        geometry,
    })
}

fn compile_field(def: &FieldDef, is_pdf: bool) -> Result<FieldSpec, String> {
    let x_range = match (def.x_min, def.x_max) {
        (Some(min), Some(max)) if min <= max => Some((min, max)),
        (Some(min), Some(max)) => {
            return Err(format!(
                "field '{}' has x_min {min} greater than x_max {max}",
                def.field
            ))
        }
        (None, None) => None,
        _ => {
            return Err(format!(
                "field '{}' must set both x_min and x_max",
                def.field
            ))
        }
    };

    if is_pdf && x_range.is_none() {
        return Err(format!("PDF field '{}' needs x_min and x_max", def.field));
    }

    let value = match &def.value {
        Some(p) => Some(compile_pattern(p)?),
        None => None,
    };

    Ok(FieldSpec {
        field: def.field,
        header: compile_pattern(&def.header)?,
        optional: def.optional,
        transform: def.transform.clone(),
        x_range,
        value,
    })
}

fn compile_geometry(def: &GeometryDef) -> Result<PdfGeometry, String> {
    if def.min_headers_y > def.max_headers_y {
        return Err(format!(
            "min_headers_y {} is greater than max_headers_y {}",
            def.min_headers_y, def.max_headers_y
        ));
    }
    if def.min_row_cells == 0 {
        return Err("min_row_cells must be at least 1".into());
    }

    let footer = match &def.footer {
        Some(p) => Some(compile_pattern(p)?),
        None => None,
    };
    let page_marker = match &def.page_marker {
        Some(p) => Some(compile_pattern(p)?),
        None => None,
    };

    Ok(PdfGeometry {
        min_headers_y: def.min_headers_y,
        max_headers_y: def.max_headers_y,
        footer,
        page_marker,
        min_row_cells: def.min_row_cells,
    })
}

/// Compile a catalog pattern. All catalog patterns are case-insensitive.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, String> {
    if pattern.is_empty() {
        return Err("pattern must not be empty".into());
    }
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| format!("invalid pattern '{pattern}': {e}"))
}
