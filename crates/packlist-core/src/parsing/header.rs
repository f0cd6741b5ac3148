use crate::catalog::descriptor::ModelDescriptor;
use crate::catalog::schema::CanonicalField;
use crate::extraction::{Cell, Row};
use crate::parsing::values::unit_from_header;
use std::collections::BTreeMap;

/// Canonical field -> column index, for one located header row.
pub type ColumnMap = BTreeMap<CanonicalField, usize>;

fn cell_matches(cell: &Option<Cell>, field_pattern: &regex::Regex) -> bool {
    match cell {
        Some(c) => field_pattern.is_match(c.as_text().trim()),
        None => false,
    }
}

/// A row is a header when every required field's label pattern matches at
/// least one of its cells.
pub fn is_header_row(model: &ModelDescriptor, row: &Row) -> bool {
    let mut required = model.required_fields().peekable();
    if required.peek().is_none() {
        return false;
    }
    required.all(|f| row.iter().any(|c| cell_matches(c, &f.header)))
}

/// Index of the first header row in `rows`, if any.
pub fn find_header_row(model: &ModelDescriptor, rows: &[Row]) -> Option<usize> {
    rows.iter().position(|r| is_header_row(model, r))
}

/// Map every declared field (required and optional) to the first cell of the
/// header row its label matches.
pub fn header_columns(model: &ModelDescriptor, header: &Row) -> ColumnMap {
    let mut columns = ColumnMap::new();
    for spec in &model.fields {
        if let Some(idx) = header.iter().position(|c| cell_matches(c, &spec.header)) {
            columns.insert(spec.field, idx);
        }
    }
    columns
}

/// The weight unit stated in the net weight header cell, e.g. "Net Weight (kg)".
pub fn header_unit(header: &Row, columns: &ColumnMap) -> Option<String> {
    let idx = columns.get(&CanonicalField::TotalNetWeightKg)?;
    let cell = header.get(*idx)?.as_ref()?;
    unit_from_header(&cell.as_text())
}
