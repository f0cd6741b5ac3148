pub mod combine;
pub mod coordinates;
pub mod header;
pub mod normalize;
pub mod values;

use crate::catalog::descriptor::{FieldSpec, ModelDescriptor};
use crate::catalog::schema::CanonicalField;
use crate::extraction::{Cell, PdfDocument, Row, Sheet, Workbook};
use crate::model::{CanonicalItem, Quantity, RowLocation};
use coordinates::{group_by_line, header_flags, join_texts, sanitize_page, PageTable};
use header::{find_header_row, header_columns, header_unit, is_header_row, ColumnMap};
use regex::Regex;
use values::{apply_transform, to_quantity};

/// Map a sanitized workbook (or CSV table) to canonical items using the
/// matched model.
///
/// Each sheet may hold several header blocks; a block runs from its header
/// row to the next header-like row or the end of the sheet.
pub fn parse_table(model: &ModelDescriptor, workbook: &Workbook) -> Vec<CanonicalItem> {
    let mut items = Vec::new();
    for sheet in &workbook.sheets {
        if !model.accepts_sheet(sheet.name.as_deref()) {
            continue;
        }
        items.extend(parse_sheet(model, sheet));
    }

    if let Some(blanket) = &model.blanket_nirms {
        let present = workbook
            .sheets
            .iter()
            .flat_map(Sheet::cells)
            .any(|c| blanket.pattern.is_match(&c.as_text()));
        if present {
            apply_blanket_nirms(&mut items, &blanket.value);
        }
    }

    let before = items.len();
    items.retain(|item| !is_degenerate(item));
    log::debug!(
        "{}: mapped {} items ({} degenerate rows dropped)",
        model.id,
        items.len(),
        before - items.len()
    );
    items
}

fn parse_sheet(model: &ModelDescriptor, sheet: &Sheet) -> Vec<CanonicalItem> {
    let mut items = Vec::new();
    let Some(mut header_idx) = find_header_row(model, &sheet.rows) else {
        return items;
    };

    loop {
        let header = &sheet.rows[header_idx];
        let columns = header_columns(model, header);
        let unit = if model.find_unit_in_header {
            header_unit(header, &columns)
        } else {
            None
        };

        let mut next_header = None;
        for (idx, row) in sheet.rows.iter().enumerate().skip(header_idx + 1) {
            if is_header_row(model, row) {
                next_header = Some(idx);
                break;
            }
            let location = RowLocation::sheet(sheet.name.as_deref(), idx + 1);
            items.push(map_row(model, &columns, row, unit.as_deref(), location));
        }

        match next_header {
            Some(idx) => header_idx = idx,
            None => break,
        }
    }
    items
}

fn map_row(
    model: &ModelDescriptor,
    columns: &ColumnMap,
    row: &Row,
    header_unit: Option<&str>,
    location: RowLocation,
) -> CanonicalItem {
    let mut item = CanonicalItem::new(location);
    let mut stripped_unit = None;

    for (field, idx) in columns {
        let Some(Some(cell)) = row.get(*idx) else {
            continue;
        };
        let Some(spec) = model.field(*field) else {
            continue;
        };
        if let Some(unit) = assign(&mut item, spec, cell.clone()) {
            stripped_unit = Some(unit);
        }
    }

    finish_unit(&mut item, stripped_unit, header_unit);
    item
}

/// Map the analysed pages of a PDF to canonical items.
pub fn parse_pdf(
    model: &ModelDescriptor,
    doc: &PdfDocument,
    pages: &[PageTable],
) -> Vec<CanonicalItem> {
    let flags = pages
        .iter()
        .find(|p| p.has_header)
        .map(|p| header_flags(model, &p.header_cells))
        .unwrap_or_default();
    let unit_in_header = flags.unit.as_deref().filter(|_| model.find_unit_in_header);

    let mut items = Vec::new();
    for page in pages {
        for row in &page.rows {
            let mut item = CanonicalItem::new(RowLocation::page(page.page_number, row.row_number));
            let mut stripped_unit = None;
            for (field, text) in &row.cells {
                if !column_present(*field, flags.has_nirms, flags.has_country_of_origin) {
                    continue;
                }
                let Some(spec) = model.field(*field) else {
                    continue;
                };
                if let Some(unit) = assign(&mut item, spec, Cell::text(text.as_str())) {
                    stripped_unit = Some(unit);
                }
            }
            finish_unit(&mut item, stripped_unit, unit_in_header);
            items.push(item);
        }
    }

    if let Some(blanket) = &model.blanket_nirms {
        if pdf_lines(doc).any(|line| blanket.pattern.is_match(&line)) {
            apply_blanket_nirms(&mut items, &blanket.value);
        }
    }

    items.retain(|item| !is_degenerate(item));
    log::debug!("{}: mapped {} items from {} pages", model.id, items.len(), pages.len());
    items
}

/// Optional PDF columns only yield values when their header was printed.
fn column_present(field: CanonicalField, has_nirms: bool, has_origin: bool) -> bool {
    match field {
        CanonicalField::Nirms => has_nirms,
        CanonicalField::CountryOfOrigin => has_origin,
        _ => true,
    }
}

/// Set one field from a raw cell. Returns the unit removed by `strip_unit`.
fn assign(item: &mut CanonicalItem, spec: &FieldSpec, cell: Cell) -> Option<String> {
    let (cell, unit) = match (&spec.transform, cell) {
        (Some(transform), Cell::Text(s)) => {
            let (value, unit) = apply_transform(&s, transform);
            if value.is_empty() {
                return unit;
            }
            (Cell::Text(value), unit)
        }
        (_, cell) => (cell, None),
    };

    let text = || Some(cell.as_text());
    match spec.field {
        CanonicalField::Description => item.description = text(),
        CanonicalField::CommodityCode => item.commodity_code = text(),
        CanonicalField::NumberOfPackages => item.number_of_packages = Some(to_quantity(&cell)),
        CanonicalField::TotalNetWeightKg => item.total_net_weight_kg = Some(to_quantity(&cell)),
        CanonicalField::TotalNetWeightUnit => item.total_net_weight_unit = text(),
        CanonicalField::NatureOfProducts => item.nature_of_products = text(),
        CanonicalField::TypeOfTreatment => item.type_of_treatment = text(),
        CanonicalField::CountryOfOrigin => item.country_of_origin = text(),
        CanonicalField::Nirms => item.nirms = text(),
    }
    unit
}

/// Unit column wins, then a unit stripped from the weight, then the header
/// unit (passed only for models that keep the unit in the header).
fn finish_unit(item: &mut CanonicalItem, stripped: Option<String>, header: Option<&str>) {
    if item.total_net_weight_unit.is_none() {
        item.total_net_weight_unit = stripped.or_else(|| header.map(str::to_string));
    }
}

fn apply_blanket_nirms(items: &mut [CanonicalItem], value: &str) {
    for item in items.iter_mut().filter(|i| i.nirms.is_none()) {
        item.nirms = Some(value.to_string());
    }
}

fn reads_zero(text: Option<&str>) -> bool {
    match text {
        None => true,
        Some(s) => values::parse_decimal(s).is_some_and(|n| n.is_zero()),
    }
}

fn quantity_zero(q: Option<&Quantity>) -> bool {
    q.is_none_or(Quantity::is_zero)
}

/// A row with nothing but nulls and zeros in its four primary fields.
///
/// Covers both blank rows and "drag-down" rows of zeros left by spreadsheet
/// formulas.
pub fn is_degenerate(item: &CanonicalItem) -> bool {
    reads_zero(item.description.as_deref())
        && reads_zero(item.commodity_code.as_deref())
        && quantity_zero(item.number_of_packages.as_ref())
        && quantity_zero(item.total_net_weight_kg.as_ref())
}

/// PDF text joined per line, for statements split over several fragments.
///
/// Lines are built the way the row extractor builds them; pages with broken
/// geometry contribute nothing.
fn pdf_lines(doc: &PdfDocument) -> impl Iterator<Item = String> + '_ {
    doc.pages
        .iter()
        .filter_map(|page| sanitize_page(page).ok())
        .flat_map(|fragments| {
            group_by_line(fragments.iter())
                .into_values()
                .map(|line| join_texts(line.into_iter()))
                .collect::<Vec<_>>()
        })
}

/// Distinct establishment numbers, in order of first appearance.
pub fn find_establishment_numbers<I, S>(pattern: &Regex, texts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut found: Vec<String> = Vec::new();
    for text in texts {
        for m in pattern.find_iter(text.as_ref()) {
            let number = m.as_str().to_ascii_uppercase();
            if !found.contains(&number) {
                found.push(number);
            }
        }
    }
    found
}

/// Every cell of every sheet, as text.
pub fn table_texts(workbook: &Workbook) -> impl Iterator<Item = String> + '_ {
    workbook
        .sheets
        .iter()
        .flat_map(Sheet::cells)
        .map(Cell::as_text)
}

/// Every fragment of every page.
pub fn pdf_texts(doc: &PdfDocument) -> impl Iterator<Item = &str> + '_ {
    doc.fragments().map(|f| f.text.as_str())
}
