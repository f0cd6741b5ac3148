//! Turns positioned PDF text fragments into header cells and data rows.
//!
//! Coordinates follow pdftotext: `y` grows downwards, so sorting by `y`
//! ascending reads the page top to bottom.

use crate::catalog::descriptor::{ModelDescriptor, PdfGeometry};
use crate::catalog::schema::CanonicalField;
use crate::error::PacklistError;
use crate::extraction::{PdfDocument, PdfPage, TextFragment};
use crate::parsing::values::unit_from_header;
use std::collections::BTreeMap;

/// Text per canonical field, for a header band or one data row.
pub type FieldCells = BTreeMap<CanonicalField, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderFlags {
    pub has_nirms: bool,
    pub has_country_of_origin: bool,
    /// Unit stated in the net weight header, e.g. "kg".
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfRow {
    /// 1-based position among the accepted rows of the page.
    pub row_number: usize,
    pub y: f32,
    pub cells: FieldCells,
}

/// Everything the matcher and mapper need to know about one page.
#[derive(Debug, Clone, Default)]
pub struct PageTable {
    pub page_number: usize,
    /// Header cells found in the header band (may be incomplete).
    pub header_cells: FieldCells,
    /// True when every required field's label matched its header cell.
    pub has_header: bool,
    pub has_page_marker: bool,
    pub has_footer: bool,
    pub rows: Vec<PdfRow>,
    /// Set when the page's geometry could not be processed.
    pub fault: Option<String>,
}

/// Drop zero-width fragments and sort the rest by (y, x).
///
/// The sort is stable, so fragments at identical positions keep their
/// extraction order.
pub fn sanitize_page(page: &PdfPage) -> Result<Vec<TextFragment>, PacklistError> {
    let mut fragments = Vec::with_capacity(page.content.len());
    for f in &page.content {
        if !(f.x.is_finite() && f.y.is_finite() && f.width.is_finite()) {
            return Err(PacklistError::Geometry {
                page: page.page_number,
                reason: format!("fragment '{}' has non-finite coordinates", f.text),
            });
        }
        if f.width <= 0.0 || f.text.trim().is_empty() {
            continue;
        }
        fragments.push(f.clone());
    }
    fragments.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    Ok(fragments)
}

fn row_key(y: f32) -> i64 {
    y.round() as i64
}

/// Group fragments into lines by rounded y. Each line is ordered by x.
pub(crate) fn group_by_line<'a>(
    fragments: impl Iterator<Item = &'a TextFragment>,
) -> BTreeMap<i64, Vec<&'a TextFragment>> {
    let mut lines: BTreeMap<i64, Vec<&TextFragment>> = BTreeMap::new();
    for f in fragments {
        lines.entry(row_key(f.y)).or_default().push(f);
    }
    for line in lines.values_mut() {
        line.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    lines
}

pub(crate) fn join_texts<'a>(fragments: impl Iterator<Item = &'a TextFragment>) -> String {
    fragments
        .map(|f| f.text.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Header text per field: the band fragments inside each field's x range,
/// read line by line. Labels split over several words or lines are joined.
pub fn header_cells(
    model: &ModelDescriptor,
    geometry: &PdfGeometry,
    fragments: &[TextFragment],
) -> FieldCells {
    let band = group_by_line(fragments.iter().filter(|f| geometry.in_header_band(f.y)));
    let mut cells = FieldCells::new();
    for spec in &model.fields {
        let text = join_texts(
            band.values()
                .flat_map(|line| line.iter().copied())
                .filter(|f| spec.contains_x(f.x)),
        );
        if !text.is_empty() {
            cells.insert(spec.field, text);
        }
    }
    cells
}

/// Whether every required field's label matches its header cell.
pub fn header_matches(model: &ModelDescriptor, cells: &FieldCells) -> bool {
    model.required_fields().all(|spec| {
        cells
            .get(&spec.field)
            .is_some_and(|text| spec.header.is_match(text))
    })
}

/// Optional-column flags and the weight unit, from a page's header cells.
pub fn header_flags(model: &ModelDescriptor, cells: &FieldCells) -> HeaderFlags {
    let labelled = |field: CanonicalField| {
        model
            .field(field)
            .zip(cells.get(&field))
            .is_some_and(|(spec, text)| spec.header.is_match(text))
    };
    HeaderFlags {
        has_nirms: labelled(CanonicalField::Nirms),
        has_country_of_origin: labelled(CanonicalField::CountryOfOrigin),
        unit: cells
            .get(&CanonicalField::TotalNetWeightKg)
            .and_then(|text| unit_from_header(text)),
    }
}

/// Assign a line's fragments to fields by x range and value pattern.
pub fn assign_columns(model: &ModelDescriptor, line: &[&TextFragment]) -> FieldCells {
    let mut cells = FieldCells::new();
    for spec in &model.fields {
        let text = join_texts(line.iter().copied().filter(|f| {
            spec.contains_x(f.x)
                && spec
                    .value
                    .as_ref()
                    .is_none_or(|pattern| pattern.is_match(f.text.trim()))
        }));
        if !text.is_empty() {
            cells.insert(spec.field, text);
        }
    }
    cells
}

/// Process a single page. Errors are page-level geometry faults.
pub fn analyse_page(
    model: &ModelDescriptor,
    geometry: &PdfGeometry,
    page: &PdfPage,
) -> Result<PageTable, PacklistError> {
    let fragments = sanitize_page(page)?;

    let header_cells = header_cells(model, geometry, &fragments);
    let has_header = header_matches(model, &header_cells);

    let marker_y = geometry.page_marker.as_ref().and_then(|pattern| {
        fragments
            .iter()
            .find(|f| pattern.is_match(f.text.trim()))
            .map(|f| f.y)
    });

    let start_y = if has_header {
        geometry.max_headers_y
    } else {
        marker_y.unwrap_or(f32::NEG_INFINITY)
    };

    let footer_y = geometry.footer.as_ref().and_then(|pattern| {
        fragments
            .iter()
            .filter(|f| f.y > start_y)
            .find(|f| pattern.is_match(f.text.trim()))
            .map(|f| f.y)
    });

    let end_key = footer_y.map(row_key);
    let start_key = row_key(start_y.max(f32::MIN));
    let lines = group_by_line(fragments.iter().filter(|f| f.y > start_y));

    let mut rows = Vec::new();
    for (key, line) in &lines {
        if *key <= start_key && start_y.is_finite() {
            continue;
        }
        if end_key.is_some_and(|end| *key >= end) {
            break;
        }
        if line.len() < geometry.min_row_cells {
            break;
        }
        if line.first().is_some_and(|f| f.text.trim() == "0") {
            break;
        }
        rows.push(PdfRow {
            row_number: rows.len() + 1,
            y: line[0].y,
            cells: assign_columns(model, line),
        });
    }

    log::debug!(
        "page {}: header={} marker={} footer={} rows={}",
        page.page_number,
        has_header,
        marker_y.is_some(),
        footer_y.is_some(),
        rows.len()
    );

    Ok(PageTable {
        page_number: page.page_number,
        header_cells,
        has_header,
        has_page_marker: marker_y.is_some(),
        has_footer: footer_y.is_some(),
        rows,
        fault: None,
    })
}

/// Process the pages that carry table content: every page up to and
/// including the first page showing the footer.
///
/// A page whose geometry fails yields an empty, faulted `PageTable`; the
/// remaining pages are still processed.
pub fn analyse_document(model: &ModelDescriptor, doc: &PdfDocument) -> Vec<PageTable> {
    let Some(geometry) = &model.geometry else {
        return Vec::new();
    };

    let mut tables = Vec::with_capacity(doc.pages.len());
    for page in &doc.pages {
        let table = match analyse_page(model, geometry, page) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("{}: {e}; page contributes no rows", model.id);
                PageTable {
                    page_number: page.page_number,
                    fault: Some(e.to_string()),
                    ..Default::default()
                }
            }
        };
        let footer = table.has_footer;
        tables.push(table);
        if footer {
            break;
        }
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin::load_builtin;

    fn frag(x: f32, y: f32, text: &str) -> TextFragment {
        TextFragment {
            x,
            y,
            width: 20.0,
            height: 8.0,
            text: text.to_string(),
        }
    }

    fn header() -> Vec<TextFragment> {
        vec![
            frag(40.0, 185.0, "Description"),
            frag(205.0, 185.0, "Commodity"),
            frag(205.0, 194.0, "Code"),
            frag(285.0, 185.0, "Packages"),
            frag(345.0, 185.0, "Net"),
            frag(365.0, 185.0, "Weight"),
            frag(345.0, 194.0, "(kg)"),
            frag(415.0, 185.0, "Origin"),
            frag(475.0, 185.0, "NIRMS"),
        ]
    }

    fn line(y: f32, cells: &[(f32, &str)]) -> Vec<TextFragment> {
        cells.iter().map(|(x, t)| frag(*x, y, t)).collect()
    }

    fn page(number: usize, content: Vec<TextFragment>) -> PdfPage {
        PdfPage {
            page_number: number,
            content,
        }
    }

    fn data_line(y: f32, desc: &str) -> Vec<TextFragment> {
        line(
            y,
            &[
                (40.0, desc),
                (205.0, "04061000"),
                (285.0, "3"),
                (345.0, "12.5"),
                (415.0, "GB"),
                (475.0, "NIRMS"),
            ],
        )
    }

    #[test]
    fn test_sanitize_drops_zero_width_and_sorts() {
        let mut zero = frag(10.0, 5.0, "noise");
        zero.width = 0.0;
        let p = page(
            1,
            vec![frag(50.0, 20.0, "b"), zero, frag(10.0, 20.0, "a"), frag(90.0, 10.0, "top")],
        );
        let texts: Vec<String> = sanitize_page(&p).unwrap().into_iter().map(|f| f.text).collect();
        assert_eq!(texts, vec!["top", "a", "b"]);
    }

    #[test]
    fn test_non_finite_coordinates_are_a_geometry_fault() {
        let p = page(3, vec![frag(f32::NAN, 20.0, "x")]);
        assert!(matches!(
            sanitize_page(&p),
            Err(PacklistError::Geometry { page: 3, .. })
        ));
    }

    #[test]
    fn test_header_cells_join_words_and_lines() {
        let catalog = load_builtin().unwrap();
        let model = catalog.get("THORNBURY1").unwrap();
        let geometry = model.geometry.as_ref().unwrap();
        let cells = header_cells(model, geometry, &sanitize_page(&page(1, header())).unwrap());
        assert_eq!(cells[&CanonicalField::CommodityCode], "Commodity Code");
        assert_eq!(cells[&CanonicalField::TotalNetWeightKg], "Net Weight (kg)");
        assert!(header_matches(model, &cells));

        let flags = header_flags(model, &cells);
        assert!(flags.has_nirms);
        assert!(flags.has_country_of_origin);
        assert_eq!(flags.unit.as_deref(), Some("kg"));
    }

    #[test]
    fn test_rows_stop_at_footer_and_zero_row() {
        let catalog = load_builtin().unwrap();
        let model = catalog.get("THORNBURY1").unwrap();
        let geometry = model.geometry.as_ref().unwrap();

        let mut content = header();
        content.extend(data_line(220.0, "Cheddar"));
        content.extend(data_line(235.0, "Stilton"));
        content.extend(line(250.0, &[(40.0, "Totals:"), (345.0, "25")]));
        content.extend(data_line(265.0, "After footer"));

        let table = analyse_page(model, geometry, &page(1, content)).unwrap();
        assert!(table.has_header);
        assert!(table.has_footer);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].row_number, 2);
        assert_eq!(table.rows[1].cells[&CanonicalField::Description], "Stilton");
        assert_eq!(table.rows[0].cells[&CanonicalField::CommodityCode], "04061000");

        let mut content = header();
        content.extend(data_line(220.0, "Cheddar"));
        content.extend(line(235.0, &[(40.0, "0"), (205.0, "0"), (285.0, "0"), (345.0, "0")]));
        content.extend(data_line(250.0, "Hidden"));
        let table = analyse_page(model, geometry, &page(1, content)).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_short_row_ends_page() {
        let catalog = load_builtin().unwrap();
        let model = catalog.get("THORNBURY1").unwrap();
        let geometry = model.geometry.as_ref().unwrap();

        let mut content = header();
        content.extend(data_line(220.0, "Cheddar"));
        content.extend(line(235.0, &[(40.0, "Signed"), (205.0, "J. Smith")]));
        content.extend(data_line(250.0, "Hidden"));
        let table = analyse_page(model, geometry, &page(1, content)).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert!(!table.has_footer);
    }

    #[test]
    fn test_value_pattern_filters_column() {
        let catalog = load_builtin().unwrap();
        let model = catalog.get("THORNBURY1").unwrap();
        let geometry = model.geometry.as_ref().unwrap();

        let mut content = header();
        content.extend(line(
            220.0,
            &[
                (40.0, "Cheddar"),
                (205.0, "0406"),
                (240.0, "(see note)"),
                (285.0, "3"),
                (345.0, "12.5"),
            ],
        ));
        let table = analyse_page(model, geometry, &page(1, content)).unwrap();
        assert_eq!(table.rows[0].cells[&CanonicalField::CommodityCode], "0406");
    }

    #[test]
    fn test_continuation_page_starts_after_marker() {
        let catalog = load_builtin().unwrap();
        let model = catalog.get("THORNBURY1").unwrap();
        let geometry = model.geometry.as_ref().unwrap();

        let mut content = line(30.0, &[(40.0, "Continued")]);
        content.extend(data_line(60.0, "Brie"));
        let table = analyse_page(model, geometry, &page(2, content)).unwrap();
        assert!(!table.has_header);
        assert!(table.has_page_marker);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_pages_after_footer_are_skipped_and_faults_isolated() {
        let catalog = load_builtin().unwrap();
        let model = catalog.get("THORNBURY1").unwrap();

        let mut first = header();
        first.extend(data_line(220.0, "Cheddar"));
        let faulty = vec![frag(f32::INFINITY, 40.0, "bad")];
        let mut last = line(30.0, &[(40.0, "Continued")]);
        last.extend(data_line(60.0, "Brie"));
        last.extend(line(80.0, &[(40.0, "Total")]));
        let terms = data_line(60.0, "Terms and conditions");

        let doc = PdfDocument {
            pages: vec![page(1, first), page(2, faulty), page(3, last), page(4, terms)],
        };
        let tables = analyse_document(model, &doc);
        assert_eq!(tables.len(), 3);
        assert!(tables[1].fault.is_some());
        assert!(tables[1].rows.is_empty());
        let rows: usize = tables.iter().map(|t| t.rows.len()).sum();
        assert_eq!(rows, 2);
    }
}
