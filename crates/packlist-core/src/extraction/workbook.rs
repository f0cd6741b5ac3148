use std::io::Cursor;

use calamine::{Data, Reader};
use rust_decimal::Decimal;

use crate::error::PacklistError;
use crate::extraction::{Cell, Row, Sheet, Workbook};

/// Read a workbook (xlsx, xls, xlsb or ods) into named sheets.
///
/// Rows keep their absolute position: leading blank rows and columns are
/// padded back in, so row `i` here is spreadsheet row `i + 1`.
pub fn read_workbook(bytes: &[u8]) -> Result<Workbook, PacklistError> {
    let cursor = Cursor::new(bytes);
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|e| PacklistError::Spreadsheet(format!("failed to open workbook: {e}")))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| PacklistError::Spreadsheet(format!("sheet '{name}': {e}")))?;

        let mut rows: Vec<Row> = Vec::new();
        if let Some((start_row, start_col)) = range.start() {
            rows.resize(start_row as usize, Vec::new());
            for data_row in range.rows() {
                let mut row: Row = vec![None; start_col as usize];
                row.extend(data_row.iter().map(to_cell));
                rows.push(row);
            }
        }

        sheets.push(Sheet {
            name: Some(name),
            rows,
        });
    }

    Ok(Workbook { sheets })
}

fn to_cell(data: &Data) -> Option<Cell> {
    match data {
        Data::String(s) => Some(Cell::Text(s.clone())),
        Data::Float(f) => Some(match f64_to_decimal(*f) {
            Some(n) => Cell::Number(n),
            None => Cell::Text(format!("{f}")),
        }),
        Data::Int(i) => Some(Cell::Number(Decimal::from(*i))),
        Data::Bool(b) => Some(Cell::Text(b.to_string())),
        Data::DateTime(dt) => Some(Cell::Text(dt.to_string())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Cell::Text(s.clone())),
        Data::Error(_) | Data::Empty => None,
    }
}

/// Convert f64 to Decimal, preserving reasonable precision.
///
/// Uses string round-trip to avoid floating-point artifacts
/// (e.g., 0.0035_f64 becoming 0.00349999...). `None` when the value is
/// outside `Decimal`'s range or not finite.
fn f64_to_decimal(f: f64) -> Option<Decimal> {
    let s = format!("{f}");
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::try_from(f).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn f64_to_decimal_preserves_precision() {
        assert_eq!(f64_to_decimal(0.0035), Some(dec!(0.0035)));
        assert_eq!(f64_to_decimal(68.0), Some(dec!(68)));
        assert_eq!(f64_to_decimal(1.23), Some(dec!(1.23)));
    }

    #[test]
    fn test_to_cell_nulls_empty_and_errors() {
        assert_eq!(to_cell(&Data::Empty), None);
        assert_eq!(to_cell(&Data::Int(4)), Some(Cell::Number(dec!(4))));
        assert_eq!(
            to_cell(&Data::String("Chilled".into())),
            Some(Cell::text("Chilled"))
        );
    }

    #[test]
    fn test_out_of_range_float_kept_as_text() {
        assert_eq!(f64_to_decimal(1e30), None);
        assert_eq!(
            to_cell(&Data::Float(1e30)),
            Some(Cell::Text(format!("{}", 1e30_f64)))
        );
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        assert!(read_workbook(b"not a workbook").is_err());
    }
}
