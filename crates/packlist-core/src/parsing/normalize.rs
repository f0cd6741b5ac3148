use crate::extraction::{Cell, Row, Sheet, Workbook};

/// Trim a text cell and turn it into a null cell when nothing is left.
///
/// Numbers pass through unchanged.
pub fn sanitize_cell(cell: Option<Cell>) -> Option<Cell> {
    match cell {
        Some(Cell::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else if trimmed.len() == s.len() {
                Some(Cell::Text(s))
            } else {
                Some(Cell::Text(trimmed.to_string()))
            }
        }
        other => other,
    }
}

pub fn sanitize_row(row: Row) -> Row {
    row.into_iter().map(sanitize_cell).collect()
}

pub fn sanitize_sheet(sheet: Sheet) -> Sheet {
    Sheet {
        name: sheet.name,
        rows: sheet.rows.into_iter().map(sanitize_row).collect(),
    }
}

/// Sanitize every sheet of an already-converted workbook or CSV table.
///
/// Row and column positions are preserved so row numbers still line up with
/// the source document.
pub fn sanitize_workbook(workbook: Workbook) -> Workbook {
    Workbook {
        sheets: workbook.sheets.into_iter().map(sanitize_sheet).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_text_is_trimmed() {
        assert_eq!(
            sanitize_cell(Some(Cell::text("  Cheddar  "))),
            Some(Cell::text("Cheddar"))
        );
    }

    #[test]
    fn test_blank_text_becomes_null() {
        assert_eq!(sanitize_cell(Some(Cell::text("   "))), None);
        assert_eq!(sanitize_cell(Some(Cell::text(""))), None);
        assert_eq!(sanitize_cell(None), None);
    }

    #[test]
    fn test_numbers_untouched() {
        assert_eq!(
            sanitize_cell(Some(Cell::Number(dec!(2.50)))),
            Some(Cell::Number(dec!(2.50)))
        );
    }

    #[test]
    fn test_workbook_keeps_positions() {
        let wb = Workbook {
            sheets: vec![Sheet {
                name: Some("Sheet1".into()),
                rows: vec![
                    vec![Some(Cell::text(" ")), Some(Cell::text(" a "))],
                    vec![],
                ],
            }],
        };
        let wb = sanitize_workbook(wb);
        assert_eq!(wb.sheets[0].rows.len(), 2);
        assert_eq!(wb.sheets[0].rows[0], vec![None, Some(Cell::text("a"))]);
        assert_eq!(wb.sheets[0].name.as_deref(), Some("Sheet1"));
    }
}
