use csv::ReaderBuilder;

use crate::error::PacklistError;
use crate::extraction::{Cell, Row};

/// Read CSV bytes into rows of text cells.
///
/// No header handling happens here: the header row is located later by the
/// matched model. Ragged rows are kept as they are.
pub fn read_csv(bytes: &[u8]) -> Result<Vec<Row>, PacklistError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row: Row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    None
                } else {
                    Some(Cell::text(field))
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}
