pub mod delimited;
pub mod pdftotext;
pub mod workbook;

use crate::error::PacklistError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single non-null spreadsheet or CSV cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(Decimal),
    Text(String),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Cell {
        Cell::Text(s.into())
    }

    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n.normalize()),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One table row; `None` is a null cell.
pub type Row = Vec<Option<Cell>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name for workbooks, `None` for CSV input.
    pub name: Option<String>,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.iter().all(Option::is_none))
    }

    /// Iterate the non-null cells of the sheet.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|r| r.iter().flatten())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn from_csv(rows: Vec<Row>) -> Workbook {
        Workbook {
            sheets: vec![Sheet { name: None, rows }],
        }
    }
}

/// A positioned text fragment from a PDF page. `y` grows downwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfPage {
    pub page_number: usize,
    pub content: Vec<TextFragment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfDocument {
    pub pages: Vec<PdfPage>,
}

impl PdfDocument {
    pub fn fragments(&self) -> impl Iterator<Item = &TextFragment> {
        self.pages.iter().flat_map(|p| p.content.iter())
    }
}

/// What the caller hands to the pipeline: raw PDF bytes, or a table that a
/// converter has already produced.
#[derive(Debug, Clone)]
pub enum DocumentInput {
    Pdf(Vec<u8>),
    Csv(Vec<Row>),
    Spreadsheet(Workbook),
}

/// Trait for PDF text-position extraction backends.
///
/// This is the pipeline's only asynchronous boundary.
#[async_trait]
pub trait PdfExtractor: Send + Sync {
    /// Extract positioned text fragments, one `PdfPage` per page.
    async fn extract(&self, pdf_bytes: &[u8]) -> Result<PdfDocument, PacklistError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_number_cell_display_drops_trailing_zeros() {
        assert_eq!(Cell::Number(dec!(5.50)).as_text(), "5.5");
        assert_eq!(Cell::Number(dec!(100)).as_text(), "100");
    }

    #[test]
    fn test_sheet_is_empty() {
        let sheet = Sheet {
            name: Some("Sheet1".into()),
            rows: vec![vec![None, None], vec![]],
        };
        assert!(sheet.is_empty());
    }
}
