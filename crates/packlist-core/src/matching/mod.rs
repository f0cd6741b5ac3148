pub mod engine;
pub mod outcome;

use crate::extraction::{PdfDocument, Workbook};
use crate::parsing::{find_establishment_numbers, pdf_texts, table_texts};
use regex::Regex;
use std::sync::LazyLock;

pub use engine::{matches, matching_models, select_model, Selection};
pub use outcome::{Disposition, MatchOutcome};

/// Any GB establishment number, whichever retailer it belongs to.
pub static ANY_ESTABLISHMENT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)RMS-GB-\d{6}(?:-\d{3})?").expect("valid establishment number regex")
});

/// A document ready for matching: a sanitized table, or extracted PDF pages.
#[derive(Debug, Clone)]
pub enum Document {
    Table(Workbook),
    Pdf(PdfDocument),
}

impl Document {
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Table(_) => "table",
            Document::Pdf(_) => "pdf",
        }
    }

    /// No sheets with content, or no pages with fragments.
    pub fn is_empty(&self) -> bool {
        match self {
            Document::Table(wb) => wb.sheets.iter().all(|s| s.is_empty()),
            Document::Pdf(doc) => doc.pages.iter().all(|p| p.content.is_empty()),
        }
    }

    /// Distinct matches of `pattern` anywhere in the document.
    pub fn establishment_numbers(&self, pattern: &Regex) -> Vec<String> {
        match self {
            Document::Table(wb) => find_establishment_numbers(pattern, table_texts(wb)),
            Document::Pdf(doc) => find_establishment_numbers(pattern, pdf_texts(doc)),
        }
    }

    pub fn contains(&self, pattern: &Regex) -> bool {
        match self {
            Document::Table(wb) => table_texts(wb).any(|t| pattern.is_match(&t)),
            Document::Pdf(doc) => pdf_texts(doc).any(|t| pattern.is_match(t)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{Cell, PdfPage, Sheet};

    #[test]
    fn test_any_establishment_number() {
        assert!(ANY_ESTABLISHMENT_NUMBER.is_match("RMS-GB-000040-001"));
        assert!(ANY_ESTABLISHMENT_NUMBER.is_match("ref rms-gb-123456"));
        assert!(!ANY_ESTABLISHMENT_NUMBER.is_match("RMS-GB-12345"));
        let m = ANY_ESTABLISHMENT_NUMBER.find("RMS-GB-000040-001").unwrap();
        assert_eq!(m.as_str(), "RMS-GB-000040-001");
    }

    #[test]
    fn test_document_emptiness() {
        let empty = Document::Table(Workbook {
            sheets: vec![Sheet {
                name: Some("Sheet1".into()),
                rows: vec![vec![None]],
            }],
        });
        assert!(empty.is_empty());

        let full = Document::Table(Workbook::from_csv(vec![vec![Some(Cell::text("a"))]]));
        assert!(!full.is_empty());

        let blank_pdf = Document::Pdf(PdfDocument {
            pages: vec![PdfPage {
                page_number: 1,
                content: vec![],
            }],
        });
        assert!(blank_pdf.is_empty());
        assert!(Document::Pdf(PdfDocument::default()).is_empty());
    }
}
