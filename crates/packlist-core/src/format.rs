use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Document format, decided from the filename extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Spreadsheet,
    Csv,
    Pdf,
    Unknown,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Spreadsheet => write!(f, "spreadsheet"),
            FileFormat::Csv => write!(f, "csv"),
            FileFormat::Pdf => write!(f, "pdf"),
            FileFormat::Unknown => write!(f, "unknown"),
        }
    }
}

impl FileFormat {
    pub fn is_tabular(self) -> bool {
        matches!(self, FileFormat::Spreadsheet | FileFormat::Csv)
    }
}

/// Classify a filename by its extension (case-insensitive).
pub fn classify(filename: &str) -> FileFormat {
    let ext = Path::new(filename.trim())
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("xlsx" | "xls" | "xlsm" | "xlsb" | "ods") => FileFormat::Spreadsheet,
        Some("csv") => FileFormat::Csv,
        Some("pdf") => FileFormat::Pdf,
        _ => FileFormat::Unknown,
    }
}
