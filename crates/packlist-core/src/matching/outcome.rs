use crate::model::ParserModel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of testing one model against one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchOutcome {
    Correct,
    WrongHeader,
    WrongEstablishmentNumber,
    EmptyFile,
    GenericError,
    WrongExtension,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchOutcome::Correct => "CORRECT",
            MatchOutcome::WrongHeader => "WRONG_HEADER",
            MatchOutcome::WrongEstablishmentNumber => "WRONG_ESTABLISHMENT_NUMBER",
            MatchOutcome::EmptyFile => "EMPTY_FILE",
            MatchOutcome::GenericError => "GENERIC_ERROR",
            MatchOutcome::WrongExtension => "WRONG_EXTENSION",
        };
        write!(f, "{s}")
    }
}

/// How a document left the pipeline.
///
/// The envelope alone cannot tell "no layout matched" from "processing
/// failed" (both are NOMATCH with no items); this can.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Disposition {
    /// A model matched and its items were mapped and validated.
    Parsed { model: String },
    /// No model matched; the envelope carries `sentinel`.
    NoMatch { sentinel: ParserModel },
    /// A document-level fault, e.g. PDF extraction failed.
    Fault { reason: String },
}

impl Disposition {
    pub fn is_fault(&self) -> bool {
        matches!(self, Disposition::Fault { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serializes_screaming_case() {
        let json = serde_json::to_string(&MatchOutcome::WrongEstablishmentNumber).unwrap();
        assert_eq!(json, "\"WRONG_ESTABLISHMENT_NUMBER\"");
        assert_eq!(MatchOutcome::EmptyFile.to_string(), "EMPTY_FILE");
    }

    #[test]
    fn test_disposition_is_tagged() {
        let json = serde_json::to_value(Disposition::NoMatch {
            sentinel: ParserModel::NoRemosCsv,
        })
        .unwrap();
        assert_eq!(json["status"], "no_match");
        assert_eq!(json["sentinel"], "NOREMOSCSV");
    }
}
