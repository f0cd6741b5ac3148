use crate::catalog::descriptor::{ModelCatalog, ModelDescriptor};
use crate::error::PacklistError;
use crate::format::FileFormat;
use crate::matching::outcome::MatchOutcome;
use crate::matching::{Document, ANY_ESTABLISHMENT_NUMBER};
use crate::model::ParserModel;
use crate::parsing::coordinates::analyse_document;
use crate::parsing::header::find_header_row;

/// The selection engine's answer for one document.
#[derive(Debug, Clone)]
pub enum Selection<'a> {
    Model(&'a ModelDescriptor),
    NoMatch(ParserModel),
}

/// Test one model against a document.
///
/// Checks run in a fixed order: extension, emptiness, establishment number,
/// then headers. Internal errors never escape; they become `GenericError`.
pub fn matches(model: &ModelDescriptor, format: FileFormat, doc: &Document) -> MatchOutcome {
    match try_matches(model, format, doc) {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("{}: matcher failed: {e}", model.id);
            MatchOutcome::GenericError
        }
    }
}

fn try_matches(
    model: &ModelDescriptor,
    format: FileFormat,
    doc: &Document,
) -> Result<MatchOutcome, PacklistError> {
    if model.format != format {
        return Ok(MatchOutcome::WrongExtension);
    }

    if doc.is_empty() {
        return Ok(MatchOutcome::EmptyFile);
    }

    if !doc.contains(&model.establishment_number) {
        return Ok(MatchOutcome::WrongEstablishmentNumber);
    }

    let headers_ok = match (doc, model.format) {
        (Document::Table(wb), FileFormat::Spreadsheet | FileFormat::Csv) => {
            let mut sheets = wb
                .sheets
                .iter()
                .filter(|s| model.accepts_sheet(s.name.as_deref()) && !s.is_empty())
                .peekable();
            sheets.peek().is_some()
                && sheets.all(|s| find_header_row(model, &s.rows).is_some())
        }
        (Document::Pdf(pdf), FileFormat::Pdf) => {
            let pages = analyse_document(model, pdf);
            let usable: Vec<_> = pages.iter().filter(|p| p.fault.is_none()).collect();
            usable.iter().any(|p| p.has_header)
                && usable.iter().all(|p| p.has_header || p.has_page_marker)
        }
        (doc, _) => {
            return Err(PacklistError::InputMismatch {
                expected: model.format.to_string(),
                actual: doc.kind().to_string(),
            })
        }
    };

    Ok(if headers_ok {
        MatchOutcome::Correct
    } else {
        MatchOutcome::WrongHeader
    })
}

/// Pick the model for a document: the first non-deprecated model, in
/// catalog priority order, whose predicate returns `Correct`.
pub fn select_model<'a>(
    catalog: &'a ModelCatalog,
    format: FileFormat,
    doc: &Document,
) -> Selection<'a> {
    if format == FileFormat::Unknown {
        return Selection::NoMatch(ParserModel::Unrecognised);
    }

    if format.is_tabular() && !doc.contains(&ANY_ESTABLISHMENT_NUMBER) {
        let sentinel = match format {
            FileFormat::Csv => ParserModel::NoRemosCsv,
            _ => ParserModel::NoRemos,
        };
        log::info!("no establishment number in {format} document: {sentinel}");
        return Selection::NoMatch(sentinel);
    }

    for model in catalog.dispatch_order() {
        let outcome = matches(model, format, doc);
        log::debug!("{}: {outcome}", model.id);
        if outcome == MatchOutcome::Correct {
            log::info!("matched model {}", model.id);
            return Selection::Model(model);
        }
    }

    let sentinel = match doc {
        Document::Pdf(pdf) if pdf.pages.is_empty() => ParserModel::NoMatch,
        Document::Pdf(_) if !doc.contains(&ANY_ESTABLISHMENT_NUMBER) => ParserModel::NoRemosPdf,
        _ => ParserModel::NoMatch,
    };
    log::info!("no model matched {format} document: {sentinel}");
    Selection::NoMatch(sentinel)
}

/// Every non-deprecated model that accepts the document.
///
/// Dispatch only ever uses the first; more than one means the catalog has
/// overlapping layouts.
pub fn matching_models<'a>(
    catalog: &'a ModelCatalog,
    format: FileFormat,
    doc: &Document,
) -> Vec<&'a ModelDescriptor> {
    catalog
        .dispatch_order()
        .filter(|m| matches(m, format, doc) == MatchOutcome::Correct)
        .collect()
}
