pub mod catalog;
pub mod error;
pub mod extraction;
pub mod format;
pub mod matching;
pub mod model;
pub mod parsing;
pub mod rules;
pub mod validation;

use catalog::descriptor::{ModelCatalog, ModelDescriptor};
use error::PacklistError;
use extraction::{DocumentInput, PdfExtractor, Workbook};
use format::FileFormat;
use matching::{select_model, Disposition, Document, Selection, ANY_ESTABLISHMENT_NUMBER};
use model::{ParsedPackingList, ParserModel};
use parsing::combine::{combine, sentinel};
use parsing::coordinates::analyse_document;
use parsing::normalize::sanitize_workbook;
use rules::RuleCatalog;
use serde::Serialize;
use std::path::Path;

/// The envelope plus how the document was dispatched.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedPackingList {
    pub packing_list: ParsedPackingList,
    pub disposition: Disposition,
}

/// Runs documents through classification, matching, mapping and validation.
///
/// Holds only read-only catalogs, so one processor can serve many documents
/// concurrently.
pub struct PackingListProcessor {
    catalog: ModelCatalog,
    rules: RuleCatalog,
    extractor: Box<dyn PdfExtractor>,
}

impl PackingListProcessor {
    pub fn new(
        catalog: ModelCatalog,
        rules: RuleCatalog,
        extractor: Box<dyn PdfExtractor>,
    ) -> PackingListProcessor {
        PackingListProcessor {
            catalog,
            rules,
            extractor,
        }
    }

    /// A processor over the built-in model and ineligibility catalogs.
    pub fn builtin(extractor: Box<dyn PdfExtractor>) -> Result<PackingListProcessor, PacklistError> {
        Ok(PackingListProcessor::new(
            ModelCatalog::builtin()?,
            RuleCatalog::builtin()?,
            extractor,
        ))
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RuleCatalog {
        &self.rules
    }

    /// Main API entry point: process one document.
    ///
    /// Never fails. Unknown formats, missing establishment numbers and
    /// unmatched layouts give a sentinel envelope; a fault (for example the
    /// PDF extraction failing) gives the NOMATCH envelope and a
    /// `Disposition::Fault`.
    pub async fn process(
        &self,
        input: DocumentInput,
        filename: &str,
        dispatch_location: Option<&str>,
    ) -> ProcessedPackingList {
        let format = format::classify(filename);
        if format == FileFormat::Unknown {
            log::info!("{filename}: unrecognised extension");
            return no_match(ParserModel::Unrecognised, dispatch_location);
        }

        let doc = match self.prepare(input).await {
            Ok(doc) => doc,
            Err(e) => return fault(filename, e, dispatch_location),
        };

        match select_model(&self.catalog, format, &doc) {
            Selection::NoMatch(sentinel) => no_match(sentinel, dispatch_location),
            Selection::Model(model) => {
                let mut packing_list = build_envelope(model, &doc, dispatch_location);
                validation::validate_and_clean(&mut packing_list, &self.rules);
                ProcessedPackingList {
                    packing_list,
                    disposition: Disposition::Parsed {
                        model: model.id.clone(),
                    },
                }
            }
        }
    }

    /// Read a file from disk, convert it by extension and process it.
    ///
    /// Only reading the file can fail; a file that cannot be converted is a
    /// document fault like any other.
    pub async fn process_file(
        &self,
        path: &Path,
        dispatch_location: Option<&str>,
    ) -> Result<ProcessedPackingList, PacklistError> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let input = match format::classify(&filename) {
            FileFormat::Spreadsheet => extraction::workbook::read_workbook(&bytes)
                .map(DocumentInput::Spreadsheet),
            FileFormat::Csv => extraction::delimited::read_csv(&bytes).map(DocumentInput::Csv),
            FileFormat::Pdf => Ok(DocumentInput::Pdf(bytes)),
            FileFormat::Unknown => {
                return Ok(no_match(ParserModel::Unrecognised, dispatch_location));
            }
        };

        Ok(match input {
            Ok(input) => self.process(input, &filename, dispatch_location).await,
            Err(e) => fault(&filename, e, dispatch_location),
        })
    }

    async fn prepare(&self, input: DocumentInput) -> Result<Document, PacklistError> {
        Ok(match input {
            DocumentInput::Pdf(bytes) => {
                let pdf = self.extractor.extract(&bytes).await?;
                log::debug!(
                    "{} extracted {} pages",
                    self.extractor.backend_name(),
                    pdf.pages.len()
                );
                Document::Pdf(pdf)
            }
            DocumentInput::Csv(rows) => Document::Table(sanitize_workbook(Workbook::from_csv(rows))),
            DocumentInput::Spreadsheet(workbook) => Document::Table(sanitize_workbook(workbook)),
        })
    }
}

/// Map a matched document and assemble its (unvalidated) envelope.
pub fn build_envelope(
    model: &ModelDescriptor,
    doc: &Document,
    dispatch_location: Option<&str>,
) -> ParsedPackingList {
    let items = match doc {
        Document::Table(workbook) => parsing::parse_table(model, workbook),
        Document::Pdf(pdf) => parsing::parse_pdf(model, pdf, &analyse_document(model, pdf)),
    };
    let primary = doc
        .establishment_numbers(&model.establishment_number)
        .into_iter()
        .next();
    let all = doc.establishment_numbers(&ANY_ESTABLISHMENT_NUMBER);
    combine(model, primary, all, items, dispatch_location)
}

fn no_match(parser_model: ParserModel, dispatch_location: Option<&str>) -> ProcessedPackingList {
    ProcessedPackingList {
        disposition: Disposition::NoMatch {
            sentinel: parser_model.clone(),
        },
        packing_list: sentinel(parser_model, dispatch_location),
    }
}

fn fault(filename: &str, e: PacklistError, dispatch_location: Option<&str>) -> ProcessedPackingList {
    log::warn!("{filename}: {e}");
    ProcessedPackingList {
        packing_list: sentinel(ParserModel::NoMatch, dispatch_location),
        disposition: Disposition::Fault {
            reason: e.to_string(),
        },
    }
}
