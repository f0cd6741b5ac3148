use packlist_core::catalog::{self, descriptor::ModelCatalog};
use packlist_core::error::PacklistError;
use packlist_core::extraction::pdftotext::PdftotextExtractor;
use packlist_core::format::{self, FileFormat};
use packlist_core::rules::{self, RuleCatalog};
use packlist_core::PackingListProcessor;
use std::path::{Path, PathBuf};

use crate::output;

pub struct ParseArgs {
    pub input_file: PathBuf,
    pub dispatch_location: Option<String>,
    pub models: Option<PathBuf>,
    pub rules: Option<PathBuf>,
    pub pdftotext: Option<PathBuf>,
    pub output: String,
    pub out: Option<PathBuf>,
}

pub async fn run(args: ParseArgs) -> Result<(), PacklistError> {
    let catalog = match &args.models {
        Some(path) => catalog::load_catalog(path)?,
        None => ModelCatalog::builtin()?,
    };
    let rules = match &args.rules {
        Some(path) => rules::load_rules(path)?,
        None => RuleCatalog::builtin()?,
    };
    let extractor = match args.pdftotext {
        Some(binary) => PdftotextExtractor::with_binary(binary),
        None => PdftotextExtractor::new(),
    };
    if is_pdf(&args.input_file) && !extractor.is_available() {
        return Err(PacklistError::PdftotextNotFound);
    }

    let processor = PackingListProcessor::new(catalog, rules, Box::new(extractor));
    let result = processor
        .process_file(&args.input_file, args.dispatch_location.as_deref())
        .await?;

    match args.out {
        Some(path) => {
            // Always write JSON when saving to file
            std::fs::write(&path, output::json::to_json(&result.packing_list)?)?;
            eprintln!(
                "{}: {} item(s), written to {}",
                result.packing_list.parser_model,
                result.packing_list.items.len(),
                path.display()
            );
        }
        None => match args.output.as_str() {
            "json" => output::json::print(&result.packing_list)?,
            _ => println!("{}", output::table::format_result(&result)),
        },
    }

    Ok(())
}

fn is_pdf(path: &Path) -> bool {
    path.file_name()
        .map(|n| format::classify(&n.to_string_lossy()) == FileFormat::Pdf)
        .unwrap_or(false)
}
