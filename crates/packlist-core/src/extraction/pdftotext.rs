use crate::error::PacklistError;
use crate::extraction::{PdfDocument, PdfExtractor, PdfPage, TextFragment};
use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox` to get one box per word, which becomes one
/// `TextFragment`.
pub struct PdftotextExtractor {
    binary: PathBuf,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        Self::with_binary("pdftotext")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        PdftotextExtractor {
            binary: binary.into(),
        }
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PdfExtractor for PdftotextExtractor {
    async fn extract(&self, pdf_bytes: &[u8]) -> Result<PdfDocument, PacklistError> {
        let bytes = pdf_bytes.to_vec();
        let binary = self.binary.clone();
        tokio::task::spawn_blocking(move || run_pdftotext(&binary, &bytes))
            .await
            .map_err(|e| PacklistError::Extraction(format!("pdftotext task failed: {e}")))?
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

fn run_pdftotext(binary: &Path, pdf_bytes: &[u8]) -> Result<PdfDocument, PacklistError> {
    let mut tmpfile =
        tempfile::NamedTempFile::new().map_err(|e| PacklistError::Extraction(e.to_string()))?;
    tmpfile
        .write_all(pdf_bytes)
        .map_err(|e| PacklistError::Extraction(e.to_string()))?;

    let output = Command::new(binary)
        .arg("-bbox")
        .arg(tmpfile.path())
        .arg("-") // output to stdout
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PacklistError::PdftotextNotFound
            } else {
                PacklistError::Extraction(format!("pdftotext -bbox failed: {e}"))
            }
        })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(PacklistError::PdftotextFailed { code, stderr });
    }

    let xml = String::from_utf8_lossy(&output.stdout);
    let document = parse_bbox_xml(&xml)?;
    log::debug!(
        "pdftotext extracted {} page(s), {} fragment(s)",
        document.pages.len(),
        document.fragments().count()
    );
    Ok(document)
}

/// Parse `pdftotext -bbox` XHTML into pages of word fragments.
pub fn parse_bbox_xml(xml: &str) -> Result<PdfDocument, PacklistError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<PdfPage> = Vec::new();
    let mut current_word: Option<(f32, f32, f32, f32)> = None;
    let mut word_text = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| PacklistError::Extraction(format!("invalid bbox output: {e}")))?;

        match event {
            Event::Start(e) if e.name().as_ref() == b"page" => {
                pages.push(PdfPage {
                    page_number: pages.len() + 1,
                    content: Vec::new(),
                });
            }
            Event::Empty(e) if e.name().as_ref() == b"page" => {
                // A page without any words.
                pages.push(PdfPage {
                    page_number: pages.len() + 1,
                    content: Vec::new(),
                });
            }
            Event::Start(e) if e.name().as_ref() == b"word" => {
                current_word = Some(parse_word_box(&e)?);
                word_text.clear();
            }
            Event::Text(t) if current_word.is_some() => {
                let text = t
                    .unescape()
                    .map_err(|e| PacklistError::Extraction(format!("invalid word text: {e}")))?;
                word_text.push_str(&text);
            }
            Event::End(e) if e.name().as_ref() == b"word" => {
                if let (Some((x_min, y_min, x_max, y_max)), Some(page)) =
                    (current_word.take(), pages.last_mut())
                {
                    let text = word_text.trim();
                    if !text.is_empty() {
                        page.content.push(TextFragment {
                            x: x_min,
                            y: y_min,
                            width: x_max - x_min,
                            height: y_max - y_min,
                            text: text.to_string(),
                        });
                    }
                }
                word_text.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(PdfDocument { pages })
}

fn parse_word_box(tag: &BytesStart<'_>) -> Result<(f32, f32, f32, f32), PacklistError> {
    let mut x_min = None;
    let mut y_min = None;
    let mut x_max = None;
    let mut y_max = None;

    for attr in tag.attributes() {
        let attr = attr.map_err(|e| PacklistError::Extraction(format!("invalid attribute: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| PacklistError::Extraction(format!("invalid attribute: {e}")))?;
        let parsed = value.trim().parse::<f32>().ok();
        match attr.key.as_ref() {
            b"xMin" => x_min = parsed,
            b"yMin" => y_min = parsed,
            b"xMax" => x_max = parsed,
            b"yMax" => y_max = parsed,
            _ => {}
        }
    }

    match (x_min, y_min, x_max, y_max) {
        (Some(a), Some(b), Some(c), Some(d)) => Ok((a, b, c, d)),
        _ => Err(PacklistError::Extraction(
            "word element without a complete bounding box".into(),
        )),
    }
}
