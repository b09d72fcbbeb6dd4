//! Text extraction: one [`Extractor`] per [`DocumentFormat`].
//!
//! Every extractor maps a byte buffer to an [`ExtractedText`] whose units
//! (pages, paragraphs) are joined by `\n` in source order. A failure anywhere
//! fails the whole document; partial text is never returned.
//!
//! Parsing is CPU-bound, so [`extract_document`] runs it on tokio's blocking
//! pool.

use crate::document::{Document, DocumentFormat};
use crate::error::{DocSumError, ExtractionError};
use crate::output::ExtractedText;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, QName, ResolveResult};
use quick_xml::reader::NsReader;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// Path of the main document part inside a `.docx` container.
const DOCX_BODY_PART: &str = "word/document.xml";

/// WordprocessingML namespace URIs (transitional, strict).
const WORDML_NAMESPACES: [&[u8]; 2] = [
    b"http://schemas.openxmlformats.org/wordprocessingml/2006/main",
    b"http://purl.oclc.org/ooxml/wordprocessingml/main",
];

/// Format-specific text extraction.
pub trait Extractor: Send + Sync {
    /// The format this extractor understands.
    fn format(&self) -> DocumentFormat;

    /// Extract the document's text.
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError>;
}

/// The extractor responsible for `format`.
pub fn extractor_for(format: DocumentFormat) -> &'static dyn Extractor {
    match format {
        DocumentFormat::Pdf => &PdfExtractor,
        DocumentFormat::Docx => &DocxExtractor,
        DocumentFormat::PlainText => &PlainTextExtractor,
    }
}

/// Extract text from a document on the current thread.
pub fn extract(document: &Document) -> Result<ExtractedText, ExtractionError> {
    let text = extractor_for(document.format()).extract(document.bytes())?;
    debug!(
        "Extracted {} {} / {} chars from '{}'",
        text.units(),
        document.format().unit_name(),
        text.as_str().len(),
        document.name()
    );
    Ok(text)
}

/// Extract text from a document on the blocking thread pool.
pub async fn extract_document(document: Document) -> Result<ExtractedText, DocSumError> {
    tokio::task::spawn_blocking(move || extract(&document))
        .await
        .map_err(|e| DocSumError::Internal(format!("Extraction task panicked: {}", e)))?
        .map_err(DocSumError::from)
}

// ── PDF ──────────────────────────────────────────────────────────────────

/// Page-by-page text extraction with lopdf.
pub struct PdfExtractor;

impl Extractor for PdfExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let document = lopdf::Document::load_mem(bytes).map_err(|e| {
            let detail = e.to_string();
            if detail.to_lowercase().contains("decrypt") {
                ExtractionError::Encrypted
            } else {
                ExtractionError::CorruptPdf { detail }
            }
        })?;

        // lopdf decrypts on load when the user password is empty and records
        // the state; without it the objects are still ciphertext
        if document.is_encrypted() && document.encryption_state.is_none() {
            return Err(ExtractionError::Encrypted);
        }

        let pages = document.get_pages();
        if pages.is_empty() {
            return Err(ExtractionError::CorruptPdf {
                detail: "document has no pages".into(),
            });
        }

        // get_pages() is keyed by 1-based page number, so iteration is in page order
        let mut texts = Vec::with_capacity(pages.len());
        for &page in pages.keys() {
            let text = document
                .extract_text(&[page])
                .map_err(|e| ExtractionError::PageText {
                    page,
                    detail: e.to_string(),
                })?;
            texts.push(text);
        }

        Ok(ExtractedText::from_units(DocumentFormat::Pdf, texts))
    }
}

// ── Word ─────────────────────────────────────────────────────────────────

/// Paragraph-by-paragraph text extraction from `.docx` containers.
pub struct DocxExtractor;

impl Extractor for DocxExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let mut archive =
            ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractionError::CorruptDocx {
                detail: format!("not a .docx container: {e}"),
            })?;

        let mut xml = String::new();
        archive
            .by_name(DOCX_BODY_PART)
            .map_err(|e| ExtractionError::CorruptDocx {
                detail: format!("missing {DOCX_BODY_PART}: {e}"),
            })?
            .read_to_string(&mut xml)
            .map_err(|e| ExtractionError::CorruptDocx {
                detail: format!("unreadable {DOCX_BODY_PART}: {e}"),
            })?;

        let paragraphs = body_paragraphs(&xml)?;
        Ok(ExtractedText::from_units(DocumentFormat::Docx, paragraphs))
    }
}

/// Collect the text of every body-level `w:p` in document order.
///
/// Elements are matched by namespace, not prefix, so a part that binds
/// WordprocessingML to something other than `w:` reads the same. Paragraphs
/// nested in tables or text boxes are skipped. Inside a run, `w:t`
/// contributes its text, `w:tab` a tab, and `w:br`/`w:cr` a newline.
fn body_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut p_depth = 0usize;

    let malformed = |pos: usize, e: quick_xml::Error| ExtractionError::CorruptDocx {
        detail: format!("malformed {DOCX_BODY_PART} at byte {pos}: {e}"),
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = wordml_name(&reader, e.name());
                if name == b"p" {
                    p_depth += 1;
                    if p_depth == 1 && parent_is(&stack, b"body") {
                        current = Some(String::new());
                    }
                }
                stack.push(name);
            }
            Ok(Event::Empty(e)) => match wordml_name(&reader, e.name()).as_slice() {
                b"p" if p_depth == 0 && parent_is(&stack, b"body") => {
                    paragraphs.push(String::new());
                }
                b"tab" if p_depth == 1 && parent_is(&stack, b"r") => {
                    if let Some(p) = current.as_mut() {
                        p.push('\t');
                    }
                }
                b"br" | b"cr" if p_depth == 1 && parent_is(&stack, b"r") => {
                    if let Some(p) = current.as_mut() {
                        p.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if p_depth == 1 && parent_is(&stack, b"t") {
                    if let Some(p) = current.as_mut() {
                        let text = t
                            .unescape()
                            .map_err(|e| malformed(reader.buffer_position(), e))?;
                        p.push_str(&text);
                    }
                }
            }
            Ok(Event::End(_)) => {
                if stack.pop().is_some_and(|name| name == b"p") {
                    if p_depth == 1 {
                        if let Some(p) = current.take() {
                            paragraphs.push(p);
                        }
                    }
                    p_depth = p_depth.saturating_sub(1);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(malformed(reader.buffer_position(), e)),
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Local name of a WordprocessingML element; empty for any other namespace.
fn wordml_name(reader: &NsReader<&[u8]>, name: QName<'_>) -> Vec<u8> {
    match reader.resolve_element(name) {
        (ResolveResult::Bound(Namespace(ns)), local)
            if WORDML_NAMESPACES.iter().any(|uri| *uri == ns) =>
        {
            local.as_ref().to_vec()
        }
        _ => Vec::new(),
    }
}

fn parent_is(stack: &[Vec<u8>], name: &[u8]) -> bool {
    stack.last().is_some_and(|n| n.as_slice() == name)
}

// ── Plain text ───────────────────────────────────────────────────────────

/// Strict UTF-8 decoding.
pub struct PlainTextExtractor;

impl Extractor for PlainTextExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::PlainText
    }

    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let text = std::str::from_utf8(bytes).map_err(|e| ExtractionError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        })?;
        Ok(ExtractedText::from_plain(text))
    }
}
