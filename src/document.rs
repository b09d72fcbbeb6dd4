//! Document model: raw bytes tagged with a closed format variant.
//!
//! The format is resolved exactly once, when the document is created. Every
//! later stage matches on [`DocumentFormat`] exhaustively, so adding a format
//! is a compile error everywhere it must be handled rather than a silent
//! fall-through to empty text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// MIME type of Word (`.docx`) documents.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The document formats the extractors understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Portable Document Format.
    Pdf,
    /// Office Open XML word-processing document (`.docx`).
    Docx,
    /// UTF-8 text.
    PlainText,
}

impl DocumentFormat {
    /// Resolve a format from a MIME type, ignoring parameters such as `charset`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(DocumentFormat::Pdf),
            DOCX_MIME => Some(DocumentFormat::Docx),
            "text/plain" => Some(DocumentFormat::PlainText),
            _ => None,
        }
    }

    /// Resolve a format from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "txt" | "text" => Some(DocumentFormat::PlainText),
            _ => None,
        }
    }

    /// Resolve a format from the extension of `path`.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Guess a format from leading magic bytes.
    ///
    /// Only binary containers are sniffed; text is never guessed because
    /// almost any byte sequence could be text.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF") {
            Some(DocumentFormat::Pdf)
        } else if bytes.starts_with(b"PK\x03\x04") {
            Some(DocumentFormat::Docx)
        } else {
            None
        }
    }

    /// The canonical MIME type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Docx => DOCX_MIME,
            DocumentFormat::PlainText => "text/plain",
        }
    }

    /// What one extraction unit is called for this format.
    pub fn unit_name(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pages",
            DocumentFormat::Docx => "paragraphs",
            DocumentFormat::PlainText => "blocks",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "Word",
            DocumentFormat::PlainText => "Text",
        };
        f.write_str(s)
    }
}

/// An uploaded or pasted document, consumed once by extraction.
#[derive(Clone)]
pub struct Document {
    name: String,
    format: DocumentFormat,
    bytes: Vec<u8>,
}

impl Document {
    /// Wrap raw bytes whose format is already known.
    pub fn new(name: impl Into<String>, format: DocumentFormat, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            format,
            bytes,
        }
    }

    /// A document made of pasted text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new("pasted text", DocumentFormat::PlainText, text.into().into_bytes())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("format", &self.format)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
