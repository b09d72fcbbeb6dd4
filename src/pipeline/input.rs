//! Input resolution: turn a file path, standard input, or pasted text into a
//! [`Document`] with its format fixed.
//!
//! Format resolution order for files: explicit override, then file
//! extension, then magic bytes. A file that matches none of them is rejected
//! with [`DocSumError::UnsupportedFormat`]; it is never guessed to be text.
//! Standard input is treated like pasted text unless its magic bytes say PDF
//! or Word.

use crate::document::{Document, DocumentFormat};
use crate::error::DocSumError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where the document comes from.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// A local file.
    File(PathBuf),
    /// Everything readable from standard input.
    Stdin,
    /// Text supplied directly (the "paste text" path).
    Text(String),
}

impl InputSource {
    /// Interpret a CLI-style argument: `-` means standard input, anything else a path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(arg))
        }
    }
}

/// Resolve an input source to a [`Document`].
pub async fn resolve_input(
    source: &InputSource,
    format_override: Option<DocumentFormat>,
) -> Result<Document, DocSumError> {
    match source {
        InputSource::File(path) => load_file(path, format_override).await,
        InputSource::Stdin => {
            let bytes = tokio::task::spawn_blocking(read_stdin)
                .await
                .map_err(|e| DocSumError::Internal(format!("stdin task panicked: {e}")))??;
            Ok(document_from_stream("stdin", bytes, format_override))
        }
        InputSource::Text(text) => Ok(match format_override {
            Some(format) => Document::new("pasted text", format, text.clone().into_bytes()),
            None => Document::from_text(text.clone()),
        }),
    }
}

/// Read a local file and resolve its format.
pub async fn load_file(
    path: &Path,
    format_override: Option<DocumentFormat>,
) -> Result<Document, DocSumError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DocSumError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => DocSumError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => DocSumError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let format = format_override
        .or_else(|| DocumentFormat::from_path(path))
        .or_else(|| DocumentFormat::sniff(&bytes))
        .ok_or_else(|| DocSumError::UnsupportedFormat { name: name.clone() })?;

    info!("File uploaded: {} ({}, {} bytes)", name, format, bytes.len());
    Ok(Document::new(name, format, bytes))
}

fn read_stdin() -> Result<Vec<u8>, DocSumError> {
    let mut buf = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut buf)
        .map_err(|e| DocSumError::ReadFailed {
            path: PathBuf::from("<stdin>"),
            source: e,
        })?;
    debug!("Read {} bytes from stdin", buf.len());
    Ok(buf)
}

/// Build a document from an unnamed byte stream.
fn document_from_stream(
    name: &str,
    bytes: Vec<u8>,
    format_override: Option<DocumentFormat>,
) -> Document {
    let format = format_override
        .or_else(|| DocumentFormat::sniff(&bytes))
        .unwrap_or(DocumentFormat::PlainText);
    Document::new(name, format, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_means_stdin() {
        assert!(matches!(InputSource::from_arg("-"), InputSource::Stdin));
        assert!(matches!(
            InputSource::from_arg("report.pdf"),
            InputSource::File(p) if p == Path::new("report.pdf")
        ));
    }

    #[test]
    fn streams_default_to_text_unless_sniffed() {
        let doc = document_from_stream("stdin", b"plain words".to_vec(), None);
        assert_eq!(doc.format(), DocumentFormat::PlainText);

        let doc = document_from_stream("stdin", b"%PDF-1.4 ...".to_vec(), None);
        assert_eq!(doc.format(), DocumentFormat::Pdf);

        let doc = document_from_stream("stdin", b"%PDF".to_vec(), Some(DocumentFormat::PlainText));
        assert_eq!(doc.format(), DocumentFormat::PlainText);
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = load_file(Path::new("/definitely/not/here.pdf"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DocSumError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn extension_wins_over_magic_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"%PDF but really text").unwrap();

        let doc = load_file(&path, None).await.unwrap();
        assert_eq!(doc.format(), DocumentFormat::PlainText);
        assert_eq!(doc.name(), "notes.txt");
    }

    #[tokio::test]
    async fn unknown_extension_falls_back_to_sniffing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("download.bin");
        std::fs::write(&path, b"%PDF-1.7").unwrap();
        let doc = load_file(&path, None).await.unwrap();
        assert_eq!(doc.format(), DocumentFormat::Pdf);
    }

    #[tokio::test]
    async fn unrecognised_file_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        std::fs::write(&path, b"\x89PNG\r\n").unwrap();
        let err = load_file(&path, None).await.unwrap_err();
        assert!(matches!(err, DocSumError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn override_beats_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readme.md");
        std::fs::write(&path, b"# title").unwrap();
        let doc = load_file(&path, Some(DocumentFormat::PlainText)).await.unwrap();
        assert_eq!(doc.format(), DocumentFormat::PlainText);
    }

    #[tokio::test]
    async fn pasted_text_resolves_without_io() {
        let doc = resolve_input(&InputSource::Text("hello there".into()), None)
            .await
            .unwrap();
        assert_eq!(doc.format(), DocumentFormat::PlainText);
        assert_eq!(doc.bytes(), b"hello there");
    }
}
