//! Output types: extracted text, summary results, advisories, and the
//! downloadable summary artifact.

use crate::config::{FocusPreference, LengthPreference};
use crate::document::DocumentFormat;
use crate::error::DocSumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fixed file name of the downloadable summary.
pub const SUMMARY_FILE_NAME: &str = "document_summary.txt";

/// Content type of the downloadable summary.
pub const SUMMARY_MIME_TYPE: &str = "text/plain";

/// Text extracted from a document.
///
/// Units (pages, paragraphs) are joined by `\n` in source order and the whole
/// string is trimmed. Once built the text cannot be modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedText {
    text: String,
    format: DocumentFormat,
    units: usize,
}

impl ExtractedText {
    /// Join extracted units into a single trimmed string.
    ///
    /// Each unit loses its trailing line breaks so that `n` units produce `n`
    /// newline-separated segments.
    pub(crate) fn from_units<I, S>(format: DocumentFormat, units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        let mut count = 0;
        for unit in units {
            text.push_str(unit.as_ref().trim_end_matches(['\r', '\n']));
            text.push('\n');
            count += 1;
        }
        Self {
            text: text.trim().to_string(),
            format,
            units: count,
        }
    }

    /// Wrap already-decoded plain text.
    pub(crate) fn from_plain(text: &str) -> Self {
        Self {
            text: text.trim().to_string(),
            format: DocumentFormat::PlainText,
            units: 1,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Number of pages (PDF), paragraphs (Word), or 1 (plain text).
    pub fn units(&self) -> usize {
        self.units
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A request that was turned away before reaching the model.
///
/// Advisories are not errors: nothing failed, the input simply does not
/// warrant a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advisory {
    /// No text at all.
    EmptyInput,
    /// Fewer words than the configured minimum.
    TooShort { words: usize, minimum: usize },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::EmptyInput => {
                f.write_str("Please upload a document or paste some text first!")
            }
            Advisory::TooShort { words, minimum } => write!(
                f,
                "Text seems too short for meaningful summarization ({words} words, \
                 at least {minimum} needed). Please provide more content."
            ),
        }
    }
}

/// Timing and token statistics for one summarization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Words in the extracted text.
    pub word_count: usize,
    /// Pages, paragraphs, or 1 for plain text.
    pub units: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub extraction_duration_ms: u64,
    pub llm_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// A completed summary.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutput {
    /// The model's response, unmodified.
    pub summary: String,
    /// Name of the generator that produced the summary.
    pub provider: String,
    pub model: String,
    pub length: LengthPreference,
    pub focus: FocusPreference,
    pub format: DocumentFormat,
    /// The exact prompt that was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub stats: SummaryStats,
}

impl SummaryOutput {
    /// The downloadable artifact for this summary.
    pub fn artifact(&self) -> SummaryArtifact {
        SummaryArtifact::new(self.summary.clone())
    }
}

/// Result of a summarization request that did not fail.
#[derive(Debug, Clone, Serialize)]
pub enum SummaryOutcome {
    Completed(SummaryOutput),
    Rejected(Advisory),
}

impl SummaryOutcome {
    pub fn summary(&self) -> Option<&SummaryOutput> {
        match self {
            SummaryOutcome::Completed(out) => Some(out),
            SummaryOutcome::Rejected(_) => None,
        }
    }

    pub fn advisory(&self) -> Option<&Advisory> {
        match self {
            SummaryOutcome::Completed(_) => None,
            SummaryOutcome::Rejected(a) => Some(a),
        }
    }

    /// Convert a rejection into `None`, keeping only completed summaries.
    pub fn into_summary(self) -> Option<SummaryOutput> {
        match self {
            SummaryOutcome::Completed(out) => Some(out),
            SummaryOutcome::Rejected(_) => None,
        }
    }
}

/// The summary as a downloadable plain-text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryArtifact {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub contents: String,
}

impl SummaryArtifact {
    pub fn new(contents: String) -> Self {
        Self {
            file_name: SUMMARY_FILE_NAME,
            mime_type: SUMMARY_MIME_TYPE,
            contents,
        }
    }

    /// Write the artifact into `dir` under its fixed file name.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, DocSumError> {
        let path = dir.as_ref().join(self.file_name);
        self.write_to(&path)?;
        Ok(path)
    }

    /// Write the artifact to `path` atomically (temp file in the same
    /// directory, then rename).
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), DocSumError> {
        let path = path.as_ref();
        let write_err = |source: std::io::Error| DocSumError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(write_err)?;
        tmp.write_all(self.contents.as_bytes()).map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_are_joined_with_single_newlines() {
        let t = ExtractedText::from_units(DocumentFormat::Pdf, ["one\n", "two", "three\r\n"]);
        assert_eq!(t.as_str(), "one\ntwo\nthree");
        assert_eq!(t.units(), 3);
        assert_eq!(t.as_str().split('\n').count(), 3);
    }

    #[test]
    fn outer_whitespace_is_trimmed() {
        let t = ExtractedText::from_units(DocumentFormat::Docx, ["", "  body  ", ""]);
        assert_eq!(t.as_str(), "body");
        assert_eq!(t.units(), 3);
    }

    #[test]
    fn plain_text_is_identity_up_to_trim() {
        let t = ExtractedText::from_plain("\n  a b\n c  \t");
        assert_eq!(t.as_str(), "a b\n c");
        assert_eq!(t.word_count(), 3);
    }

    #[test]
    fn word_count_handles_mixed_whitespace() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("a\tb\nc  d"), 4);
    }

    #[test]
    fn advisories_have_distinct_messages() {
        let empty = Advisory::EmptyInput.to_string();
        let short = Advisory::TooShort {
            words: 9,
            minimum: 10,
        }
        .to_string();
        assert_ne!(empty, short);
        assert!(short.contains("too short"));
        assert!(short.contains('9'));
    }

    #[test]
    fn artifact_has_fixed_name_and_type() {
        let a = SummaryArtifact::new("hello".into());
        assert_eq!(a.file_name, "document_summary.txt");
        assert_eq!(a.mime_type, "text/plain");
    }

    #[test]
    fn artifact_writes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let a = SummaryArtifact::new("  Summary with trailing space \n".into());
        let path = a.write_to_dir(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "document_summary.txt");
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "  Summary with trailing space \n");
    }

    #[test]
    fn artifact_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/out.txt");
        SummaryArtifact::new("x".into()).write_to(&nested).unwrap();
        assert_eq!(std::fs::read_to_string(nested).unwrap(), "x");
    }
}
