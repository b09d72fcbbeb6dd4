//! Error types for the edgequake-docsum library.
//!
//! Two error types reflect two layers of failure:
//!
//! * [`ExtractionError`] — a document's bytes could not be turned into text
//!   (corrupt PDF, broken `.docx` container, invalid UTF-8). Raised by the
//!   format extractors in [`crate::pipeline::extract`].
//!
//! * [`DocSumError`] — everything the top-level `summarize*` functions can
//!   return: input problems, extraction failures (wrapping
//!   [`ExtractionError`]), configuration problems, and collaborator failures.
//!
//! A request that is merely too short is *not* an error; it is reported as an
//! [`crate::output::Advisory`] inside [`crate::output::SummaryOutcome`].
//!
//! The library never prints. Callers use [`DocSumError::kind`] to decide how
//! to label a failure for their users.

use crate::document::DocumentFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn document bytes into text.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ExtractionError {
    /// The bytes are not a readable PDF container.
    #[error("Error reading PDF: {detail}")]
    CorruptPdf { detail: String },

    /// The PDF needs a user password; text cannot be extracted without it.
    #[error("Error reading PDF: document is encrypted\nTry decrypting with: qpdf --decrypt input.pdf output.pdf")]
    Encrypted,

    /// The text layer of a single page could not be decoded.
    ///
    /// Extraction stops at the first bad page; no partial text is returned.
    #[error("Error reading PDF: page {page} text could not be decoded: {detail}")]
    PageText { page: u32, detail: String },

    /// The bytes are not a readable Word (`.docx`) document.
    #[error("Error reading Word document: {detail}")]
    CorruptDocx { detail: String },

    /// Plain-text input is not valid UTF-8.
    #[error("Error reading text file: invalid UTF-8 at byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },
}

impl ExtractionError {
    /// The document format whose extractor raised this error.
    pub fn format(&self) -> DocumentFormat {
        match self {
            ExtractionError::CorruptPdf { .. }
            | ExtractionError::Encrypted
            | ExtractionError::PageText { .. } => DocumentFormat::Pdf,
            ExtractionError::CorruptDocx { .. } => DocumentFormat::Docx,
            ExtractionError::InvalidUtf8 { .. } => DocumentFormat::PlainText,
        }
    }
}

/// Coarse classification of a [`DocSumError`], for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ErrorKind {
    /// The input could not be read or decoded.
    Extraction,
    /// Credentials, provider selection, or builder values are wrong.
    Configuration,
    /// The text-generation service failed.
    Collaborator,
    /// The summary could not be written out.
    Output,
    /// A bug or runtime failure inside the library.
    Internal,
}

/// All fatal errors returned by the edgequake-docsum library.
#[derive(Debug, Error)]
pub enum DocSumError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading the input failed for another I/O reason.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is none of PDF, Word (.docx), or plain text.
    #[error("Unsupported document '{name}'\nSupported formats: PDF, Word (.docx), Text (.txt)")]
    UnsupportedFormat { name: String },

    /// The document was read but its text could not be extracted.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    // ── Config errors ─────────────────────────────────────────────────────
    /// No API key is available for the OpenAI-compatible endpoint.
    #[error("No API key configured.\nSet DOCSUM_API_KEY or OPENAI_API_KEY, or pass --api-key.")]
    MissingCredential,

    /// The named provider could not be initialised.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The LLM API returned an error response.
    #[error("An error occurred: LLM API error: {message}")]
    LlmApiError { message: String },

    /// The LLM API rejected the credential (401/403).
    #[error("An error occurred: authentication failed for provider '{provider}': {detail}")]
    AuthError { provider: String, detail: String },

    /// The LLM API returned HTTP 429.
    #[error("An error occurred: rate limit exceeded for provider '{provider}'")]
    RateLimitExceeded {
        provider: String,
        retry_after_secs: Option<u64>,
    },

    /// The LLM call did not finish within the configured timeout.
    #[error("An error occurred: LLM call timed out after {secs}s")]
    ApiTimeout { secs: u64 },

    /// The LLM API answered with a body that could not be decoded.
    #[error("An error occurred: malformed response from provider '{provider}': {detail}")]
    MalformedResponse { provider: String, detail: String },

    /// The LLM API answered successfully but with no text.
    #[error("An error occurred: provider '{provider}' returned an empty response")]
    EmptyResponse { provider: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the summary file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocSumError {
    /// Classify this error for display.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocSumError::FileNotFound { .. }
            | DocSumError::PermissionDenied { .. }
            | DocSumError::ReadFailed { .. }
            | DocSumError::UnsupportedFormat { .. }
            | DocSumError::Extraction(_) => ErrorKind::Extraction,
            DocSumError::MissingCredential
            | DocSumError::ProviderNotConfigured { .. }
            | DocSumError::InvalidConfig(_) => ErrorKind::Configuration,
            DocSumError::LlmApiError { .. }
            | DocSumError::AuthError { .. }
            | DocSumError::RateLimitExceeded { .. }
            | DocSumError::ApiTimeout { .. }
            | DocSumError::MalformedResponse { .. }
            | DocSumError::EmptyResponse { .. } => ErrorKind::Collaborator,
            DocSumError::OutputWriteFailed { .. } => ErrorKind::Output,
            DocSumError::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_display() {
        let e = DocSumError::RateLimitExceeded {
            provider: "openai".into(),
            retry_after_secs: Some(60),
        };
        assert!(e.to_string().contains("openai"));
        assert_eq!(e.kind(), ErrorKind::Collaborator);
    }

    #[test]
    fn api_timeout_display() {
        let e = DocSumError::ApiTimeout { secs: 45 };
        assert!(e.to_string().contains("45s"));
    }

    #[test]
    fn auth_error_display() {
        let e = DocSumError::AuthError {
            provider: "openai".into(),
            detail: "invalid key".into(),
        };
        assert!(e.to_string().contains("openai"));
        assert!(e.to_string().contains("invalid key"));
    }

    #[test]
    fn extraction_errors_keep_their_cause() {
        let e: DocSumError = ExtractionError::PageText {
            page: 4,
            detail: "bad font".into(),
        }
        .into();
        let msg = e.to_string();
        assert!(msg.contains("page 4"), "got: {msg}");
        assert!(msg.contains("bad font"), "got: {msg}");
        assert_eq!(e.kind(), ErrorKind::Extraction);
    }

    #[test]
    fn extraction_error_reports_its_format() {
        assert_eq!(ExtractionError::Encrypted.format(), DocumentFormat::Pdf);
        assert_eq!(
            ExtractionError::CorruptDocx { detail: "x".into() }.format(),
            DocumentFormat::Docx
        );
        assert_eq!(
            ExtractionError::InvalidUtf8 { valid_up_to: 3 }.format(),
            DocumentFormat::PlainText
        );
    }

    #[test]
    fn missing_credential_is_configuration() {
        assert_eq!(
            DocSumError::MissingCredential.kind(),
            ErrorKind::Configuration
        );
        assert!(DocSumError::MissingCredential
            .to_string()
            .contains("OPENAI_API_KEY"));
    }
}
