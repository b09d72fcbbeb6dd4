//! Progress-callback trait for summarization events.
//!
//! A request moves through `Idle → Summarizing → {Result | Error}`. Inject an
//! [`Arc<dyn SummaryProgressCallback>`] via
//! [`crate::config::SummaryConfigBuilder::progress_callback`] to observe those
//! transitions, e.g. to drive a terminal spinner, without the library knowing
//! how the host application talks to its user.
//!
//! # Example
//!
//! ```rust
//! use edgequake_docsum::{SummaryConfig, SummaryProgressCallback};
//! use std::sync::Arc;
//!
//! struct Logger;
//!
//! impl SummaryProgressCallback for Logger {
//!     fn on_summary_complete(&self, summary_len: usize) {
//!         eprintln!("summary ready ({summary_len} bytes)");
//!     }
//! }
//!
//! let config = SummaryConfig::builder()
//!     .progress_callback(Arc::new(Logger) as Arc<dyn SummaryProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::document::DocumentFormat;
use crate::output::Advisory;
use std::sync::Arc;

/// Called by the summarization pipeline at each state transition.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait SummaryProgressCallback: Send + Sync {
    /// Text was extracted from a document.
    ///
    /// # Arguments
    /// * `format`     — the source format
    /// * `units`      — pages, paragraphs, or 1 for plain text
    /// * `word_count` — words in the extracted text
    fn on_extraction_complete(&self, format: DocumentFormat, units: usize, word_count: usize) {
        let _ = (format, units, word_count);
    }

    /// The request passed validation and was rejected without an LLM call.
    fn on_rejected(&self, advisory: &Advisory) {
        let _ = advisory;
    }

    /// Idle → Summarizing: the LLM request is about to be sent.
    fn on_summary_start(&self, model: &str) {
        let _ = model;
    }

    /// Summarizing → Result.
    ///
    /// # Arguments
    /// * `summary_len` — byte length of the returned summary
    fn on_summary_complete(&self, summary_len: usize) {
        let _ = summary_len;
    }

    /// Summarizing → Error.
    fn on_summary_error(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SummaryProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummaryConfig`].
pub type ProgressCallback = Arc<dyn SummaryProgressCallback>;
