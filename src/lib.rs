//! # edgequake-docsum
//!
//! Summarize PDF, Word (`.docx`) and plain-text documents with a Large
//! Language Model.
//!
//! The caller picks how long the summary should be and what it should focus
//! on; the crate extracts the text, builds one prompt, makes one LLM call,
//! and returns the model's answer unchanged.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Document
//!  │
//!  ├─ 1. Input    local file, stdin, or pasted text
//!  ├─ 2. Extract  PDF pages (lopdf) / Word paragraphs (zip + quick-xml) / UTF-8
//!  ├─ 3. Guard    empty or < min_words → Advisory, no LLM call
//!  ├─ 4. Prompt   length clause + focus clause + full text
//!  ├─ 5. LLM      exactly one call, bounded by a timeout
//!  └─ 6. Output   summary text + stats, optional document_summary.txt
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_docsum::{summarize_file, ApiKey, LengthPreference, SummaryConfig, SummaryOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SummaryConfig::builder()
//!         .api_key(ApiKey::new(std::env::var("OPENAI_API_KEY")?))
//!         .length(LengthPreference::Short)
//!         .build()?;
//!
//!     match summarize_file("report.pdf", &config).await? {
//!         SummaryOutcome::Completed(out) => println!("{}", out.summary),
//!         SummaryOutcome::Rejected(advisory) => eprintln!("{advisory}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docsum` binary (clap + anyhow + tracing-subscriber) |
//!
//! ```toml
//! edgequake-docsum = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ApiKey, FocusPreference, LengthPreference, SummaryConfig, SummaryConfigBuilder};
pub use document::{Document, DocumentFormat};
pub use error::{DocSumError, ErrorKind, ExtractionError};
pub use output::{
    Advisory, ExtractedText, SummaryArtifact, SummaryOutcome, SummaryOutput, SummaryStats,
};
pub use pipeline::input::InputSource;
pub use pipeline::llm::{
    ChatCompletionsGenerator, Generation, GenerationOptions, ProviderGenerator, TextGenerator,
};
pub use prompts::SummaryRequest;
pub use progress::{NoopProgressCallback, ProgressCallback, SummaryProgressCallback};
pub use summarize::{
    check_input, extract_file, summarize_document, summarize_extracted, summarize_file,
    summarize_input, summarize_sync, summarize_text, summarize_to_file,
};
