//! Summarization entry points.
//!
//! Every entry point funnels into the same sequence:
//!
//! ```text
//! input ──▶ extract ──▶ guard ──▶ prompt ──▶ generate (once) ──▶ SummaryOutcome
//! ```
//!
//! The guard rejects empty or too-short text with an [`Advisory`] before any
//! generator is resolved, so a rejected request needs no credential and never
//! reaches the network.

use crate::config::SummaryConfig;
use crate::document::{Document, DocumentFormat};
use crate::error::DocSumError;
use crate::output::{Advisory, ExtractedText, SummaryOutcome, SummaryOutput, SummaryStats};
use crate::pipeline::input::{self, InputSource};
use crate::pipeline::{extract, llm};
use crate::prompts::SummaryRequest;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Summarize a document file.
///
/// The format is taken from the file extension, falling back to the file's
/// magic bytes.
///
/// # Returns
/// * `Ok(SummaryOutcome::Completed(_))` — the model's summary, verbatim.
/// * `Ok(SummaryOutcome::Rejected(_))` — the text was empty or too short;
///   no LLM call was made.
///
/// # Errors
/// Returns `Err(DocSumError)` when the file cannot be read or decoded, no
/// generator can be configured, or the LLM call fails.
pub async fn summarize_file(
    path: impl AsRef<Path>,
    config: &SummaryConfig,
) -> Result<SummaryOutcome, DocSumError> {
    let document = input::load_file(path.as_ref(), None).await?;
    summarize_document(document, config).await
}

/// Summarize whatever an [`InputSource`] points at.
pub async fn summarize_input(
    source: &InputSource,
    format_override: Option<DocumentFormat>,
    config: &SummaryConfig,
) -> Result<SummaryOutcome, DocSumError> {
    let document = input::resolve_input(source, format_override).await?;
    summarize_document(document, config).await
}

/// Summarize an in-memory document.
pub async fn summarize_document(
    document: Document,
    config: &SummaryConfig,
) -> Result<SummaryOutcome, DocSumError> {
    let start = Instant::now();
    info!("Summarizing '{}' ({})", document.name(), document.format());

    let extracted = extract::extract_document(document).await?;
    let extraction_ms = start.elapsed().as_millis() as u64;

    summarize_inner(&extracted, extraction_ms, start, config).await
}

/// Summarize pasted text.
pub async fn summarize_text(
    text: &str,
    config: &SummaryConfig,
) -> Result<SummaryOutcome, DocSumError> {
    let start = Instant::now();
    let extracted = ExtractedText::from_plain(text);
    summarize_inner(&extracted, 0, start, config).await
}

/// Summarize text that has already been extracted.
pub async fn summarize_extracted(
    extracted: &ExtractedText,
    config: &SummaryConfig,
) -> Result<SummaryOutcome, DocSumError> {
    summarize_inner(extracted, 0, Instant::now(), config).await
}

/// Synchronous wrapper around [`summarize_file`].
///
/// Creates a temporary tokio runtime internally; do not call it from inside
/// an async context.
pub fn summarize_sync(
    path: impl AsRef<Path>,
    config: &SummaryConfig,
) -> Result<SummaryOutcome, DocSumError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DocSumError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(summarize_file(path, config))
}

/// Summarize a file and write the summary to `output_path`.
///
/// Nothing is written when the request is rejected.
pub async fn summarize_to_file(
    path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &SummaryConfig,
) -> Result<SummaryOutcome, DocSumError> {
    let outcome = summarize_file(path, config).await?;
    if let SummaryOutcome::Completed(ref output) = outcome {
        let output_path = output_path.as_ref();
        output.artifact().write_to(output_path)?;
        info!("Summary written to {}", output_path.display());
    }
    Ok(outcome)
}

/// Extract a file's text without summarizing it.
///
/// Needs no generator or API key.
pub async fn extract_file(path: impl AsRef<Path>) -> Result<ExtractedText, DocSumError> {
    let document = input::load_file(path.as_ref(), None).await?;
    extract::extract_document(document).await
}

/// Decide whether `text` is worth summarizing.
///
/// Returns `None` when it is, or the advisory to show instead.
pub fn check_input(text: &str, min_words: usize) -> Option<Advisory> {
    if text.trim().is_empty() {
        return Some(Advisory::EmptyInput);
    }
    let words = crate::output::word_count(text);
    if words < min_words {
        return Some(Advisory::TooShort {
            words,
            minimum: min_words,
        });
    }
    None
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn summarize_inner(
    extracted: &ExtractedText,
    extraction_duration_ms: u64,
    start: Instant,
    config: &SummaryConfig,
) -> Result<SummaryOutcome, DocSumError> {
    let word_count = extracted.word_count();
    debug!(
        "Extracted {} {}(s), {} words",
        extracted.units(),
        extracted.format().unit_name(),
        word_count
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(extracted.format(), extracted.units(), word_count);
    }

    if let Some(advisory) = check_input(extracted.as_str(), config.min_words) {
        warn!("{}", advisory);
        if let Some(ref cb) = config.progress_callback {
            cb.on_rejected(&advisory);
        }
        return Ok(SummaryOutcome::Rejected(advisory));
    }

    let generator = llm::resolve_generator(config)?;
    let model = config.model_or_default().to_string();
    let prompt = SummaryRequest::from_config(extracted, config).prompt();

    if let Some(ref cb) = config.progress_callback {
        cb.on_summary_start(&model);
    }

    let llm_start = Instant::now();
    let generation = match llm::generate_summary(&generator, &prompt, config).await {
        Ok(g) => g,
        Err(e) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_summary_error(&e.to_string());
            }
            return Err(e);
        }
    };
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_summary_complete(generation.text.len());
    }

    let stats = SummaryStats {
        word_count,
        units: extracted.units(),
        input_tokens: generation.input_tokens,
        output_tokens: generation.output_tokens,
        extraction_duration_ms,
        llm_duration_ms,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Summary complete: {} chars from {} words, {}ms total",
        generation.text.len(),
        word_count,
        stats.total_duration_ms
    );

    Ok(SummaryOutcome::Completed(SummaryOutput {
        summary: generation.text,
        provider: generator.name().to_string(),
        model,
        length: config.length,
        focus: config.focus,
        format: extracted.format(),
        prompt: Some(prompt),
        stats,
    }))
}
