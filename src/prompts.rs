//! Prompt assembly for document summarization.
//!
//! Every instruction clause and the prompt template live here so the exact
//! wording sent to the model is defined in one place and can be inspected by
//! unit tests without calling a provider.
//!
//! The document text is interpolated whole. Nothing here truncates, chunks, or
//! budgets the input, so a document larger than the model's context window is
//! rejected by the provider rather than summarized.

use crate::config::{FocusPreference, LengthPreference, SummaryConfig};
use crate::output::ExtractedText;

pub const SHORT_INSTRUCTION: &str = "Provide a brief summary in 2-3 sentences.";
pub const MEDIUM_INSTRUCTION: &str = "Provide a concise summary in 1-2 paragraphs.";
pub const LONG_INSTRUCTION: &str =
    "Provide a detailed summary with key points and important details.";

pub const GENERAL_FOCUS: &str = "Focus on the main themes and overall content.";
pub const KEY_POINTS_FOCUS: &str =
    "Focus on extracting and listing the key points and main arguments.";
pub const ACTION_ITEMS_FOCUS: &str = "Focus on identifying action items, tasks, and next steps.";
pub const DECISIONS_FOCUS: &str =
    "Focus on decisions made, conclusions reached, and recommendations.";

/// Section marker preceding the document text.
pub const DOCUMENT_MARKER: &str = "Document content:";

/// Section marker after which the model writes its answer.
pub const SUMMARY_MARKER: &str = "Summary:";

/// The length clause for a preference.
pub fn length_instruction(length: LengthPreference) -> &'static str {
    match length {
        LengthPreference::Short => SHORT_INSTRUCTION,
        LengthPreference::Medium => MEDIUM_INSTRUCTION,
        LengthPreference::Long => LONG_INSTRUCTION,
    }
}

/// The focus clause for a preference.
pub fn focus_instruction(focus: FocusPreference) -> &'static str {
    match focus {
        FocusPreference::General => GENERAL_FOCUS,
        FocusPreference::KeyPoints => KEY_POINTS_FOCUS,
        FocusPreference::ActionItems => ACTION_ITEMS_FOCUS,
        FocusPreference::Decisions => DECISIONS_FOCUS,
    }
}

/// Build the single user message sent to the model.
pub fn build_prompt(text: &str, length: LengthPreference, focus: FocusPreference) -> String {
    format!(
        "Please summarize the following document.\n\
         {length}\n\
         {focus}\n\
         \n\
         {DOCUMENT_MARKER}\n\
         {text}\n\
         \n\
         {SUMMARY_MARKER}\n",
        length = length_instruction(length),
        focus = focus_instruction(focus),
    )
}

/// Like [`build_prompt`], but from raw keys with medium/general fallback.
pub fn build_prompt_from_keys(text: &str, length_key: &str, focus_key: &str) -> String {
    build_prompt(
        text,
        LengthPreference::from_key_or_default(length_key),
        FocusPreference::from_key_or_default(focus_key),
    )
}

/// Extracted text plus the two preferences that shape its summary.
#[derive(Debug, Clone, Copy)]
pub struct SummaryRequest<'a> {
    pub text: &'a ExtractedText,
    pub length: LengthPreference,
    pub focus: FocusPreference,
}

impl<'a> SummaryRequest<'a> {
    pub fn new(text: &'a ExtractedText, length: LengthPreference, focus: FocusPreference) -> Self {
        Self {
            text,
            length,
            focus,
        }
    }

    /// Take length and focus from the config.
    pub fn from_config(text: &'a ExtractedText, config: &SummaryConfig) -> Self {
        Self::new(text, config.length, config.focus)
    }

    pub fn prompt(&self) -> String {
        build_prompt(self.text.as_str(), self.length, self.focus)
    }
}
