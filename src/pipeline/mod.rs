//! Pipeline stages for document summarization.
//!
//! Each submodule implements exactly one step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ llm
//! (path/stdin/text)  (pdf/docx/txt)  (one call)
//! ```
//!
//! 1. [`input`]   — read the file, stdin, or pasted text and fix its format
//! 2. [`extract`] — turn bytes into text; runs in `spawn_blocking` because
//!    PDF parsing and unzipping are CPU-bound
//! 3. [`llm`]     — send the prompt once with a timeout; the only stage with
//!    network I/O

pub mod extract;
pub mod input;
pub mod llm;
