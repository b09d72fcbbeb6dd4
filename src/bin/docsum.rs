//! CLI binary for edgequake-docsum.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `SummaryConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_docsum::{
    extract_file, summarize_input, ApiKey, DocSumError, DocumentFormat, ErrorKind,
    FocusPreference, InputSource, LengthPreference, ProgressCallback, SummaryConfig,
    SummaryOutcome, SummaryProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

/// Exit code for requests turned away by the input guard.
const EXIT_ADVISORY: u8 = 2;

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal spinner shown while the summary is being generated.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Reading");
        bar.set_message("Extracting text…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl SummaryProgressCallback for CliProgressCallback {
    fn on_extraction_complete(&self, format: DocumentFormat, units: usize, word_count: usize) {
        self.bar.println(format!(
            "  {} {} document  {}",
            green("✓"),
            format,
            dim(&format!("{units} {}(s), {word_count} words", format.unit_name())),
        ));
    }

    fn on_rejected(&self, _advisory: &edgequake_docsum::Advisory) {
        self.bar.finish_and_clear();
    }

    fn on_summary_start(&self, model: &str) {
        self.bar.set_prefix("Summarizing");
        self.bar.set_message(format!("Generating summary with {model}…"));
    }

    fn on_summary_complete(&self, summary_len: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} Summary ready  {}",
            green("✔"),
            dim(&format!("{summary_len} chars"))
        );
    }

    fn on_summary_error(&self, _error: &str) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarize a PDF (summary on stdout)
  docsum report.pdf

  # Short summary of action items from a Word document
  docsum --length short --focus action_items minutes.docx

  # Summarize pasted text
  docsum --text "$(pbpaste)"

  # Read from stdin
  cat notes.txt | docsum -

  # Save as document_summary.txt in the current directory
  docsum report.pdf --save

  # Save as document_summary.txt in another directory
  docsum report.pdf --save out/

  # Write the summary to an arbitrary path
  docsum report.pdf -o summary.txt

  # Show extracted text only (no API key needed)
  docsum --extract-only report.pdf

  # JSON output with stats and the prompt that was sent
  docsum --json report.pdf > summary.json

SUMMARY LENGTH:
  short    2-3 sentences
  medium   1-2 paragraphs (default)
  long     detailed, with key points

FOCUS AREA:
  general        main themes and overall content (default)
  key_points     key points and main arguments
  action_items   action items, tasks, next steps
  decisions      decisions, conclusions, recommendations

SUPPORTED FORMATS:
  PDF (.pdf), Word (.docx), Text (.txt)

ENVIRONMENT VARIABLES:
  DOCSUM_API_KEY          API key for the OpenAI-compatible endpoint
  OPENAI_API_KEY          Used when DOCSUM_API_KEY is not set
  DOCSUM_BASE_URL         OpenAI-compatible base URL (default https://api.openai.com/v1)
  DOCSUM_MODEL            Model ID (default gpt-4.1-nano)
  DOCSUM_PROVIDER         Other edgequake-llm provider (anthropic, gemini, ollama, …)
  ANTHROPIC_API_KEY       Read by the anthropic provider
  GEMINI_API_KEY          Read by the gemini provider
"#;

/// Summarize PDF, Word and text documents with an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "docsum",
    version,
    about = "Summarize PDF, Word and text documents with an LLM",
    long_about = "Summarize PDF, Word (.docx) and plain-text documents with a Large Language \
Model. Choose how long the summary should be and what it should focus on. Works with OpenAI and \
any OpenAI-compatible endpoint, or with Anthropic, Gemini and Ollama through edgequake-llm.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document path (.pdf, .docx, .txt), or `-` for stdin.
    #[arg(required_unless_present = "text", conflicts_with = "text")]
    input: Option<String>,

    /// Summarize this text instead of a file.
    #[arg(long)]
    text: Option<String>,

    /// Summary length: short, medium, long.
    #[arg(short, long, env = "DOCSUM_LENGTH", default_value = "medium")]
    length: String,

    /// Focus area: general, key_points, action_items, decisions.
    #[arg(short, long, env = "DOCSUM_FOCUS", default_value = "general")]
    focus: String,

    /// Treat the input as this format: pdf, docx, txt.
    #[arg(long)]
    format: Option<String>,

    /// Write the summary to this file instead of stdout.
    #[arg(short, long, env = "DOCSUM_OUTPUT", conflicts_with = "save")]
    output: Option<PathBuf>,

    /// Save the summary as document_summary.txt in DIR (default: current directory).
    #[arg(long, value_name = "DIR", num_args = 0..=1, default_missing_value = ".")]
    save: Option<PathBuf>,

    /// LLM model ID (e.g. gpt-4.1-nano, gpt-4.1-mini, claude-sonnet-4-20250514).
    #[arg(long, env = "DOCSUM_MODEL")]
    model: Option<String>,

    /// edgequake-llm provider: openai, anthropic, gemini, ollama.
    #[arg(
        long,
        env = "DOCSUM_PROVIDER",
        long_help = "LLM provider. When unset (or openai) the built-in OpenAI-compatible client \
          is used with --api-key. Other providers read their own key variables."
    )]
    provider: Option<String>,

    /// API key for the OpenAI-compatible endpoint.
    #[arg(long, env = "DOCSUM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// OpenAI-compatible base URL.
    #[arg(long, env = "DOCSUM_BASE_URL")]
    base_url: Option<String>,

    /// Max tokens the model may generate.
    #[arg(long, env = "DOCSUM_MAX_TOKENS", default_value_t = 1000)]
    max_tokens: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "DOCSUM_TEMPERATURE", default_value_t = 0.3)]
    temperature: f32,

    /// LLM call timeout in seconds.
    #[arg(long, env = "DOCSUM_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Inputs with fewer words are not summarized.
    #[arg(long, env = "DOCSUM_MIN_WORDS", default_value_t = 10)]
    min_words: usize,

    /// Output structured JSON (SummaryOutput) instead of plain text.
    #[arg(long, env = "DOCSUM_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "DOCSUM_NO_PROGRESS")]
    no_progress: bool,

    /// Print the extracted text only, no summary.
    #[arg(long, conflicts_with = "text")]
    extract_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCSUM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCSUM_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters; keep INFO logs out of
    // its way unless --verbose asks for them.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.extract_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli, show_progress).await {
        Ok(code) => code,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, show_progress: bool) -> Result<ExitCode> {
    let source = match (&cli.text, &cli.input) {
        (Some(text), _) => InputSource::Text(text.clone()),
        (None, Some(arg)) => InputSource::from_arg(arg),
        (None, None) => anyhow::bail!("Provide a document path, `-` for stdin, or --text"),
    };
    let format_override = cli.format.as_deref().map(parse_format).transpose()?;

    // ── Extract-only mode ────────────────────────────────────────────────
    if cli.extract_only {
        let extracted = match (&source, format_override) {
            (InputSource::File(path), None) => extract_file(path).await?,
            _ => {
                let doc = edgequake_docsum::pipeline::input::resolve_input(&source, format_override)
                    .await?;
                edgequake_docsum::pipeline::extract::extract_document(doc).await?
            }
        };
        write_stdout(extracted.as_str())?;
        if !cli.quiet {
            eprintln!(
                "{}",
                dim(&format!(
                    "{} document: {} {}(s), {} words",
                    extracted.format(),
                    extracted.units(),
                    extracted.format().unit_name(),
                    extracted.word_count()
                ))
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    // ── Build config ─────────────────────────────────────────────────────
    let spinner = show_progress.then(CliProgressCallback::new);
    let progress_cb: Option<ProgressCallback> = spinner
        .clone()
        .map(|cb| cb as Arc<dyn SummaryProgressCallback>);
    let config = build_config(cli, progress_cb)?;

    // ── Run summarization ────────────────────────────────────────────────
    let result = summarize_input(&source, format_override, &config).await;
    if let Some(ref spinner) = spinner {
        spinner.bar.finish_and_clear();
    }
    let output = match result? {
        SummaryOutcome::Completed(output) => output,
        SummaryOutcome::Rejected(advisory) => {
            eprintln!("{} {}", yellow("⚠"), advisory);
            return Ok(ExitCode::from(EXIT_ADVISORY));
        }
    };

    let artifact = output.artifact();
    let written = if let Some(ref path) = cli.output {
        artifact.write_to(path)?;
        Some(path.clone())
    } else if let Some(ref dir) = cli.save {
        Some(artifact.write_to_dir(dir)?)
    } else {
        None
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if written.is_none() {
        write_stdout(&output.summary)?;
    }

    if !cli.quiet && !cli.json {
        if let Some(path) = written {
            eprintln!(
                "{}  Saved  →  {}",
                green("✔"),
                bold(&path.display().to_string())
            );
        }
        eprintln!(
            "   {} tokens in  /  {} tokens out  —  {}ms total",
            dim(&output.stats.input_tokens.to_string()),
            dim(&output.stats.output_tokens.to_string()),
            output.stats.total_duration_ms,
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Map CLI args to `SummaryConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SummaryConfig> {
    let mut builder = SummaryConfig::builder()
        .length(LengthPreference::from_key_or_default(&cli.length))
        .focus(FocusPreference::from_key_or_default(&cli.focus))
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .api_timeout_secs(cli.api_timeout)
        .min_words(cli.min_words);

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(ref base_url) = cli.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(key) = resolve_api_key(cli.api_key.as_deref()) {
        builder = builder.api_key(key);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// `--api-key` / `DOCSUM_API_KEY`, then `OPENAI_API_KEY`.
fn resolve_api_key(flag: Option<&str>) -> Option<ApiKey> {
    flag.map(str::to_string)
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .filter(|k| !k.trim().is_empty())
        .map(ApiKey::new)
}

/// Parse `--format` into a `DocumentFormat`.
fn parse_format(s: &str) -> Result<DocumentFormat> {
    DocumentFormat::from_extension(s.trim().trim_start_matches('.'))
        .or_else(|| DocumentFormat::from_mime(s.trim()))
        .with_context(|| format!("Unknown format '{s}' (expected pdf, docx, txt)"))
}

fn write_stdout(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;
    if !text.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}

/// Print a failure as a labelled red line.
fn report_error(err: &anyhow::Error) {
    let label = match err.downcast_ref::<DocSumError>().map(DocSumError::kind) {
        Some(ErrorKind::Extraction) => "Could not read document",
        Some(ErrorKind::Configuration) => "Configuration error",
        Some(ErrorKind::Collaborator) => "Summarization failed",
        Some(ErrorKind::Output) => "Could not save summary",
        Some(ErrorKind::Internal) => "Internal error",
        None => "Error",
    };
    match err.downcast_ref::<DocSumError>() {
        Some(e) => eprintln!("{} {}: {}", red("✗"), bold(label), e),
        None => eprintln!("{} {}: {:#}", red("✗"), bold(label), err),
    }
}
