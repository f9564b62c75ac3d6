//! CLI binary for edgequake-ocr2md.
//!
//! A thin shim over the library crate that maps CLI flags to `OcrConfig`,
//! runs the orchestrator, and turns its final stage into the exit status.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use edgequake_ocr2md::{
    ConversionProgressCallback, ConversionStats, ImageError, InputSpec, OcrConfig, Orchestrator,
    ProgressCallback, API_KEY_ENV_VAR, DEFAULT_MODEL,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
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
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a page bar plus one log line per image error.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Writing");

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        // Ticking starts only once OCR results are in hand.
        self.bar.set_length(total_pages as u64);
        self.bar.reset_eta();
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_page_complete(
        &self,
        _page_num: usize,
        _total_pages: usize,
        _markdown_len: usize,
        _image_count: usize,
    ) {
        self.bar.inc(1);
    }

    fn on_image_error(&self, page_num: usize, error: &ImageError) {
        self.bar.println(format!(
            "  {} Page {:>3}  {}",
            red("✗"),
            page_num,
            red(&error.to_string())
        ));
    }

    fn on_conversion_complete(&self, _total_pages: usize, _images_written: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Local file: uploaded, then processed through a signed URL
  ocr2md report.pdf out/report.md

  # Remote document: the service fetches the URL itself, nothing is uploaded
  ocr2md --url https://arxiv.org/pdf/1706.03762 out/attention.md

OUTPUT:
  <OUTPUT_FILE>            page Markdown, pages separated by one blank line
  <OUTPUT_DIR>/<image id>  raw bytes of each extracted image (no extension added)

ENVIRONMENT VARIABLES:
  MISTRAL_API_KEY   Mistral API key (required)
  MISTRAL_BASE_URL  Override the API endpoint
  OCR2MD_MODEL      Override the OCR model
  RUST_LOG          Override the log filter (e.g. RUST_LOG=edgequake_ocr2md=debug)

EXIT STATUS:
  0  every page written (individual image failures are reported, not fatal)
  1  missing API key, invalid input file, service failure, or output write failure
"#;

/// Convert a document to Markdown with the Mistral OCR API.
#[derive(Parser, Debug)]
#[command(
    name = "ocr2md",
    version,
    about = "Convert a PDF file or URL to Markdown and images with the Mistral OCR API",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file path, or the document URL when --url is given.
    input_source: String,

    /// Markdown file to write. Images are saved in the same directory.
    output_file: PathBuf,

    /// Treat INPUT_SOURCE as a URL: no local file access, no upload.
    #[arg(long)]
    url: bool,

    /// Mistral API key.
    #[arg(long, env = API_KEY_ENV_VAR, hide_env_values = true)]
    api_key: Option<String>,

    /// API base URL.
    #[arg(long, env = "MISTRAL_BASE_URL")]
    base_url: Option<String>,

    /// OCR model ID.
    #[arg(long, env = "OCR2MD_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Signed URL lifetime in hours for uploaded files.
    #[arg(long, default_value_t = 24)]
    signed_url_expiry: u32,

    /// Per-request timeout in seconds (default: none).
    #[arg(long)]
    timeout: Option<u64>,

    /// Disable progress bar.
    #[arg(long, env = "OCR2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OCR2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "OCR2MD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return usage_exit_code(&e);
        }
    };

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(&cli, show_progress))),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = match build_config(&cli, progress_cb) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", red("error:"), e);
            return ExitCode::FAILURE;
        }
    };

    // The API key is checked here, before any file or network access.
    let mut orchestrator = match Orchestrator::new(config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            eprintln!("{} {}", red("error:"), e);
            return e.exit_code();
        }
    };

    // ── Run conversion ───────────────────────────────────────────────────
    // A failed run has already been logged by the orchestrator.
    let input = InputSpec::new(cli.input_source.clone(), cli.url);
    if let Ok(stats) = orchestrator.run(&input, &cli.output_file).await {
        if !cli.quiet {
            print_summary(&stats, &cli.output_file);
        }
        println!("Finished all!");
    }

    orchestrator.exit_code()
}

/// Exit status for a failed argument parse: 0 for `--help`/`--version`,
/// 1 for every usage error (clap's own default would be 2).
fn usage_exit_status(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn usage_exit_code(err: &clap::Error) -> ExitCode {
    ExitCode::from(usage_exit_status(err))
}

/// Default log filter when `RUST_LOG` is unset.
///
/// The progress bar replaces INFO-level logs, but warnings still show.
/// Verbose always wins.
fn log_filter(cli: &Cli, show_progress: bool) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if show_progress {
        "warn"
    } else {
        "info"
    }
}

/// Map CLI args to `OcrConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<OcrConfig> {
    let mut builder = OcrConfig::builder()
        .model(cli.model.clone())
        .signed_url_expiry_hours(cli.signed_url_expiry);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url.clone());
    }
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(stats: &ConversionStats, output: &std::path::Path) {
    let failed = stats.image_errors.len();
    eprintln!(
        "{}  {} pages  {} images  {}ms  →  {}",
        if failed == 0 { green("✔") } else { cyan("⚠") },
        stats.total_pages,
        stats.images_written,
        stats.duration_ms,
        bold(&output.display().to_string()),
    );
    if failed > 0 {
        eprintln!("   {} images could not be saved", red(&failed.to_string()));
    }
    if stats.images_skipped > 0 {
        eprintln!(
            "   {}",
            dim(&format!("{} images had no data", stats.images_skipped))
        );
    }
}
