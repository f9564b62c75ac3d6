//! # edgequake-ocr2md
//!
//! Convert documents (local files or URLs) to Markdown with the Mistral OCR
//! API, saving every extracted image next to the Markdown file.
//!
//! ## Pipeline Overview
//!
//! ```text
//! path / URL
//!  │
//!  ├─ 1. Input    local file must exist and be readable; URLs pass through
//!  ├─ 2. Submit   upload + signed URL (local) or the URL itself
//!  ├─ 3. OCR      one call to mistral-ocr-latest with inline base64 images
//!  └─ 4. Write    pages joined by a blank line; images saved as <dir>/<id>
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_ocr2md::{convert_to_file, InputSpec, OcrConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads MISTRAL_API_KEY (and MISTRAL_BASE_URL if set)
//!     let config = OcrConfig::from_env()?;
//!     let stats = convert_to_file(&InputSpec::file("report.pdf"), "out/report.md", &config).await?;
//!     eprintln!("{} pages, {} images", stats.total_pages, stats.images_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ocr2md` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{MistralClient, MockOcrService, OcrRequest, OcrService};
pub use config::{OcrConfig, OcrConfigBuilder, API_KEY_ENV_VAR, DEFAULT_MODEL};
pub use convert::{convert_sync, convert_to_file, Orchestrator, Stage};
pub use document::{OcrDocument, OcrImage, OcrPage, UsageInfo};
pub use error::{ImageError, Ocr2MdError, RemoteOperation};
pub use output::ConversionStats;
pub use pipeline::input::InputSpec;
pub use pipeline::submit::DocumentLocator;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
