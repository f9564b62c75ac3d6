//! The orchestrator: drive one run from input to written files.
//!
//! A run moves through a fixed sequence of stages, each performing exactly
//! one pipeline step and advancing only on success:
//!
//! ```text
//! Init ──▶ ResolvingInput ──▶ Submitting ──▶ Invoking ──▶ Writing ──▶ Done
//!               │                 │              │            │
//!               └─────────────────┴──────────────┴────────────┴──▶ Failed
//! ```
//!
//! Pipeline stages never terminate the process; they return errors here, and
//! only the orchestrator decides the exit status ([`Orchestrator::exit_status`]).

use crate::client::{MistralClient, OcrService};
use crate::config::OcrConfig;
use crate::error::Ocr2MdError;
use crate::output::ConversionStats;
use crate::pipeline::input::{resolve_input, InputSpec};
use crate::pipeline::{ocr, submit, write};
use std::fmt;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    ResolvingInput,
    Submitting,
    Invoking,
    Writing,
    Done,
    Failed,
}

impl Stage {
    /// `Done` or `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Init => "init",
            Stage::ResolvingInput => "resolving-input",
            Stage::Submitting => "submitting",
            Stage::Invoking => "invoking",
            Stage::Writing => "writing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        })
    }
}

/// Drives a single conversion and owns its exit status.
pub struct Orchestrator {
    config: OcrConfig,
    service: Arc<dyn OcrService>,
    stage: Stage,
}

impl Orchestrator {
    /// Build an orchestrator talking to the Mistral API.
    ///
    /// Fails with [`Ocr2MdError::MissingApiKey`] before anything else happens
    /// when the config carries no API key.
    pub fn new(config: OcrConfig) -> Result<Self, Ocr2MdError> {
        let client = MistralClient::from_config(&config)?;
        Ok(Self::with_service(config, Arc::new(client)))
    }

    /// Build an orchestrator around any [`OcrService`] (tests, proxies).
    pub fn with_service(config: OcrConfig, service: Arc<dyn OcrService>) -> Self {
        Self {
            config,
            service,
            stage: Stage::Init,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// 0 once the run reached `Done`, 1 otherwise.
    pub fn exit_status(&self) -> u8 {
        match self.stage {
            Stage::Done => 0,
            _ => 1,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    fn advance(&mut self, next: Stage) {
        debug!("Stage {} → {}", self.stage, next);
        self.stage = next;
    }

    /// Run the whole pipeline once.
    ///
    /// Any error moves the orchestrator to [`Stage::Failed`], is logged with
    /// the stage it happened in, and is returned unchanged.
    pub async fn run(
        &mut self,
        input: &InputSpec,
        output_path: &Path,
    ) -> Result<ConversionStats, Ocr2MdError> {
        if self.stage != Stage::Init {
            return Err(Ocr2MdError::Internal(format!(
                "orchestrator already ran (stage: {})",
                self.stage
            )));
        }

        match self.drive(input, output_path).await {
            Ok(stats) => {
                self.advance(Stage::Done);
                Ok(stats)
            }
            Err(e) => {
                error!("Failed while {}: {}", self.stage, e);
                self.advance(Stage::Failed);
                Err(e)
            }
        }
    }

    async fn drive(
        &mut self,
        input: &InputSpec,
        output_path: &Path,
    ) -> Result<ConversionStats, Ocr2MdError> {
        let start = Instant::now();
        info!(
            "Starting conversion: {} ({}) → {}",
            input.source(),
            if input.is_url() { "url" } else { "file" },
            output_path.display()
        );

        self.advance(Stage::ResolvingInput);
        let resolved = resolve_input(input)?;

        self.advance(Stage::Submitting);
        let service = Arc::clone(&self.service);
        let locator =
            submit::submit(&resolved, service.as_ref(), self.config.signed_url_expiry_hours)
                .await?;

        self.advance(Stage::Invoking);
        let document = ocr::invoke(service.as_ref(), &locator, &self.config.model).await?;

        self.advance(Stage::Writing);
        let mut stats = write::write_document(
            &document,
            output_path,
            self.config.progress_callback.as_ref(),
        )
        .await?;

        stats.model = document.model.clone();
        stats.pages_processed = document.usage.as_ref().map(|u| u.pages_processed);
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Conversion complete: {} pages, {} images, {}ms total",
            stats.total_pages, stats.images_written, stats.duration_ms
        );
        Ok(stats)
    }
}

/// Convert `input` to Markdown at `output_path` using the Mistral API.
///
/// This is the primary library entry point.
///
/// # Errors
/// Every [`Ocr2MdError`] is fatal. Per-image problems do not fail the run;
/// they are listed in [`ConversionStats::image_errors`].
pub async fn convert_to_file(
    input: &InputSpec,
    output_path: impl AsRef<Path>,
    config: &OcrConfig,
) -> Result<ConversionStats, Ocr2MdError> {
    let mut orchestrator = Orchestrator::new(config.clone())?;
    orchestrator.run(input, output_path.as_ref()).await
}

/// Synchronous wrapper around [`convert_to_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input: &InputSpec,
    output_path: impl AsRef<Path>,
    config: &OcrConfig,
) -> Result<ConversionStats, Ocr2MdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Ocr2MdError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_to_file(input, output_path, config))
}
