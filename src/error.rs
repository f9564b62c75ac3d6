//! Error types for the edgequake-ocr2md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Ocr2MdError`] — **Fatal**: the run cannot proceed at all (missing API
//!   key, missing input file, remote service failure, output file cannot be
//!   written). Returned as `Err(Ocr2MdError)` from the orchestrator and the
//!   top-level `convert*` functions, and mapped to exit status 1.
//!
//! * [`ImageError`] — **Non-fatal**: a single extracted image could not be
//!   decoded or saved. Collected into
//!   [`crate::output::ConversionStats::image_errors`] while the remaining
//!   images and pages are still written.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// The remote call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoteOperation {
    /// `POST /v1/files`
    Upload,
    /// `GET /v1/files/{id}/url`
    SignedUrl,
    /// `POST /v1/ocr`
    Ocr,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RemoteOperation::Upload => "upload",
            RemoteOperation::SignedUrl => "signed-url",
            RemoteOperation::Ocr => "ocr",
        })
    }
}

/// All fatal errors returned by the edgequake-ocr2md library.
///
/// Image-level failures use [`ImageError`] and are stored in
/// [`crate::output::ConversionStats`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Ocr2MdError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// The API credential is absent (or empty).
    #[error("Environment variable '{var}' is not set.\nSet it with: export {var}=<your-api-key>")]
    MissingApiKey { var: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input path does not exist, is not a regular file, or cannot be read.
    #[error("'{path}' is not a valid input file: {detail}\nCheck the path exists and is a readable file.")]
    InputNotFound { path: PathBuf, detail: String },

    // ── Remote errors ─────────────────────────────────────────────────────
    /// Any failure talking to the OCR service: transport, auth, quota,
    /// non-2xx status, or a response that does not have the expected shape.
    #[error("OCR service {operation} call failed{}: {detail}", status_suffix(.status))]
    RemoteService {
        operation: RemoteOperation,
        status: Option<u16>,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
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

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}

impl Ocr2MdError {
    /// Shorthand for a [`Ocr2MdError::RemoteService`] without an HTTP status.
    pub fn remote(operation: RemoteOperation, detail: impl Into<String>) -> Self {
        Ocr2MdError::RemoteService {
            operation,
            status: None,
            detail: detail.into(),
        }
    }

    /// True for errors caused by configuration rather than the run itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Ocr2MdError::MissingApiKey { .. } | Ocr2MdError::InvalidConfig(_)
        )
    }

    /// Every fatal error terminates the process with status 1.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::FAILURE
    }
}

/// A non-fatal error for a single extracted image.
///
/// The page writer records it and moves on to the next image.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum ImageError {
    /// The payload is not a well-formed data URI.
    #[error("Image '{id}': could not decode data URI: {detail}")]
    Decode { id: String, detail: String },

    /// The decoded bytes could not be saved.
    #[error("Image '{id}': could not write '{path}': {detail}")]
    Write {
        id: String,
        path: PathBuf,
        detail: String,
    },
}

impl ImageError {
    /// The id of the image this error belongs to.
    pub fn image_id(&self) -> &str {
        match self {
            ImageError::Decode { id, .. } | ImageError::Write { id, .. } => id,
        }
    }
}
