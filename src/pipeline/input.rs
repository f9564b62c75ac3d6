//! Input resolution: turn the user-supplied source into something the
//! submitter can act on.
//!
//! URL inputs are passed through without any existence check. Local inputs
//! must be an existing, readable regular file before any network call is
//! made; otherwise the run fails with [`Ocr2MdError::InputNotFound`].

use crate::error::Ocr2MdError;
use reqwest::Url;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What the user asked to convert. Built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    source: String,
    is_url: bool,
}

impl InputSpec {
    /// A local file path.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            source: path.into(),
            is_url: false,
        }
    }

    /// A URL the OCR service fetches itself.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            source: url.into(),
            is_url: true,
        }
    }

    pub fn new(source: impl Into<String>, is_url: bool) -> Self {
        Self {
            source: source.into(),
            is_url,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_url(&self) -> bool {
        self.is_url
    }
}

/// The resolved input: either an opaque URL or a verified local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedInput {
    /// Used as the document locator verbatim.
    Url(String),
    /// Exists, is a regular file, and could be opened for reading.
    Local(PathBuf),
}

/// Check if the input string looks like an absolute http/https URL.
///
/// Format only; nothing is fetched.
pub fn looks_like_http_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

/// Resolve an [`InputSpec`] without touching the network.
pub fn resolve_input(spec: &InputSpec) -> Result<ResolvedInput, Ocr2MdError> {
    if spec.is_url() {
        if !looks_like_http_url(spec.source()) {
            warn!(
                "Input '{}' does not look like an http(s) URL; using it as given",
                spec.source()
            );
        }
        return Ok(ResolvedInput::Url(spec.source().to_string()));
    }

    resolve_local(Path::new(spec.source()))
}

fn resolve_local(path: &Path) -> Result<ResolvedInput, Ocr2MdError> {
    let not_found = |detail: String| Ocr2MdError::InputNotFound {
        path: path.to_path_buf(),
        detail,
    };

    let meta = std::fs::metadata(path).map_err(|e| not_found(e.to_string()))?;
    if !meta.is_file() {
        return Err(not_found("not a regular file".to_string()));
    }

    // Opening catches permission problems before anything is uploaded.
    std::fs::File::open(path).map_err(|e| not_found(e.to_string()))?;

    debug!("Resolved local input: {}", path.display());
    Ok(ResolvedInput::Local(path.to_path_buf()))
}
