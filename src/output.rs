//! What a completed run produced.

use crate::error::ImageError;
use serde::{Deserialize, Serialize};

/// Summary of a successful conversion.
///
/// Image failures are non-fatal and listed in `image_errors`; a run that
/// reaches this value exits with status 0 regardless of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages written to the Markdown file.
    pub total_pages: usize,
    /// Bytes of Markdown written, separators included.
    pub markdown_bytes: usize,
    /// Image files created or overwritten.
    pub images_written: usize,
    /// Images with an empty or absent payload (nothing to write).
    pub images_skipped: usize,
    /// Per-image decode and write failures, in processing order.
    pub image_errors: Vec<ImageError>,
    /// Model reported by the service, if any.
    pub model: Option<String>,
    /// Pages the service reports having processed, if reported.
    pub pages_processed: Option<u32>,
    /// Wall-clock time of the whole run.
    pub duration_ms: u64,
}

impl ConversionStats {
    /// True when every image with a payload was written.
    pub fn is_clean(&self) -> bool {
        self.image_errors.is_empty()
    }
}
