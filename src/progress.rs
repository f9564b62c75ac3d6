//! Progress-callback trait for per-page write events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::OcrConfigBuilder::progress_callback`] to receive events
//! as the page writer walks the OCR result. Pages are written one at a time
//! in document order, so events arrive in page order.
//!
//! # Example
//!
//! ```rust
//! use edgequake_ocr2md::{ConversionProgressCallback, OcrConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     pages: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, total: usize, _len: usize, _images: usize) {
//!         self.pages.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {page_num}/{total} written");
//!     }
//! }
//!
//! let config = OcrConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { pages: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::ImageError;
use std::sync::Arc;

/// Called by the page writer as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once, before the first page is written.
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page's text and images have been handled.
    ///
    /// # Arguments
    /// * `page_num`     — 1-indexed page number
    /// * `total_pages`  — total pages
    /// * `markdown_len` — byte length of the page's Markdown
    /// * `image_count`  — images listed on the page (written or not)
    fn on_page_complete(
        &self,
        page_num: usize,
        total_pages: usize,
        markdown_len: usize,
        image_count: usize,
    ) {
        let _ = (page_num, total_pages, markdown_len, image_count);
    }

    /// Called for every image that could not be decoded or written.
    fn on_image_error(&self, page_num: usize, error: &ImageError) {
        let _ = (page_num, error);
    }

    /// Called once after the Markdown file is complete.
    fn on_conversion_complete(&self, total_pages: usize, images_written: usize) {
        let _ = (total_pages, images_written);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::OcrConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        images_written: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_complete(&self, _page: usize, _total: usize, _len: usize, _images: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_error(&self, _page_num: usize, _error: &ImageError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, _total_pages: usize, images_written: usize) {
            self.images_written.store(images_written, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(5);
        cb.on_page_complete(1, 5, 42, 0);
        cb.on_image_error(
            2,
            &ImageError::Decode {
                id: "x".into(),
                detail: "bad".into(),
            },
        );
        cb.on_conversion_complete(5, 4);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_conversion_start(3);
        tracker.on_page_complete(1, 3, 100, 0);
        tracker.on_page_complete(2, 3, 200, 1);
        tracker.on_image_error(
            2,
            &ImageError::Decode {
                id: "img-1".into(),
                detail: "not a data URI".into(),
            },
        );
        tracker.on_page_complete(3, 3, 50, 0);
        tracker.on_conversion_complete(3, 0);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.images_written.load(Ordering::SeqCst), 0);
    }
}
