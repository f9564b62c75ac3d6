//! The OCR result as the rest of the pipeline sees it.
//!
//! These types are produced once, at the client boundary, from the service's
//! JSON response. Everything downstream depends on this fixed shape.

use serde::{Deserialize, Serialize};

/// A whole OCR result: pages in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrDocument {
    /// Pages in document page order. Output preserves this order.
    pub pages: Vec<OcrPage>,

    /// Model that produced the result, when the service reports it.
    pub model: Option<String>,

    /// Usage accounting, when the service reports it.
    pub usage: Option<UsageInfo>,
}

impl OcrDocument {
    pub fn new(pages: Vec<OcrPage>) -> Self {
        Self {
            pages,
            model: None,
            usage: None,
        }
    }

    /// Total number of images attached across all pages.
    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|p| p.images.len()).sum()
    }
}

/// One page of OCR output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrPage {
    /// 0-indexed page number within the document.
    pub index: usize,

    /// Markdown text for this page, written verbatim.
    pub markdown: String,

    /// Images referenced by the page, in listed order. Possibly empty.
    pub images: Vec<OcrImage>,
}

impl OcrPage {
    pub fn new(index: usize, markdown: impl Into<String>) -> Self {
        Self {
            index,
            markdown: markdown.into(),
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: OcrImage) -> Self {
        self.images.push(image);
        self
    }
}

/// An image extracted from a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrImage {
    /// Identifier; also the output file name (no extension added).
    pub id: String,

    /// Data-URI encoded bytes. `None` or empty means nothing to write.
    pub image_base64: Option<String>,
}

impl OcrImage {
    pub fn new(id: impl Into<String>, payload: Option<String>) -> Self {
        Self {
            id: id.into(),
            image_base64: payload,
        }
    }

    /// The payload, if present and non-empty.
    pub fn payload(&self) -> Option<&str> {
        self.image_base64.as_deref().filter(|s| !s.is_empty())
    }
}

/// Usage accounting returned alongside the pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageInfo {
    pub pages_processed: u32,
    #[serde(default)]
    pub doc_size_bytes: Option<u64>,
}
