//! The remote OCR service seam.
//!
//! The pipeline talks to the service only through [`OcrService`], so the
//! same orchestrator drives the real Mistral API ([`MistralClient`]) and the
//! in-memory [`MockOcrService`] used by tests.

pub mod mistral;
pub mod mock;

pub use mistral::MistralClient;
pub use mock::MockOcrService;

use crate::document::OcrDocument;
use crate::error::Ocr2MdError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// How the OCR call locates the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentChunk {
    /// A URL the service can fetch: a public URL or a signed URL.
    DocumentUrl { document_url: String },
}

/// Body of an OCR request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrRequest {
    pub model: String,
    pub document: DocumentChunk,
    pub include_image_base64: bool,
}

impl OcrRequest {
    /// A request for `document_url` that asks for inline base64 images.
    pub fn document_url(model: impl Into<String>, document_url: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            document: DocumentChunk::DocumentUrl {
                document_url: document_url.into(),
            },
            include_image_base64: true,
        }
    }

    /// The locator this request points at.
    pub fn locator(&self) -> &str {
        match &self.document {
            DocumentChunk::DocumentUrl { document_url } => document_url,
        }
    }
}

/// The three calls the pipeline needs from the OCR service.
///
/// Every failure is reported as [`Ocr2MdError::RemoteService`].
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Service name for logging.
    fn name(&self) -> &str;

    /// Upload a file and return the service's opaque file identifier.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, Ocr2MdError>;

    /// Fetch a signed, time-limited URL for an uploaded file.
    async fn signed_url(&self, file_id: &str, expiry_hours: u32) -> Result<String, Ocr2MdError>;

    /// Run OCR and return the pages in document order.
    async fn process(&self, request: &OcrRequest) -> Result<OcrDocument, Ocr2MdError>;
}
