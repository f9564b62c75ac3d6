//! In-memory [`OcrService`] for tests.
//!
//! Returns a canned [`OcrDocument`], can be told to fail one remote
//! operation, and records every call so tests can count network traffic.

use super::{OcrRequest, OcrService};
use crate::document::OcrDocument;
use crate::error::{Ocr2MdError, RemoteOperation};
use async_trait::async_trait;
use std::sync::Mutex;

/// An in-memory OCR service that returns a canned document and records
/// every call it receives.
pub struct MockOcrService {
    document: OcrDocument,
    file_id: String,
    signed_url: String,
    fail_on: Option<RemoteOperation>,
    uploads: Mutex<Vec<(String, usize)>>,
    signed_url_requests: Mutex<Vec<String>>,
    ocr_requests: Mutex<Vec<OcrRequest>>,
}

impl MockOcrService {
    pub fn new(document: OcrDocument) -> Self {
        Self {
            document,
            file_id: "file-mock-0001".to_string(),
            signed_url: "https://files.mock.invalid/file-mock-0001?signature=abc".to_string(),
            fail_on: None,
            uploads: Mutex::new(Vec::new()),
            signed_url_requests: Mutex::new(Vec::new()),
            ocr_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_signed_url(mut self, url: impl Into<String>) -> Self {
        self.signed_url = url.into();
        self
    }

    /// Make the given call fail with a remote-service error.
    pub fn failing_on(mut self, operation: RemoteOperation) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// `(file_name, byte_len)` of every upload.
    pub fn uploads(&self) -> Vec<(String, usize)> {
        lock(&self.uploads).clone()
    }

    /// File ids passed to `signed_url`.
    pub fn signed_url_requests(&self) -> Vec<String> {
        lock(&self.signed_url_requests).clone()
    }

    /// Every OCR request received.
    pub fn ocr_requests(&self) -> Vec<OcrRequest> {
        lock(&self.ocr_requests).clone()
    }

    /// Total calls of any kind.
    pub fn call_count(&self) -> usize {
        lock(&self.uploads).len()
            + lock(&self.signed_url_requests).len()
            + lock(&self.ocr_requests).len()
    }

    fn check(&self, operation: RemoteOperation) -> Result<(), Ocr2MdError> {
        if self.fail_on == Some(operation) {
            return Err(Ocr2MdError::RemoteService {
                operation,
                status: Some(500),
                detail: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl OcrService for MockOcrService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, Ocr2MdError> {
        lock(&self.uploads).push((file_name.to_string(), bytes.len()));
        self.check(RemoteOperation::Upload)?;
        Ok(self.file_id.clone())
    }

    async fn signed_url(&self, file_id: &str, _expiry_hours: u32) -> Result<String, Ocr2MdError> {
        lock(&self.signed_url_requests).push(file_id.to_string());
        self.check(RemoteOperation::SignedUrl)?;
        Ok(self.signed_url.clone())
    }

    async fn process(&self, request: &OcrRequest) -> Result<OcrDocument, Ocr2MdError> {
        lock(&self.ocr_requests).push(request.clone());
        self.check(RemoteOperation::Ocr)?;
        Ok(self.document.clone())
    }
}
