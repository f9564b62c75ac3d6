//! Document submission: produce the single locator the OCR call will fetch.
//!
//! URL inputs cost zero remote calls. Local files cost exactly two: one
//! upload under the file's own name, then one signed-URL request for the
//! returned file id.

use super::input::ResolvedInput;
use crate::client::OcrService;
use crate::error::Ocr2MdError;
use std::fmt;
use std::path::Path;
use tracing::info;

/// A URL the OCR service can dereference. Produced once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocator(String);

impl DocumentLocator {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 50 characters, for logs. Signed URLs carry credentials.
    pub fn redacted(&self) -> String {
        let head: String = self.0.chars().take(50).collect();
        if head.len() < self.0.len() {
            format!("{head}...")
        } else {
            head
        }
    }
}

impl fmt::Display for DocumentLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turn a resolved input into a [`DocumentLocator`].
pub async fn submit(
    input: &ResolvedInput,
    service: &dyn OcrService,
    expiry_hours: u32,
) -> Result<DocumentLocator, Ocr2MdError> {
    match input {
        ResolvedInput::Url(url) => {
            info!("Using URL input as document locator: {}", url);
            Ok(DocumentLocator(url.clone()))
        }
        ResolvedInput::Local(path) => upload_local(path, service, expiry_hours).await,
    }
}

async fn upload_local(
    path: &Path,
    service: &dyn OcrService,
    expiry_hours: u32,
) -> Result<DocumentLocator, Ocr2MdError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Ocr2MdError::InputNotFound {
            path: path.to_path_buf(),
            detail: "path has no file name".to_string(),
        })?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Ocr2MdError::InputNotFound {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    info!(
        "Uploading '{}' ({} bytes) to {}",
        path.display(),
        bytes.len(),
        service.name()
    );
    let file_id = service.upload(&file_name, bytes).await?;
    info!("Uploaded '{}' as file id {}", file_name, file_id);

    let url = service.signed_url(&file_id, expiry_hours).await?;
    let locator = DocumentLocator(url);
    info!("Obtained signed URL: {}", locator.redacted());

    Ok(locator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockOcrService;
    use crate::document::OcrDocument;
    use crate::error::RemoteOperation;

    #[tokio::test]
    async fn url_input_makes_no_calls() {
        let mock = MockOcrService::new(OcrDocument::default());
        let input = ResolvedInput::Url("https://example.com/doc.pdf".into());
        let locator = submit(&input, &mock, 24).await.unwrap();
        assert_eq!(locator.as_str(), "https://example.com/doc.pdf");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn local_input_uploads_then_signs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.7 body").unwrap();

        let mock = MockOcrService::new(OcrDocument::default())
            .with_signed_url("https://signed.example/abc?sig=1");
        let locator = submit(&ResolvedInput::Local(path), &mock, 24)
            .await
            .unwrap();

        assert_eq!(locator.as_str(), "https://signed.example/abc?sig=1");
        assert_eq!(mock.uploads(), vec![("report.pdf".to_string(), 13)]);
        assert_eq!(mock.signed_url_requests(), vec!["file-mock-0001".to_string()]);
    }

    #[tokio::test]
    async fn upload_failure_is_remote_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.pdf");
        std::fs::write(&path, b"x").unwrap();

        let mock =
            MockOcrService::new(OcrDocument::default()).failing_on(RemoteOperation::Upload);
        let err = submit(&ResolvedInput::Local(path), &mock, 24)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Ocr2MdError::RemoteService {
                operation: RemoteOperation::Upload,
                ..
            }
        ));
        assert!(mock.signed_url_requests().is_empty());
    }

    #[test]
    fn redacted_truncates_long_urls() {
        let long = DocumentLocator(format!("https://example.com/{}", "a".repeat(100)));
        let r = long.redacted();
        assert!(r.ends_with("..."));
        assert_eq!(r.chars().count(), 53);

        let short = DocumentLocator("https://x.io".into());
        assert_eq!(short.redacted(), "https://x.io");
    }
}
