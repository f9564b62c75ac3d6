//! OCR invocation: one call, no retry.
//!
//! The request always asks for inline base64 images so the page writer can
//! save them next to the Markdown file. An empty page list is a valid
//! result, not an error.

use super::submit::DocumentLocator;
use crate::client::{OcrRequest, OcrService};
use crate::document::OcrDocument;
use crate::error::Ocr2MdError;
use tracing::{debug, info};

/// Run OCR on the document at `locator` with `model`.
pub async fn invoke(
    service: &dyn OcrService,
    locator: &DocumentLocator,
    model: &str,
) -> Result<OcrDocument, Ocr2MdError> {
    let request = OcrRequest::document_url(model, locator.as_str());
    info!("Starting OCR (model: {}) for {}", model, locator.redacted());

    let document = service.process(&request).await?;

    info!(
        "OCR complete: {} pages, {} images",
        document.pages.len(),
        document.image_count()
    );
    if let Some(ref usage) = document.usage {
        debug!(
            pages_processed = usage.pages_processed,
            doc_size_bytes = ?usage.doc_size_bytes,
            "OCR usage"
        );
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockOcrService;
    use crate::document::OcrPage;
    use crate::pipeline::input::ResolvedInput;
    use crate::pipeline::submit::submit;

    #[tokio::test]
    async fn passes_locator_and_model() {
        let mock = MockOcrService::new(OcrDocument::new(vec![OcrPage::new(0, "hello")]));
        let locator = submit(&ResolvedInput::Url("https://example.com/x.pdf".into()), &mock, 24)
            .await
            .unwrap();

        let doc = invoke(&mock, &locator, "mistral-ocr-latest").await.unwrap();
        assert_eq!(doc.pages.len(), 1);

        let requests = mock.ocr_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].locator(), "https://example.com/x.pdf");
        assert_eq!(requests[0].model, "mistral-ocr-latest");
        assert!(requests[0].include_image_base64);
    }
}
