//! HTTP client for the Mistral platform API.
//!
//! Only three endpoints are used: file upload, signed URL, and OCR. The JSON
//! responses are decoded into private wire structs and converted into
//! [`OcrDocument`] here, so nothing past this module sees raw JSON.

use super::{OcrRequest, OcrService};
use crate::config::OcrConfig;
use crate::document::{OcrDocument, OcrImage, OcrPage, UsageInfo};
use crate::error::{Ocr2MdError, RemoteOperation};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Mistral API client authenticated with a bearer key.
pub struct MistralClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MistralClient {
    /// Build a client from a validated config.
    ///
    /// Fails with [`Ocr2MdError::MissingApiKey`] when no key is configured.
    /// No network traffic happens here.
    pub fn from_config(config: &OcrConfig) -> Result<Self, Ocr2MdError> {
        let api_key = config.require_api_key()?.to_string();

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Ocr2MdError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }
}

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct UploadedFile {
    id: String,
}

#[derive(Deserialize)]
struct SignedUrl {
    url: String,
}

#[derive(Deserialize)]
struct OcrResponse {
    pages: Vec<WirePage>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage_info: Option<UsageInfo>,
}

#[derive(Deserialize)]
struct WirePage {
    index: usize,
    markdown: String,
    #[serde(default)]
    images: Option<Vec<WireImage>>,
}

#[derive(Deserialize)]
struct WireImage {
    id: String,
    #[serde(default)]
    image_base64: Option<String>,
}

impl From<OcrResponse> for OcrDocument {
    fn from(resp: OcrResponse) -> Self {
        let pages = resp
            .pages
            .into_iter()
            .map(|page| OcrPage {
                index: page.index,
                markdown: page.markdown,
                images: page
                    .images
                    .unwrap_or_default()
                    .into_iter()
                    .map(|img| OcrImage::new(img.id, img.image_base64))
                    .collect(),
            })
            .collect();

        OcrDocument {
            pages,
            model: resp.model,
            usage: resp.usage_info,
        }
    }
}

/// Parse an OCR response body into an [`OcrDocument`].
///
/// Any shape mismatch (missing `pages`, page without `markdown`, …) is a
/// remote-service error.
pub fn parse_ocr_response(body: &str) -> Result<OcrDocument, Ocr2MdError> {
    let resp: OcrResponse = serde_json::from_str(body).map_err(|e| {
        Ocr2MdError::remote(
            RemoteOperation::Ocr,
            format!("unexpected response shape: {e}"),
        )
    })?;
    Ok(resp.into())
}

/// Turn a response into `T`, mapping transport, status, and decode failures.
async fn decode_json<T: DeserializeOwned>(
    operation: RemoteOperation,
    response: Result<Response, reqwest::Error>,
) -> Result<T, Ocr2MdError> {
    let response = response.map_err(|e| {
        let detail = if e.is_timeout() {
            format!("request timed out: {e}")
        } else {
            e.to_string()
        };
        Ocr2MdError::remote(operation, detail)
    })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Ocr2MdError::remote(operation, format!("failed to read body: {e}")))?;

    if !status.is_success() {
        return Err(Ocr2MdError::RemoteService {
            operation,
            status: Some(status.as_u16()),
            detail: if body.is_empty() {
                status.to_string()
            } else {
                body
            },
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        Ocr2MdError::remote(operation, format!("unexpected response shape: {e}"))
    })
}

#[async_trait]
impl OcrService for MistralClient {
    fn name(&self) -> &str {
        "mistral"
    }

    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, Ocr2MdError> {
        debug!(file_name, bytes = bytes.len(), "Uploading file");
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().text("purpose", "ocr").part("file", part);

        let response = self
            .client
            .post(self.endpoint("files"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await;

        let uploaded: UploadedFile = decode_json(RemoteOperation::Upload, response).await?;
        Ok(uploaded.id)
    }

    async fn signed_url(&self, file_id: &str, expiry_hours: u32) -> Result<String, Ocr2MdError> {
        debug!(file_id, expiry_hours, "Requesting signed URL");
        let response = self
            .client
            .get(self.endpoint(&format!("files/{file_id}/url")))
            .bearer_auth(&self.api_key)
            .query(&[("expiry", expiry_hours)])
            .send()
            .await;

        let signed: SignedUrl = decode_json(RemoteOperation::SignedUrl, response).await?;
        Ok(signed.url)
    }

    async fn process(&self, request: &OcrRequest) -> Result<OcrDocument, Ocr2MdError> {
        debug!(model = %request.model, "Sending OCR request");
        let response = self
            .client
            .post(self.endpoint("ocr"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await;

        let resp: OcrResponse = decode_json(RemoteOperation::Ocr, response).await?;
        Ok(resp.into())
    }
}
