//! Configuration types for OCR-to-Markdown conversion.
//!
//! All run behaviour is controlled through [`OcrConfig`], built via its
//! [`OcrConfigBuilder`] or [`OcrConfig::from_env`]. The config is an explicit
//! value handed to the orchestrator; nothing in the library reads the API key
//! from ambient process state on its own.

use crate::error::Ocr2MdError;
use crate::progress::ProgressCallback;
use reqwest::Url;
use std::fmt;

/// Environment variable holding the Mistral API key.
pub const API_KEY_ENV_VAR: &str = "MISTRAL_API_KEY";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV_VAR: &str = "MISTRAL_BASE_URL";

/// OCR model requested for every document.
pub const DEFAULT_MODEL: &str = "mistral-ocr-latest";

/// Public Mistral platform endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai";

/// Configuration for a single OCR conversion run.
///
/// # Example
/// ```rust
/// use edgequake_ocr2md::OcrConfig;
///
/// let config = OcrConfig::builder()
///     .api_key("sk-test")
///     .signed_url_expiry_hours(1)
///     .build()
///     .unwrap();
/// assert_eq!(config.model, "mistral-ocr-latest");
/// ```
#[derive(Clone)]
pub struct OcrConfig {
    /// Service API credential. Required; checked when the orchestrator is built.
    pub api_key: Option<String>,

    /// Base URL of the OCR service. Default: `https://api.mistral.ai`.
    pub base_url: String,

    /// OCR model identifier. Default: `mistral-ocr-latest`.
    pub model: String,

    /// Lifetime of the signed URL requested after an upload, in hours. Default: 24.
    pub signed_url_expiry_hours: u32,

    /// Per-request timeout in seconds. Default: none (the transport's own limits apply).
    pub request_timeout_secs: Option<u64>,

    /// Optional page-progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            signed_url_expiry_hours: 24,
            request_timeout_secs: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for OcrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("signed_url_expiry_hours", &self.signed_url_expiry_hours)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl OcrConfig {
    /// Create a new builder for `OcrConfig`.
    pub fn builder() -> OcrConfigBuilder {
        OcrConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults plus the API key and base URL taken from the environment.
    ///
    /// A missing key is not an error here; it surfaces as
    /// [`Ocr2MdError::MissingApiKey`] when the orchestrator is constructed.
    pub fn from_env() -> Result<Self, Ocr2MdError> {
        let mut builder = Self::builder();
        if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
            builder = builder.api_key(key);
        }
        if let Ok(url) = std::env::var(BASE_URL_ENV_VAR) {
            if !url.is_empty() {
                builder = builder.base_url(url);
            }
        }
        builder.build()
    }

    /// The API key, or [`Ocr2MdError::MissingApiKey`] if it is absent or empty.
    pub fn require_api_key(&self) -> Result<&str, Ocr2MdError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(Ocr2MdError::MissingApiKey {
                var: API_KEY_ENV_VAR.to_string(),
            }),
        }
    }
}

/// Builder for [`OcrConfig`].
#[derive(Debug)]
pub struct OcrConfigBuilder {
    config: OcrConfig,
}

impl OcrConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn signed_url_expiry_hours(mut self, hours: u32) -> Self {
        self.config.signed_url_expiry_hours = hours;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<OcrConfig, Ocr2MdError> {
        let c = &mut self.config;

        let trimmed = c.base_url.trim_end_matches('/').to_string();
        match Url::parse(&trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => c.base_url = trimmed,
            Ok(url) => {
                return Err(Ocr2MdError::InvalidConfig(format!(
                    "base URL must use http or https, got scheme '{}'",
                    url.scheme()
                )))
            }
            Err(e) => {
                return Err(Ocr2MdError::InvalidConfig(format!(
                    "base URL '{}' is not a valid URL: {}",
                    c.base_url, e
                )))
            }
        }

        if c.model.trim().is_empty() {
            return Err(Ocr2MdError::InvalidConfig("model must not be empty".into()));
        }
        if c.signed_url_expiry_hours == 0 {
            return Err(Ocr2MdError::InvalidConfig(
                "signed URL expiry must be ≥ 1 hour".into(),
            ));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(Ocr2MdError::InvalidConfig(
                "request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OcrConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.signed_url_expiry_hours, 24);
        assert!(config.request_timeout_secs.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn builder_strips_trailing_slash() {
        let config = OcrConfig::builder()
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn builder_rejects_bad_values() {
        assert!(OcrConfig::builder().base_url("not a url").build().is_err());
        assert!(OcrConfig::builder().base_url("ftp://host").build().is_err());
        assert!(OcrConfig::builder().model("  ").build().is_err());
        assert!(OcrConfig::builder()
            .signed_url_expiry_hours(0)
            .build()
            .is_err());
        assert!(OcrConfig::builder().request_timeout_secs(0).build().is_err());
    }

    #[test]
    fn require_api_key() {
        let missing = OcrConfig::default();
        assert!(matches!(
            missing.require_api_key(),
            Err(Ocr2MdError::MissingApiKey { .. })
        ));

        let empty = OcrConfig::builder().api_key("").build().unwrap();
        assert!(empty.require_api_key().is_err());

        let present = OcrConfig::builder().api_key("sk-1").build().unwrap();
        assert_eq!(present.require_api_key().unwrap(), "sk-1");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = OcrConfig::builder().api_key("sk-secret").build().unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
