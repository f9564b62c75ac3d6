//! Image decoding: data-URI payload → raw bytes.
//!
//! The OCR service embeds each extracted image as
//! `data:image/jpeg;base64,<payload>`. This module parses the RFC 2397
//! grammar (`data:[<mediatype>][;base64],<data>`), decodes base64 payloads
//! and percent-decodes the rest. A malformed URI is an [`ImageError::Decode`]
//! for that one image; an empty payload means there is nothing to write.

use crate::document::OcrImage;
use crate::error::ImageError;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Standard alphabet, tolerant of missing or present padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

static DATA_URI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)^data:(?P<mime>[A-Za-z0-9!#$&^_.+-]+/[A-Za-z0-9!#$&^_.+-]+)?(?P<params>(?:;[A-Za-z0-9!#$&^_.+-]+=[^;,]*)*)(?P<b64>;base64)?,(?P<data>.*)$",
    )
    .unwrap()
});

/// A parsed data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Declared media type; `text/plain` when omitted.
    pub media_type: String,
    /// Whether the payload was base64 encoded.
    pub is_base64: bool,
    /// Decoded bytes.
    pub data: Vec<u8>,
}

/// Parse a data URI and decode its payload.
pub fn parse_data_uri(uri: &str) -> Result<DataUri, String> {
    let caps = DATA_URI_RE
        .captures(uri)
        .ok_or_else(|| "not a data URI (expected 'data:[<mediatype>][;base64],<data>')".to_string())?;

    let media_type = caps
        .name("mime")
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_else(|| "text/plain".to_string());
    let is_base64 = caps.name("b64").is_some();
    let payload = caps.name("data").map(|m| m.as_str()).unwrap_or("");

    let data = if is_base64 {
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        LENIENT_BASE64
            .decode(compact.as_bytes())
            .map_err(|e| format!("invalid base64 payload: {e}"))?
    } else {
        urlencoding::decode_binary(payload.as_bytes()).into_owned()
    };

    Ok(DataUri {
        media_type,
        is_base64,
        data,
    })
}

/// Decode an image's payload.
///
/// Returns `Ok(None)` when the payload is empty or absent: nothing should be
/// written and nothing went wrong.
pub fn decode_image(image: &OcrImage) -> Result<Option<Vec<u8>>, ImageError> {
    let Some(payload) = image.payload() else {
        warn!("Image '{}' has no data; no file will be created", image.id);
        return Ok(None);
    };

    let uri = parse_data_uri(payload).map_err(|detail| ImageError::Decode {
        id: image.id.clone(),
        detail,
    })?;

    debug!(
        "Decoded image '{}' ({}, {} bytes)",
        image.id,
        uri.media_type,
        uri.data.len()
    );
    Ok(Some(uri.data))
}
