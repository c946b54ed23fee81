//! Screenshot intake for agent requests
//!
//! Accepts raw base64 or a `data:` URL. The declared MIME type is only a
//! hint: the decoded bytes decide, and anything that is not a plausible
//! PNG, JPEG or WEBP image is dropped.

use crate::llm::ImageAttachment;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};

/// Payloads smaller than this cannot be a real screenshot
const MIN_IMAGE_BYTES: usize = 100;

/// Detected image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Webp => "image/webp",
        }
    }

    /// Identify the format from its magic number
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }
}

/// Split a `data:` URL into its MIME hint and payload
fn split_data_url(input: &str) -> (Option<&str>, &str) {
    let Some(rest) = input.strip_prefix("data:") else {
        return (None, input);
    };
    match rest.split_once(',') {
        Some((header, payload)) => {
            let mime = header.split(';').next().filter(|m| !m.is_empty());
            (mime, payload)
        }
        None => (None, rest),
    }
}

/// Decode a screenshot into a verified image, or `None` to go text-only
pub fn decode_screenshot(input: &str) -> Option<ImageAttachment> {
    let (declared, payload) = split_data_url(input.trim());
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    let data = match STANDARD
        .decode(&payload)
        .or_else(|_| STANDARD_NO_PAD.decode(&payload))
    {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(error = %e, "dropping screenshot: invalid base64");
            return None;
        }
    };

    if data.len() < MIN_IMAGE_BYTES {
        tracing::warn!(bytes = data.len(), "dropping screenshot: payload too small");
        return None;
    }

    let Some(format) = ImageFormat::detect(&data) else {
        tracing::warn!(declared = ?declared, "dropping screenshot: not a PNG, JPEG or WEBP image");
        return None;
    };

    if let Some(declared) = declared {
        if !declared.eq_ignore_ascii_case(format.mime_type()) {
            tracing::debug!(declared, detected = format.mime_type(), "screenshot MIME corrected from content");
        }
    }

    Some(ImageAttachment {
        mime_type: format.mime_type().to_string(),
        data,
    })
}
