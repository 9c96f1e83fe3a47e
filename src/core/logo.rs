//! Seller logo embedding.
//!
//! The UI hands over raw file bytes; the invoice keeps a `data:` URI that any
//! renderer can place in an `<img>` without touching the filesystem.

use base64::{Engine, engine::general_purpose};
use serde::{Deserialize, Serialize};

use super::error::InvoiceError;

/// Largest accepted logo file.
pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

/// An embedded logo image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logo {
    /// Image media type, e.g. "image/png".
    pub media_type: String,
    /// `data:<media_type>;base64,<payload>`.
    pub data_uri: String,
}

impl Logo {
    /// Embed an image, detecting its type from the leading bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InvoiceError> {
        if bytes.is_empty() {
            return Err(InvoiceError::Logo("file is empty".into()));
        }
        if bytes.len() > MAX_LOGO_BYTES {
            return Err(InvoiceError::Logo(format!(
                "file is {} bytes, limit is {MAX_LOGO_BYTES}",
                bytes.len()
            )));
        }
        let media_type = sniff_media_type(bytes)
            .ok_or_else(|| InvoiceError::Logo("unsupported image format".into()))?;
        let encoded = general_purpose::STANDARD.encode(bytes);
        Ok(Self {
            media_type: media_type.to_string(),
            data_uri: format!("data:{media_type};base64,{encoded}"),
        })
    }

    /// Decode the embedded image back into bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, InvoiceError> {
        let payload = self
            .data_uri
            .split_once(";base64,")
            .map(|(_, p)| p)
            .ok_or_else(|| InvoiceError::Logo("not a base64 data URI".into()))?;
        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| InvoiceError::Logo(e.to_string()))
    }
}

fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some("image/png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
        return Some("image/svg+xml");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn png_is_embedded() {
        let logo = Logo::from_bytes(PNG_HEADER).unwrap();
        assert_eq!(logo.media_type, "image/png");
        assert!(logo.data_uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert_eq!(logo.to_bytes().unwrap(), PNG_HEADER);
    }

    #[test]
    fn svg_is_detected() {
        let logo = Logo::from_bytes(br#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).unwrap();
        assert_eq!(logo.media_type, "image/svg+xml");
    }

    #[test]
    fn jpeg_and_gif_are_detected() {
        assert_eq!(Logo::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap().media_type, "image/jpeg");
        assert_eq!(Logo::from_bytes(b"GIF89a....").unwrap().media_type, "image/gif");
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(matches!(Logo::from_bytes(b"%PDF-1.7"), Err(InvoiceError::Logo(_))));
    }

    #[test]
    fn empty_and_oversized_rejected() {
        assert!(Logo::from_bytes(&[]).is_err());
        let mut big = PNG_HEADER.to_vec();
        big.resize(MAX_LOGO_BYTES + 1, 0);
        assert!(Logo::from_bytes(&big).is_err());
    }
}
