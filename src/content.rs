//! Content codec - classification and base64 encoding of stored payloads
//!
//! Every stored item carries one of two coarse content types, derived from the
//! file extension via a fixed mapping:
//! - `txt`, `py`, `html` -> `TEXT`
//! - `jpg`, `jpeg`, `png` -> `IMAGE`
//!
//! Text payloads are base64-encoded verbatim. Image payloads are decoded and
//! re-encoded in the format implied by the extension before base64 encoding,
//! so the stored bytes are a clean image stream rather than the original file
//! bytes.

use crate::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::ImageFormat;
use std::io::Cursor;
use std::str::FromStr;

/// Coarse classification of a stored item, derived from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Plain text payload, stored verbatim
    Text,
    /// Image payload, re-encoded before storage
    Image,
}

impl ContentType {
    /// Get the string representation stored in the `content_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "TEXT",
            ContentType::Image => "IMAGE",
        }
    }

    /// Classify a file extension via the fixed mapping table.
    ///
    /// Extensions outside the table are rejected; nothing is ever stored with
    /// a fallback type.
    pub fn classify(extension: &str) -> Result<Self> {
        match extension.to_lowercase().as_str() {
            "txt" | "py" | "html" => Ok(ContentType::Text),
            "jpg" | "jpeg" | "png" => Ok(ContentType::Image),
            other => Err(Error::UnsupportedExtension(other.to_string())),
        }
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TEXT" => Ok(ContentType::Text),
            "IMAGE" => Ok(ContentType::Image),
            _ => Err(Error::UnknownContentType(s.to_string())),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Base64-encode raw bytes verbatim
pub fn encode_text(raw: &[u8]) -> String {
    BASE64.encode(raw)
}

/// Decode the bytes as an image, re-encode in the format implied by
/// `extension`, then base64-encode the result.
pub fn encode_image(raw: &[u8], extension: &str) -> Result<String> {
    let format = match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => ImageFormat::Jpeg,
        "png" => ImageFormat::Png,
        other => return Err(Error::UnsupportedImageFormat(other.to_string())),
    };

    let img = image::load_from_memory(raw)
        .map_err(|_| Error::UnsupportedImageFormat(extension.to_string()))?;

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)?;
    Ok(BASE64.encode(buf.into_inner()))
}

/// Reverse base64 encoding back to raw bytes
pub fn decode(content: &str) -> Result<Vec<u8>> {
    Ok(BASE64.decode(content)?)
}
