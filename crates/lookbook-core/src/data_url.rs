//! Base64 `data:` URLs for image payloads

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LookbookError, Result};

/// An encoded payload of the form `data:<media type>;base64,<payload>`.
///
/// Uploaded assets are staged in this form and generated images are handed
/// to the presentation layer in this form, so previews and downloads need no
/// further decoding step.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUrl {
    media_type: String,
    payload: String,
}

impl DataUrl {
    /// Encode raw bytes under the given media type
    pub fn encode(media_type: &str, bytes: &[u8]) -> Self {
        Self {
            media_type: media_type.to_string(),
            payload: BASE64.encode(bytes),
        }
    }

    /// Wrap an already base64-encoded payload.
    ///
    /// The payload is validated so that `decode` cannot fail later.
    pub fn from_base64(media_type: &str, payload: &str) -> Result<Self> {
        BASE64
            .decode(payload.as_bytes())
            .map_err(|e| LookbookError::InvalidDataUrl(format!("bad base64 payload: {}", e)))?;
        Ok(Self {
            media_type: media_type.to_string(),
            payload: payload.to_string(),
        })
    }

    /// Parse a `data:` URL string
    pub fn parse(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix("data:")
            .ok_or_else(|| LookbookError::InvalidDataUrl("missing 'data:' scheme".to_string()))?;
        let (media_type, payload) = rest.split_once(";base64,").ok_or_else(|| {
            LookbookError::InvalidDataUrl("missing ';base64,' separator".to_string())
        })?;
        if media_type.is_empty() {
            return Err(LookbookError::InvalidDataUrl("empty media type".to_string()));
        }
        Self::from_base64(media_type, payload)
    }

    /// The media type, e.g. `image/png`
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// The base64 payload without the `data:...;base64,` prefix
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Decode the payload back into raw bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(self.payload.as_bytes())
            .map_err(|e| LookbookError::InvalidDataUrl(format!("bad base64 payload: {}", e)))
    }

    /// File extension matching the media type (`png` when unknown)
    pub fn extension(&self) -> &'static str {
        match self.media_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "image/bmp" => "bmp",
            _ => "png",
        }
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.media_type, self.payload)
    }
}

impl fmt::Debug for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataUrl({}, {} base64 chars)",
            self.media_type,
            self.payload.len()
        )
    }
}

impl FromStr for DataUrl {
    type Err = LookbookError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DataUrl {
    type Error = LookbookError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<DataUrl> for String {
    fn from(url: DataUrl) -> Self {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_produces_data_url() {
        let url = DataUrl::encode("image/png", b"hello");
        assert_eq!(url.to_string(), "data:image/png;base64,aGVsbG8=");
        assert_eq!(url.payload(), "aGVsbG8=");
        assert_eq!(url.media_type(), "image/png");
    }

    #[test]
    fn test_parse_and_decode() {
        let url: DataUrl = "data:image/jpeg;base64,aGVsbG8=".parse().unwrap();
        assert_eq!(url.media_type(), "image/jpeg");
        assert_eq!(url.decode().unwrap(), b"hello");
        assert_eq!(url.extension(), "jpg");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(DataUrl::parse("image/png;base64,aGVsbG8=").is_err());
        assert!(DataUrl::parse("data:image/png,aGVsbG8=").is_err());
        assert!(DataUrl::parse("data:;base64,aGVsbG8=").is_err());
        assert!(DataUrl::parse("data:image/png;base64,@@not base64@@").is_err());
    }

    #[test]
    fn test_debug_does_not_dump_payload() {
        let url = DataUrl::encode("image/png", &[0u8; 300]);
        let debug = format!("{:?}", url);
        assert!(debug.starts_with("DataUrl(image/png"));
        assert!(!debug.contains("AAAA"));
    }
}
