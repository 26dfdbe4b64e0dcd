//! Image service provider trait and request/response types

use lookbook_core::DataUrl;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::asset::Asset;

/// Output modality requested from the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Image,
    Text,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modality::Image => write!(f, "IMAGE"),
            Modality::Text => write!(f, "TEXT"),
        }
    }
}

/// An encoded image attached to a request or returned in a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineAsset {
    pub media_type: String,
    /// Base64 payload without the data URL prefix
    pub data: String,
}

impl From<&Asset> for InlineAsset {
    fn from(asset: &Asset) -> Self {
        Self {
            media_type: asset.media_type.clone(),
            data: asset.encoded.payload().to_string(),
        }
    }
}

/// A request to generate one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Finalized prompt text
    pub text: String,
    /// Reference images, in submission order
    pub inline_assets: Vec<InlineAsset>,
    pub modalities: Vec<Modality>,
}

impl ImageRequest {
    /// Request image + text output for the given prompt and references
    pub fn new(text: String, inline_assets: Vec<InlineAsset>) -> Self {
        Self {
            text,
            inline_assets,
            modalities: vec![Modality::Image, Modality::Text],
        }
    }
}

/// One content part of a service response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPart {
    pub text: Option<String>,
    pub inline_image: Option<InlineAsset>,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_image: None,
        }
    }

    pub fn image(media_type: &str, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_image: Some(InlineAsset {
                media_type: media_type.to_string(),
                data: data.into(),
            }),
        }
    }
}

/// The ordered content parts returned by the service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageResponse {
    pub parts: Vec<ContentPart>,
}

impl ImageResponse {
    /// The first inline image among the parts, as a displayable data URL.
    ///
    /// Only the first inline part counts; if its payload is not valid base64
    /// the response has no usable image.
    pub fn first_image(&self) -> Option<DataUrl> {
        let inline = self.parts.iter().find_map(|part| part.inline_image.as_ref())?;
        match DataUrl::from_base64(&inline.media_type, &inline.data) {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::error!(error = %e, "failed to decode inline image");
                None
            }
        }
    }

    /// All text parts joined, for logging when no image came back
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A failed submission. The message carries the service's own wording so the
/// caller can classify it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Request(String),

    #[error("API key is not configured")]
    MissingApiKey,
}

/// Status returned by a provider health check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    Available,
    Unavailable(String),
    NoApiKey,
}

/// Trait implemented by each image service backend (Gemini, Mock).
///
/// Calls block until the service answers; one call is one batch item.
pub trait ImageProvider: Send {
    /// Provider name (e.g. "gemini", "mock")
    fn name(&self) -> &str;

    /// Check if the provider can be called (credential present)
    fn health_check(&self) -> ProviderStatus;

    /// Submit one request and wait for the response
    fn generate(&self, request: &ImageRequest) -> Result<ImageResponse, ProviderError>;

    /// Install a credential chosen through the credential prompt
    fn set_api_key(&mut self, _api_key: String) {}
}
