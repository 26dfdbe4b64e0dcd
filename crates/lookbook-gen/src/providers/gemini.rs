//! Gemini image generation provider
//!
//! Calls the `generateContent` endpoint of the Generative Language API with
//! image + text response modalities. Each call blocks until the service
//! answers; there is no automatic retry.

use crate::config::LookbookConfig;
use crate::provider::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on a response body (inline images are base64 in the JSON)
const MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

/// Gemini provider for product photo generation
pub struct GeminiProvider {
    api_key: Option<String>,
    api_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiProvider {
    /// Create a new GeminiProvider from config. A missing API key is not an
    /// error here; it is reported by `health_check`.
    pub fn from_config(config: &LookbookConfig) -> Self {
        Self {
            api_key: config.api_key().map(str::to_string),
            api_url: config.api_url().trim_end_matches('/').to_string(),
            model: config.model().to_string(),
            timeout: Duration::from_secs(config.provider.timeout_secs),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }

    fn post(&self, api_key: &str, body: &serde_json::Value) -> Result<String, ProviderError> {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .http_status_as_error(false)
            .build()
            .into();

        let mut response = agent
            .post(&self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .send_json(body)
            .map_err(|e| ProviderError::Request(format!("Gemini API request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_string()
            .map_err(|e| {
                ProviderError::Request(format!("Failed to read Gemini response: {}", e))
            })?;

        if status.is_success() {
            Ok(text)
        } else {
            Err(ProviderError::Request(describe_error_body(
                status.as_u16(),
                &text,
            )))
        }
    }
}

impl ImageProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn health_check(&self) -> ProviderStatus {
        match self.api_key {
            Some(_) => ProviderStatus::Available,
            None => ProviderStatus::NoApiKey,
        }
    }

    fn generate(&self, request: &ImageRequest) -> Result<ImageResponse, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let body = build_request_body(request)?;
        tracing::debug!(
            model = %self.model,
            assets = request.inline_assets.len(),
            "submitting generateContent request"
        );
        let text = self.post(api_key, &body)?;
        parse_generate_response(&text)
    }

    fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key).filter(|key| !key.trim().is_empty());
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: Vec<WireContent<'a>>,
    generation_config: WireGenerationConfig,
}

#[derive(Serialize)]
struct WireContent<'a> {
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WirePart<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<WireBlob<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireBlob<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    response_modalities: Vec<Modality>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    #[serde(default)]
    prompt_feedback: Option<WirePromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireResponseContent {
    #[serde(default)]
    parts: Vec<WireResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, alias = "inline_data")]
    inline_data: Option<WireResponseBlob>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponseBlob {
    #[serde(alias = "mime_type")]
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireErrorEnvelope {
    error: WireError,
}

#[derive(Deserialize)]
struct WireError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<WireErrorDetail>,
}

#[derive(Deserialize)]
struct WireErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

/// Build the JSON body for a `generateContent` call
pub fn build_request_body(request: &ImageRequest) -> Result<serde_json::Value, ProviderError> {
    let mut parts = vec![WirePart {
        text: Some(&request.text),
        inline_data: None,
    }];
    parts.extend(request.inline_assets.iter().map(|asset| WirePart {
        text: None,
        inline_data: Some(WireBlob {
            mime_type: &asset.media_type,
            data: &asset.data,
        }),
    }));

    let wire = WireRequest {
        contents: vec![WireContent { parts }],
        generation_config: WireGenerationConfig {
            response_modalities: request.modalities.clone(),
        },
    };
    serde_json::to_value(wire)
        .map_err(|e| ProviderError::Request(format!("Failed to encode Gemini request: {}", e)))
}

/// Parse a `generateContent` response body. Only the first candidate is used.
pub fn parse_generate_response(json: &str) -> Result<ImageResponse, ProviderError> {
    let response: WireResponse = serde_json::from_str(json).map_err(|e| {
        ProviderError::Request(format!("Unexpected Gemini response format: {}", e))
    })?;

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        tracing::warn!(reason, "prompt was blocked by the service");
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Ok(ImageResponse::default());
    };
    if let Some(reason) = candidate.finish_reason.as_deref() {
        tracing::debug!(reason, "candidate finished");
    }

    let parts = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .map(|part| ContentPart {
            text: part.text,
            inline_image: part.inline_data.map(|blob| InlineAsset {
                media_type: blob.mime_type,
                data: blob.data,
            }),
        })
        .collect();

    Ok(ImageResponse { parts })
}

/// Turn a non-2xx response into a failure message that keeps the service's
/// status, message and detail reasons (e.g. `API_KEY_INVALID`).
pub fn describe_error_body(status: u16, body: &str) -> String {
    match serde_json::from_str::<WireErrorEnvelope>(body) {
        Ok(envelope) => {
            let err = envelope.error;
            let mut message = format!("HTTP {}", status);
            if let Some(s) = err.status {
                message.push_str(&format!(" {}", s));
            }
            message.push_str(&format!(": {}", err.message));
            let reasons: Vec<String> = err.details.into_iter().filter_map(|d| d.reason).collect();
            if !reasons.is_empty() {
                message.push_str(&format!(" [{}]", reasons.join(", ")));
            }
            message
        }
        Err(_) => format!("HTTP {}: {}", status, body.trim()),
    }
}
