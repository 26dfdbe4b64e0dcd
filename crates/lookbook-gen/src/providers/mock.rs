//! Mock provider for testing and offline use
//!
//! Produces solid-color 9:16 PNGs without any network calls. Individual calls
//! can be scripted to return a text-only response or to fail, and every
//! request is recorded for inspection.

use crate::provider::*;
use lookbook_core::DataUrl;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard};

const MOCK_WIDTH: u32 = 90;
const MOCK_HEIGHT: u32 = 160;

/// What the mock returns for a given call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOutcome {
    /// A single generated PNG
    Image,
    /// A response with text parts only (e.g. a blocked prompt)
    TextOnly(String),
    /// A failed submission with the given message
    Fail(String),
}

#[derive(Default)]
struct MockState {
    requests: Vec<ImageRequest>,
    script: HashMap<usize, MockOutcome>,
    api_key: Option<String>,
    requires_api_key: bool,
}

/// A mock provider that renders placeholder images locally.
///
/// Clones share state, so a test can keep a handle after boxing the
/// provider into a session.
#[derive(Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome of the call with the given (zero-based) index
    pub fn with_outcome(self, call: usize, outcome: MockOutcome) -> Self {
        self.state().script.insert(call, outcome);
        self
    }

    /// Report `NoApiKey` until a key is installed via `set_api_key`
    pub fn requiring_api_key(self) -> Self {
        self.state().requires_api_key = true;
        self
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<ImageRequest> {
        self.state().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().requests.len()
    }

    pub fn api_key(&self) -> Option<String> {
        self.state().api_key.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ImageProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn health_check(&self) -> ProviderStatus {
        let state = self.state();
        if state.requires_api_key && state.api_key.is_none() {
            ProviderStatus::NoApiKey
        } else {
            ProviderStatus::Available
        }
    }

    fn generate(&self, request: &ImageRequest) -> Result<ImageResponse, ProviderError> {
        let outcome = {
            let mut state = self.state();
            let call = state.requests.len();
            state.requests.push(request.clone());
            state.script.get(&call).cloned().unwrap_or(MockOutcome::Image)
        };

        match outcome {
            MockOutcome::Image => {
                let image = render_placeholder(&request.text)?;
                Ok(ImageResponse {
                    parts: vec![
                        ContentPart::text("Mock render"),
                        ContentPart::image(image.media_type(), image.payload()),
                    ],
                })
            }
            MockOutcome::TextOnly(text) => Ok(ImageResponse {
                parts: vec![ContentPart::text(text)],
            }),
            MockOutcome::Fail(message) => Err(ProviderError::Request(message)),
        }
    }

    fn set_api_key(&mut self, api_key: String) {
        self.state().api_key = Some(api_key);
    }
}

/// Render a solid-color portrait PNG whose color is derived from the prompt
fn render_placeholder(prompt: &str) -> Result<DataUrl, ProviderError> {
    let hash_val = prompt
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    let r = ((hash_val >> 16) & 0xFF) as u8;
    let g = ((hash_val >> 8) & 0xFF) as u8;
    let b = (hash_val & 0xFF) as u8;

    let img = image::RgbaImage::from_pixel(MOCK_WIDTH, MOCK_HEIGHT, image::Rgba([r, g, b, 255]));
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| ProviderError::Request(format!("Failed to encode mock PNG: {}", e)))?;

    Ok(DataUrl::encode("image/png", &png))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> ImageRequest {
        ImageRequest::new(text.to_string(), vec![])
    }

    #[test]
    fn test_mock_provider_health() {
        let provider = MockProvider::new();
        assert_eq!(provider.health_check(), ProviderStatus::Available);
        assert_eq!(provider.name(), "mock");
    }

    #[test]
    fn test_mock_generates_portrait_png() {
        let provider = MockProvider::new();
        let response = provider.generate(&request("brick wall")).unwrap();
        let image = response.first_image().unwrap();
        assert_eq!(image.media_type(), "image/png");

        let decoded = image::load_from_memory(&image.decode().unwrap()).unwrap();
        assert_eq!(decoded.width(), MOCK_WIDTH);
        assert_eq!(decoded.height(), MOCK_HEIGHT);
    }

    #[test]
    fn test_scripted_outcomes_and_recording() {
        let provider = MockProvider::new()
            .with_outcome(1, MockOutcome::TextOnly("blocked".to_string()))
            .with_outcome(2, MockOutcome::Fail("boom".to_string()));

        assert!(provider.generate(&request("a")).unwrap().first_image().is_some());
        assert!(provider.generate(&request("b")).unwrap().first_image().is_none());
        assert_eq!(
            provider.generate(&request("c")),
            Err(ProviderError::Request("boom".to_string()))
        );

        let texts: Vec<String> = provider.requests().into_iter().map(|r| r.text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clones_share_state() {
        let handle = MockProvider::new().requiring_api_key();
        let mut boxed: Box<dyn ImageProvider> = Box::new(handle.clone());
        assert_eq!(boxed.health_check(), ProviderStatus::NoApiKey);

        boxed.set_api_key("key".to_string());
        boxed.generate(&request("x")).unwrap();

        assert_eq!(handle.api_key().as_deref(), Some("key"));
        assert_eq!(handle.call_count(), 1);
    }
}
