//! Batch generation pipeline
//!
//! Runs a fixed number of items one after another against an image provider.
//! An item whose response carries no image is skipped; a failed submission
//! stops the batch but keeps everything produced so far.

use lookbook_core::{LookbookError, Mode, Result};

use crate::asset::{Asset, AssetStore, SlotId};
use crate::history::GeneratedImage;
use crate::prompt::TEMPLATE_COUNT;
use crate::provider::{ImageProvider, ImageRequest, InlineAsset, ProviderError};
use crate::style::{finalize_prompt, LayerContext, StyleSelection, Theme};

/// Images produced per run unless configured otherwise
pub const DEFAULT_BATCH_SIZE: usize = 6;

/// Slots attached to every request when filled, after the mode's own slots
pub const AUXILIARY_SLOTS: [SlotId; 2] = [SlotId::OtherProductLifestyle, SlotId::Background];

/// Which slots feed a mode's primary and secondary inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSlots {
    pub primary: SlotId,
    pub secondary: Option<SlotId>,
}

impl ModeSlots {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Spotlight => Self {
                primary: SlotId::ProductSpotlight,
                secondary: None,
            },
            Mode::Lifestyle => Self {
                primary: SlotId::ProductLifestyle,
                secondary: Some(SlotId::ModelLifestyle),
            },
            // The reference image is both the product and the subject
            Mode::ShotLab => Self {
                primary: SlotId::ShotLabReference,
                secondary: Some(SlotId::ShotLabReference),
            },
        }
    }
}

/// The assets one run submits with every item
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs<'a> {
    pub primary: Option<&'a Asset>,
    pub secondary: Option<&'a Asset>,
    pub auxiliary: Vec<&'a Asset>,
}

impl<'a> PipelineInputs<'a> {
    /// Pick the mode's inputs out of the asset store
    pub fn from_store(mode: Mode, store: &'a AssetStore) -> Self {
        let slots = ModeSlots::for_mode(mode);
        Self {
            primary: store.get(slots.primary),
            secondary: slots.secondary.and_then(|slot| store.get(slot)),
            auxiliary: AUXILIARY_SLOTS
                .iter()
                .filter_map(|slot| store.get(*slot))
                .collect(),
        }
    }

    /// Whether a person accompanies the product
    pub fn model_present(&self) -> bool {
        self.secondary.is_some()
    }

    /// Inline payloads in submission order: primary, secondary, auxiliary
    pub fn inline_assets(&self) -> Vec<InlineAsset> {
        self.primary
            .into_iter()
            .chain(self.secondary)
            .chain(self.auxiliary.iter().copied())
            .map(InlineAsset::from)
            .collect()
    }
}

/// Why a run stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The service rejected or lacked the credential
    Credential,
    /// Any other submission failure
    Service,
}

/// The failure that halted a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    pub kind: FailureKind,
    /// Raw error text from the provider
    pub message: String,
    /// Batch item whose submission failed
    pub item_index: usize,
}

impl FailureDetail {
    pub fn classify(item_index: usize, error: &ProviderError) -> Self {
        let message = error.to_string();
        let kind = match error {
            ProviderError::MissingApiKey => FailureKind::Credential,
            ProviderError::Request(text) if is_credential_error(text) => FailureKind::Credential,
            ProviderError::Request(_) => FailureKind::Service,
        };
        Self {
            kind,
            message,
            item_index,
        }
    }

    /// The caller should offer the credential-selection prompt
    pub fn needs_credential(&self) -> bool {
        self.kind == FailureKind::Credential
    }

    /// Single human-readable notification for this failure
    pub fn user_message(&self) -> String {
        match self.kind {
            FailureKind::Credential => {
                "Your API key is invalid. Please add a valid API key.".to_string()
            }
            FailureKind::Service => format!("Error: {}", self.message),
        }
    }
}

/// Whether a failure message means the credential was missing or rejected
pub fn is_credential_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("api_key_invalid")
        || lower.contains("api key not valid")
        || lower.contains("permission denied")
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every item was submitted
    Complete,
    /// Halted after producing at least one image
    PartialFailure(FailureDetail),
    /// Halted before producing any image
    Aborted(FailureDetail),
}

impl RunOutcome {
    pub fn failure(&self) -> Option<&FailureDetail> {
        match self {
            RunOutcome::Complete => None,
            RunOutcome::PartialFailure(detail) | RunOutcome::Aborted(detail) => Some(detail),
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRun {
    pub images: Vec<GeneratedImage>,
    pub outcome: RunOutcome,
    /// Items answered without an image
    pub skipped: Vec<usize>,
    /// Requests actually submitted
    pub requests_sent: usize,
}

/// Sequential batch runner over a provider
pub struct GenerationPipeline<'a> {
    provider: &'a dyn ImageProvider,
    batch_size: usize,
    lifestyle_requires_model: bool,
}

impl<'a> GenerationPipeline<'a> {
    pub fn new(provider: &'a dyn ImageProvider) -> Self {
        Self {
            provider,
            batch_size: DEFAULT_BATCH_SIZE,
            lifestyle_requires_model: true,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_lifestyle_requires_model(mut self, required: bool) -> Self {
        self.lifestyle_requires_model = required;
        self
    }

    /// Fail with a user-facing message if a mode-required asset is missing
    pub fn check_inputs(&self, mode: Mode, inputs: &PipelineInputs<'_>) -> Result<()> {
        let slots = ModeSlots::for_mode(mode);
        let mut missing = Vec::new();
        if inputs.primary.is_none() {
            missing.push(slots.primary.label());
        }
        if let Some(secondary) = slots.secondary {
            let required = secondary != slots.primary
                && (mode != Mode::Lifestyle || self.lifestyle_requires_model);
            if required && inputs.secondary.is_none() {
                missing.push(secondary.label());
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(LookbookError::MissingInput(format!(
                "Please upload the {} first.",
                missing.join(" and ")
            )))
        }
    }

    /// Generate one batch. Items cycle through `prompts` when the batch is
    /// larger than the template list.
    pub fn run(
        &self,
        mode: Mode,
        prompts: &[String],
        inputs: &PipelineInputs<'_>,
        style: &StyleSelection,
    ) -> Result<GenerationRun> {
        self.check_inputs(mode, inputs)?;
        if prompts.is_empty() {
            return Err(LookbookError::ConfigError(format!(
                "No prompt templates for {}",
                mode
            )));
        }
        // Urban Street swaps in the Lifestyle template at the same index
        if style.theme() == Some(&Theme::UrbanStreet) && prompts.len() != TEMPLATE_COUNT {
            return Err(LookbookError::ConfigError(format!(
                "Urban Street Style needs {} prompt templates, got {}",
                TEMPLATE_COUNT,
                prompts.len()
            )));
        }

        let model_present = inputs.model_present();
        let inline_assets = inputs.inline_assets();

        tracing::info!(
            %mode,
            provider = self.provider.name(),
            items = self.batch_size,
            assets = inline_assets.len(),
            "starting generation run"
        );

        let mut images = Vec::new();
        let mut skipped = Vec::new();
        let mut requests_sent = 0;
        let mut outcome = RunOutcome::Complete;

        for index in 0..self.batch_size {
            let base = &prompts[index % prompts.len()];
            let text = finalize_prompt(
                base,
                style,
                LayerContext {
                    index,
                    model_present,
                },
            );
            let request = ImageRequest::new(text, inline_assets.clone());

            tracing::debug!(index, "submitting item");
            requests_sent += 1;
            match self.provider.generate(&request) {
                Ok(response) => match response.first_image() {
                    Some(image) => images.push(GeneratedImage {
                        item_index: index,
                        prompt: request.text,
                        image,
                    }),
                    None => {
                        tracing::warn!(
                            index,
                            text = %response.text(),
                            "no image generated for item; the prompt may have been blocked"
                        );
                        skipped.push(index);
                    }
                },
                Err(err) => {
                    let detail = FailureDetail::classify(index, &err);
                    tracing::error!(index, kind = ?detail.kind, error = %err, "image generation failed");
                    outcome = if images.is_empty() {
                        RunOutcome::Aborted(detail)
                    } else {
                        RunOutcome::PartialFailure(detail)
                    };
                    break;
                }
            }
        }

        tracing::info!(
            produced = images.len(),
            skipped = skipped.len(),
            halted = outcome.failure().is_some(),
            "generation run finished"
        );

        Ok(GenerationRun {
            images,
            outcome,
            skipped,
            requests_sent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::build_prompts;
    use crate::providers::mock::{MockOutcome, MockProvider};
    use crate::style::{AURA_TEMPLATE, TECHNICAL_SUFFIX};

    fn store_with(slots: &[SlotId]) -> AssetStore {
        let mut store = AssetStore::new();
        for (i, slot) in slots.iter().enumerate() {
            store
                .set_asset_bytes(*slot, vec![i as u8 + 1; 4], "image/png")
                .unwrap();
        }
        store
    }

    #[test]
    fn test_spotlight_run_uses_templates_verbatim() {
        let provider = MockProvider::new();
        let store = store_with(&[SlotId::ProductSpotlight]);
        let inputs = PipelineInputs::from_store(Mode::Spotlight, &store);
        let prompts = build_prompts(Mode::Spotlight, false, None);

        let run = GenerationPipeline::new(&provider)
            .run(Mode::Spotlight, &prompts, &inputs, &StyleSelection::new())
            .unwrap();

        assert_eq!(run.outcome, RunOutcome::Complete);
        assert_eq!(run.images.len(), 6);
        let requests = provider.requests();
        assert_eq!(requests.len(), 6);
        for (i, request) in requests.iter().enumerate() {
            assert_eq!(request.text, format!("{}{}", prompts[i], TECHNICAL_SUFFIX));
            assert_eq!(request.inline_assets.len(), 1);
        }
    }

    #[test]
    fn test_missing_input_fails_before_any_call() {
        let provider = MockProvider::new();
        let store = store_with(&[SlotId::ProductLifestyle]);
        let inputs = PipelineInputs::from_store(Mode::Lifestyle, &store);
        let prompts = build_prompts(Mode::Lifestyle, false, None);

        let err = GenerationPipeline::new(&provider)
            .run(Mode::Lifestyle, &prompts, &inputs, &StyleSelection::new())
            .unwrap_err();

        assert!(matches!(err, LookbookError::MissingInput(_)));
        assert!(err.to_string().contains("model/talent photo"));
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_missing_everything_names_all_assets() {
        let provider = MockProvider::new();
        let store = AssetStore::new();
        let inputs = PipelineInputs::from_store(Mode::Lifestyle, &store);
        let err = GenerationPipeline::new(&provider)
            .check_inputs(Mode::Lifestyle, &inputs)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please upload the product photo and model/talent photo first."
        );
    }

    #[test]
    fn test_credential_failure_halts_batch() {
        let provider = MockProvider::new().with_outcome(
            2,
            MockOutcome::Fail("HTTP 400: API key not valid. Please pass a valid API key.".into()),
        );
        let store = store_with(&[SlotId::ProductSpotlight]);
        let inputs = PipelineInputs::from_store(Mode::Spotlight, &store);
        let prompts = build_prompts(Mode::Spotlight, false, None);

        let run = GenerationPipeline::new(&provider)
            .run(Mode::Spotlight, &prompts, &inputs, &StyleSelection::new())
            .unwrap();

        assert_eq!(run.images.len(), 2);
        assert_eq!(run.requests_sent, 3);
        assert_eq!(provider.call_count(), 3);
        match run.outcome {
            RunOutcome::PartialFailure(ref detail) => {
                assert!(detail.needs_credential());
                assert_eq!(detail.item_index, 2);
            }
            ref other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_first_item_failure_aborts() {
        let provider =
            MockProvider::new().with_outcome(0, MockOutcome::Fail("quota exhausted".into()));
        let store = store_with(&[SlotId::ShotLabReference]);
        let inputs = PipelineInputs::from_store(Mode::ShotLab, &store);
        let prompts = build_prompts(Mode::ShotLab, true, None);

        let run = GenerationPipeline::new(&provider)
            .run(Mode::ShotLab, &prompts, &inputs, &StyleSelection::new())
            .unwrap();

        assert!(run.images.is_empty());
        let detail = run.outcome.failure().unwrap();
        assert!(matches!(run.outcome, RunOutcome::Aborted(_)));
        assert_eq!(detail.kind, FailureKind::Service);
        assert_eq!(detail.user_message(), "Error: quota exhausted");
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_item_without_image_is_skipped() {
        let provider =
            MockProvider::new().with_outcome(1, MockOutcome::TextOnly("blocked".into()));
        let store = store_with(&[SlotId::ProductSpotlight]);
        let inputs = PipelineInputs::from_store(Mode::Spotlight, &store);
        let prompts = build_prompts(Mode::Spotlight, false, None);

        let run = GenerationPipeline::new(&provider)
            .run(Mode::Spotlight, &prompts, &inputs, &StyleSelection::new())
            .unwrap();

        assert_eq!(run.outcome, RunOutcome::Complete);
        assert_eq!(run.images.len(), 5);
        assert_eq!(run.skipped, vec![1]);
        let indices: Vec<usize> = run.images.iter().map(|i| i.item_index).collect();
        assert_eq!(indices, vec![0, 2, 3, 4, 5]);
    }

    #[test]
    fn test_prompts_cycle_when_batch_is_larger() {
        let provider = MockProvider::new();
        let store = store_with(&[SlotId::ProductSpotlight]);
        let inputs = PipelineInputs::from_store(Mode::Spotlight, &store);
        let prompts = vec!["one. ".to_string(), "two. ".to_string()];

        GenerationPipeline::new(&provider)
            .with_batch_size(5)
            .run(Mode::Spotlight, &prompts, &inputs, &StyleSelection::new())
            .unwrap();

        let starts: Vec<String> = provider
            .requests()
            .iter()
            .map(|r| r.text.split('.').next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(starts, vec!["one", "two", "one", "two", "one"]);
    }

    #[test]
    fn test_asset_order_in_payload() {
        let provider = MockProvider::new();
        let store = store_with(&[
            SlotId::Background,
            SlotId::OtherProductLifestyle,
            SlotId::ModelLifestyle,
            SlotId::ProductLifestyle,
        ]);
        let inputs = PipelineInputs::from_store(Mode::Lifestyle, &store);
        let payload = inputs.inline_assets();

        let expected: Vec<InlineAsset> = [
            SlotId::ProductLifestyle,
            SlotId::ModelLifestyle,
            SlotId::OtherProductLifestyle,
            SlotId::Background,
        ]
        .iter()
        .map(|slot| InlineAsset::from(store.get(*slot).unwrap()))
        .collect();
        assert_eq!(payload, expected);
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_shot_lab_sends_reference_as_product_and_subject() {
        let provider = MockProvider::new();
        let store = store_with(&[SlotId::ShotLabReference]);
        let inputs = PipelineInputs::from_store(Mode::ShotLab, &store);
        assert!(inputs.model_present());
        let prompts = build_prompts(Mode::ShotLab, inputs.model_present(), None);

        GenerationPipeline::new(&provider)
            .with_batch_size(1)
            .run(Mode::ShotLab, &prompts, &inputs, &StyleSelection::new())
            .unwrap();

        let reference = InlineAsset::from(store.get(SlotId::ShotLabReference).unwrap());
        assert_eq!(
            provider.requests()[0].inline_assets,
            vec![reference.clone(), reference]
        );
    }

    #[test]
    fn test_shot_lab_missing_reference_named_once() {
        let provider = MockProvider::new();
        let store = AssetStore::new();
        let inputs = PipelineInputs::from_store(Mode::ShotLab, &store);
        let err = GenerationPipeline::new(&provider)
            .check_inputs(Mode::ShotLab, &inputs)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please upload the Shot Lab reference image first."
        );
    }

    #[test]
    fn test_urban_street_rejects_short_prompt_list() {
        let provider = MockProvider::new();
        let store = store_with(&[SlotId::ProductSpotlight]);
        let inputs = PipelineInputs::from_store(Mode::Spotlight, &store);
        let prompts = vec!["one. ".to_string(), "two. ".to_string()];
        let mut style = StyleSelection::new();
        style.set_theme(Some(Theme::UrbanStreet));

        let err = GenerationPipeline::new(&provider)
            .with_batch_size(3)
            .run(Mode::Spotlight, &prompts, &inputs, &style)
            .unwrap_err();

        assert!(matches!(err, LookbookError::ConfigError(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_urban_street_follows_item_index() {
        let provider = MockProvider::new();
        let store = store_with(&[SlotId::ProductSpotlight]);
        let inputs = PipelineInputs::from_store(Mode::Spotlight, &store);
        let prompts = build_prompts(Mode::Spotlight, false, None);
        let mut style = StyleSelection::new();
        style.set_theme(Some(Theme::UrbanStreet));

        GenerationPipeline::new(&provider)
            .with_batch_size(8)
            .run(Mode::Spotlight, &prompts, &inputs, &style)
            .unwrap();

        let urban = crate::prompt::lifestyle_prompts(false);
        for (i, request) in provider.requests().iter().enumerate() {
            assert!(request.text.starts_with(&urban[i % prompts.len()]));
        }
    }

    #[test]
    fn test_aura_with_color_in_request() {
        let provider = MockProvider::new();
        let store = store_with(&[SlotId::ProductSpotlight]);
        let inputs = PipelineInputs::from_store(Mode::Spotlight, &store);
        let prompts = build_prompts(Mode::Spotlight, false, None);
        let mut style = StyleSelection::new();
        style.set_theme(Some(Theme::Aura));
        style.set_color(Some("black".to_string()));

        GenerationPipeline::new(&provider)
            .with_batch_size(1)
            .run(Mode::Spotlight, &prompts, &inputs, &style)
            .unwrap();

        let text = &provider.requests()[0].text;
        assert!(text.starts_with(&format!("{}The background color is black. ", AURA_TEMPLATE)));
    }

    #[test]
    fn test_lifestyle_without_model_when_optional() {
        let provider = MockProvider::new();
        let store = store_with(&[SlotId::ProductLifestyle]);
        let inputs = PipelineInputs::from_store(Mode::Lifestyle, &store);
        let prompts = build_prompts(Mode::Lifestyle, inputs.model_present(), None);

        let run = GenerationPipeline::new(&provider)
            .with_lifestyle_requires_model(false)
            .run(Mode::Lifestyle, &prompts, &inputs, &StyleSelection::new())
            .unwrap();

        assert_eq!(run.images.len(), 6);
        for request in provider.requests() {
            assert!(!request.text.to_lowercase().contains("the model"), "{}", request.text);
        }
    }

    #[test]
    fn test_credential_classification() {
        assert!(is_credential_error("API_KEY_INVALID"));
        assert!(is_credential_error("api key not valid. please pass a valid api key."));
        assert!(is_credential_error("403 Permission Denied on resource"));
        assert!(!is_credential_error("500 internal error"));

        let detail = FailureDetail::classify(0, &ProviderError::MissingApiKey);
        assert!(detail.needs_credential());
    }
}
