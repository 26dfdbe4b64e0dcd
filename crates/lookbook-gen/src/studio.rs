//! Single-session studio
//!
//! Ties the asset slots, style selection, pipeline and history together for
//! one user session. Hosts (the CLI, tests) drive it through these methods
//! and render whatever `current()` returns.

use std::path::{Path, PathBuf};

use lookbook_core::{Mode, Result};

use crate::asset::AssetStore;
use crate::config::{GenerationConfig, LookbookConfig};
use crate::credential::{CredentialPrompt, CredentialRequest, NoCredentialPrompt, CREDENTIAL_MISSING};
use crate::history::{GenerationBatch, HistoryStore};
use crate::pipeline::{GenerationPipeline, PipelineInputs, RunOutcome};
use crate::prompt::build_prompts;
use crate::provider::{ImageProvider, ProviderStatus};
use crate::providers::create_provider;
use crate::style::{finalize_prompt, LayerContext, StyleSelection};

/// Everything a host needs to show after a generate request
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// `None` when no run was attempted
    pub outcome: Option<RunOutcome>,
    /// Images produced by this run
    pub produced: usize,
    /// Batch items answered without an image
    pub skipped: Vec<usize>,
    /// The batch at the history cursor after the run
    pub shown: GenerationBatch,
    /// At most one human-readable message
    pub notification: Option<String>,
    /// Set when the credential prompt was invoked
    pub credential_request: Option<CredentialRequest>,
}

impl GenerateReport {
    pub fn credential_prompted(&self) -> bool {
        self.credential_request.is_some()
    }
}

/// One studio session
pub struct Studio {
    mode: Mode,
    assets: AssetStore,
    style: StyleSelection,
    history: HistoryStore,
    provider: Box<dyn ImageProvider>,
    credential_prompt: Box<dyn CredentialPrompt>,
    settings: GenerationConfig,
}

impl Studio {
    pub fn new(provider: Box<dyn ImageProvider>, settings: GenerationConfig) -> Self {
        Self {
            mode: Mode::default(),
            assets: AssetStore::new(),
            style: StyleSelection::new(),
            history: HistoryStore::new(),
            provider,
            credential_prompt: Box::new(NoCredentialPrompt),
            settings,
        }
    }

    /// Build a session with the provider named in `config`
    pub fn from_config(config: &LookbookConfig) -> Result<Self> {
        let provider = create_provider(&config.provider.name, config)?;
        Ok(Self::new(provider, config.generation.clone()))
    }

    pub fn with_credential_prompt(mut self, prompt: Box<dyn CredentialPrompt>) -> Self {
        self.credential_prompt = prompt;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Enter `mode`. History and style are cleared even if the mode is
    /// unchanged; uploaded assets stay.
    pub fn switch_mode(&mut self, mode: Mode) {
        tracing::info!(from = %self.mode, to = %mode, "switching mode");
        self.mode = mode;
        self.history.reset();
        self.style.reset();
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetStore {
        &mut self.assets
    }

    pub fn style(&self) -> &StyleSelection {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut StyleSelection {
        &mut self.style
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn settings(&self) -> &GenerationConfig {
        &self.settings
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The prompts a run would send right now, one per batch item
    pub fn prompts(&self) -> Vec<String> {
        let inputs = PipelineInputs::from_store(self.mode, &self.assets);
        let model_present = inputs.model_present();
        let bases = build_prompts(self.mode, model_present, self.style.pose_angle());
        (0..self.settings.batch_size)
            .map(|index| {
                finalize_prompt(
                    &bases[index % bases.len()],
                    &self.style,
                    LayerContext {
                        index,
                        model_present,
                    },
                )
            })
            .collect()
    }

    /// Run one batch for the current mode and style.
    ///
    /// Fails only when a required asset is missing; every other problem is
    /// reported through the returned notification.
    pub fn generate(&mut self) -> Result<GenerateReport> {
        match self.provider.health_check() {
            ProviderStatus::Available => {}
            ProviderStatus::NoApiKey => {
                tracing::warn!(provider = self.provider.name(), "no API key configured");
                let request = self.request_credentials();
                return Ok(self.report_without_run(
                    with_credential_message(CREDENTIAL_MISSING.to_string(), request),
                    Some(request),
                ));
            }
            ProviderStatus::Unavailable(reason) => {
                tracing::warn!(provider = self.provider.name(), %reason, "provider unavailable");
                return Ok(self.report_without_run(format!("Error: {}", reason), None));
            }
        }

        let run = {
            let inputs = PipelineInputs::from_store(self.mode, &self.assets);
            let prompts = build_prompts(
                self.mode,
                inputs.model_present(),
                self.style.pose_angle(),
            );
            GenerationPipeline::new(self.provider.as_ref())
                .with_batch_size(self.settings.batch_size)
                .with_lifestyle_requires_model(self.settings.lifestyle_requires_model)
                .run(self.mode, &prompts, &inputs, &self.style)?
        };

        let produced = run.images.len();
        if produced > 0 {
            self.history.push(GenerationBatch::new(run.images));
        }

        let mut notification = None;
        let mut credential_request = None;
        match run.outcome.failure() {
            Some(detail) if detail.needs_credential() => {
                let request = self.request_credentials();
                notification = Some(with_credential_message(detail.user_message(), request));
                credential_request = Some(request);
            }
            Some(detail) => notification = Some(detail.user_message()),
            None if produced == 0 => {
                notification =
                    Some("No images were generated. The prompts may have been blocked.".to_string())
            }
            None => {}
        }

        Ok(GenerateReport {
            outcome: Some(run.outcome),
            produced,
            skipped: run.skipped,
            shown: self.history.current().clone(),
            notification,
            credential_request,
        })
    }

    /// Run again with the same inputs and style
    pub fn regenerate(&mut self) -> Result<GenerateReport> {
        self.generate()
    }

    pub fn undo(&mut self) -> Option<&GenerationBatch> {
        self.history.undo()
    }

    pub fn redo(&mut self) -> Option<&GenerationBatch> {
        self.history.redo()
    }

    pub fn current(&self) -> &GenerationBatch {
        self.history.current()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Ask the host for a key and install it on the provider
    pub fn request_credentials(&mut self) -> CredentialRequest {
        if !self.credential_prompt.is_available() {
            tracing::warn!("credential prompt not available");
            return CredentialRequest::Unavailable;
        }
        match self.credential_prompt.select_key() {
            Some(key) => {
                self.provider.set_api_key(key);
                tracing::info!(provider = self.provider.name(), "API key updated");
                CredentialRequest::Selected
            }
            None => CredentialRequest::Dismissed,
        }
    }

    /// Write the images at the cursor as `generated_photo_<n>.<ext>` (n from 1)
    pub fn export_current(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for (n, generated) in self.current().images.iter().enumerate() {
            let path = dir.join(format!(
                "generated_photo_{}.{}",
                n + 1,
                generated.image.extension()
            ));
            std::fs::write(&path, generated.image.decode()?)?;
            written.push(path);
        }
        tracing::info!(count = written.len(), dir = %dir.display(), "exported images");
        Ok(written)
    }

    fn report_without_run(
        &self,
        notification: String,
        credential_request: Option<CredentialRequest>,
    ) -> GenerateReport {
        GenerateReport {
            outcome: None,
            produced: 0,
            skipped: Vec::new(),
            shown: self.history.current().clone(),
            notification: Some(notification),
            credential_request,
        }
    }
}

/// Follow `message` with whatever the credential prompt had to say
fn with_credential_message(message: String, request: CredentialRequest) -> String {
    match request.message() {
        Some(extra) => format!("{} {}", message, extra),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::SlotId;
    use crate::providers::mock::{MockOutcome, MockProvider};
    use crate::style::Theme;

    struct FixedPrompt(Option<String>);

    impl CredentialPrompt for FixedPrompt {
        fn is_available(&self) -> bool {
            true
        }

        fn select_key(&mut self) -> Option<String> {
            self.0.take()
        }
    }

    fn studio(provider: &MockProvider) -> Studio {
        Studio::new(Box::new(provider.clone()), GenerationConfig::default())
    }

    fn upload(studio: &mut Studio, slot: SlotId) {
        studio
            .assets_mut()
            .set_asset_bytes(slot, vec![1, 2, 3], "image/png")
            .unwrap();
    }

    #[test]
    fn test_generate_pushes_batch() {
        let provider = MockProvider::new();
        let mut studio = studio(&provider);
        upload(&mut studio, SlotId::ProductSpotlight);

        let report = studio.generate().unwrap();

        assert_eq!(report.produced, 6);
        assert_eq!(report.outcome, Some(RunOutcome::Complete));
        assert!(report.notification.is_none());
        assert_eq!(report.shown.len(), 6);
        assert_eq!(studio.history().cursor(), Some(0));
    }

    #[test]
    fn test_missing_key_prompts_without_running() {
        let provider = MockProvider::new().requiring_api_key();
        let mut studio = studio(&provider);
        upload(&mut studio, SlotId::ProductSpotlight);

        let report = studio.generate().unwrap();

        assert!(report.outcome.is_none());
        assert_eq!(report.credential_request, Some(CredentialRequest::Unavailable));
        assert_eq!(
            report.notification,
            Some(format!(
                "{} {}",
                CREDENTIAL_MISSING,
                crate::credential::CREDENTIAL_PROMPT_UNAVAILABLE
            ))
        );
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_selected_key_reaches_provider() {
        let provider = MockProvider::new().requiring_api_key();
        let mut studio = studio(&provider)
            .with_credential_prompt(Box::new(FixedPrompt(Some("k-1".to_string()))));
        upload(&mut studio, SlotId::ProductSpotlight);

        let report = studio.generate().unwrap();
        assert_eq!(report.credential_request, Some(CredentialRequest::Selected));
        assert_eq!(report.notification.as_deref(), Some(CREDENTIAL_MISSING));
        assert_eq!(provider.api_key().as_deref(), Some("k-1"));

        let report = studio.generate().unwrap();
        assert_eq!(report.produced, 6);
    }

    #[test]
    fn test_credential_failure_notifies_once() {
        let provider = MockProvider::new()
            .with_outcome(2, MockOutcome::Fail("[API_KEY_INVALID]".to_string()));
        let mut studio = studio(&provider).with_credential_prompt(Box::new(FixedPrompt(None)));
        upload(&mut studio, SlotId::ProductSpotlight);

        let report = studio.generate().unwrap();

        assert_eq!(report.produced, 2);
        assert_eq!(report.credential_request, Some(CredentialRequest::Dismissed));
        assert_eq!(
            report.notification.as_deref(),
            Some("Your API key is invalid. Please add a valid API key.")
        );
        assert_eq!(studio.current().len(), 2);
    }

    #[test]
    fn test_rejected_key_reported_when_prompt_unavailable() {
        let provider = MockProvider::new()
            .with_outcome(2, MockOutcome::Fail("API key not valid".to_string()));
        let mut studio = studio(&provider);
        upload(&mut studio, SlotId::ProductSpotlight);

        let report = studio.generate().unwrap();

        assert_eq!(report.credential_request, Some(CredentialRequest::Unavailable));
        assert_eq!(
            report.notification.as_deref(),
            Some(
                "Your API key is invalid. Please add a valid API key. \
                 API key selection is not available. Please configure the API_KEY environment variable."
            )
        );
    }

    #[test]
    fn test_empty_run_is_not_pushed() {
        let provider = MockProvider::new().with_outcome(0, MockOutcome::Fail("boom".to_string()));
        let mut studio = studio(&provider);
        upload(&mut studio, SlotId::ProductSpotlight);

        let report = studio.generate().unwrap();

        assert_eq!(report.notification.as_deref(), Some("Error: boom"));
        assert!(studio.history().is_empty());
        assert!(report.shown.is_empty());
    }

    #[test]
    fn test_switch_mode_resets_history_and_style() {
        let provider = MockProvider::new();
        let mut studio = studio(&provider);
        upload(&mut studio, SlotId::ProductSpotlight);
        studio.style_mut().set_theme(Some(Theme::Aura));
        studio.generate().unwrap();

        studio.switch_mode(Mode::Spotlight);

        assert!(studio.history().is_empty());
        assert!(studio.style().theme().is_none());
        assert!(studio.assets().contains(SlotId::ProductSpotlight));
    }

    #[test]
    fn test_prompts_preview_matches_requests() {
        let provider = MockProvider::new();
        let mut studio = studio(&provider);
        upload(&mut studio, SlotId::ProductSpotlight);
        studio.style_mut().set_lighting(Some("Golden Hour".to_string()));

        let preview = studio.prompts();
        studio.generate().unwrap();

        let sent: Vec<String> = provider.requests().into_iter().map(|r| r.text).collect();
        assert_eq!(preview, sent);
    }

    #[test]
    fn test_export_current() {
        let provider = MockProvider::new();
        let mut studio = studio(&provider);
        upload(&mut studio, SlotId::ProductSpotlight);
        studio.generate().unwrap();

        let dir = std::env::temp_dir().join(format!("lookbook_export_{}", uuid::Uuid::new_v4()));
        let written = studio.export_current(&dir).unwrap();

        assert_eq!(written.len(), 6);
        assert_eq!(written[0].file_name().unwrap(), "generated_photo_1.png");
        assert!(written[5].exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
