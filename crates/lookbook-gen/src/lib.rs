//! Lookbook Gen - product photo generation studio
//!
//! Holds the uploaded images for a session, expands per-mode prompt templates
//! through the style modifier chain, runs batches against a pluggable image
//! provider (Gemini or the offline mock) and keeps an undo/redo history of
//! the results.

pub mod asset;
pub mod config;
pub mod credential;
pub mod history;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod studio;
pub mod style;

pub use asset::{Asset, AssetStore, SlotId};
pub use config::LookbookConfig;
pub use credential::{CredentialPrompt, CredentialRequest, NoCredentialPrompt};
pub use history::{GeneratedImage, GenerationBatch, HistoryStore};
pub use pipeline::{
    FailureDetail, FailureKind, GenerationPipeline, GenerationRun, PipelineInputs, RunOutcome,
};
pub use provider::{ImageProvider, ImageRequest, ImageResponse, ProviderError, ProviderStatus};
pub use studio::{GenerateReport, Studio};
pub use style::{StyleSelection, Theme};
