//! Provider registry
//!
//! Maps provider names to concrete implementations.

pub mod gemini;
pub mod mock;

use crate::config::LookbookConfig;
use crate::provider::ImageProvider;
use lookbook_core::{LookbookError, Result};

/// Create a provider by name with configuration
pub fn create_provider(name: &str, config: &LookbookConfig) -> Result<Box<dyn ImageProvider>> {
    match name {
        "mock" => Ok(Box::new(mock::MockProvider::new())),
        "gemini" => Ok(Box::new(gemini::GeminiProvider::from_config(config))),
        _ => Err(LookbookError::ConfigError(format!(
            "Unknown provider '{}'. Available: {}",
            name,
            available_providers().join(", ")
        ))),
    }
}

/// List all available provider names
pub fn available_providers() -> Vec<&'static str> {
    vec!["gemini", "mock"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_known_providers() {
        let config = LookbookConfig::default();
        assert_eq!(create_provider("mock", &config).unwrap().name(), "mock");
        assert_eq!(create_provider("gemini", &config).unwrap().name(), "gemini");
    }

    #[test]
    fn test_unknown_provider() {
        let err = create_provider("dalle", &LookbookConfig::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("gemini, mock"));
    }
}
