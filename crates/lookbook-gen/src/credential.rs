//! Credential selection hook
//!
//! The session asks a host-supplied prompt for a new API key when the
//! provider reports a missing or rejected credential.

/// Shown when the host has no way to ask for a key
pub const CREDENTIAL_PROMPT_UNAVAILABLE: &str =
    "API key selection is not available. Please configure the API_KEY environment variable.";

/// Shown when a run is attempted without any key configured
pub const CREDENTIAL_MISSING: &str = "API key is not configured. Please add your API key.";

/// A host-side way of obtaining an API key from the user
pub trait CredentialPrompt {
    /// Whether this host can ask for a key at all
    fn is_available(&self) -> bool;

    /// Ask for a key. `None` when the user dismissed the prompt.
    fn select_key(&mut self) -> Option<String>;
}

/// Prompt for hosts that cannot ask interactively
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCredentialPrompt;

impl CredentialPrompt for NoCredentialPrompt {
    fn is_available(&self) -> bool {
        false
    }

    fn select_key(&mut self) -> Option<String> {
        None
    }
}

/// What happened when the credential prompt was invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialRequest {
    /// A key was chosen and installed on the provider
    Selected,
    /// The user closed the prompt without choosing
    Dismissed,
    /// The host offers no prompt
    Unavailable,
}

impl CredentialRequest {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            CredentialRequest::Unavailable => Some(CREDENTIAL_PROMPT_UNAVAILABLE),
            _ => None,
        }
    }
}
