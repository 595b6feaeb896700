//! Provider identities and endpoint resolution
//!
//! A small closed set of recognized providers maps to fixed chat-completion
//! URLs; the generic `Custom` identity accepts a caller-supplied base URL,
//! normalized to end with the chat-completion path segment.

use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, Result};

/// Path segment every OpenAI-compatible chat-completion endpoint ends with.
pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Model used when the caller does not override it.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// A recognized chat-completion provider identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    AzureOpenAi,
    DeepSeek,
    OpenAi,
    Custom,
}

impl ProviderKind {
    /// Match a stored provider name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "gemini" => Some(Self::Gemini),
            "azure openai" => Some(Self::AzureOpenAi),
            "deepseek" => Some(Self::DeepSeek),
            "openai" => Some(Self::OpenAi),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    /// Display name, identical to the persisted record key.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::AzureOpenAi => "Azure OpenAI",
            Self::DeepSeek => "DeepSeek",
            Self::OpenAi => "OpenAI",
            Self::Custom => "Custom",
        }
    }

    /// Resolve the chat-completion URL for this identity.
    ///
    /// Built-in OpenAI-compatible providers route to fixed endpoints and
    /// ignore `configured_url`. `Custom` normalizes the caller-supplied base
    /// URL to end with [`CHAT_COMPLETIONS_PATH`]. Identities without a
    /// chat-completion route are a configuration error, raised before any
    /// network call.
    pub fn chat_completions_url(&self, configured_url: &str) -> Result<String> {
        match self {
            Self::OpenAi => Ok(format!("https://api.openai.com{CHAT_COMPLETIONS_PATH}")),
            Self::DeepSeek => Ok(format!("https://api.deepseek.com{CHAT_COMPLETIONS_PATH}")),
            Self::Custom => {
                let base = configured_url.trim();
                if base.is_empty() {
                    return Err(PlanningError::Configuration(
                        "Custom provider has no base URL configured".to_string(),
                    ));
                }
                if base.ends_with(CHAT_COMPLETIONS_PATH) {
                    Ok(base.to_string())
                } else {
                    Ok(format!("{}{}", base.trim_end_matches('/'), CHAT_COMPLETIONS_PATH))
                }
            }
            Self::Gemini | Self::AzureOpenAi => Err(PlanningError::Configuration(format!(
                "Unsupported AI provider for planning: {}",
                self.name()
            ))),
        }
    }
}

//
// ================= Persisted Record =================
//

/// Persisted per-provider record: display name, base URL, API key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    pub name: String,
    pub api_url: String,
    pub api_key: String,
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

/// The provider records shipped by default, keys left blank for the user to
/// fill in. The Azure endpoint is a placeholder the user must replace.
pub fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new(ProviderKind::Gemini.name(), "https://generativelanguage.googleapis.com/", ""),
        ProviderConfig::new(ProviderKind::AzureOpenAi.name(), "YOUR_AZURE_OPENAI_ENDPOINT", ""),
        ProviderConfig::new(ProviderKind::DeepSeek.name(), "https://api.deepseek.com/", ""),
        ProviderConfig::new(ProviderKind::OpenAi.name(), "https://api.openai.com/", ""),
        ProviderConfig::new(ProviderKind::Custom.name(), "", ""),
    ]
}
