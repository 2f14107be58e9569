//! Explicitly constructed client configuration.
//!
//! Nothing here is global: the binary builds a [`ClientConfig`] from its
//! arguments and hands it to [`GeminiClient::new`](crate::client::GeminiClient::new);
//! tests skip it entirely and use a fake client.

use std::time::Duration;

use serde::Serialize;

/// Default hosted model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini REST endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Sampling parameters sent with every request.
///
/// Serialized directly as the `generationConfig` object of a
/// `generateContent` call.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            top_p: 1.0,
            top_k: 32,
            max_output_tokens: 4096,
        }
    }
}

/// Everything the HTTP client needs to reach the model.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,
    /// Endpoint root without trailing slash. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Transport timeout. Default: 120 s.
    pub timeout: Duration,
    pub generation: GenerationConfig,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            generation: GenerationConfig::default(),
        }
    }

    /// Read the API key from [`API_KEY_ENV`].
    pub fn from_env() -> Result<Self, String> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| format!("Set {API_KEY_ENV} env var to your Gemini API key"))?;
        Ok(Self::new(api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("generation", &self.generation)
            .finish()
    }
}
