//! Assistant settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// User settings for the study assistant.
///
/// The API key itself is never stored here, only the name of the
/// environment variable that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub enabled: bool,

    /// Base URL of an OpenAI-compatible API, without the endpoint path.
    pub base_url: String,

    pub model: String,

    /// Environment variable holding the bearer key.
    pub api_key_env: String,

    pub timeout_secs: u64,

    /// How many questions to ask for per assessment.
    pub question_count: u32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "PORTAL_AI_API_KEY".to_string(),
            timeout_secs: 30,
            question_count: 5,
        }
    }
}

impl AiSettings {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the chat completions endpoint.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
