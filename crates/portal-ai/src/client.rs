//! HTTP client for OpenAI-compatible chat completion APIs.

use std::env;

use portal_model::{Evaluation, Question};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::AiSettings;
use crate::error::{AiError, Result};
use crate::prompts::{self, Prompt};
use crate::{AiService, check_answer_count, parse};

/// Retry delay assumed when a 429 response carries no `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Client for a hosted chat model.
pub struct HttpAiClient {
    client: Client,
    settings: AiSettings,
    api_key: String,
}

impl std::fmt::Debug for HttpAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAiClient")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl HttpAiClient {
    /// Build a client, reading the API key from the configured variable.
    pub fn new(settings: AiSettings) -> Result<Self> {
        if !settings.enabled {
            return Err(AiError::Disabled);
        }
        let api_key = env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AiError::MissingApiKey {
                var: settings.api_key_env.clone(),
            })?;
        Self::with_key(settings, api_key)
    }

    /// Build a client with an explicit key.
    pub fn with_key(settings: AiSettings, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            client,
            settings,
            api_key: api_key.into(),
        })
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    /// Send one prompt and return the reply text.
    fn complete(&self, prompt: &Prompt) -> Result<String> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        debug!(model = %self.settings.model, "sending chat completion request");
        trace!(system = %prompt.system, user = %prompt.user, "chat prompt");
        let response = self
            .client
            .post(self.settings.completions_url())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(
                USER_AGENT,
                format!("study-portal/{}", env!("CARGO_PKG_VERSION")),
            )
            .json(&request)
            .send()?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            warn!(retry_after, "chat completion rate limited");
            return Err(AiError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        reply_text(response.json()?)
    }
}

fn reply_text(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| AiError::InvalidResponse("reply had no content".to_string()))
}

impl AiService for HttpAiClient {
    fn ask_question(&self, text: &str) -> Result<String> {
        self.complete(&prompts::ask(text))
    }

    fn generate_questions(
        &self,
        subject: &str,
        semester: u8,
        topic: &str,
    ) -> Result<Vec<Question>> {
        let prompt =
            prompts::generate_questions(subject, semester, topic, self.settings.question_count);
        parse::parse_questions(&self.complete(&prompt)?)
    }

    fn evaluate(&self, questions: &[Question], answers: &[String]) -> Result<Evaluation> {
        check_answer_count(questions, answers)?;
        let reply = self.complete(&prompts::evaluate(questions, answers))?;
        parse::parse_evaluation(&reply, questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_text_takes_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "Entropy measures disorder."}}]}"#,
        )
        .unwrap();
        assert_eq!(reply_text(response).unwrap(), "Entropy measures disorder.");
    }

    #[test]
    fn test_empty_reply_is_invalid() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(matches!(
            reply_text(response),
            Err(AiError::InvalidResponse(_))
        ));
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(reply_text(response).is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let prompt = prompts::ask("What is a Carnot engine?");
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "What is a Carnot engine?");
    }

    #[test]
    fn test_mismatched_answers_fail_before_any_request() {
        // Port 9 is discard; nothing is listening, and nothing should be sent.
        let settings = AiSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            ..AiSettings::default()
        };
        let client = HttpAiClient::with_key(settings, "test-key").unwrap();
        let questions = vec![Question {
            number: 1,
            text: "Define work.".to_string(),
            marks: 2,
        }];
        assert!(matches!(
            client.evaluate(&questions, &[]),
            Err(AiError::AnswerCountMismatch {
                questions: 1,
                answers: 0
            })
        ));
    }

    #[test]
    fn test_disabled_settings_refuse_to_build() {
        let settings = AiSettings {
            enabled: false,
            ..AiSettings::default()
        };
        assert!(matches!(HttpAiClient::new(settings), Err(AiError::Disabled)));
    }
}
