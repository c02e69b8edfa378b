//! AnthropicResponder -- concrete [`Responder`] implementation for Anthropic Claude.
//!
//! Sends the session history to the Anthropic Messages API (`/v1/messages`)
//! with proper authentication headers and returns the reply text.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::Instrument;

use devtalk_core::exchange::responder::Responder;
use devtalk_observe::genai_attrs::{OP_CHAT, PROVIDER_ANTHROPIC};
use devtalk_types::config::ResponderConfig;
use devtalk_types::message::{Message, MessageRole, MessageStatus};
use devtalk_types::responder::ResponderError;

use super::types::{AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse};

/// Anthropic Claude responder.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers. It never appears in Debug output,
/// Display output, or tracing logs.
pub struct AnthropicResponder {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicResponder {
    /// The Anthropic API version header value.
    const API_VERSION: &'static str = "2023-06-01";

    /// Create a new Anthropic responder from config.
    pub fn new(api_key: SecretString, config: &ResponderConfig) -> Self {
        let client = reqwest::Client::builder()
            // The coordinator applies the effective per-exchange timeout;
            // this is a transport-level backstop slightly beyond it.
            .timeout(Duration::from_secs(config.timeout_secs + 5))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// The model this responder sends requests for.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a session history into wire messages.
    ///
    /// Failure placeholders are skipped: a failed turn carries no assistant
    /// content worth replaying, and the provider rejects empty messages.
    fn to_wire_messages(history: &[Message]) -> Vec<AnthropicMessage> {
        history
            .iter()
            .filter(|m| m.status != MessageStatus::Failed)
            .map(|m| AnthropicMessage {
                role: match m.role {
                    MessageRole::User => "user".to_string(),
                    MessageRole::Ai => "assistant".to_string(),
                },
                content: m.content.clone(),
            })
            .collect()
    }
}

// AnthropicResponder intentionally does NOT derive Debug. The SecretString
// field ensures the API key is never printed, but we also omit Debug
// entirely so the struct cannot leak internal state.

impl Responder for AnthropicResponder {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn respond(&self, history: &[Message]) -> Result<String, ResponderError> {
        let body = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: Self::to_wire_messages(history),
        };
        let url = self.url("/v1/messages");

        let span = tracing::info_span!(
            "chat",
            gen_ai.operation.name = OP_CHAT,
            gen_ai.provider.name = PROVIDER_ANTHROPIC,
            gen_ai.request.model = %self.model,
        );

        async {
            let response = self
                .client
                .post(&url)
                .header("x-api-key", self.api_key.expose_secret())
                .header("anthropic-version", Self::API_VERSION)
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
                .map_err(|e| ResponderError::Provider {
                    message: format!("HTTP request failed: {e}"),
                })?;

            let status = response.status();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                return Err(match status.as_u16() {
                    401 => ResponderError::AuthenticationFailed,
                    429 => ResponderError::RateLimited {
                        retry_after_ms: None,
                    },
                    529 => ResponderError::Overloaded(error_body),
                    _ => ResponderError::Provider {
                        message: format!("HTTP {status}: {error_body}"),
                    },
                });
            }

            let reply: AnthropicResponse = response.json().await.map_err(|e| {
                ResponderError::Deserialization(format!("failed to parse response: {e}"))
            })?;

            let content = reply
                .content
                .iter()
                .filter_map(|block| match block {
                    AnthropicContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("");

            Ok(content)
        }
        .instrument(span)
        .await
    }
}
