//! Responder trait definition.
//!
//! The responder is the abstraction over assistant content generation.
//! Uses RPITIT; the coordinator is generic over it, so implementations do
//! not need to be object-safe.

use devtalk_types::message::Message;
use devtalk_types::responder::ResponderError;

/// Trait for assistant-reply backends.
///
/// Given the full ordered message history of a session -- ending with the
/// user message being answered -- produce the assistant's reply content.
/// Invocations may take arbitrary time; the coordinator bounds them with a
/// timeout and treats a timeout identically to a failure.
///
/// Implementations live in devtalk-infra (e.g., `AnthropicResponder`).
pub trait Responder: Send + Sync {
    /// Human-readable backend name (e.g., "anthropic"). Used in logs.
    fn name(&self) -> &str;

    /// Generate reply content for the given history.
    fn respond(
        &self,
        history: &[Message],
    ) -> impl std::future::Future<Output = Result<String, ResponderError>> + Send;
}
