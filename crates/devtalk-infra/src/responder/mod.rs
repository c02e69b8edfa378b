//! Responder implementations.

pub mod anthropic;
mod types;

pub use anthropic::AnthropicResponder;
