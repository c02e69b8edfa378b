//! The session + message exchange protocol.
//!
//! `SessionStore` and `Responder` are the ports implemented by
//! `devtalk-infra`; `ExchangeCoordinator` is the state machine that drives
//! one conversation turn at a time.

pub mod coordinator;
pub mod responder;
pub mod store;

pub use coordinator::{ExchangeCoordinator, FALLBACK_CONTENT};
