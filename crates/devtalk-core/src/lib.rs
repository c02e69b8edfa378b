//! Business logic and port trait definitions for DevTalk.
//!
//! This crate defines the "ports" (`SessionStore`, `Responder`) that the
//! infrastructure layer implements, plus the `ExchangeCoordinator` state
//! machine that drives a conversation. It depends only on `devtalk-types` --
//! never on `devtalk-infra` or any database/IO crate.

pub mod clock;
pub mod exchange;
