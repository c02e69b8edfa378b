//! Shared domain types for DevTalk.
//!
//! This crate contains the core domain types used across the DevTalk backend:
//! Session, Message, their status enums, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod message;
pub mod responder;
pub mod session;
