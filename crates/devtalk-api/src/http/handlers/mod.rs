//! HTTP request handlers for the REST API.

pub mod message;
pub mod session;
pub mod stats;
