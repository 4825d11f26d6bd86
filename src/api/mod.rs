//! HTTP layer translating requests into link service calls.
//!
//! # Modules
//!
//! - [`dto`] - Form and JSON payloads
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing

pub mod dto;
pub mod handlers;
pub mod middleware;
