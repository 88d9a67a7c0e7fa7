//! HTTP transport with retry and error classification.

pub mod client;
pub mod retry;

pub use client::{HttpClient, IDEMPOTENCY_KEY_HEADER};
