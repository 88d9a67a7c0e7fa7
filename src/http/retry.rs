//! Retry policy and error classification for merchant API requests.

use reqwest::StatusCode;
use std::time::Duration;

use crate::error::UcpError;

/// Maximum number of physical attempts per logical operation.
pub const MAX_ATTEMPTS: usize = 3;

/// Base delay before the first retry; doubles per attempt.
pub const BASE_DELAY_MS: u64 = 250;

/// Upper bound on the backoff delay.
const MAX_DELAY_MS: u64 = 2000;

/// Backoff delay after the given attempt (1-based), doubling per attempt
/// and capped at [`MAX_DELAY_MS`].
pub fn backoff_delay(attempt: usize, base: Duration) -> Duration {
    let exp = attempt.saturating_sub(1).min(16) as u32;
    let delay = base.saturating_mul(1 << exp);
    delay.min(Duration::from_millis(MAX_DELAY_MS))
}

/// Classifies a transport-level failure from reqwest.
///
/// Timeouts and connection failures are transient and map to
/// [`UcpError::Network`]; request construction failures cannot succeed on
/// retry and map to [`UcpError::Validation`].
pub fn classify_transport(error: reqwest::Error) -> UcpError {
    if error.is_builder() {
        return UcpError::Validation(format!("invalid request: {}", error));
    }
    if error.is_timeout() {
        return UcpError::Network(format!("request timed out: {}", error));
    }
    UcpError::Network(format!("request failed: {}", error))
}

/// Classifies a non-success HTTP response.
///
/// 5xx responses are transient server failures. 4xx responses mean the
/// request was understood and rejected; payment rejections are told apart
/// from other rejections by status code 402 or the server's error text.
pub fn classify_status(status: StatusCode, body: &str) -> UcpError {
    if status.is_server_error() {
        return UcpError::Network(format!("server error: HTTP {}", status.as_u16()));
    }

    if status.is_client_error() {
        let detail =
            rejection_detail(body).unwrap_or_else(|| format!("HTTP {} error", status.as_u16()));

        if status == StatusCode::PAYMENT_REQUIRED || is_payment_rejection(&detail) {
            return UcpError::Payment(detail);
        }
        return UcpError::Validation(detail);
    }

    UcpError::Protocol(format!("unexpected HTTP {} response", status.as_u16()))
}

/// Extracts the `error` field from a UCP rejection body, if present.
fn rejection_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(|s| s.to_string())
}

fn is_payment_rejection(detail: &str) -> bool {
    let detail = detail.to_lowercase();
    detail.contains("payment")
        || detail.contains("declined")
        || detail.contains("insufficient")
        || detail.contains("card")
}
