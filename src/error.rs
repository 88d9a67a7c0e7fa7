//! Error taxonomy for merchant API operations.

/// Failures surfaced by merchant API operations.
///
/// Only [`UcpError::Network`] is retryable; the other variants describe
/// requests the server understood and rejected, or responses that do not
/// match the protocol, and repeating them cannot succeed.
#[derive(Debug)]
pub enum UcpError {
    /// Transport failure, timeout, or transient server-side failure (5xx)
    Network(String),
    /// Response received but does not match the expected shape
    Protocol(String),
    /// Request rejected due to malformed input
    Validation(String),
    /// Checkout rejected for payment reasons
    Payment(String),
}

impl UcpError {
    /// Whether a retry of the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, UcpError::Network(_))
    }
}

impl std::fmt::Display for UcpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UcpError::Network(msg) => {
                write!(f, "Network error: {}", msg)
            }
            UcpError::Protocol(msg) => {
                write!(
                    f,
                    "Protocol error: {}. The merchant may speak an incompatible UCP version.",
                    msg
                )
            }
            UcpError::Validation(msg) => {
                write!(f, "Request rejected: {}", msg)
            }
            UcpError::Payment(msg) => {
                write!(f, "Payment rejected: {}", msg)
            }
        }
    }
}

impl std::error::Error for UcpError {}
