use thiserror::Error;

/// Error type for JWT operations.
///
/// Validation failures are kept distinct so callers can log the cause; they
/// should still be reported outward as a single "unauthorized" outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Signing secret is empty")]
    EmptySecret,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid: {0}")]
    SignatureInvalid(String),

    #[error("Token is expired")]
    Expired,
}
