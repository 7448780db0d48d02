use thiserror::Error;

/// Error type for token operations.
///
/// Verification failures are reported in the order they are detected:
/// structure, algorithm, signature, claims, expiry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token declares unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token has no subject")]
    MissingSubject,

    #[error("Token has no expiry")]
    MissingExpiry,

    #[error("Token is expired")]
    Expired,
}
