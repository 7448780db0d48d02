use auth::TokenError;
use thiserror::Error;

/// Why a bearer token did not resolve to a usable principal.
///
/// Only ever logged; clients see a single generic rejection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("token subject does not match any user")]
    PrincipalNotFound,

    #[error("user account is inactive")]
    PrincipalInactive,
}

#[derive(Debug, Clone, Error)]
pub enum GuardError {
    #[error("Could not validate credentials")]
    Unauthorized(RejectionReason),

    #[error("Principal lookup failed: {0}")]
    Internal(String),
}

impl From<TokenError> for GuardError {
    fn from(err: TokenError) -> Self {
        GuardError::Unauthorized(RejectionReason::InvalidToken(err))
    }
}
