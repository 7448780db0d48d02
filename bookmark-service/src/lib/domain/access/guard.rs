use std::sync::Arc;

use auth::Authenticator;

use crate::domain::access::errors::GuardError;
use crate::domain::access::errors::RejectionReason;
use crate::domain::user::models::User;
use crate::user::ports::UserRepository;

/// Resolves bearer tokens to active users.
///
/// Every failure to prove identity becomes `GuardError::Unauthorized` with a
/// reason for the logs. Storage failures are kept apart as
/// `GuardError::Internal` so they are not reported as bad credentials.
#[derive(Clone)]
pub struct AccessGuard {
    authenticator: Arc<Authenticator>,
    users: Arc<dyn UserRepository>,
}

impl AccessGuard {
    pub fn new(authenticator: Arc<Authenticator>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            authenticator,
            users,
        }
    }

    /// Validate `token` and load the user named by its subject.
    ///
    /// # Errors
    /// * `Unauthorized(InvalidToken)` - Signature, structure or expiry check failed
    /// * `Unauthorized(PrincipalNotFound)` - Subject names no existing user
    /// * `Unauthorized(PrincipalInactive)` - User exists but is deactivated
    /// * `Internal` - User lookup failed
    pub async fn authenticate(&self, token: &str) -> Result<User, GuardError> {
        let verified = self.authenticator.validate_token(token)?;

        let user = self
            .users
            .find_by_username(&verified.subject)
            .await
            .map_err(|e| GuardError::Internal(e.to_string()))?
            .ok_or(GuardError::Unauthorized(RejectionReason::PrincipalNotFound))?;

        if !user.is_active {
            return Err(GuardError::Unauthorized(RejectionReason::PrincipalInactive));
        }

        Ok(user)
    }
}
