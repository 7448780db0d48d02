use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

mod create_user;
mod delete_user;
mod get_user;
mod list_users;
mod update_user;

pub use create_user::create_user;
pub use create_user::CreateUserRequest;
pub use delete_user::delete_user;
pub use get_user::current_user;
pub use get_user::get_user;
pub use list_users::list_users;
pub use update_user::update_user;
pub use update_user::UpdateUserRequest;

/// Public view of a user. The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            is_active: user.is_active,
        }
    }
}

/// Only the account owner may modify or delete an account.
fn ensure_self(principal: &User, target: &UserId) -> Result<(), UserError> {
    if principal.id == *target {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %principal.id,
            target_user_id = %target,
            "Attempt to modify another user's account"
        );
        Err(UserError::Forbidden)
    }
}
