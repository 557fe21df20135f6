use async_trait::async_trait;

use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

/// Port for the authentication flows: register, login, logout.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create a new account with a hashed password and resolved role.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError>;

    /// Run the login state machine and return a signed token on success.
    ///
    /// # Errors
    /// * `AccountLocked` - Account is locked; credentials were not checked
    /// * `InvalidCredentials` - Unknown user, disabled user, or wrong
    ///   password (indistinguishable by design)
    /// * `Token` - Token issuance failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, username: &str, password: &str) -> Result<String, UserError>;

    /// Audit a logout, attributing it to the token's subject when the
    /// bearer token is present and valid, `"unknown"` otherwise. Always
    /// succeeds; returns the resolved actor.
    async fn logout(&self, bearer_token: Option<&str>) -> String;
}
