use async_trait::async_trait;

use crate::audit::errors::AuditError;
use crate::audit::models::AuditEntry;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Persistence operations for user records.
///
/// Lookups take raw `&str` usernames: login must treat arbitrary input as
/// a potential username without validating its shape first, otherwise the
/// rejection path would differ between malformed and unknown names.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier, `None` if not found.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username, `None` if not found.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;

    /// Retrieve all users from storage.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Update existing user in storage. The username is immutable and is
    /// never written back.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage (hard delete, no tombstone).
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}

/// Port for the admin user-management surface.
///
/// `actor` is the acting admin's username as resolved by the boundary
/// layer; `None` degrades to the `"unknown"` audit actor and never fails
/// the operation.
#[async_trait]
pub trait UserAdminPort: Send + Sync + 'static {
    /// All user records, for the admin listing.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Flip the enabled flag and audit the change.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn toggle_enabled(&self, id: &UserId, actor: Option<&str>) -> Result<User, UserError>;

    /// Clear the lock flag and `locked_at`, and audit the change.
    ///
    /// Does not reset the in-memory failure counter; only a successful
    /// authentication does that.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn unlock_user(&self, id: &UserId, actor: Option<&str>) -> Result<User, UserError>;

    /// Remove the user record entirely and audit the deletion.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, id: &UserId, actor: Option<&str>) -> Result<(), UserError>;

    /// The full audit trail, for admin review.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn audit_entries(&self) -> Result<Vec<AuditEntry>, AuditError>;
}
