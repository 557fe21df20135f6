use async_trait::async_trait;

use crate::audit::errors::AuditError;
use crate::audit::models::AuditEntry;

/// Append-only persistence for audit entries.
#[async_trait]
pub trait AuditRepository: Send + Sync + 'static {
    /// Append one entry. There is no update or delete; the trail is
    /// immutable by construction.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn append(&self, entry: AuditEntry) -> Result<(), AuditError>;

    /// All entries, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<AuditEntry>, AuditError>;
}
