use std::sync::Arc;

use crate::audit::errors::AuditError;
use crate::audit::models::AuditAction;
use crate::audit::models::AuditEntry;
use crate::audit::ports::AuditRepository;

/// Append-only audit trail of security events.
///
/// Writes are fire-and-forget: a failed append is reported through
/// `tracing` and swallowed, so audit storage trouble can never fail a
/// login, logout, or admin mutation.
pub struct AuditLog<AR>
where
    AR: AuditRepository,
{
    repository: Arc<AR>,
}

impl<AR> Clone for AuditLog<AR>
where
    AR: AuditRepository,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<AR> AuditLog<AR>
where
    AR: AuditRepository,
{
    pub fn new(repository: Arc<AR>) -> Self {
        Self { repository }
    }

    /// Record one security event.
    ///
    /// The timestamp is assigned here; an absent actor becomes `"unknown"`.
    /// Infallible from the caller's point of view.
    pub async fn log(&self, username: Option<&str>, action: AuditAction, details: String) {
        let entry = AuditEntry::record(username, action, details);

        if let Err(e) = self.repository.append(entry).await {
            tracing::error!(
                action = action.as_str(),
                error = %e,
                "Failed to write audit entry"
            );
        }
    }

    /// The full trail, for admin review.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    pub async fn entries(&self) -> Result<Vec<AuditEntry>, AuditError> {
        self.repository.list_all().await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;

    use super::*;

    mock! {
        pub TestAuditRepository {}

        #[async_trait]
        impl AuditRepository for TestAuditRepository {
            async fn append(&self, entry: AuditEntry) -> Result<(), AuditError>;
            async fn list_all(&self) -> Result<Vec<AuditEntry>, AuditError>;
        }
    }

    #[tokio::test]
    async fn test_log_appends_entry_with_actor() {
        let mut repository = MockTestAuditRepository::new();

        repository
            .expect_append()
            .withf(|entry| {
                entry.username == "alice"
                    && entry.action == AuditAction::LoginSuccess
                    && entry.details == "User logged in successfully"
            })
            .times(1)
            .returning(|_| Ok(()));

        let audit = AuditLog::new(Arc::new(repository));
        audit
            .log(
                Some("alice"),
                AuditAction::LoginSuccess,
                "User logged in successfully".to_string(),
            )
            .await;
    }

    #[tokio::test]
    async fn test_log_defaults_to_unknown_actor() {
        let mut repository = MockTestAuditRepository::new();

        repository
            .expect_append()
            .withf(|entry| entry.username == "unknown" && entry.action == AuditAction::Logout)
            .times(1)
            .returning(|_| Ok(()));

        let audit = AuditLog::new(Arc::new(repository));
        audit
            .log(None, AuditAction::Logout, "User logged out".to_string())
            .await;
    }

    #[tokio::test]
    async fn test_log_swallows_repository_failure() {
        let mut repository = MockTestAuditRepository::new();

        repository
            .expect_append()
            .times(1)
            .returning(|_| Err(AuditError::DatabaseError("connection reset".to_string())));

        let audit = AuditLog::new(Arc::new(repository));

        // Must not panic or surface the error
        audit
            .log(Some("alice"), AuditAction::LoginFail, "Invalid credentials".to_string())
            .await;
    }
}
