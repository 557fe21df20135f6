use std::sync::Arc;

use async_trait::async_trait;

use crate::audit::errors::AuditError;
use crate::audit::models::AuditAction;
use crate::audit::models::AuditEntry;
use crate::audit::ports::AuditRepository;
use crate::audit::service::AuditLog;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserAdminPort;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Admin user-management service.
///
/// Each mutation requires an existing user, persists the change, and
/// writes exactly one audit entry attributing the acting admin. The
/// actor arrives as an explicit parameter from the boundary layer; a
/// missing identity degrades to `"unknown"` and never fails the call.
pub struct UserAdminService<UR, AR>
where
    UR: UserRepository,
    AR: AuditRepository,
{
    repository: Arc<UR>,
    audit: AuditLog<AR>,
}

impl<UR, AR> UserAdminService<UR, AR>
where
    UR: UserRepository,
    AR: AuditRepository,
{
    pub fn new(repository: Arc<UR>, audit: AuditLog<AR>) -> Self {
        Self { repository, audit }
    }

    async fn require_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<UR, AR> UserAdminPort for UserAdminService<UR, AR>
where
    UR: UserRepository,
    AR: AuditRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn toggle_enabled(&self, id: &UserId, actor: Option<&str>) -> Result<User, UserError> {
        let mut user = self.require_user(id).await?;
        user.enabled = !user.enabled;

        let updated = self.repository.update(user).await?;

        self.audit
            .log(
                actor,
                AuditAction::AdminToggleUser,
                format!(
                    "Admin toggled user '{}' to {}",
                    updated.username,
                    if updated.enabled { "ENABLED" } else { "DISABLED" }
                ),
            )
            .await;

        Ok(updated)
    }

    async fn unlock_user(&self, id: &UserId, actor: Option<&str>) -> Result<User, UserError> {
        let mut user = self.require_user(id).await?;
        user.unlock();

        let updated = self.repository.update(user).await?;

        self.audit
            .log(
                actor,
                AuditAction::AdminUnlockUser,
                format!("Admin unlocked user '{}'", updated.username),
            )
            .await;

        Ok(updated)
    }

    async fn delete_user(&self, id: &UserId, actor: Option<&str>) -> Result<(), UserError> {
        let user = self.require_user(id).await?;
        self.repository.delete(id).await?;

        self.audit
            .log(
                actor,
                AuditAction::AdminDeleteUser,
                format!("Admin deleted user '{}'", user.username),
            )
            .await;

        Ok(())
    }

    async fn audit_entries(&self) -> Result<Vec<AuditEntry>, AuditError> {
        self.audit.entries().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::Role;
    use crate::domain::user::models::Username;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    mock! {
        pub TestAuditRepository {}

        #[async_trait]
        impl AuditRepository for TestAuditRepository {
            async fn append(&self, entry: AuditEntry) -> Result<(), AuditError>;
            async fn list_all(&self) -> Result<Vec<AuditEntry>, AuditError>;
        }
    }

    fn test_user(name: &str) -> User {
        User::new(
            Username::new(name.to_string()).unwrap(),
            "$argon2id$test_hash".to_string(),
            Role::User,
        )
    }

    fn service(
        repository: MockTestUserRepository,
        audit: MockTestAuditRepository,
    ) -> UserAdminService<MockTestUserRepository, MockTestAuditRepository> {
        UserAdminService::new(Arc::new(repository), AuditLog::new(Arc::new(audit)))
    }

    #[tokio::test]
    async fn test_toggle_enabled_flips_and_audits_actor() {
        let mut repository = MockTestUserRepository::new();
        let mut audit = MockTestAuditRepository::new();

        let user = test_user("alice");
        let user_id = user.id;

        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_update()
            .withf(|user| !user.enabled)
            .times(1)
            .returning(Ok);
        audit
            .expect_append()
            .withf(|entry| {
                entry.username == "root"
                    && entry.action == AuditAction::AdminToggleUser
                    && entry.details == "Admin toggled user 'alice' to DISABLED"
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = service(repository, audit);

        let updated = service.toggle_enabled(&user_id, Some("root")).await.unwrap();
        assert!(!updated.enabled);
    }

    #[tokio::test]
    async fn test_toggle_enabled_unknown_actor() {
        let mut repository = MockTestUserRepository::new();
        let mut audit = MockTestAuditRepository::new();

        let user = test_user("alice");
        let user_id = user.id;

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository.expect_update().times(1).returning(Ok);
        audit
            .expect_append()
            .withf(|entry| entry.username == "unknown")
            .times(1)
            .returning(|_| Ok(()));

        let service = service(repository, audit);
        service.toggle_enabled(&user_id, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_unlock_clears_both_lock_fields() {
        let mut repository = MockTestUserRepository::new();
        let mut audit = MockTestAuditRepository::new();

        let mut user = test_user("alice");
        user.lock(Utc::now());
        let user_id = user.id;

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_update()
            .withf(|user| !user.is_locked() && user.locked_at.is_none())
            .times(1)
            .returning(Ok);
        audit
            .expect_append()
            .withf(|entry| {
                entry.action == AuditAction::AdminUnlockUser
                    && entry.details == "Admin unlocked user 'alice'"
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = service(repository, audit);

        let updated = service.unlock_user(&user_id, Some("root")).await.unwrap();
        assert!(!updated.is_locked());
        assert!(updated.locked_at.is_none());
    }

    #[tokio::test]
    async fn test_delete_user_audits_deletion() {
        let mut repository = MockTestUserRepository::new();
        let mut audit = MockTestAuditRepository::new();

        let user = test_user("alice");
        let user_id = user.id;

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_delete()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(()));
        audit
            .expect_append()
            .withf(|entry| {
                entry.action == AuditAction::AdminDeleteUser
                    && entry.details == "Admin deleted user 'alice'"
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = service(repository, audit);
        service.delete_user(&user_id, Some("root")).await.unwrap();
    }

    #[tokio::test]
    async fn test_operations_on_missing_user_fail_without_audit() {
        let mut repository = MockTestUserRepository::new();
        let mut audit = MockTestAuditRepository::new();

        repository
            .expect_find_by_id()
            .times(3)
            .returning(|_| Ok(None));
        repository.expect_update().times(0);
        repository.expect_delete().times(0);
        audit.expect_append().times(0);

        let service = service(repository, audit);
        let id = UserId::new();

        assert!(matches!(
            service.toggle_enabled(&id, Some("root")).await.unwrap_err(),
            UserError::NotFound(_)
        ));
        assert!(matches!(
            service.unlock_user(&id, Some("root")).await.unwrap_err(),
            UserError::NotFound(_)
        ));
        assert!(matches!(
            service.delete_user(&id, Some("root")).await.unwrap_err(),
            UserError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_list_users_passes_through() {
        let mut repository = MockTestUserRepository::new();
        let audit = MockTestAuditRepository::new();

        repository
            .expect_list_all()
            .times(1)
            .returning(|| Ok(vec![test_user("alice"), test_user("bob")]));

        let service = service(repository, audit);
        assert_eq!(service.list_users().await.unwrap().len(), 2);
    }
}
