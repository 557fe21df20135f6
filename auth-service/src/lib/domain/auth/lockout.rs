use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;
use std::sync::Mutex;

use chrono::Utc;

use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const SHARD_COUNT: usize = 16;

/// Per-username failed-login tracking and automatic lockout.
///
/// Counters live only in memory, sharded across `SHARD_COUNT` maps so
/// unrelated usernames never contend on a single lock; the lock state
/// itself is persisted on the user record. The increment and the
/// threshold check happen under one shard guard, so of two racing
/// attempts exactly one observes the threshold crossing and flips the
/// lock. The guard is a `std::sync::Mutex` and is never held across an
/// await.
pub struct LoginAttemptTracker<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    max_attempts: u32,
    shards: [Mutex<HashMap<String, u32>>; SHARD_COUNT],
}

impl<UR> LoginAttemptTracker<UR>
where
    UR: UserRepository,
{
    /// Create a tracker locking accounts at `max_attempts` failures.
    pub fn new(repository: Arc<UR>, max_attempts: u32) -> Self {
        Self {
            repository,
            max_attempts,
            shards: std::array::from_fn(|_| Mutex::new(HashMap::new())),
        }
    }

    fn shard(&self, username: &str) -> &Mutex<HashMap<String, u32>> {
        let mut hasher = DefaultHasher::new();
        username.hash(&mut hasher);
        &self.shards[hasher.finish() as usize % SHARD_COUNT]
    }

    /// True iff the user's persisted lock flag is set.
    ///
    /// Unknown usernames are simply not locked; this must never error for
    /// them, so the login path stays identical for existing and
    /// nonexistent accounts.
    ///
    /// # Errors
    /// * `DatabaseError` - lookup failed
    pub async fn is_account_locked(&self, username: &str) -> Result<bool, UserError> {
        Ok(self
            .repository
            .find_by_username(username)
            .await?
            .map(|user| user.is_locked())
            .unwrap_or(false))
    }

    /// Count one failed attempt; lock the account at the threshold.
    ///
    /// The counter keeps climbing past the threshold with no further side
    /// effects: only the exact crossing writes the lock. Locking a
    /// nonexistent (or just-deleted) user is a no-op.
    ///
    /// # Errors
    /// * `DatabaseError` - persisting the lock failed
    pub async fn record_failed_attempt(&self, username: &str) -> Result<(), UserError> {
        let crossed_threshold = {
            let mut counts = self.shard(username).lock().expect("attempt shard poisoned");
            let count = counts.entry(username.to_string()).or_insert(0);
            *count += 1;
            *count == self.max_attempts
        };

        if !crossed_threshold {
            return Ok(());
        }

        match self.repository.find_by_username(username).await? {
            Some(mut user) => {
                user.lock(Utc::now());
                self.repository.update(user).await?;
                tracing::warn!(
                    username,
                    max_attempts = self.max_attempts,
                    "Account locked after repeated failed logins"
                );
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Clear the failure counter. Called on every successful
    /// authentication; deliberately does NOT unlock the account, which is
    /// an explicit admin action.
    pub fn reset_attempts(&self, username: &str) {
        self.shard(username)
            .lock()
            .expect("attempt shard poisoned")
            .remove(username);
    }

    /// Current failure count for a username (0 if never seen).
    pub fn failure_count(&self, username: &str) -> u32 {
        self.shard(username)
            .lock()
            .expect("attempt shard poisoned")
            .get(username)
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::Role;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserId;
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

    fn test_user(name: &str) -> User {
        User::new(
            Username::new(name.to_string()).unwrap(),
            "$argon2id$test_hash".to_string(),
            Role::User,
        )
    }

    #[tokio::test]
    async fn test_unknown_username_is_not_locked() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let tracker = LoginAttemptTracker::new(Arc::new(repository), 5);
        assert!(!tracker.is_account_locked("nobody").await.unwrap());
    }

    #[tokio::test]
    async fn test_lock_flips_exactly_at_threshold() {
        let mut repository = MockTestUserRepository::new();

        // Only the fifth failure touches the store
        repository
            .expect_find_by_username()
            .withf(|name| name == "alice")
            .times(1)
            .returning(|_| Ok(Some(test_user("alice"))));
        repository
            .expect_update()
            .withf(|user| user.is_locked() && user.locked_at.is_some())
            .times(1)
            .returning(Ok);

        let tracker = LoginAttemptTracker::new(Arc::new(repository), 5);

        for _ in 0..5 {
            tracker.record_failed_attempt("alice").await.unwrap();
        }
        assert_eq!(tracker.failure_count("alice"), 5);
    }

    #[tokio::test]
    async fn test_counter_keeps_climbing_without_further_lock_writes() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(Some(test_user("alice"))));
        repository.expect_update().times(1).returning(Ok);

        let tracker = LoginAttemptTracker::new(Arc::new(repository), 3);

        for _ in 0..7 {
            tracker.record_failed_attempt("alice").await.unwrap();
        }
        assert_eq!(tracker.failure_count("alice"), 7);
    }

    #[tokio::test]
    async fn test_lock_for_nonexistent_user_is_noop() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_update().times(0);

        let tracker = LoginAttemptTracker::new(Arc::new(repository), 2);

        tracker.record_failed_attempt("ghost").await.unwrap();
        tracker.record_failed_attempt("ghost").await.unwrap();
        assert_eq!(tracker.failure_count("ghost"), 2);
    }

    #[tokio::test]
    async fn test_reset_clears_counter_only() {
        let repository = MockTestUserRepository::new();
        let tracker = LoginAttemptTracker::new(Arc::new(repository), 5);

        tracker.record_failed_attempt("alice").await.unwrap();
        tracker.record_failed_attempt("alice").await.unwrap();
        assert_eq!(tracker.failure_count("alice"), 2);

        tracker.reset_attempts("alice");
        assert_eq!(tracker.failure_count("alice"), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_failures_trigger_exactly_one_lock_write() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(Some(test_user("alice"))));
        repository.expect_update().times(1).returning(Ok);

        let tracker = Arc::new(LoginAttemptTracker::new(Arc::new(repository), 8));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let tracker = Arc::clone(&tracker);
            handles.push(tokio::spawn(async move {
                tracker.record_failed_attempt("alice").await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(tracker.failure_count("alice"), 16);
    }
}
