use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;

use crate::audit::models::AuditAction;
use crate::audit::ports::AuditRepository;
use crate::audit::service::AuditLog;
use crate::domain::auth::lockout::LoginAttemptTracker;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Authentication orchestrator.
///
/// Composes the credential store, the attempt tracker, the token issuer,
/// and the audit trail into the register/login/logout flows. Every login
/// attempt, successful or not, writes exactly one audit entry.
pub struct AuthService<UR, AR>
where
    UR: UserRepository,
    AR: AuditRepository,
{
    repository: Arc<UR>,
    attempts: LoginAttemptTracker<UR>,
    audit: AuditLog<AR>,
    token_issuer: Arc<TokenIssuer>,
    password_hasher: PasswordHasher,
}

impl<UR, AR> AuthService<UR, AR>
where
    UR: UserRepository,
    AR: AuditRepository,
{
    pub fn new(
        repository: Arc<UR>,
        audit: AuditLog<AR>,
        token_issuer: Arc<TokenIssuer>,
        max_attempts: u32,
    ) -> Self {
        Self {
            attempts: LoginAttemptTracker::new(Arc::clone(&repository), max_attempts),
            repository,
            audit,
            token_issuer,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Current failed-attempt count for a username (0 if never seen).
    pub fn failed_attempts(&self, username: &str) -> u32 {
        self.attempts.failure_count(username)
    }

    /// Shared failure path: count the attempt (possibly locking the
    /// account as a side effect), audit, and collapse every cause into
    /// `InvalidCredentials` so unknown-user and wrong-password are
    /// indistinguishable to the caller.
    async fn reject_credentials(&self, username: &str) -> Result<String, UserError> {
        self.attempts.record_failed_attempt(username).await?;
        self.audit
            .log(
                Some(username),
                AuditAction::LoginFail,
                "Invalid credentials".to_string(),
            )
            .await;
        Err(UserError::InvalidCredentials)
    }
}

#[async_trait]
impl<UR, AR> AuthServicePort for AuthService<UR, AR>
where
    UR: UserRepository,
    AR: AuditRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        // Checked before any mutation; the store's unique constraint
        // still backstops the race between check and insert.
        if self
            .repository
            .find_by_username(command.username.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;
        let role = command.role;
        let user = User::new(command.username, password_hash, role);

        let created = self.repository.create(user).await?;

        self.audit
            .log(
                Some(created.username.as_str()),
                AuditAction::Register,
                format!("User registered as {}", role.as_str()),
            )
            .await;

        Ok(created)
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, UserError> {
        if self.attempts.is_account_locked(username).await? {
            self.audit
                .log(
                    Some(username),
                    AuditAction::LoginFail,
                    "Account locked due to too many attempts".to_string(),
                )
                .await;
            return Err(UserError::AccountLocked);
        }

        // Unknown user, disabled user, and wrong password all leave
        // through reject_credentials so the caller sees one shape.
        let user = match self.repository.find_by_username(username).await? {
            Some(user) if user.enabled => user,
            _ => return self.reject_credentials(username).await,
        };

        if !self
            .password_hasher
            .verify(password, &user.password_hash)?
        {
            return self.reject_credentials(username).await;
        }

        self.attempts.reset_attempts(username);

        let token = self
            .token_issuer
            .generate(user.username.as_str(), &user.role_tags())?;

        self.audit
            .log(
                Some(username),
                AuditAction::LoginSuccess,
                "User logged in successfully".to_string(),
            )
            .await;

        Ok(token)
    }

    async fn logout(&self, bearer_token: Option<&str>) -> String {
        let actor = bearer_token
            .and_then(|token| self.token_issuer.extract_username(token).ok())
            .unwrap_or_else(|| "unknown".to_string());

        self.audit
            .log(
                Some(&actor),
                AuditAction::Logout,
                "User logged out".to_string(),
            )
            .await;

        actor
    }
}
