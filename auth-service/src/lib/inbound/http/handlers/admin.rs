use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::audit::models::AuditEntry;
use crate::domain::user::models::User;

pub mod delete_user;
pub mod list_audit;
pub mod list_users;
pub mod toggle_enabled;
pub mod unlock_user;

/// Admin-facing user view. Deliberately omits the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub roles: Vec<String>,
    pub enabled: bool,
    pub account_non_locked: bool,
    pub locked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            roles: user.role_tags(),
            enabled: user.enabled,
            account_non_locked: user.account_non_locked,
            locked_at: user.locked_at,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntryData {
    pub id: Uuid,
    pub username: String,
    pub action: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&AuditEntry> for AuditEntryData {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            id: entry.id,
            username: entry.username.clone(),
            action: entry.action.as_str().to_string(),
            details: entry.details.clone(),
            timestamp: entry.timestamp,
        }
    }
}
