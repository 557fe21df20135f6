use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::audit::errors::AuditActionError;

/// Immutable record of one security-relevant event.
///
/// Entries are created once, never mutated, never deleted. The timestamp
/// is assigned by the audit component at creation time, not by callers.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: Uuid,
    pub username: String,
    pub action: AuditAction,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Build an entry for `action`, stamping it now.
    ///
    /// An absent actor becomes the literal `"unknown"` here, the single
    /// place that fallback is encoded.
    pub fn record(username: Option<&str>, action: AuditAction, details: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.unwrap_or("unknown").to_string(),
            action,
            details,
            timestamp: Utc::now(),
        }
    }
}

/// Closed set of auditable event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Register,
    LoginSuccess,
    LoginFail,
    Logout,
    AdminToggleUser,
    AdminUnlockUser,
    AdminDeleteUser,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Register => "REGISTER",
            AuditAction::LoginSuccess => "LOGIN_SUCCESS",
            AuditAction::LoginFail => "LOGIN_FAIL",
            AuditAction::Logout => "LOGOUT",
            AuditAction::AdminToggleUser => "ADMIN_TOGGLE_USER",
            AuditAction::AdminUnlockUser => "ADMIN_UNLOCK_USER",
            AuditAction::AdminDeleteUser => "ADMIN_DELETE_USER",
        }
    }
}

impl FromStr for AuditAction {
    type Err = AuditActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGISTER" => Ok(AuditAction::Register),
            "LOGIN_SUCCESS" => Ok(AuditAction::LoginSuccess),
            "LOGIN_FAIL" => Ok(AuditAction::LoginFail),
            "LOGOUT" => Ok(AuditAction::Logout),
            "ADMIN_TOGGLE_USER" => Ok(AuditAction::AdminToggleUser),
            "ADMIN_UNLOCK_USER" => Ok(AuditAction::AdminUnlockUser),
            "ADMIN_DELETE_USER" => Ok(AuditAction::AdminDeleteUser),
            other => Err(AuditActionError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fills_in_unknown_actor() {
        let entry = AuditEntry::record(None, AuditAction::Logout, "User logged out".to_string());
        assert_eq!(entry.username, "unknown");
    }

    #[test]
    fn test_record_assigns_timestamp() {
        let before = Utc::now();
        let entry = AuditEntry::record(Some("alice"), AuditAction::Register, String::new());
        let after = Utc::now();

        assert!(entry.timestamp >= before && entry.timestamp <= after);
        assert_eq!(entry.username, "alice");
    }

    #[test]
    fn test_action_tags_round_trip() {
        for action in [
            AuditAction::Register,
            AuditAction::LoginSuccess,
            AuditAction::LoginFail,
            AuditAction::Logout,
            AuditAction::AdminToggleUser,
            AuditAction::AdminUnlockUser,
            AuditAction::AdminDeleteUser,
        ] {
            assert_eq!(action.as_str().parse::<AuditAction>().unwrap(), action);
        }
        assert!("SOMETHING_ELSE".parse::<AuditAction>().is_err());
    }
}
