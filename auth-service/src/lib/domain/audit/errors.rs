use thiserror::Error;

/// Error for unknown action tags read back from storage
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuditActionError {
    #[error("Unknown audit action: {0}")]
    Unknown(String),
}

/// Error for audit trail operations
#[derive(Debug, Clone, Error)]
pub enum AuditError {
    #[error("Invalid audit action: {0}")]
    InvalidAction(#[from] AuditActionError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
