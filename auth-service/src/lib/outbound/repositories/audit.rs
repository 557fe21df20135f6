use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::audit::errors::AuditError;
use crate::audit::models::AuditAction;
use crate::audit::models::AuditEntry;
use crate::audit::ports::AuditRepository;

pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_entry(row: &PgRow) -> Result<AuditEntry, AuditError> {
        let action: String = row
            .try_get("action")
            .map_err(|e| AuditError::DatabaseError(e.to_string()))?;

        Ok(AuditEntry {
            id: row
                .try_get("id")
                .map_err(|e| AuditError::DatabaseError(e.to_string()))?,
            username: row
                .try_get("username")
                .map_err(|e| AuditError::DatabaseError(e.to_string()))?,
            action: action.parse::<AuditAction>()?,
            details: row
                .try_get("details")
                .map_err(|e| AuditError::DatabaseError(e.to_string()))?,
            timestamp: row
                .try_get("timestamp")
                .map_err(|e| AuditError::DatabaseError(e.to_string()))?,
        })
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append(&self, entry: AuditEntry) -> Result<(), AuditError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (id, username, action, details, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.username)
        .bind(entry.action.as_str())
        .bind(&entry.details)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| AuditError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<AuditEntry>, AuditError> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, action, details, timestamp
            FROM audit_log
            ORDER BY timestamp DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuditError::DatabaseError(e.to_string()))?;

        rows.iter().map(Self::row_to_entry).collect()
    }
}
