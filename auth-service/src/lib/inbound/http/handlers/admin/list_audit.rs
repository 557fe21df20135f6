use axum::extract::State;
use axum::http::StatusCode;

use super::AuditEntryData;
use crate::domain::user::ports::UserAdminPort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn list_audit(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<AuditEntryData>>, ApiError> {
    state
        .admin_service
        .audit_entries()
        .await
        .map_err(ApiError::from)
        .map(|entries| {
            ApiSuccess::new(
                StatusCode::OK,
                entries.iter().map(AuditEntryData::from).collect(),
            )
        })
}
