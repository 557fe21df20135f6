use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::inbound::http::router::AppState;

/// Extension type carrying the acting admin's identity into handlers,
/// which pass it on to the service as an explicit actor parameter.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub username: String,
}

/// Middleware guarding the admin surface: a valid bearer token with the
/// ADMIN role, or the request never reaches a handler.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(&req)?;

    let claims = state.token_issuer.decode(token).map_err(|e| {
        tracing::warn!("Token validation failed: {}", e);
        error_response(StatusCode::UNAUTHORIZED, "Invalid or expired token")
    })?;

    if !claims.has_role("ADMIN") {
        return Err(error_response(StatusCode::FORBIDDEN, "Admin role required"));
    }

    req.extensions_mut().insert(AuthenticatedAdmin {
        username: claims.sub,
    });

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Result<&str, Response> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "Missing Authorization header"))?
        .to_str()
        .map_err(|_| error_response(StatusCode::UNAUTHORIZED, "Invalid Authorization header"))?;

    header.strip_prefix("Bearer ").ok_or_else(|| {
        error_response(
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header format. Expected: Bearer <token>",
        )
    })
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
