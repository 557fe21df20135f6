use std::sync::Arc;
use std::time::Duration;

use auth::TokenIssuer;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::admin::delete_user::delete_user;
use super::handlers::admin::list_audit::list_audit;
use super::handlers::admin::list_users::list_users;
use super::handlers::admin::toggle_enabled::toggle_enabled;
use super::handlers::admin::unlock_user::unlock_user;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::register::register;
use super::middleware::require_admin;
use crate::domain::auth::service::AuthService;
use crate::domain::user::service::UserAdminService;
use crate::outbound::repositories::audit::PostgresAuditRepository;
use crate::outbound::repositories::user::PostgresUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService<PostgresUserRepository, PostgresAuditRepository>>,
    pub admin_service: Arc<UserAdminService<PostgresUserRepository, PostgresAuditRepository>>,
    pub token_issuer: Arc<TokenIssuer>,
}

pub fn create_router(
    auth_service: Arc<AuthService<PostgresUserRepository, PostgresAuditRepository>>,
    admin_service: Arc<UserAdminService<PostgresUserRepository, PostgresAuditRepository>>,
    token_issuer: Arc<TokenIssuer>,
) -> Router {
    let state = AppState {
        auth_service,
        admin_service,
        token_issuer,
    };

    let auth_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout));

    let admin_routes = Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/:id/toggle-enabled", put(toggle_enabled))
        .route("/api/admin/users/:id/unlock", put(unlock_user))
        .route("/api/admin/users/:id", delete(delete_user))
        .route("/api/admin/audit", get(list_audit))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(auth_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
