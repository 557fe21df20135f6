use std::sync::Arc;

use auth::TokenIssuer;
use auth_service::audit::service::AuditLog;
use auth_service::config::Config;
use auth_service::domain::auth::service::AuthService;
use auth_service::domain::user::service::UserAdminService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::PostgresAuditRepository;
use auth_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        jwt_expiration_hours = config.jwt.expiration_hours,
        lockout_max_attempts = config.lockout.max_attempts,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_issuer = Arc::new(TokenIssuer::new(
        config.jwt.secret.as_bytes(),
        config.jwt.expiration_hours,
    ));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let audit_repository = Arc::new(PostgresAuditRepository::new(pg_pool));
    let audit_log = AuditLog::new(audit_repository);

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        audit_log.clone(),
        Arc::clone(&token_issuer),
        config.lockout.max_attempts,
    ));
    let admin_service = Arc::new(UserAdminService::new(user_repository, audit_log));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(auth_service, admin_service, token_issuer);
    axum::serve(http_listener, application).await?;

    Ok(())
}
