//! CampusFlow server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware, routing::get};
use campusflow_api::{AppState, home, middleware::auth_middleware, router as api_router};
use campusflow_common::Config;
use campusflow_core::{
    AdminCodeService, DirectoryService, DisruptionService, IdentityVerifier, JwtIdentityVerifier,
    MockToneAnnotator, ToneAnnotator,
};
use campusflow_db::repositories::{
    AdminCodeRepository, AuditLogRepository, DepartmentRepository, DisruptionRepository,
    NotificationRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campusflow=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting campusflow server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = campusflow_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    campusflow_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let disruption_repo = DisruptionRepository::new(Arc::clone(&db));
    let department_repo = DepartmentRepository::new(Arc::clone(&db));
    let audit_repo = AuditLogRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let admin_code_repo = AdminCodeRepository::new(Arc::clone(&db));

    // Initialize collaborators
    let identity_verifier: Arc<dyn IdentityVerifier> =
        Arc::new(JwtIdentityVerifier::new(&config.auth.jwt_secret));
    let annotator: Arc<dyn ToneAnnotator> = Arc::new(MockToneAnnotator::new());

    // Initialize services
    let directory_service = DirectoryService::new(user_repo.clone());
    let disruption_service = DisruptionService::new(
        disruption_repo,
        department_repo,
        audit_repo,
        notification_repo,
        directory_service.clone(),
        Arc::clone(&annotator),
        Duration::from_millis(config.tone.timeout_ms),
    );
    let admin_code_service = AdminCodeService::new(admin_code_repo, user_repo);

    // Create app state
    let state = AppState {
        disruption_service,
        directory_service,
        admin_code_service,
        annotator,
        identity_verifier,
    };

    // Build router
    let app = Router::new()
        .route("/", get(home))
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
