use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parkwise_api::background::{activity_report, expiry_sweep, reminders};
use parkwise_api::bootstrap::{ensure_admin, AdminSeed};
use parkwise_api::config::ServerConfig;
use parkwise_api::router::build_app_router;
use parkwise_api::state::AppState;
use parkwise_events::{EmailConfig, EmailDelivery, LogNotifier, Notifier};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "parkwise_api=debug,parkwise_events=info,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(env_filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = parkwise_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    parkwise_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    parkwise_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Admin bootstrap ---
    if let Some(seed) = AdminSeed::from_env() {
        ensure_admin(&pool, &seed)
            .await
            .expect("Failed to provision admin account");
    }

    // --- Notifier ---
    let notifier: Arc<dyn Notifier> = match EmailConfig::from_env() {
        Some(email_config) => Arc::new(
            EmailDelivery::new(email_config).expect("Invalid SMTP configuration"),
        ),
        None => {
            tracing::warn!("SMTP_HOST not set, notifications will only be logged");
            Arc::new(LogNotifier)
        }
    };
    tracing::info!(channel = notifier.channel(), "Notifier ready");

    // --- Background jobs ---
    let jobs_cancel = CancellationToken::new();
    let job_handles = vec![
        (
            "expiry_sweep",
            tokio::spawn(expiry_sweep::run(
                pool.clone(),
                config.jobs.clone(),
                jobs_cancel.clone(),
            )),
        ),
        (
            "reminders",
            tokio::spawn(reminders::run(
                pool.clone(),
                Arc::clone(&notifier),
                config.jobs.clone(),
                jobs_cancel.clone(),
            )),
        ),
        (
            "activity_report",
            tokio::spawn(activity_report::run(
                pool.clone(),
                Arc::clone(&notifier),
                config.jobs.clone(),
                jobs_cancel.clone(),
            )),
        ),
    ];
    tracing::info!("Background jobs started (expiry sweep, reminders, monthly report)");

    // --- App state + router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        notifier,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, stopping background jobs");

    jobs_cancel.cancel();
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    for (job, handle) in job_handles {
        match tokio::time::timeout(shutdown_timeout, handle).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) if err.is_panic() => {
                tracing::error!(job, error = %err, "Background job panicked");
            }
            Ok(Err(err)) => {
                tracing::warn!(job, error = %err, "Background job was cancelled");
            }
            Err(_) => tracing::warn!(job, "Background job did not stop in time"),
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
