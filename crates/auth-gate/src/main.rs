//! Auth Gate
//!
//! Token verification sidecar. Run with `--health-check` to probe a running
//! instance instead of serving.

use auth_gate::config::Config;
use auth_gate::health_check::{self, HEALTH_CHECK_FLAG};
use auth_gate::observability::{init_tracing, LogFormat};
use auth_gate::routes::{self, AppState};
use common::secret::{EnvSource, ProcessEnv, SecretResolver};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env: Arc<dyn EnvSource> = Arc::new(ProcessEnv);

    init_tracing(LogFormat::from_env(env.as_ref()));

    if std::env::args().nth(1).as_deref() == Some(HEALTH_CHECK_FLAG) {
        let target = health_check::resolve_target(env.as_ref());
        return match health_check::run(&target).await {
            Ok(()) => {
                println!("Health check passed");
                Ok(())
            }
            Err(e) => {
                eprintln!("Health check failed: {e}");
                std::process::exit(1);
            }
        };
    }

    info!("Starting Auth Gate");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        secret_env = %config.secret_env,
        issuer_env = %config.issuer_env,
        drain_seconds = config.drain_seconds,
        "Configuration loaded successfully"
    );

    // A missing or weak secret is fatal here; per-request checks only fail closed.
    SecretResolver::new(Arc::clone(&env))
        .validate_startup(&config.secret_env)
        .await
        .map_err(|e| {
            error!(target: "auth_gate.secret", "{}", e);
            e
        })?;

    info!(target: "auth_gate.secret", "Signing secret validated");

    if config.skip_server_start {
        info!("SKIP_SERVER_START=1, exiting after validation");
        return Ok(());
    }

    let bind_address = config.bind_address;
    let drain_seconds = config.drain_seconds;

    let state = Arc::new(AppState::new(config, env));
    let app = routes::build_routes(state);

    info!("Auth Gate listening on {}", bind_address);

    let listener = tokio::net::TcpListener::bind(bind_address).await.map_err(|e| {
        error!("Failed to bind {}: {}", bind_address, e);
        e
    })?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(drain_seconds))
    .await?;

    info!("Auth Gate shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
/// Returns when a shutdown signal is received and the drain period is over.
async fn shutdown_signal(drain_seconds: u64) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    if drain_seconds > 0 {
        warn!("Draining connections for {} seconds...", drain_seconds);
        tokio::time::sleep(Duration::from_secs(drain_seconds)).await;
        info!("Drain period complete");
    }
}
