use std::error::Error;
use std::future::pending;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use server::bootstrap::router::create_router;
use server::bootstrap::state::AppState;
use server::config_loader;
use server::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let config = config_loader::load_config()?;
    observability::tracing::setup_logging(&config)?;

    info!(
        environment = %config.environment.env,
        database = %config.db.redacted_url(),
        "Starting profile moderation server"
    );

    let state = AppState::new(config.clone()).await?;
    info!(pool_size = state.db_pool().size(), "Database pool ready");

    let app = create_router(&state)
        .await?
        .into_make_service_with_connect_info::<SocketAddr>();

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!(%address, "Server listening");

    observability::startup_info::print_api_info(&config);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    state.db_pool().close().await;

    if let Err(e) = served {
        error!(error = %e, "Server stopped with an error");
        return Err(e.into());
    }

    info!("Server shutdown completed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Ctrl+C handler unavailable");
            pending::<()>().await;
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                pending::<()>().await;
            }
        }
    };

    let signal_name = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };
    info!(signal = signal_name, "Shutting down, draining in-flight requests");
}
