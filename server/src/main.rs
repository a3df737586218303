use std::error::Error;
use std::future;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use postflow_application::infrastructure_config::Config;
use server::bootstrap::{router::create_router, state::AppState};
use server::config_loader;
use server::observability::{startup_info, tracing::setup_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let config = config_loader::load_config()?;
    setup_logging(&config)?;

    info!(
        environment = %config.environment.env,
        database = %config.db.redacted_url(),
        "Starting Postflow Backend Server"
    );

    if let Err(e) = serve(config).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    info!("Server shutdown completed");
    Ok(())
}

async fn serve(config: Config) -> Result<(), Box<dyn Error>> {
    let address = config.server_address();
    let state = AppState::new(config.clone()).await?;
    let app = create_router(state).await?;

    let listener = TcpListener::bind(&address).await?;
    info!("Listening on http://{}", address);
    startup_info::print_api_info(&config);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Ctrl+C handler unavailable: {}", e);
            future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                future::pending::<()>().await;
            }
        }
    };

    let source = tokio::select! {
        () = interrupt => "Ctrl+C",
        () = terminate => "SIGTERM",
    };
    info!(signal = source, "Draining in-flight requests before shutdown");
}
