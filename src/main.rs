use anyhow::Result;
use clap::Parser;
use media_gateway::api::create_router;
use media_gateway::gateway::Gateway;
use media_gateway::models::Config;
use media_gateway::state::AppState;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "media-gateway")]
#[command(about = "Text-to-speech and image description gateway backed by S3")]
struct CliArgs {
    /// Address to listen on.
    #[arg(long, env = "GATEWAY_BIND", default_value = "0.0.0.0:5000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "media_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    info!("Starting media-gateway");

    let state = match build_state().await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("Listening on http://{}", args.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn build_state() -> media_gateway::Result<AppState> {
    let config = Config::from_env()?;
    let max_upload_bytes = config.max_upload_bytes;
    let gateway = Gateway::new(&config).await?;
    Ok(AppState::new(gateway)?.with_max_upload_bytes(max_upload_bytes))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
