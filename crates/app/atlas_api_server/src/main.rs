//! Atlas API server binary.

use clap::Parser;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "atlas_api_server", about = "Atlas chat agent API server")]
struct Args {
    /// Port to listen on (0 = ephemeral). Overrides `BIND_ADDR` when set.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,atlas_api=debug,atlas_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let mut config = atlas_api::config::ApiConfig::from_env();
    if let Some(port) = args.port {
        config.bind_addr = format!("127.0.0.1:{port}");
    }

    if config.chat.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; chat requests will fail until it is configured");
    }

    let state = atlas_api::AppState {
        http: reqwest::Client::new(),
        config: config.clone(),
    };

    let app = atlas_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    info!(addr = %local_addr, model = %config.chat.model, "REST API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
