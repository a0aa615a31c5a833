use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use vgen_core::VConfig;
use vgen_server::{build_orchestrator, create_router};
use vgen_telemetry::{TelemetryOptions, init_telemetry};

/// Prompt/image to video generation server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to a config.toml (defaults to searching the current directory and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => VConfig::load_from(path)?,
        None => VConfig::load()?,
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_telemetry(&TelemetryOptions::new(
        config.observability.service_name.as_deref(),
        config.observability.json_logs,
    ));

    let orchestrator = Arc::new(build_orchestrator(&config).context("Failed to configure providers")?);
    let app = create_router(orchestrator, config.server.max_body_bytes);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("vgen server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
