//! chatgate server entry point.
//!
//! Loads `.env`, reads configuration from the environment (fatal if a
//! required key is missing), wires the application state, and serves the
//! router until Ctrl+C or SIGTERM.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chatgate_api::http::router::build_router;
use chatgate_api::state::AppState;
use chatgate_core::llm::provider::ChatProvider;
use chatgate_infra::config::RelayConfig;

#[derive(Debug, Parser)]
#[command(name = "chatgate", about = "Streaming chat relay with external tracing")]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,chatgate_api=debug,chatgate_core=debug,chatgate_infra=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let config = RelayConfig::from_env()?;
    let state = AppState::init(config);
    tracing::info!(
        provider = state.provider.name(),
        model = %state.config.model,
        "upstream configured"
    );

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "chatgate listening");

    let router = build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
