//! chatrelay server binary.
//!
//! Serves the chat page from the public directory and relays
//! `POST /api/chat` to the upstream completion provider.

use std::path::PathBuf;
use std::sync::Arc;

use chatrelay_api::AppState;
use chatrelay_api::config::ApiConfig;
use chatrelay_core::completion::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use chatrelay_core::completion::{CompletionConfig, OpenAiProvider};
use clap::Parser;
use tracing::info;

/// CLI arguments for the relay server.
#[derive(Parser, Debug)]
#[command(name = "chatrelay_server", about = "Chat widget completion relay")]
struct Args {
    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Directory with the chat page, script and stylesheet.
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    public_dir: PathBuf,

    /// Upstream provider credential.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: String,

    /// Upstream model name.
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Root of the OpenAI-compatible API.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,chatrelay_api=debug,chatrelay_core=debug,tower_http=info",
                )
            }),
        )
        .init();

    let args = Args::parse();

    let completion = CompletionConfig::new(args.openai_api_key, args.model, &args.base_url)?;
    info!(
        model = %completion.model,
        base_url = %completion.base_url,
        "configured completion provider"
    );

    let config = ApiConfig::for_port(args.port, args.public_dir);
    if !config.public_dir.is_dir() {
        tracing::warn!(
            public_dir = %config.public_dir.display(),
            "public directory not found; only /api/chat will be served"
        );
    }

    let state = AppState::new(Arc::new(OpenAiProvider::new(completion)), config.clone());
    let app = chatrelay_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!("Server listening at http://{local_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
