use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sidestage_api::{app, config};

#[derive(Parser)]
#[command(name = "sidestage-api", version, about = "Sidestage music marketplace API")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "SIDESTAGE_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind
    #[arg(long, env = "SIDESTAGE_BIND", default_value = "0.0.0.0")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Local runs pick up DATABASE_URL and the signing secrets from .env
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::config();
    tracing::info!("starting sidestage-api ({:?} profile)", config.environment);

    let bind_addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app())
        .await
        .context("server error")?;

    Ok(())
}
