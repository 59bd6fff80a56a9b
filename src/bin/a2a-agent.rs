//! `a2a-agent` serves the compliance review agent over HTTP.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tower_a2a_server::{config::ServerConfig, server};

#[derive(Debug, Parser)]
#[command(name = "a2a-agent", version, about = "A2A compliance review agent")]
struct Args {
    /// TOML config file; defaults apply when omitted
    #[arg(short, long, env = "A2A_AGENT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind, overriding the config file
    #[arg(long, env = "A2A_AGENT_BIND")]
    bind: Option<String>,

    /// Port to listen on, overriding the config file
    #[arg(short, long, env = "A2A_AGENT_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let listener = tokio::net::TcpListener::bind(config.socket_addr()?)
        .await
        .context("binding listener")?;
    // port 0 picks an ephemeral port; advertise the real one
    config.port = listener.local_addr()?.port();

    tracing::info!(
        agent = %config.agent.name,
        auth = config.auth_credentials().is_some(),
        "starting A2A agent"
    );

    let app = server::router(config.app_state());
    server::serve(listener, app).await?;
    Ok(())
}
