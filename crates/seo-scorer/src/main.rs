mod config;
mod error;
mod rate_limit;
mod server;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use rate_limit::RateLimiter;
use server::SeoScorerServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is reserved for MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting seo-scorer MCP server");

    let config = Config::from_env()?;
    let limiter = RateLimiter::from_env();
    info!(
        site_host = config.site_host.as_deref().unwrap_or("-"),
        rate_limit_rps = limiter.as_ref().map(RateLimiter::rps),
        "configuration loaded"
    );

    let server = SeoScorerServer::new(config.scoring_config(), limiter);
    match config.tcp_listen_addr.as_deref() {
        Some(addr) => serve_tcp(server, addr).await,
        None => serve_stdio(server).await,
    }
}

/// One scoring session per editor connection; all sessions share the limiter.
async fn serve_tcp(server: SeoScorerServer, addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(listen_addr = %addr, "seo-scorer listening on TCP");
    loop {
        let (stream, peer) = listener.accept().await?;
        let session = server.clone();
        tokio::spawn(async move {
            info!(peer = %peer, "editor connected");
            match session.serve(stream).await {
                Ok(service) => {
                    if let Err(e) = service.waiting().await {
                        error!(peer = %peer, error = %e, "session ended with error");
                    }
                }
                Err(e) => error!(peer = %peer, error = %e, "MCP handshake failed"),
            }
            info!(peer = %peer, "editor disconnected");
        });
    }
}

async fn serve_stdio(server: SeoScorerServer) -> anyhow::Result<()> {
    info!("seo-scorer serving on stdio");
    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| error!(error = %e, "MCP handshake failed"))?;
    service.waiting().await?;
    info!("seo-scorer shut down");
    Ok(())
}
