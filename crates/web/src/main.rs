use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::info;

use vitrine_web::server::WebServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let web_addr: SocketAddr = std::env::var("VITRINE_WEB_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3001".to_string())
        .parse()?;

    let widget_dist = std::env::var("VITRINE_WIDGET_DIST")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    let cfg = WebServerConfig { widget_dist };

    info!("Starting Vitrine catalog service on http://{}", web_addr);

    vitrine_web::server::serve(web_addr, cfg).await
}
