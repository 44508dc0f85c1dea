//! Serve Command
//!
//! Runs the catalog service in-process, optionally hosting the widget
//! build artifacts from the same listener.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use vitrine_web::server::WebServerConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3001", env = "VITRINE_WEB_ADDR")]
    pub addr: String,

    /// Directory with the widget build artifacts to host
    #[arg(long, env = "VITRINE_WIDGET_DIST")]
    pub widget_dist: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let addr: SocketAddr = args
        .addr
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.addr))?;

    let cfg = WebServerConfig {
        widget_dist: args.widget_dist,
    };

    vitrine_web::server::serve(addr, cfg).await
}
