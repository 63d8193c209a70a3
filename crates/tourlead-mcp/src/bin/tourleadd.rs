use std::io;
use std::process::ExitCode;

use tourlead_mcp::{ScoringServer, ServiceConfig, Transport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // stdout carries JSON-RPC frames; logs always go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = ServiceConfig::from_env()?;
    let server = ScoringServer::from_config(&cfg)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?cfg.transport,
        "starting tourleadd"
    );

    match cfg.transport {
        Transport::Stdio => server.serve_stdio()?,
        Transport::Http => server.serve_http(cfg.http_addr())?,
    }
    Ok(())
}
