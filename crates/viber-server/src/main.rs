use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use viber_provider::{client_for, ProviderConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("VIBER_BIND").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("VIBER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::new(bind.parse()?, port);

    let listener = TcpListener::bind(addr).await?;
    info!("viber-server listening on http://{addr}");

    viber_server::serve(
        listener,
        Arc::new(|config: &ProviderConfig| client_for(config)),
    )
    .await
}
