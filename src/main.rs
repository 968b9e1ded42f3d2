use coinbase_proxy::{config::ProxyConfig, observability, routing};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = ProxyConfig::load()?;
    tracing::info!(
        backend = ?cfg.secret_backend,
        exchange = %cfg.exchange_base_url,
        "Configuration loaded"
    );

    let app_state = routing::AppState::new(&cfg).await?;
    let app = routing::router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Coinbase proxy listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
