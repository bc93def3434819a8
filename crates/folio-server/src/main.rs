use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use folio_server::config::Config;
use folio_service::PortfolioService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    let addr = SocketAddr::new(config.bind.parse()?, config.port);

    let db_config = config.db_config();
    let db = folio_db::open(&db_config).await?;
    info!("record store: {}", db_config.backend_name());

    let store = folio_store::create_store(&config.store_config())?;
    info!("uploads: {}", config.upload_dir.display());

    let service = PortfolioService::new(db, store);

    let listener = TcpListener::bind(addr).await?;
    info!("folio-server listening on http://{addr}");

    folio_server::serve(listener, service, config.upload_dir).await?;
    Ok(())
}
