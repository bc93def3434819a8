pub mod config;
mod routes;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use folio_service::PortfolioService;
use tokio::net::TcpListener;

pub use routes::{build_router, AppState, InnerAppState};

pub async fn serve(
    listener: TcpListener,
    service: PortfolioService,
    upload_dir: PathBuf,
) -> Result<()> {
    let state = Arc::new(InnerAppState {
        service,
        upload_dir,
    });
    let app = routes::build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
