use std::sync::Arc;

use axum::Router;
use folio_service::PortfolioService;
use folio_store::StoreConfig;
use tempfile::TempDir;
use tokio::net::TcpListener;

use crate::routes::InnerAppState;

/// Build a test router with in-memory SQLite and a temp upload directory.
/// The directory is removed when the returned guard is dropped.
pub async fn test_router() -> (Router, TempDir) {
    let uploads = tempfile::tempdir().unwrap();
    let db = Arc::new(folio_db::SqliteDatabase::open_in_memory().unwrap());
    let store_config = StoreConfig {
        content_dir: uploads.path().to_path_buf(),
    };
    let store = folio_store::create_store(&store_config).unwrap();
    let state = Arc::new(InnerAppState {
        service: PortfolioService::new(db, store),
        upload_dir: store_config.content_dir,
    });
    (crate::routes::build_router(state), uploads)
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    _handle: tokio::task::JoinHandle<()>,
    _uploads: TempDir,
}

/// Spawn an axum test server on a random port. Returns the TestServer
/// with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let (app, uploads) = test_router().await;
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        _handle: handle,
        _uploads: uploads,
    }
}
