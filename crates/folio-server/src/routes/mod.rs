pub mod contact;
pub mod health;
pub mod projects;

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use folio_core::upload::PUBLIC_PREFIX;
use folio_service::PortfolioService;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub struct InnerAppState {
    pub service: PortfolioService,
    /// Served read-only under [`PUBLIC_PREFIX`].
    pub upload_dir: PathBuf,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.upload_dir);

    Router::new()
        .merge(health::routes())
        .merge(contact::routes())
        .merge(projects::routes())
        .nest_service(PUBLIC_PREFIX, uploads)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `{"msg": ...}` with the given status.
pub(crate) fn msg(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(json!({ "msg": msg.into() }))).into_response()
}

/// Log the detail and answer with a bare 500.
pub(crate) fn server_error(detail: impl Display) -> Response {
    tracing::error!("{detail}");
    (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
}
