use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use folio_core::project::{CreateProject, UpdateProject};
use folio_service::ServiceError;
use serde_json::{json, Value};

use super::{msg, server_error, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
}

async fn list_projects(State(state): State<AppState>) -> Result<Json<Value>, Response> {
    state
        .service
        .list_projects()
        .await
        .map(|p| Json(json!(p)))
        .map_err(to_error)
}

async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, Response> {
    state
        .service
        .get_project(&id)
        .await
        .map(|p| Json(json!(p)))
        .map_err(to_error)
}

async fn create_project(
    State(state): State<AppState>,
    input: Result<Json<CreateProject>, JsonRejection>,
) -> Result<Json<Value>, Response> {
    let Json(input) = input.map_err(bad_body)?;
    state
        .service
        .create_project(input)
        .await
        .map(|p| Json(json!(p)))
        .map_err(to_error)
}

async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    input: Result<Json<UpdateProject>, JsonRejection>,
) -> Result<Json<Value>, Response> {
    let Json(input) = input.map_err(bad_body)?;
    state
        .service
        .update_project(&id, input)
        .await
        .map(|p| Json(json!(p)))
        .map_err(to_error)
}

async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, Response> {
    state
        .service
        .delete_project(&id)
        .await
        .map(|_| Json(json!({ "msg": "Project removed" })))
        .map_err(to_error)
}

fn bad_body(rejection: JsonRejection) -> Response {
    msg(StatusCode::BAD_REQUEST, rejection.body_text())
}

fn to_error(e: ServiceError) -> Response {
    match e {
        ServiceError::NotFound(_) => msg(StatusCode::NOT_FOUND, "Project not found"),
        ServiceError::InvalidInput(reason) => msg(StatusCode::BAD_REQUEST, reason),
        ServiceError::Internal(_) => server_error(e),
    }
}
