//! Project route handlers.

use crate::error::{parse_id, setup_error, ApiError};
use crate::routes::{body, ProjectBody, ReorderRequest, SetOrderRequest};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use log::info;
use planline_core::{MoveOutcome, ProjectService, SqliteOrderStore, SqliteProjectRepository};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

fn service(
    conn: &Connection,
) -> Result<ProjectService<SqliteProjectRepository<'_>, SqliteOrderStore<'_>>, ApiError> {
    let projects = SqliteProjectRepository::try_new(conn).map_err(setup_error)?;
    let order_store = SqliteOrderStore::try_new(conn).map_err(setup_error)?;
    Ok(ProjectService::new(projects, order_store))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = body(payload)?;
    let conn = state.lock_db();
    let project = service(&conn)?.create_project(payload.name)?;

    info!(
        "event=project_created module=api status=ok project={} order={}",
        project.uuid, project.order_key
    );
    Ok((StatusCode::CREATED, Json(ProjectBody::from(project))))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProjectBody>>, ApiError> {
    let conn = state.lock_db();
    let projects = service(&conn)?.list_projects()?;
    Ok(Json(projects.into_iter().map(ProjectBody::from).collect()))
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectBody>, ApiError> {
    let uuid = parse_id(&id)?;
    let conn = state.lock_db();
    let project = service(&conn)?.get_project(uuid)?;
    Ok(Json(ProjectBody::from(project)))
}

pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NameRequest>, JsonRejection>,
) -> Result<Json<ProjectBody>, ApiError> {
    let uuid = parse_id(&id)?;
    let payload = body(payload)?;
    let conn = state.lock_db();
    let project = service(&conn)?.rename_project(uuid, payload.name)?;
    Ok(Json(ProjectBody::from(project)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let uuid = parse_id(&id)?;
    let conn = state.lock_db();
    service(&conn)?.delete_project(uuid)?;

    info!("event=project_deleted module=api status=ok project={uuid}");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn move_up(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let uuid = parse_id(&id)?;
    let conn = state.lock_db();
    let service = service(&conn)?;
    let outcome = service.move_up(uuid)?;
    let project = service.get_project(uuid)?;

    Ok(Json(json!({
        "moved": outcome == MoveOutcome::Moved,
        "project": ProjectBody::from(project),
    })))
}

pub async fn move_down(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let uuid = parse_id(&id)?;
    let conn = state.lock_db();
    let service = service(&conn)?;
    let outcome = service.move_down(uuid)?;
    let project = service.get_project(uuid)?;

    Ok(Json(json!({
        "moved": outcome == MoveOutcome::Moved,
        "project": ProjectBody::from(project),
    })))
}

pub async fn set_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SetOrderRequest>, JsonRejection>,
) -> Result<Json<ProjectBody>, ApiError> {
    let uuid = parse_id(&id)?;
    let payload = body(payload)?;
    let conn = state.lock_db();
    let project = service(&conn)?.set_order_key(uuid, payload.order)?;
    Ok(Json(ProjectBody::from(project)))
}

pub async fn reorder(
    State(state): State<AppState>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = body(payload)?;
    let conn = state.lock_db();
    service(&conn)?.reorder(&payload.item_ids)?;

    info!(
        "event=projects_reordered module=api status=ok count={}",
        payload.item_ids.len()
    );
    Ok(Json(json!({ "reordered": payload.item_ids.len() })))
}

pub async fn renumber(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let conn = state.lock_db();
    let renumbered = service(&conn)?.renumber()?;

    info!("event=projects_renumbered module=api status=ok count={renumbered}");
    Ok(Json(json!({ "renumbered": renumbered })))
}
