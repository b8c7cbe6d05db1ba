//! Item route handlers.

use crate::error::{parse_id, setup_error, ApiError};
use crate::routes::{body, ItemBody, ReorderRequest, SetOrderRequest};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use log::info;
use planline_core::{
    ItemKind, ItemService, ItemStatus, ItemUpdate, MoveOutcome, SqliteItemRepository,
    SqliteOrderStore,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    #[serde(default)]
    pub kind: Option<ItemKind>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub kind: Option<ItemKind>,
    pub status: Option<ItemStatus>,
}

fn service(
    conn: &Connection,
) -> Result<ItemService<SqliteItemRepository<'_>, SqliteOrderStore<'_>>, ApiError> {
    let items = SqliteItemRepository::try_new(conn).map_err(setup_error)?;
    let order_store = SqliteOrderStore::try_new(conn).map_err(setup_error)?;
    Ok(ItemService::new(items, order_store))
}

pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let project_uuid = parse_id(&id)?;
    let payload = body(payload)?;
    let kind = payload.kind.unwrap_or(ItemKind::Task);

    let conn = state.lock_db();
    let item = service(&conn)?.create_item(project_uuid, kind, payload.title)?;

    info!(
        "event=item_created module=api status=ok item={} project={} order={}",
        item.uuid, item.project_uuid, item.order_key
    );
    Ok((StatusCode::CREATED, Json(ItemBody::from(item))))
}

pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ItemBody>>, ApiError> {
    let project_uuid = parse_id(&id)?;
    let conn = state.lock_db();
    let items = service(&conn)?.list_items(project_uuid)?;
    Ok(Json(items.into_iter().map(ItemBody::from).collect()))
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ItemBody>, ApiError> {
    let uuid = parse_id(&id)?;
    let conn = state.lock_db();
    let item = service(&conn)?.get_item(uuid)?;
    Ok(Json(ItemBody::from(item)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> Result<Json<ItemBody>, ApiError> {
    let uuid = parse_id(&id)?;
    let payload = body(payload)?;
    let update = ItemUpdate {
        title: payload.title,
        kind: payload.kind,
        status: payload.status,
    };

    let conn = state.lock_db();
    let item = service(&conn)?.update_item(uuid, update)?;
    Ok(Json(ItemBody::from(item)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let uuid = parse_id(&id)?;
    let conn = state.lock_db();
    service(&conn)?.delete_item(uuid)?;

    info!("event=item_deleted module=api status=ok item={uuid}");
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
    let item = service.get_item(uuid)?;

    Ok(Json(json!({
        "moved": outcome == MoveOutcome::Moved,
        "item": ItemBody::from(item),
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
    let item = service.get_item(uuid)?;

    Ok(Json(json!({
        "moved": outcome == MoveOutcome::Moved,
        "item": ItemBody::from(item),
    })))
}

pub async fn set_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SetOrderRequest>, JsonRejection>,
) -> Result<Json<ItemBody>, ApiError> {
    let uuid = parse_id(&id)?;
    let payload = body(payload)?;
    let conn = state.lock_db();
    let item = service(&conn)?.set_order_key(uuid, payload.order)?;
    Ok(Json(ItemBody::from(item)))
}

pub async fn reorder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let project_uuid = parse_id(&id)?;
    let payload = body(payload)?;
    let conn = state.lock_db();
    service(&conn)?.reorder(project_uuid, &payload.item_ids)?;

    info!(
        "event=items_reordered module=api status=ok project={project_uuid} count={}",
        payload.item_ids.len()
    );
    Ok(Json(json!({ "reordered": payload.item_ids.len() })))
}

pub async fn renumber(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let project_uuid = parse_id(&id)?;
    let conn = state.lock_db();
    let renumbered = service(&conn)?.renumber(project_uuid)?;

    info!(
        "event=items_renumbered module=api status=ok project={project_uuid} count={renumbered}"
    );
    Ok(Json(json!({ "renumbered": renumbered })))
}
