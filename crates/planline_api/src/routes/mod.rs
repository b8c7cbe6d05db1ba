//! Route handlers and their wire-level request/response bodies.

pub mod health;
pub mod items;
pub mod projects;

use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use planline_core::{Item, ItemKind, ItemStatus, Project};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direct order-key assignment body.
#[derive(Debug, Deserialize)]
pub struct SetOrderRequest {
    pub order: i64,
}

/// Bulk reorder body. The field name matches the external wire contract.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub item_ids: Vec<Uuid>,
}

/// Unwraps a JSON request body, mapping extraction rejections to 400.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Wire shape of one project record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBody {
    pub id: Uuid,
    pub name: String,
    pub order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Project> for ProjectBody {
    fn from(project: Project) -> Self {
        Self {
            id: project.uuid,
            name: project.name,
            order: project.order_key,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Wire shape of one item record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub id: Uuid,
    pub project_id: Uuid,
    pub kind: ItemKind,
    pub title: String,
    pub status: ItemStatus,
    pub order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Item> for ItemBody {
    fn from(item: Item) -> Self {
        Self {
            id: item.uuid,
            project_id: item.project_uuid,
            kind: item.kind,
            title: item.title,
            status: item.status,
            order: item.order_key,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}
