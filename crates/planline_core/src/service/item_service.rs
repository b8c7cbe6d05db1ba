//! Item use-case service.
//!
//! # Responsibility
//! - Validate item input and owning-project liveness above the repository.
//! - Resolve an item's ordering scope from its own record before invoking
//!   ordering operations.
//!
//! # Invariants
//! - Item titles are trimmed and must not be blank.
//! - A created item lands at the end of its project's item list.
//! - Content updates never move an item; only ordering operations do.

use crate::model::item::{Item, ItemId, ItemKind, ItemStatus};
use crate::model::project::ProjectId;
use crate::repo::item_repo::{ItemRepoError, ItemRepository};
use crate::repo::order_store::{OrderScope, OrderStore};
use crate::service::order_service::{MoveOutcome, OrderService, OrderServiceError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Errors from item service operations.
#[derive(Debug)]
pub enum ItemServiceError {
    /// Item title is blank after trim.
    InvalidTitle,
    /// Target item does not exist or is soft-deleted.
    ItemNotFound(ItemId),
    /// Owning project does not exist or is soft-deleted.
    ProjectNotFound(ProjectId),
    /// Ordering-level failure.
    Order(OrderServiceError),
    /// Repository-level failure.
    Repo(ItemRepoError),
}

impl Display for ItemServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "item title must not be blank"),
            Self::ItemNotFound(uuid) => write!(f, "item not found: {uuid}"),
            Self::ProjectNotFound(uuid) => write!(f, "project not found: {uuid}"),
            Self::Order(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ItemServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Order(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemRepoError> for ItemServiceError {
    fn from(value: ItemRepoError) -> Self {
        match value {
            ItemRepoError::NotFound(uuid) => Self::ItemNotFound(uuid),
            other => Self::Repo(other),
        }
    }
}

impl From<OrderServiceError> for ItemServiceError {
    fn from(value: OrderServiceError) -> Self {
        match value {
            OrderServiceError::RecordNotFound(uuid) => Self::ItemNotFound(uuid),
            other => Self::Order(other),
        }
    }
}

/// Partial update applied to one item's content fields.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    /// New title, trimmed and validated when present.
    pub title: Option<String>,
    /// New item kind.
    pub kind: Option<ItemKind>,
    /// New lifecycle status.
    pub status: Option<ItemStatus>,
}

/// Use-case facade over item persistence and per-project item ordering.
pub struct ItemService<I: ItemRepository, S: OrderStore> {
    items: I,
    ordering: OrderService<S>,
}

impl<I: ItemRepository, S: OrderStore> ItemService<I, S> {
    /// Creates a service from repository and order store implementations.
    pub fn new(items: I, order_store: S) -> Self {
        Self {
            items,
            ordering: OrderService::new(order_store),
        }
    }

    /// Creates one item appended to the end of its project's item list.
    pub fn create_item(
        &self,
        project_uuid: ProjectId,
        kind: ItemKind,
        title: impl Into<String>,
    ) -> Result<Item, ItemServiceError> {
        let normalized = normalize_title(title.into())?;
        self.ensure_project_active(project_uuid)?;

        let scope = OrderScope::ProjectItems(project_uuid);
        let order_key = self.ordering.append_key(&scope)?;
        self.items
            .create_item(project_uuid, kind, normalized.as_str(), order_key)
            .map_err(Into::into)
    }

    /// Lists one project's live items ascending by order key.
    pub fn list_items(&self, project_uuid: ProjectId) -> Result<Vec<Item>, ItemServiceError> {
        self.ensure_project_active(project_uuid)?;
        self.items.list_items(project_uuid, false).map_err(Into::into)
    }

    /// Loads one live item.
    pub fn get_item(&self, uuid: ItemId) -> Result<Item, ItemServiceError> {
        self.items
            .get_item(uuid, false)?
            .ok_or(ItemServiceError::ItemNotFound(uuid))
    }

    /// Applies a partial content update to one item.
    pub fn update_item(&self, uuid: ItemId, update: ItemUpdate) -> Result<Item, ItemServiceError> {
        let mut item = self.get_item(uuid)?;
        if let Some(title) = update.title {
            item.title = normalize_title(title)?;
        }
        if let Some(kind) = update.kind {
            item.kind = kind;
        }
        if let Some(status) = update.status {
            item.status = status;
        }
        self.items.update_item(&item)?;
        self.get_item(uuid)
    }

    /// Soft-deletes one item. Surviving siblings keep their keys.
    pub fn delete_item(&self, uuid: ItemId) -> Result<(), ItemServiceError> {
        self.items.soft_delete_item(uuid).map_err(Into::into)
    }

    /// Moves one item a single slot toward the front of its project's list.
    pub fn move_up(&self, uuid: ItemId) -> Result<MoveOutcome, ItemServiceError> {
        let scope = self.scope_of(uuid)?;
        self.ordering.move_up(&scope, uuid).map_err(Into::into)
    }

    /// Moves one item a single slot toward the back of its project's list.
    pub fn move_down(&self, uuid: ItemId) -> Result<MoveOutcome, ItemServiceError> {
        let scope = self.scope_of(uuid)?;
        self.ordering.move_down(&scope, uuid).map_err(Into::into)
    }

    /// Assigns an explicit order key to one item within its project.
    pub fn set_order_key(&self, uuid: ItemId, order_key: i64) -> Result<Item, ItemServiceError> {
        let scope = self.scope_of(uuid)?;
        self.ordering.set_order_key(&scope, uuid, order_key)?;
        self.get_item(uuid)
    }

    /// Reassigns step-spaced keys to the listed items of one project.
    pub fn reorder(
        &self,
        project_uuid: ProjectId,
        ordered_ids: &[Uuid],
    ) -> Result<(), ItemServiceError> {
        self.ensure_project_active(project_uuid)?;
        self.ordering
            .reorder(&OrderScope::ProjectItems(project_uuid), ordered_ids)
            .map_err(Into::into)
    }

    /// Renumbers one project's item list with step-spaced keys.
    pub fn renumber(&self, project_uuid: ProjectId) -> Result<usize, ItemServiceError> {
        self.ensure_project_active(project_uuid)?;
        self.ordering
            .renumber(&OrderScope::ProjectItems(project_uuid))
            .map_err(Into::into)
    }

    fn scope_of(&self, uuid: ItemId) -> Result<OrderScope, ItemServiceError> {
        let item = self.get_item(uuid)?;
        Ok(OrderScope::ProjectItems(item.project_uuid))
    }

    fn ensure_project_active(&self, project_uuid: ProjectId) -> Result<(), ItemServiceError> {
        if !self.items.project_is_active(project_uuid)? {
            return Err(ItemServiceError::ProjectNotFound(project_uuid));
        }
        Ok(())
    }
}

fn normalize_title(value: String) -> Result<String, ItemServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ItemServiceError::InvalidTitle);
    }
    Ok(trimmed.to_string())
}
