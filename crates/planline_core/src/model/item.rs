//! Item domain model.
//!
//! # Responsibility
//! - Define the canonical record for tasks, epics and stories.
//! - Keep ordering semantics identical across item kinds.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another item.
//! - `order_key` positions the item among the live items of its project.
//! - `order_key` is never touched by content edits; only explicit reorder
//!   operations mutate it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable item identifier.
pub type ItemId = Uuid;

/// Work item category. All kinds share one ordering within their project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Atomic unit of work.
    Task,
    /// Large body of work grouping stories/tasks.
    Epic,
    /// User-visible slice of functionality.
    Story,
}

/// Item lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Created but not started.
    Todo,
    /// Work is in progress.
    InProgress,
    /// Completed.
    Done,
}

/// Canonical item record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable global ID.
    pub uuid: ItemId,
    /// Owning project; defines the ordering scope for this item.
    pub project_uuid: Uuid,
    /// Item category.
    pub kind: ItemKind,
    /// User-facing title.
    pub title: String,
    /// Lifecycle state.
    pub status: ItemStatus,
    /// Sparse sibling sort key within the owning project.
    pub order_key: i64,
    /// Soft delete tombstone.
    pub is_deleted: bool,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Item {
    /// Returns whether this item should be considered visible/active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
