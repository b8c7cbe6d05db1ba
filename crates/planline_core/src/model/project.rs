//! Project domain model.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another project.
//! - `order_key` positions the project within the global project list; lower
//!   keys sort first, ties break on ascending `uuid`.
//! - `is_deleted` is the source of truth for tombstone state; deleting a
//!   project drops it from the sequence without renumbering survivors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable project identifier.
pub type ProjectId = Uuid;

/// Canonical project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable global ID.
    pub uuid: ProjectId,
    /// User-facing project name.
    pub name: String,
    /// Sparse sibling sort key within the global project list.
    pub order_key: i64,
    /// Soft delete tombstone.
    pub is_deleted: bool,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Project {
    /// Returns whether this project should be considered visible/active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}
