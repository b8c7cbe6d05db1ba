//! Core domain logic for planline.
//! This crate is the single source of truth for ordering and record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::DbError;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemId, ItemKind, ItemStatus};
pub use model::project::{Project, ProjectId};
pub use repo::item_repo::{ItemRepoError, ItemRepository, SqliteItemRepository};
pub use repo::order_store::{
    OrderScope, OrderStore, OrderStoreError, OrderedRow, SqliteOrderStore,
};
pub use repo::project_repo::{ProjectRepoError, ProjectRepository, SqliteProjectRepository};
pub use service::item_service::{ItemService, ItemServiceError, ItemUpdate};
pub use service::order_service::{MoveOutcome, OrderService, OrderServiceError, ORDER_STEP};
pub use service::project_service::{ProjectService, ProjectServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
