//! HTTP delivery layer for planline.
//!
//! # Responsibility
//! - Map the core project/item services onto a JSON-over-HTTP surface.
//! - Serialize requests onto the single SQLite connection.
//!
//! # Invariants
//! - Handlers never touch SQL; all persistence goes through core repos.
//! - Every non-2xx response body is `{"message": "..."}`.

use axum::routing::{get, patch, post};
use axum::Router;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

mod error;
mod routes;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection for shared handler access.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Locks the connection for one request.
    ///
    /// A poisoned lock is recovered: the connection itself stays valid when
    /// a handler panics between statements, and every multi-row write runs
    /// inside its own transaction.
    pub(crate) fn lock_db(&self) -> MutexGuard<'_, Connection> {
        self.db
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Builds the full API router over the provided state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health))
        .route(
            "/api/projects",
            post(routes::projects::create).get(routes::projects::list),
        )
        .route("/api/projects/reorder", patch(routes::projects::reorder))
        .route("/api/projects/renumber", patch(routes::projects::renumber))
        .route(
            "/api/projects/:id",
            get(routes::projects::fetch)
                .patch(routes::projects::rename)
                .delete(routes::projects::remove),
        )
        .route("/api/projects/:id/move-up", patch(routes::projects::move_up))
        .route(
            "/api/projects/:id/move-down",
            patch(routes::projects::move_down),
        )
        .route("/api/projects/:id/order", patch(routes::projects::set_order))
        .route(
            "/api/projects/:id/items",
            post(routes::items::create).get(routes::items::list),
        )
        .route(
            "/api/projects/:id/items/reorder",
            patch(routes::items::reorder),
        )
        .route(
            "/api/projects/:id/items/renumber",
            patch(routes::items::renumber),
        )
        .route(
            "/api/items/:id",
            get(routes::items::fetch)
                .patch(routes::items::update)
                .delete(routes::items::remove),
        )
        .route("/api/items/:id/move-up", patch(routes::items::move_up))
        .route("/api/items/:id/move-down", patch(routes::items::move_down))
        .route("/api/items/:id/order", patch(routes::items::set_order))
        .with_state(state)
}
