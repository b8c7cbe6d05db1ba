//! Sibling ordering service.
//!
//! # Responsibility
//! - Compute and persist the order keys that realize a requested positional
//!   change: append, neighbor swap, direct assignment, bulk reorder,
//!   renumber.
//!
//! # Invariants
//! - Append returns a key strictly greater than every live key in the scope.
//! - A neighbor swap touches exactly the two swapped records.
//! - Boundary moves (first up, last down) succeed without writing anything.
//! - Bulk reorder and renumber write all keys in one transaction or none.
//!
//! The service is stateless: every operation re-derives the scope from the
//! store, so concurrent appends can race to the same key. That tie is
//! tolerated (listing breaks it on ascending id) and repairable via
//! [`OrderService::renumber`].

use crate::repo::order_store::{OrderScope, OrderStore, OrderStoreError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Gap between freshly assigned order keys. Leaves room for future inserts
/// between siblings without renumbering.
pub const ORDER_STEP: i64 = 1000;

/// Errors from ordering service operations.
#[derive(Debug)]
pub enum OrderServiceError {
    /// Target record is not part of the scope.
    RecordNotFound(Uuid),
    /// Store-level failure.
    Store(OrderStoreError),
}

impl Display for OrderServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecordNotFound(uuid) => write!(f, "record not found in scope: {uuid}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for OrderServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::RecordNotFound(_) => None,
        }
    }
}

impl From<OrderStoreError> for OrderServiceError {
    fn from(value: OrderStoreError) -> Self {
        match value {
            OrderStoreError::RecordNotFound(uuid) => Self::RecordNotFound(uuid),
            other => Self::Store(other),
        }
    }
}

/// Result of a single-slot move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The record swapped keys with its neighbor.
    Moved,
    /// The record was already at the requested boundary; nothing changed.
    AlreadyAtEdge,
}

#[derive(Debug, Clone, Copy)]
enum MoveDirection {
    Up,
    Down,
}

/// Ordering service over any [`OrderStore`] implementation.
pub struct OrderService<R: OrderStore> {
    repo: R,
}

impl<R: OrderStore> OrderService<R> {
    /// Creates a service using the provided store implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Computes the order key for a record appended to `scope`.
    ///
    /// Pure read: `max + 1000`, or `1000` for an empty scope. The caller
    /// persists the new record with the returned key. The addition saturates:
    /// a scope whose maximum key was pushed to the top of the `i64` range by
    /// a direct assignment appends at `i64::MAX` instead of overflowing, and
    /// a renumber pass restores the gaps.
    pub fn append_key(&self, scope: &OrderScope) -> Result<i64, OrderServiceError> {
        let max = self.repo.max_order_key(scope)?.unwrap_or(0);
        Ok(max.saturating_add(ORDER_STEP))
    }

    /// Moves one record a single slot toward the front of its scope.
    pub fn move_up(
        &self,
        scope: &OrderScope,
        uuid: Uuid,
    ) -> Result<MoveOutcome, OrderServiceError> {
        self.shift(scope, uuid, MoveDirection::Up)
    }

    /// Moves one record a single slot toward the back of its scope.
    pub fn move_down(
        &self,
        scope: &OrderScope,
        uuid: Uuid,
    ) -> Result<MoveOutcome, OrderServiceError> {
        self.shift(scope, uuid, MoveDirection::Down)
    }

    /// Assigns an explicit order key to one record.
    ///
    /// # Contract
    /// - Collisions with a key already held by a sibling are accepted, not
    ///   resolved; listing falls back to the id tiebreak until a later write
    ///   disambiguates.
    /// - Idempotent: repeating the same assignment is a no-op.
    pub fn set_order_key(
        &self,
        scope: &OrderScope,
        uuid: Uuid,
        order_key: i64,
    ) -> Result<(), OrderServiceError> {
        self.repo.write_order_keys(scope, &[(uuid, order_key)])?;
        Ok(())
    }

    /// Reassigns step-spaced keys (1000, 2000, ...) to the listed records in
    /// list sequence.
    ///
    /// Records of the scope not listed keep their keys and may interleave
    /// with the new block; callers wanting strict placement supply the full
    /// scope. An id absent from the scope fails the whole call.
    pub fn reorder(
        &self,
        scope: &OrderScope,
        ordered_ids: &[Uuid],
    ) -> Result<(), OrderServiceError> {
        if ordered_ids.is_empty() {
            return Ok(());
        }

        let known: HashSet<Uuid> = self
            .repo
            .list_scope(scope)?
            .into_iter()
            .map(|row| row.uuid)
            .collect();
        if let Some(missing) = ordered_ids.iter().find(|uuid| !known.contains(uuid)) {
            return Err(OrderServiceError::RecordNotFound(*missing));
        }

        let assignments = step_spaced(ordered_ids.iter().copied());
        self.repo.write_order_keys(scope, &assignments)?;
        Ok(())
    }

    /// Renumbers the whole scope with step-spaced keys in its current order.
    ///
    /// On-demand repair for scopes whose key gaps collapsed under repeated
    /// reorders. Returns the number of records renumbered.
    pub fn renumber(&self, scope: &OrderScope) -> Result<usize, OrderServiceError> {
        let rows = self.repo.list_scope(scope)?;
        let assignments = step_spaced(rows.into_iter().map(|row| row.uuid));
        self.repo.write_order_keys(scope, &assignments)?;
        Ok(assignments.len())
    }

    fn shift(
        &self,
        scope: &OrderScope,
        uuid: Uuid,
        direction: MoveDirection,
    ) -> Result<MoveOutcome, OrderServiceError> {
        let rows = self.repo.list_scope(scope)?;
        let index = rows
            .iter()
            .position(|row| row.uuid == uuid)
            .ok_or(OrderServiceError::RecordNotFound(uuid))?;

        let neighbor_index = match direction {
            MoveDirection::Up => {
                if index == 0 {
                    return Ok(MoveOutcome::AlreadyAtEdge);
                }
                index - 1
            }
            MoveDirection::Down => {
                if index + 1 == rows.len() {
                    return Ok(MoveOutcome::AlreadyAtEdge);
                }
                index + 1
            }
        };

        let current = rows[index];
        let neighbor = rows[neighbor_index];
        self.repo.write_order_keys(
            scope,
            &[
                (current.uuid, neighbor.order_key),
                (neighbor.uuid, current.order_key),
            ],
        )?;
        Ok(MoveOutcome::Moved)
    }
}

fn step_spaced(ids: impl Iterator<Item = Uuid>) -> Vec<(Uuid, i64)> {
    ids.enumerate()
        .map(|(index, uuid)| (uuid, (index as i64 + 1) * ORDER_STEP))
        .collect()
}
