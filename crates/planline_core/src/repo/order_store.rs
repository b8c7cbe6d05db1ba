//! Sibling-order persistence contract and SQLite implementation.
//!
//! # Responsibility
//! - Expose the three store operations the ordering service composes:
//!   list a scope ascending, read its max order key, write order keys.
//! - Keep SQL details and the scope-to-table mapping inside this boundary.
//!
//! # Invariants
//! - Only live (`is_deleted=0`) rows participate in a scope.
//! - Scope listing is deterministic: `order_key ASC, uuid ASC`.
//! - Multi-row key writes are atomic: one failed row rolls back all of them.

use crate::db::DbError;
use crate::repo::{probe_schema, SchemaProbe};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Result type used by order store operations.
pub type OrderStoreResult<T> = Result<T, OrderStoreError>;

/// Errors from order store operations.
#[derive(Debug)]
pub enum OrderStoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target record does not exist (or is soft-deleted) in the scope.
    RecordNotFound(Uuid),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for OrderStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::RecordNotFound(uuid) => write!(f, "record not found in scope: {uuid}"),
            Self::InvalidData(message) => write!(f, "invalid order data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "order store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "order store requires table `{table}`")
            }
        }
    }
}

impl Error for OrderStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for OrderStoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for OrderStoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// The set of sibling records one ordering is defined over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    /// The global project list.
    Projects,
    /// The items owned by one project.
    ProjectItems(Uuid),
}

impl Display for OrderScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Projects => write!(f, "projects"),
            Self::ProjectItems(project_uuid) => write!(f, "items:{project_uuid}"),
        }
    }
}

/// One live record of a scope, as the ordering service sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedRow {
    /// Stable record id.
    pub uuid: Uuid,
    /// Current sort key.
    pub order_key: i64,
}

/// Store interface the ordering service composes its operations from.
pub trait OrderStore {
    /// Lists the live records of `scope`, ascending by `order_key` then id.
    fn list_scope(&self, scope: &OrderScope) -> OrderStoreResult<Vec<OrderedRow>>;
    /// Reads the maximum live `order_key` in `scope`; `None` when empty.
    fn max_order_key(&self, scope: &OrderScope) -> OrderStoreResult<Option<i64>>;
    /// Writes new order keys for the listed records in one transaction.
    ///
    /// A record that is absent from the scope fails the whole write with
    /// [`OrderStoreError::RecordNotFound`]; nothing is left half-applied.
    fn write_order_keys(
        &self,
        scope: &OrderScope,
        assignments: &[(Uuid, i64)],
    ) -> OrderStoreResult<()>;
}

/// SQLite-backed order store over the `projects` and `items` tables.
pub struct SqliteOrderStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOrderStore<'conn> {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> OrderStoreResult<Self> {
        match probe_schema(conn, &["projects", "items"])? {
            SchemaProbe::Ready => Ok(Self { conn }),
            SchemaProbe::VersionMismatch {
                expected_version,
                actual_version,
            } => Err(OrderStoreError::UninitializedConnection {
                expected_version,
                actual_version,
            }),
            SchemaProbe::MissingTable(table) => Err(OrderStoreError::MissingRequiredTable(table)),
        }
    }
}

impl OrderStore for SqliteOrderStore<'_> {
    fn list_scope(&self, scope: &OrderScope) -> OrderStoreResult<Vec<OrderedRow>> {
        let mut rows = Vec::new();
        match scope {
            OrderScope::Projects => {
                let mut stmt = self.conn.prepare(
                    "SELECT project_uuid, order_key
                     FROM projects
                     WHERE is_deleted = 0
                     ORDER BY order_key ASC, project_uuid ASC;",
                )?;
                let mut result = stmt.query([])?;
                while let Some(row) = result.next()? {
                    let uuid_text: String = row.get(0)?;
                    rows.push(OrderedRow {
                        uuid: parse_uuid(&uuid_text, "projects.project_uuid")?,
                        order_key: row.get(1)?,
                    });
                }
            }
            OrderScope::ProjectItems(project_uuid) => {
                let mut stmt = self.conn.prepare(
                    "SELECT item_uuid, order_key
                     FROM items
                     WHERE project_uuid = ?1
                       AND is_deleted = 0
                     ORDER BY order_key ASC, item_uuid ASC;",
                )?;
                let mut result = stmt.query([project_uuid.to_string()])?;
                while let Some(row) = result.next()? {
                    let uuid_text: String = row.get(0)?;
                    rows.push(OrderedRow {
                        uuid: parse_uuid(&uuid_text, "items.item_uuid")?,
                        order_key: row.get(1)?,
                    });
                }
            }
        }
        Ok(rows)
    }

    fn max_order_key(&self, scope: &OrderScope) -> OrderStoreResult<Option<i64>> {
        let max = match scope {
            OrderScope::Projects => self.conn.query_row(
                "SELECT MAX(order_key)
                 FROM projects
                 WHERE is_deleted = 0;",
                [],
                |row| row.get::<_, Option<i64>>(0),
            )?,
            OrderScope::ProjectItems(project_uuid) => self.conn.query_row(
                "SELECT MAX(order_key)
                 FROM items
                 WHERE project_uuid = ?1
                   AND is_deleted = 0;",
                [project_uuid.to_string()],
                |row| row.get::<_, Option<i64>>(0),
            )?,
        };
        Ok(max)
    }

    fn write_order_keys(
        &self,
        scope: &OrderScope,
        assignments: &[(Uuid, i64)],
    ) -> OrderStoreResult<()> {
        if assignments.is_empty() {
            return Ok(());
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (uuid, order_key) in assignments {
            let changed = match scope {
                OrderScope::Projects => tx.execute(
                    "UPDATE projects
                     SET order_key = ?2,
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE project_uuid = ?1
                       AND is_deleted = 0;",
                    params![uuid.to_string(), order_key],
                )?,
                OrderScope::ProjectItems(project_uuid) => tx.execute(
                    "UPDATE items
                     SET order_key = ?2,
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE item_uuid = ?1
                       AND project_uuid = ?3
                       AND is_deleted = 0;",
                    params![uuid.to_string(), order_key, project_uuid.to_string()],
                )?,
            };
            if changed == 0 {
                // Dropping the open transaction rolls back prior updates.
                return Err(OrderStoreError::RecordNotFound(*uuid));
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn parse_uuid(value: &str, column: &'static str) -> OrderStoreResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| OrderStoreError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}
