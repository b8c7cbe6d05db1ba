//! Item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD persistence APIs for item records.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Only active (`is_deleted=0`) items are returned by default.
//! - Listing is deterministic: `order_key ASC, item_uuid ASC`.
//! - Content updates never touch `order_key`; reorder operations go through
//!   the order store.

use crate::db::DbError;
use crate::model::item::{Item, ItemId, ItemKind, ItemStatus};
use crate::model::project::ProjectId;
use crate::repo::{probe_schema, SchemaProbe};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ITEM_SELECT_SQL: &str = "SELECT
    item_uuid,
    project_uuid,
    kind,
    title,
    status,
    order_key,
    is_deleted,
    created_at,
    updated_at
FROM items";

/// Result type used by item repository operations.
pub type ItemRepoResult<T> = Result<T, ItemRepoError>;

/// Errors from item repository operations.
#[derive(Debug)]
pub enum ItemRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target item does not exist or is soft-deleted.
    NotFound(ItemId),
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

impl Display for ItemRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(uuid) => write!(f, "item not found: {uuid}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "item repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "item repository requires table `{table}`")
            }
        }
    }
}

impl Error for ItemRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for ItemRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ItemRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for item CRUD operations.
pub trait ItemRepository {
    /// Creates one item under a project with the provided order key.
    fn create_item(
        &self,
        project_uuid: ProjectId,
        kind: ItemKind,
        title: &str,
        order_key: i64,
    ) -> ItemRepoResult<Item>;
    /// Loads one item by id.
    fn get_item(&self, uuid: ItemId, include_deleted: bool) -> ItemRepoResult<Option<Item>>;
    /// Lists the items of one project ascending by order key.
    fn list_items(&self, project_uuid: ProjectId, include_deleted: bool)
        -> ItemRepoResult<Vec<Item>>;
    /// Writes kind/title/status of one item. `order_key` is deliberately
    /// excluded: positional state only moves through reorder operations.
    fn update_item(&self, item: &Item) -> ItemRepoResult<()>;
    /// Soft-deletes one item.
    fn soft_delete_item(&self, uuid: ItemId) -> ItemRepoResult<()>;
    /// Returns whether the owning project exists and is live.
    fn project_is_active(&self, project_uuid: ProjectId) -> ItemRepoResult<bool>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> ItemRepoResult<Self> {
        match probe_schema(conn, &["items", "projects"])? {
            SchemaProbe::Ready => Ok(Self { conn }),
            SchemaProbe::VersionMismatch {
                expected_version,
                actual_version,
            } => Err(ItemRepoError::UninitializedConnection {
                expected_version,
                actual_version,
            }),
            SchemaProbe::MissingTable(table) => Err(ItemRepoError::MissingRequiredTable(table)),
        }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(
        &self,
        project_uuid: ProjectId,
        kind: ItemKind,
        title: &str,
        order_key: i64,
    ) -> ItemRepoResult<Item> {
        let uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO items (item_uuid, project_uuid, kind, title, status, order_key, is_deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0);",
            params![
                uuid.to_string(),
                project_uuid.to_string(),
                item_kind_to_db(kind),
                title,
                item_status_to_db(ItemStatus::Todo),
                order_key,
            ],
        )?;
        load_required_item(self.conn, uuid)
    }

    fn get_item(&self, uuid: ItemId, include_deleted: bool) -> ItemRepoResult<Option<Item>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE item_uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;
        let mut rows = stmt.query(params![uuid.to_string(), i64::from(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }
        Ok(None)
    }

    fn list_items(
        &self,
        project_uuid: ProjectId,
        include_deleted: bool,
    ) -> ItemRepoResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE project_uuid = ?1
               AND (?2 = 1 OR is_deleted = 0)
             ORDER BY order_key ASC, item_uuid ASC;"
        ))?;
        let mut rows = stmt.query(params![project_uuid.to_string(), i64::from(include_deleted)])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn update_item(&self, item: &Item) -> ItemRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE items
             SET kind = ?2,
                 title = ?3,
                 status = ?4,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE item_uuid = ?1
               AND is_deleted = 0;",
            params![
                item.uuid.to_string(),
                item_kind_to_db(item.kind),
                item.title.as_str(),
                item_status_to_db(item.status),
            ],
        )?;
        if changed == 0 {
            return Err(ItemRepoError::NotFound(item.uuid));
        }
        Ok(())
    }

    fn soft_delete_item(&self, uuid: ItemId) -> ItemRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE items
             SET is_deleted = 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE item_uuid = ?1
               AND is_deleted = 0;",
            [uuid.to_string()],
        )?;
        if changed == 0 {
            return Err(ItemRepoError::NotFound(uuid));
        }
        Ok(())
    }

    fn project_is_active(&self, project_uuid: ProjectId) -> ItemRepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM projects
                WHERE project_uuid = ?1
                  AND is_deleted = 0
            );",
            [project_uuid.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn load_required_item(conn: &Connection, uuid: ItemId) -> ItemRepoResult<Item> {
    let mut stmt = conn.prepare(&format!(
        "{ITEM_SELECT_SQL}
         WHERE item_uuid = ?1
           AND is_deleted = 0;"
    ))?;
    let mut rows = stmt.query([uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_item_row(row);
    }
    Err(ItemRepoError::NotFound(uuid))
}

fn parse_item_row(row: &Row<'_>) -> ItemRepoResult<Item> {
    let uuid_text: String = row.get("item_uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        ItemRepoError::InvalidData(format!("invalid uuid `{uuid_text}` in items.item_uuid"))
    })?;

    let project_uuid_text: String = row.get("project_uuid")?;
    let project_uuid = Uuid::parse_str(&project_uuid_text).map_err(|_| {
        ItemRepoError::InvalidData(format!(
            "invalid uuid `{project_uuid_text}` in items.project_uuid"
        ))
    })?;

    let kind_text: String = row.get("kind")?;
    let kind = parse_item_kind(&kind_text).ok_or_else(|| {
        ItemRepoError::InvalidData(format!("invalid item kind `{kind_text}` in items.kind"))
    })?;

    let status_text: String = row.get("status")?;
    let status = parse_item_status(&status_text).ok_or_else(|| {
        ItemRepoError::InvalidData(format!(
            "invalid item status `{status_text}` in items.status"
        ))
    })?;

    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(ItemRepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in items.is_deleted"
            )));
        }
    };

    Ok(Item {
        uuid,
        project_uuid,
        kind,
        title: row.get("title")?,
        status,
        order_key: row.get("order_key")?,
        is_deleted,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn item_kind_to_db(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Task => "task",
        ItemKind::Epic => "epic",
        ItemKind::Story => "story",
    }
}

fn parse_item_kind(value: &str) -> Option<ItemKind> {
    match value {
        "task" => Some(ItemKind::Task),
        "epic" => Some(ItemKind::Epic),
        "story" => Some(ItemKind::Story),
        _ => None,
    }
}

fn item_status_to_db(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Todo => "todo",
        ItemStatus::InProgress => "in_progress",
        ItemStatus::Done => "done",
    }
}

fn parse_item_status(value: &str) -> Option<ItemStatus> {
    match value {
        "todo" => Some(ItemStatus::Todo),
        "in_progress" => Some(ItemStatus::InProgress),
        "done" => Some(ItemStatus::Done),
        _ => None,
    }
}
