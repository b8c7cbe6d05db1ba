//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD persistence APIs for project records.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Only active (`is_deleted=0`) projects are returned by default.
//! - Listing is deterministic: `order_key ASC, project_uuid ASC`.
//! - `order_key` is written at creation only; reorder operations go through
//!   the order store.

use crate::db::DbError;
use crate::model::project::{Project, ProjectId};
use crate::repo::{probe_schema, SchemaProbe};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    project_uuid,
    name,
    order_key,
    is_deleted,
    created_at,
    updated_at
FROM projects";

/// Result type used by project repository operations.
pub type ProjectRepoResult<T> = Result<T, ProjectRepoError>;

/// Errors from project repository operations.
#[derive(Debug)]
pub enum ProjectRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target project does not exist or is soft-deleted.
    NotFound(ProjectId),
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

impl Display for ProjectRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(uuid) => write!(f, "project not found: {uuid}"),
            Self::InvalidData(message) => write!(f, "invalid persisted project data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "project repository requires schema version {expected_version}, \
                 got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "project repository requires table `{table}`")
            }
        }
    }
}

impl Error for ProjectRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for ProjectRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ProjectRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    /// Creates one project with the provided order key.
    fn create_project(&self, name: &str, order_key: i64) -> ProjectRepoResult<Project>;
    /// Loads one project by id.
    fn get_project(
        &self,
        uuid: ProjectId,
        include_deleted: bool,
    ) -> ProjectRepoResult<Option<Project>>;
    /// Lists projects ascending by order key.
    fn list_projects(&self, include_deleted: bool) -> ProjectRepoResult<Vec<Project>>;
    /// Renames one project.
    fn rename_project(&self, uuid: ProjectId, name: &str) -> ProjectRepoResult<()>;
    /// Soft-deletes one project.
    fn soft_delete_project(&self, uuid: ProjectId) -> ProjectRepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> ProjectRepoResult<Self> {
        match probe_schema(conn, &["projects"])? {
            SchemaProbe::Ready => Ok(Self { conn }),
            SchemaProbe::VersionMismatch {
                expected_version,
                actual_version,
            } => Err(ProjectRepoError::UninitializedConnection {
                expected_version,
                actual_version,
            }),
            SchemaProbe::MissingTable(table) => Err(ProjectRepoError::MissingRequiredTable(table)),
        }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, name: &str, order_key: i64) -> ProjectRepoResult<Project> {
        let uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO projects (project_uuid, name, order_key, is_deleted)
             VALUES (?1, ?2, ?3, 0);",
            params![uuid.to_string(), name, order_key],
        )?;
        load_required_project(self.conn, uuid)
    }

    fn get_project(
        &self,
        uuid: ProjectId,
        include_deleted: bool,
    ) -> ProjectRepoResult<Option<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             WHERE project_uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;
        let mut rows = stmt.query(params![uuid.to_string(), i64::from(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn list_projects(&self, include_deleted: bool) -> ProjectRepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             WHERE (?1 = 1 OR is_deleted = 0)
             ORDER BY order_key ASC, project_uuid ASC;"
        ))?;
        let mut rows = stmt.query([i64::from(include_deleted)])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn rename_project(&self, uuid: ProjectId, name: &str) -> ProjectRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE projects
             SET name = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE project_uuid = ?1
               AND is_deleted = 0;",
            params![uuid.to_string(), name],
        )?;
        if changed == 0 {
            return Err(ProjectRepoError::NotFound(uuid));
        }
        Ok(())
    }

    fn soft_delete_project(&self, uuid: ProjectId) -> ProjectRepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE projects
             SET is_deleted = 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE project_uuid = ?1
               AND is_deleted = 0;",
            [uuid.to_string()],
        )?;
        if changed == 0 {
            return Err(ProjectRepoError::NotFound(uuid));
        }
        Ok(())
    }
}

fn load_required_project(conn: &Connection, uuid: ProjectId) -> ProjectRepoResult<Project> {
    let mut stmt = conn.prepare(&format!(
        "{PROJECT_SELECT_SQL}
         WHERE project_uuid = ?1
           AND is_deleted = 0;"
    ))?;
    let mut rows = stmt.query([uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_project_row(row);
    }
    Err(ProjectRepoError::NotFound(uuid))
}

fn parse_project_row(row: &Row<'_>) -> ProjectRepoResult<Project> {
    let uuid_text: String = row.get("project_uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        ProjectRepoError::InvalidData(format!(
            "invalid uuid `{uuid_text}` in projects.project_uuid"
        ))
    })?;

    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(ProjectRepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in projects.is_deleted"
            )));
        }
    };

    Ok(Project {
        uuid,
        name: row.get("name")?,
        order_key: row.get("order_key")?,
        is_deleted,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
