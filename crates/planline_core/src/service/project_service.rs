//! Project use-case service.
//!
//! # Responsibility
//! - Validate project input above the repository layer.
//! - Wire creation to the append contract of the ordering service.
//! - Expose the project-scope ordering operations.
//!
//! # Invariants
//! - Project names are trimmed and must not be blank.
//! - A created project lands at the end of the global project list.

use crate::model::project::{Project, ProjectId};
use crate::repo::order_store::{OrderScope, OrderStore};
use crate::repo::project_repo::{ProjectRepoError, ProjectRepository};
use crate::service::order_service::{MoveOutcome, OrderService, OrderServiceError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Errors from project service operations.
#[derive(Debug)]
pub enum ProjectServiceError {
    /// Project name is blank after trim.
    InvalidName,
    /// Target project does not exist or is soft-deleted.
    ProjectNotFound(ProjectId),
    /// Ordering-level failure.
    Order(OrderServiceError),
    /// Repository-level failure.
    Repo(ProjectRepoError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "project name must not be blank"),
            Self::ProjectNotFound(uuid) => write!(f, "project not found: {uuid}"),
            Self::Order(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Order(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProjectRepoError> for ProjectServiceError {
    fn from(value: ProjectRepoError) -> Self {
        match value {
            ProjectRepoError::NotFound(uuid) => Self::ProjectNotFound(uuid),
            other => Self::Repo(other),
        }
    }
}

impl From<OrderServiceError> for ProjectServiceError {
    fn from(value: OrderServiceError) -> Self {
        match value {
            OrderServiceError::RecordNotFound(uuid) => Self::ProjectNotFound(uuid),
            other => Self::Order(other),
        }
    }
}

/// Use-case facade over project persistence and the global project ordering.
pub struct ProjectService<P: ProjectRepository, S: OrderStore> {
    projects: P,
    ordering: OrderService<S>,
}

impl<P: ProjectRepository, S: OrderStore> ProjectService<P, S> {
    /// Creates a service from repository and order store implementations.
    pub fn new(projects: P, order_store: S) -> Self {
        Self {
            projects,
            ordering: OrderService::new(order_store),
        }
    }

    /// Creates one project appended to the end of the project list.
    pub fn create_project(
        &self,
        name: impl Into<String>,
    ) -> Result<Project, ProjectServiceError> {
        let normalized = normalize_name(name.into())?;
        let order_key = self.ordering.append_key(&OrderScope::Projects)?;
        self.projects
            .create_project(normalized.as_str(), order_key)
            .map_err(Into::into)
    }

    /// Lists live projects ascending by order key.
    pub fn list_projects(&self) -> Result<Vec<Project>, ProjectServiceError> {
        self.projects.list_projects(false).map_err(Into::into)
    }

    /// Loads one live project.
    pub fn get_project(&self, uuid: ProjectId) -> Result<Project, ProjectServiceError> {
        self.projects
            .get_project(uuid, false)?
            .ok_or(ProjectServiceError::ProjectNotFound(uuid))
    }

    /// Renames one project.
    pub fn rename_project(
        &self,
        uuid: ProjectId,
        name: impl Into<String>,
    ) -> Result<Project, ProjectServiceError> {
        let normalized = normalize_name(name.into())?;
        self.projects.rename_project(uuid, normalized.as_str())?;
        self.get_project(uuid)
    }

    /// Soft-deletes one project. Surviving siblings keep their keys.
    pub fn delete_project(&self, uuid: ProjectId) -> Result<(), ProjectServiceError> {
        self.projects.soft_delete_project(uuid).map_err(Into::into)
    }

    /// Moves one project a single slot toward the front of the list.
    pub fn move_up(&self, uuid: ProjectId) -> Result<MoveOutcome, ProjectServiceError> {
        self.ordering
            .move_up(&OrderScope::Projects, uuid)
            .map_err(Into::into)
    }

    /// Moves one project a single slot toward the back of the list.
    pub fn move_down(&self, uuid: ProjectId) -> Result<MoveOutcome, ProjectServiceError> {
        self.ordering
            .move_down(&OrderScope::Projects, uuid)
            .map_err(Into::into)
    }

    /// Assigns an explicit order key to one project.
    pub fn set_order_key(
        &self,
        uuid: ProjectId,
        order_key: i64,
    ) -> Result<Project, ProjectServiceError> {
        self.ordering
            .set_order_key(&OrderScope::Projects, uuid, order_key)?;
        self.get_project(uuid)
    }

    /// Reassigns step-spaced keys to the listed projects in list sequence.
    pub fn reorder(&self, ordered_ids: &[Uuid]) -> Result<(), ProjectServiceError> {
        self.ordering
            .reorder(&OrderScope::Projects, ordered_ids)
            .map_err(Into::into)
    }

    /// Renumbers the whole project list with step-spaced keys.
    pub fn renumber(&self) -> Result<usize, ProjectServiceError> {
        self.ordering
            .renumber(&OrderScope::Projects)
            .map_err(Into::into)
    }
}

fn normalize_name(value: String) -> Result<String, ProjectServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProjectServiceError::InvalidName);
    }
    Ok(trimmed.to_string())
}
