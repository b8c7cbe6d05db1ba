//! HTTP error mapping.
//!
//! Every non-2xx response carries the same JSON body shape,
//! `{"message": "..."}`, so clients have one error contract to parse.
//! Internal failures are logged with their full chain and reported to the
//! client with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use planline_core::{
    ItemRepoError, ItemServiceError, OrderServiceError, OrderStoreError, ProjectRepoError,
    ProjectServiceError,
};
use serde_json::json;

/// One HTTP-facing error: a status code and a client-safe message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

impl From<ProjectServiceError> for ApiError {
    fn from(value: ProjectServiceError) -> Self {
        match value {
            ProjectServiceError::InvalidName => Self::bad_request(value.to_string()),
            ProjectServiceError::ProjectNotFound(_) => Self::not_found(value.to_string()),
            ProjectServiceError::Repo(ProjectRepoError::Db(ref db))
                if db.is_constraint_violation() =>
            {
                Self::conflict("request conflicts with existing data")
            }
            ProjectServiceError::Order(OrderServiceError::Store(OrderStoreError::Db(ref db)))
                if db.is_constraint_violation() =>
            {
                Self::conflict("request conflicts with existing data")
            }
            other => {
                error!("event=request_failed module=api status=error error={other}");
                Self::internal()
            }
        }
    }
}

impl From<ItemServiceError> for ApiError {
    fn from(value: ItemServiceError) -> Self {
        match value {
            ItemServiceError::InvalidTitle => Self::bad_request(value.to_string()),
            ItemServiceError::ItemNotFound(_) | ItemServiceError::ProjectNotFound(_) => {
                Self::not_found(value.to_string())
            }
            ItemServiceError::Repo(ItemRepoError::Db(ref db)) if db.is_constraint_violation() => {
                Self::conflict("request conflicts with existing data")
            }
            ItemServiceError::Order(OrderServiceError::Store(OrderStoreError::Db(ref db)))
                if db.is_constraint_violation() =>
            {
                Self::conflict("request conflicts with existing data")
            }
            other => {
                error!("event=request_failed module=api status=error error={other}");
                Self::internal()
            }
        }
    }
}

/// Maps repository construction failures surfaced while wiring a request.
///
/// A connection that no longer passes schema readiness checks is a server
/// fault, never a client one.
pub fn setup_error(err: impl std::error::Error) -> ApiError {
    error!("event=repo_setup_failed module=api status=error error={err}");
    ApiError::internal()
}

/// Shared guard for malformed path ids.
pub fn parse_id(raw: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("malformed id `{raw}`")))
}
