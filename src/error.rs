use crate::models::ErrorResponse;
use crate::services::geodistance::GeodistanceError;
use crate::services::store::StoreError;
use crate::services::tasks::TaskError;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Engine-wide error taxonomy. Every lifecycle and pipeline operation funnels
/// into this enum, which also drives the HTTP status of API responses.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("permission denied for {action} on {resource}")]
    PermissionDenied {
        resource: &'static str,
        action: &'static str,
    },

    #[error("a tutorship already exists between this child and tutor (id {existing_id})")]
    DuplicateRelationship { existing_id: i64 },

    #[error("final approval is blocked by incomplete task {task_id}")]
    BlockedByIncompleteTask { task_id: i64 },

    #[error("role {approver_role_id} already approved tutorship {tutorship_id}")]
    DuplicateApproval {
        tutorship_id: i64,
        approver_role_id: i64,
    },

    /// State that should be unreachable, e.g. an approval counter out of step
    /// with the approver list.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("child {child_id} is not eligible for matching (life status {life_status})")]
    IneligibleChild {
        child_id: i64,
        life_status: &'static str,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Geodistance(#[from] GeodistanceError),
}

impl EngineError {
    /// Stable machine-readable kind for API clients
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::PermissionDenied { .. } => "permission_denied",
            EngineError::DuplicateRelationship { .. } => "duplicate_relationship",
            EngineError::BlockedByIncompleteTask { .. } => "blocked_by_incomplete_task",
            EngineError::DuplicateApproval { .. } => "duplicate_approval",
            EngineError::InvariantViolation(_) => "invariant_violation",
            EngineError::IneligibleChild { .. } => "ineligible_child",
            EngineError::NotFound { .. } => "not_found",
            EngineError::Database(_) | EngineError::Store(_) | EngineError::Geodistance(_) => {
                "internal_error"
            }
        }
    }
}

impl From<TaskError> for EngineError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(id) => EngineError::NotFound { entity: "task", id },
            TaskError::Sqlx(e) => EngineError::Database(e),
            TaskError::Store(e) => EngineError::Store(e),
        }
    }
}

impl ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            EngineError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            EngineError::DuplicateRelationship { .. } => StatusCode::CONFLICT,
            EngineError::BlockedByIncompleteTask { .. } => StatusCode::CONFLICT,
            EngineError::DuplicateApproval { .. } => StatusCode::CONFLICT,
            EngineError::InvariantViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EngineError::IneligibleChild { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::Database(_) | EngineError::Store(_) | EngineError::Geodistance(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}
