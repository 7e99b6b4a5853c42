mod auth;
mod comments;
mod common;
mod files;
mod projects;
mod tasks;
mod users;

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use taskboard_core::AppError;
use taskboard_domain::access::TrackedField;

pub use auth::{AuthBootstrapRequest, AuthLoginRequest, AuthRegisterRequest};
pub use comments::{CommentResponse, SaveCommentRequest};
pub use common::{HealthResponse, UserIdentityResponse};
pub use files::TaskFileResponse;
pub use projects::{
    CreateProjectRequest, ProjectDetailsResponse, ProjectListParams, ProjectResponse,
    UpdateProjectRequest,
};
pub use tasks::{CreateTaskRequest, TaskDetailsResponse, TaskResponse, UpdateTaskRequest};
pub use users::{ReplaceGroupsRequest, UserGroupsResponse};

/// Returns the known field names present in a partial-update body.
///
/// Unknown keys are skipped here and rejected by [`parse_patch`].
pub fn submitted_fields<F: TrackedField>(payload: &serde_json::Value) -> BTreeSet<F> {
    payload
        .as_object()
        .map(|object| object.keys().filter_map(|key| F::from_wire(key)).collect())
        .unwrap_or_default()
}

/// Decodes a partial-update body, reporting unknown keys and bad values as
/// validation errors.
pub fn parse_patch<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T, AppError> {
    if !payload.is_object() {
        return Err(AppError::Validation(
            "update payload must be a JSON object".to_owned(),
        ));
    }

    serde_json::from_value(payload)
        .map_err(|error| AppError::Validation(format!("invalid update payload: {error}")))
}
