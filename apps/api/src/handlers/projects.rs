use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use taskboard_application::ProjectListQuery;
use taskboard_core::UserIdentity;
use taskboard_domain::ProjectId;
use uuid::Uuid;

use crate::dto::{
    CreateProjectRequest, ProjectDetailsResponse, ProjectListParams, ProjectResponse,
    UpdateProjectRequest, parse_patch, submitted_fields,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_projects_handler(
    State(state): State<AppState>,
    Query(params): Query<ProjectListParams>,
) -> ApiResult<Json<Vec<ProjectResponse>>> {
    let query = ProjectListQuery::try_from(params)?;
    let projects = state
        .project_service
        .list_projects(&query)
        .await?
        .into_iter()
        .map(ProjectResponse::from)
        .collect();

    Ok(Json(projects))
}

pub async fn get_project_handler(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<ProjectDetailsResponse>> {
    let details = state
        .project_service
        .get_project(ProjectId::from_uuid(project_id))
        .await?;

    Ok(Json(ProjectDetailsResponse::from(details)))
}

pub async fn create_project_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    let project = state
        .project_service
        .create_project(&user, payload.try_into()?)
        .await?;

    Ok((StatusCode::CREATED, Json(ProjectResponse::from(project))))
}

/// Serves both `PUT` and `PATCH`. Either way only the submitted keys are
/// checked and applied. Key names are authorized before values are decoded.
pub async fn update_project_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<serde_json::Value>,
) -> ApiResult<Json<ProjectResponse>> {
    let project_id = ProjectId::from_uuid(project_id);
    state
        .project_service
        .check_project_update(&user, project_id, &submitted_fields(&payload))
        .await?;

    let request = parse_patch::<UpdateProjectRequest>(payload)?;
    let project = state
        .project_service
        .update_project(&user, project_id, request.into())
        .await?;

    Ok(Json(ProjectResponse::from(project)))
}

pub async fn delete_project_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .project_service
        .delete_project(&user, ProjectId::from_uuid(project_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
