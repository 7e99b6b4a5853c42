use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use taskboard_core::UserIdentity;
use taskboard_domain::{ProjectId, TaskId};
use uuid::Uuid;

use crate::dto::{
    CreateTaskRequest, TaskDetailsResponse, TaskResponse, UpdateTaskRequest, parse_patch,
    submitted_fields,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_tasks_handler(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = state
        .task_service
        .list_tasks(ProjectId::from_uuid(project_id))
        .await?
        .into_iter()
        .map(TaskResponse::from)
        .collect();

    Ok(Json(tasks))
}

pub async fn get_task_handler(
    State(state): State<AppState>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<TaskDetailsResponse>> {
    let details = state
        .task_service
        .get_task(ProjectId::from_uuid(project_id), TaskId::from_uuid(task_id))
        .await?;

    Ok(Json(TaskDetailsResponse::from(details)))
}

pub async fn create_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let task = state
        .task_service
        .create_task(&user, ProjectId::from_uuid(project_id), payload.try_into()?)
        .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

pub async fn update_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<serde_json::Value>,
) -> ApiResult<Json<TaskResponse>> {
    let (project_id, task_id) = (ProjectId::from_uuid(project_id), TaskId::from_uuid(task_id));
    state
        .task_service
        .check_task_update(&user, project_id, task_id, &submitted_fields(&payload))
        .await?;

    let request = parse_patch::<UpdateTaskRequest>(payload)?;
    let task = state
        .task_service
        .update_task(&user, project_id, task_id, request.into())
        .await?;

    Ok(Json(TaskResponse::from(task)))
}

pub async fn delete_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .task_service
        .delete_task(
            &user,
            ProjectId::from_uuid(project_id),
            TaskId::from_uuid(task_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
