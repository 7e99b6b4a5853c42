use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use taskboard_application::CommentScope;
use taskboard_core::UserIdentity;
use taskboard_domain::{CommentId, ProjectId, TaskId};
use uuid::Uuid;

use crate::dto::{CommentResponse, SaveCommentRequest};
use crate::error::ApiResult;
use crate::state::AppState;

fn task_scope(project_id: Uuid, task_id: Uuid) -> CommentScope {
    CommentScope::Task {
        project_id: ProjectId::from_uuid(project_id),
        task_id: TaskId::from_uuid(task_id),
    }
}

fn project_scope(project_id: Uuid) -> CommentScope {
    CommentScope::Project(ProjectId::from_uuid(project_id))
}

async fn list_in_scope(
    state: &AppState,
    scope: CommentScope,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    let comments = state
        .comment_service
        .list_comments(scope)
        .await?
        .into_iter()
        .map(CommentResponse::from)
        .collect();

    Ok(Json(comments))
}

async fn create_in_scope(
    state: &AppState,
    user: &UserIdentity,
    scope: CommentScope,
    payload: SaveCommentRequest,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    let comment = state
        .comment_service
        .create_comment(user, scope, payload.text)
        .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

async fn update_in_scope(
    state: &AppState,
    user: &UserIdentity,
    scope: CommentScope,
    comment_id: Uuid,
    payload: SaveCommentRequest,
) -> ApiResult<Json<CommentResponse>> {
    let comment = state
        .comment_service
        .update_comment(user, scope, CommentId::from_uuid(comment_id), payload.text)
        .await?;

    Ok(Json(CommentResponse::from(comment)))
}

async fn delete_in_scope(
    state: &AppState,
    user: &UserIdentity,
    scope: CommentScope,
    comment_id: Uuid,
) -> ApiResult<StatusCode> {
    state
        .comment_service
        .delete_comment(user, scope, CommentId::from_uuid(comment_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_project_comments_handler(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    list_in_scope(&state, project_scope(project_id)).await
}

pub async fn create_project_comment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<SaveCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    create_in_scope(&state, &user, project_scope(project_id), payload).await
}

pub async fn update_project_comment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((project_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SaveCommentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    update_in_scope(&state, &user, project_scope(project_id), comment_id, payload).await
}

pub async fn delete_project_comment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((project_id, comment_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    delete_in_scope(&state, &user, project_scope(project_id), comment_id).await
}

pub async fn list_task_comments_handler(
    State(state): State<AppState>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    list_in_scope(&state, task_scope(project_id, task_id)).await
}

pub async fn create_task_comment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SaveCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    create_in_scope(&state, &user, task_scope(project_id, task_id), payload).await
}

pub async fn update_task_comment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((project_id, task_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(payload): Json<SaveCommentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    update_in_scope(
        &state,
        &user,
        task_scope(project_id, task_id),
        comment_id,
        payload,
    )
    .await
}

pub async fn delete_task_comment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((project_id, task_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    delete_in_scope(&state, &user, task_scope(project_id, task_id), comment_id).await
}
