use axum::Json;
use axum::extract::{Extension, Multipart, Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use taskboard_application::UploadedFile;
use taskboard_core::{AppError, UserIdentity};
use taskboard_domain::{ProjectId, TaskFileId, TaskId};
use uuid::Uuid;

use crate::dto::{ProjectResponse, TaskFileResponse};
use crate::error::ApiResult;
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const IMAGE_FIELD: &str = "image";
const FALLBACK_FILENAME: &str = "upload";

pub async fn list_task_files_handler(
    State(state): State<AppState>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<TaskFileResponse>>> {
    let files = state
        .task_file_service
        .list_task_files(ProjectId::from_uuid(project_id), TaskId::from_uuid(task_id))
        .await?
        .into_iter()
        .map(TaskFileResponse::from)
        .collect();

    Ok(Json(files))
}

pub async fn upload_task_file_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<TaskFileResponse>)> {
    let file = read_file_part(multipart, FILE_FIELD).await?;
    let task_file = state
        .task_file_service
        .upload_task_file(
            &user,
            ProjectId::from_uuid(project_id),
            TaskId::from_uuid(task_id),
            file,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TaskFileResponse::from(task_file))))
}

pub async fn download_task_file_handler(
    State(state): State<AppState>,
    Path((project_id, task_id, file_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<Response> {
    let download = state
        .task_file_service
        .download_task_file(
            ProjectId::from_uuid(project_id),
            TaskId::from_uuid(task_id),
            TaskFileId::from_uuid(file_id),
        )
        .await?;

    attachment_response(download.task_file.filename(), download.bytes)
}

pub async fn delete_task_file_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((project_id, task_id, file_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .task_file_service
        .delete_task_file(
            &user,
            ProjectId::from_uuid(project_id),
            TaskId::from_uuid(task_id),
            TaskFileId::from_uuid(file_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn upload_project_image_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Json<ProjectResponse>> {
    let image = read_file_part(multipart, IMAGE_FIELD).await?;
    let project = state
        .project_service
        .set_project_image(&user, ProjectId::from_uuid(project_id), image)
        .await?;

    Ok(Json(ProjectResponse::from(project)))
}

pub async fn download_project_image_handler(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Response> {
    let download = state
        .project_service
        .download_project_image(ProjectId::from_uuid(project_id))
        .await?;

    attachment_response(&download.image.filename, download.bytes)
}

pub async fn delete_project_image_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .project_service
        .remove_project_image(&user, ProjectId::from_uuid(project_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the first part named `field_name`. Other parts are skipped.
async fn read_file_part(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| AppError::Validation(format!("invalid multipart body: {error}")))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILENAME)
            .to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|error| AppError::Validation(format!("failed to read upload: {error}")))?;

        return Ok(Some(UploadedFile {
            filename,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}

fn attachment_response(filename: &str, bytes: Vec<u8>) -> ApiResult<Response> {
    let disposition = content_disposition(filename)?;
    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

fn content_disposition(filename: &str) -> Result<HeaderValue, AppError> {
    let safe_name: String = filename
        .chars()
        .map(|character| {
            if character.is_ascii_graphic() && character != '"' && character != '\\' {
                character
            } else {
                '_'
            }
        })
        .collect();

    HeaderValue::from_str(&format!("attachment; filename=\"{safe_name}\""))
        .map_err(|error| AppError::Internal(format!("invalid content disposition: {error}")))
}
