use std::sync::Arc;

use chrono::Utc;
use taskboard_core::{AppError, AppResult, UserIdentity};
use taskboard_domain::{ProjectId, TaskFile, TaskFileId, TaskId};
use tracing::{info, warn};

use crate::project_service::load_project;
use crate::task_service::load_task;
use crate::{
    ActorDirectory, AuthorizationService, BlobStore, ProjectRepository, TaskFileRepository,
    TaskRepository,
};

/// File part received with an upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-supplied filename.
    pub filename: String,
    /// File content.
    pub bytes: Vec<u8>,
}

/// Attachment record together with its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFileDownload {
    /// Attachment record.
    pub task_file: TaskFile,
    /// Stored bytes.
    pub bytes: Vec<u8>,
}

/// Application service for task attachments.
#[derive(Clone)]
pub struct TaskFileService {
    actors: ActorDirectory,
    authorization: AuthorizationService,
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
    task_files: Arc<dyn TaskFileRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl TaskFileService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        actors: ActorDirectory,
        authorization: AuthorizationService,
        projects: Arc<dyn ProjectRepository>,
        tasks: Arc<dyn TaskRepository>,
        task_files: Arc<dyn TaskFileRepository>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            actors,
            authorization,
            projects,
            tasks,
            task_files,
            blobs,
        }
    }

    /// Lists a task's attachments.
    pub async fn list_task_files(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> AppResult<Vec<TaskFile>> {
        load_project(self.projects.as_ref(), project_id).await?;
        load_task(self.tasks.as_ref(), project_id, task_id).await?;
        self.task_files.list_task_files(task_id).await
    }

    /// Stores an uploaded file and records it against the task.
    ///
    /// `file` is `None` when the request carried no file part.
    pub async fn upload_task_file(
        &self,
        identity: &UserIdentity,
        project_id: ProjectId,
        task_id: TaskId,
        file: Option<UploadedFile>,
    ) -> AppResult<TaskFile> {
        let actor = self.actors.resolve(identity).await?;
        let project = load_project(self.projects.as_ref(), project_id).await?;
        load_task(self.tasks.as_ref(), project_id, task_id).await?;
        self.authorization
            .require_attachment_upload(&actor, &project)?;

        let file = file.ok_or_else(|| AppError::MissingAttachment("file".to_owned()))?;
        let content_ref = self.blobs.store(&file.filename, file.bytes).await?;

        let recorded = async {
            let task_file = TaskFile::new(
                TaskFileId::new(),
                task_id,
                content_ref.clone(),
                file.filename,
                actor.user_id(),
                Utc::now(),
            )?;
            self.task_files.create_task_file(&task_file).await?;
            Ok::<_, AppError>(task_file)
        }
        .await;

        let task_file = match recorded {
            Ok(task_file) => task_file,
            Err(error) => {
                if let Err(cleanup_error) = self.blobs.remove(&content_ref).await {
                    warn!(
                        content_ref = %content_ref,
                        error = %cleanup_error,
                        "failed to remove orphaned attachment blob"
                    );
                }
                return Err(error);
            }
        };

        info!(
            user_id = %actor.user_id(),
            task_id = %task_id,
            task_file_id = %task_file.id(),
            "attachment uploaded"
        );
        Ok(task_file)
    }

    /// Returns an attachment with its content.
    pub async fn download_task_file(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        task_file_id: TaskFileId,
    ) -> AppResult<TaskFileDownload> {
        load_project(self.projects.as_ref(), project_id).await?;
        load_task(self.tasks.as_ref(), project_id, task_id).await?;
        let task_file = self.load(task_id, task_file_id).await?;
        let bytes = self.blobs.load(task_file.content_ref()).await?;

        Ok(TaskFileDownload { task_file, bytes })
    }

    /// Deletes an attachment record and its content.
    pub async fn delete_task_file(
        &self,
        identity: &UserIdentity,
        project_id: ProjectId,
        task_id: TaskId,
        task_file_id: TaskFileId,
    ) -> AppResult<()> {
        let actor = self.actors.resolve(identity).await?;
        let project = load_project(self.projects.as_ref(), project_id).await?;
        load_task(self.tasks.as_ref(), project_id, task_id).await?;
        let task_file = self.load(task_id, task_file_id).await?;
        self.authorization
            .require_attachment_removal(&actor, &project, &task_file)?;

        self.task_files.delete_task_file(task_file_id).await?;
        if let Err(error) = self.blobs.remove(task_file.content_ref()).await {
            warn!(
                task_file_id = %task_file_id,
                %error,
                "failed to remove attachment blob"
            );
        }

        info!(
            user_id = %actor.user_id(),
            task_id = %task_id,
            task_file_id = %task_file_id,
            "attachment deleted"
        );
        Ok(())
    }

    async fn load(&self, task_id: TaskId, task_file_id: TaskFileId) -> AppResult<TaskFile> {
        self.task_files
            .find_task_file(task_id, task_file_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("attachment '{task_file_id}' does not exist"))
            })
    }
}
