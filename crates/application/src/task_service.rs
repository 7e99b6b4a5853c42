use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use taskboard_core::{AppError, AppResult, UserIdentity};
use taskboard_domain::access::TouchedFields;
use taskboard_domain::{
    Comment, CommentTarget, ProjectId, Task, TaskDraft, TaskField, TaskFile, TaskId, TaskPatch,
};
use tracing::info;

use crate::project_service::{load_project, remove_blobs};
use crate::{
    ActorDirectory, AuthorizationService, BlobStore, CommentRepository, ProjectRepository,
    TaskFileRepository, TaskRepository,
};

/// Task together with its parent project summary, attachments and comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    /// The task.
    pub task: Task,
    /// Title of the owning project.
    pub project_title: String,
    /// Attachments, oldest first.
    pub files: Vec<TaskFile>,
    /// Comments, oldest first.
    pub comments: Vec<Comment>,
}

/// Application service for task use-cases.
#[derive(Clone)]
pub struct TaskService {
    actors: ActorDirectory,
    authorization: AuthorizationService,
    projects: Arc<dyn ProjectRepository>,
    tasks: Arc<dyn TaskRepository>,
    comments: Arc<dyn CommentRepository>,
    task_files: Arc<dyn TaskFileRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl TaskService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        actors: ActorDirectory,
        authorization: AuthorizationService,
        projects: Arc<dyn ProjectRepository>,
        tasks: Arc<dyn TaskRepository>,
        comments: Arc<dyn CommentRepository>,
        task_files: Arc<dyn TaskFileRepository>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            actors,
            authorization,
            projects,
            tasks,
            comments,
            task_files,
            blobs,
        }
    }

    /// Lists a project's tasks by number.
    pub async fn list_tasks(&self, project_id: ProjectId) -> AppResult<Vec<Task>> {
        load_project(self.projects.as_ref(), project_id).await?;
        self.tasks.list_tasks(project_id).await
    }

    /// Returns a task with its project title, attachments and comments.
    pub async fn get_task(&self, project_id: ProjectId, task_id: TaskId) -> AppResult<TaskDetails> {
        let project = load_project(self.projects.as_ref(), project_id).await?;
        let task = load_task(self.tasks.as_ref(), project_id, task_id).await?;
        let files = self.task_files.list_task_files(task_id).await?;
        let comments = self
            .comments
            .list_comments(CommentTarget::Task(task_id))
            .await?;

        Ok(TaskDetails {
            task,
            project_title: project.title().to_owned(),
            files,
            comments,
        })
    }

    /// Creates a task under a project the caller controls.
    pub async fn create_task(
        &self,
        identity: &UserIdentity,
        project_id: ProjectId,
        draft: TaskDraft,
    ) -> AppResult<Task> {
        let actor = self.actors.resolve(identity).await?;
        let project = load_project(self.projects.as_ref(), project_id).await?;
        self.authorization.require_project_control(&actor, &project)?;

        let task = Task::create(project_id, draft, Utc::now())?;
        self.tasks.create_task(&task).await?;

        info!(
            user_id = %actor.user_id(),
            project_id = %project_id,
            task_id = %task.id(),
            "task created"
        );
        Ok(task)
    }

    /// Checks the submitted field names before their values are decoded.
    pub async fn check_task_update(
        &self,
        identity: &UserIdentity,
        project_id: ProjectId,
        task_id: TaskId,
        attempted: &BTreeSet<TaskField>,
    ) -> AppResult<()> {
        let actor = self.actors.resolve(identity).await?;
        let project = load_project(self.projects.as_ref(), project_id).await?;
        load_task(self.tasks.as_ref(), project_id, task_id).await?;
        self.authorization
            .authorize_task_fields(&actor, &project, attempted)
    }

    /// Applies a partial update when every submitted field is allowed.
    pub async fn update_task(
        &self,
        identity: &UserIdentity,
        project_id: ProjectId,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> AppResult<Task> {
        let actor = self.actors.resolve(identity).await?;
        let project = load_project(self.projects.as_ref(), project_id).await?;
        let task = load_task(self.tasks.as_ref(), project_id, task_id).await?;
        self.authorization
            .authorize_task_update(&actor, &project, &patch)?;

        if patch.touched_fields().is_empty() {
            return Ok(task);
        }

        let updated = task.with_patch(patch)?;
        let stored = self.tasks.update_task(&updated, task.version()).await?;

        info!(
            user_id = %actor.user_id(),
            project_id = %project_id,
            task_id = %task_id,
            version = stored.version(),
            "task updated"
        );
        Ok(stored)
    }

    /// Deletes a task with its comments and attachments.
    pub async fn delete_task(
        &self,
        identity: &UserIdentity,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> AppResult<()> {
        let actor = self.actors.resolve(identity).await?;
        let project = load_project(self.projects.as_ref(), project_id).await?;
        load_task(self.tasks.as_ref(), project_id, task_id).await?;
        self.authorization.require_project_control(&actor, &project)?;

        let content_refs = self.task_files.list_content_refs_for_task(task_id).await?;
        self.tasks.delete_task(project_id, task_id).await?;
        remove_blobs(self.blobs.as_ref(), &content_refs).await;

        info!(
            user_id = %actor.user_id(),
            project_id = %project_id,
            task_id = %task_id,
            "task deleted"
        );
        Ok(())
    }
}

pub(crate) async fn load_task(
    tasks: &dyn TaskRepository,
    project_id: ProjectId,
    task_id: TaskId,
) -> AppResult<Task> {
    tasks
        .find_task(project_id, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("task '{task_id}' does not exist")))
}
