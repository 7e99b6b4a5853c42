//! PostgreSQL-backed project, task, comment and attachment repositories.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use taskboard_application::{
    CommentRepository, ProjectListQuery, ProjectRepository, TaskFileRepository, TaskRepository,
};
use taskboard_core::{AppError, AppResult};
use taskboard_domain::{
    Comment, CommentId, CommentTarget, Project, ProjectId, ProjectImage, ProjectParts, Task,
    TaskFile, TaskFileId, TaskId, TaskParts, UserId, WorkStatus,
};

mod comments;
mod projects;
mod task_files;
mod tasks;

/// PostgreSQL implementation of the tracker repository ports.
#[derive(Clone)]
pub struct PostgresTrackerRepository {
    pool: PgPool,
}

impl PostgresTrackerRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: Uuid,
    title: String,
    description: String,
    status: i16,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    author_id: Uuid,
    executor_id: Uuid,
    comment: String,
    image_ref: Option<String>,
    image_filename: Option<String>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = AppError;

    fn try_from(row: ProjectRow) -> AppResult<Self> {
        Project::from_parts(ProjectParts {
            id: ProjectId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            status: WorkStatus::from_code(row.status)?,
            start_date: row.start_date,
            end_date: row.end_date,
            author: UserId::from_uuid(row.author_id),
            executor: UserId::from_uuid(row.executor_id),
            comment: row.comment,
            image: match (row.image_ref, row.image_filename) {
                (Some(content_ref), Some(filename)) => Some(ProjectImage {
                    content_ref,
                    filename,
                }),
                _ => None,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
            version: row.version,
        })
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: Uuid,
    project_id: Uuid,
    number: i32,
    title: String,
    description: String,
    status: i16,
    start_date: NaiveDate,
    end_date: NaiveDate,
    version: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = AppError;

    fn try_from(row: TaskRow) -> AppResult<Self> {
        Task::from_parts(TaskParts {
            id: TaskId::from_uuid(row.id),
            project_id: ProjectId::from_uuid(row.project_id),
            number: row.number,
            title: row.title,
            description: row.description,
            status: WorkStatus::from_code(row.status)?,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            version: row.version,
        })
    }
}

#[derive(Debug, FromRow)]
struct CommentRow {
    id: Uuid,
    project_id: Option<Uuid>,
    task_id: Option<Uuid>,
    author_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = AppError;

    fn try_from(row: CommentRow) -> AppResult<Self> {
        let target = CommentTarget::from_columns(
            row.project_id.map(ProjectId::from_uuid),
            row.task_id.map(TaskId::from_uuid),
        )?;

        Comment::new(
            CommentId::from_uuid(row.id),
            target,
            UserId::from_uuid(row.author_id),
            row.text,
            row.created_at,
        )
    }
}

#[derive(Debug, FromRow)]
struct TaskFileRow {
    id: Uuid,
    task_id: Uuid,
    content_ref: String,
    filename: String,
    uploaded_by: Uuid,
    uploaded_at: DateTime<Utc>,
}

impl TryFrom<TaskFileRow> for TaskFile {
    type Error = AppError;

    fn try_from(row: TaskFileRow) -> AppResult<Self> {
        TaskFile::new(
            TaskFileId::from_uuid(row.id),
            TaskId::from_uuid(row.task_id),
            row.content_ref,
            row.filename,
            UserId::from_uuid(row.uploaded_by),
            row.uploaded_at,
        )
    }
}

#[async_trait]
impl ProjectRepository for PostgresTrackerRepository {
    async fn create_project(&self, project: &Project) -> AppResult<()> {
        self.create_project_impl(project).await
    }

    async fn find_project(&self, project_id: ProjectId) -> AppResult<Option<Project>> {
        self.find_project_impl(project_id).await
    }

    async fn list_projects(&self, query: &ProjectListQuery) -> AppResult<Vec<Project>> {
        self.list_projects_impl(query).await
    }

    async fn update_project(&self, project: &Project, expected_version: i64) -> AppResult<Project> {
        self.update_project_impl(project, expected_version).await
    }

    async fn delete_project(&self, project_id: ProjectId) -> AppResult<()> {
        self.delete_project_impl(project_id).await
    }
}

#[async_trait]
impl TaskRepository for PostgresTrackerRepository {
    async fn create_task(&self, task: &Task) -> AppResult<()> {
        self.create_task_impl(task).await
    }

    async fn find_task(&self, project_id: ProjectId, task_id: TaskId) -> AppResult<Option<Task>> {
        self.find_task_impl(project_id, task_id).await
    }

    async fn list_tasks(&self, project_id: ProjectId) -> AppResult<Vec<Task>> {
        self.list_tasks_impl(project_id).await
    }

    async fn update_task(&self, task: &Task, expected_version: i64) -> AppResult<Task> {
        self.update_task_impl(task, expected_version).await
    }

    async fn delete_task(&self, project_id: ProjectId, task_id: TaskId) -> AppResult<()> {
        self.delete_task_impl(project_id, task_id).await
    }
}

#[async_trait]
impl CommentRepository for PostgresTrackerRepository {
    async fn create_comment(&self, comment: &Comment) -> AppResult<()> {
        self.create_comment_impl(comment).await
    }

    async fn find_comment(
        &self,
        target: CommentTarget,
        comment_id: CommentId,
    ) -> AppResult<Option<Comment>> {
        self.find_comment_impl(target, comment_id).await
    }

    async fn list_comments(&self, target: CommentTarget) -> AppResult<Vec<Comment>> {
        self.list_comments_impl(target).await
    }

    async fn update_comment(&self, comment: &Comment) -> AppResult<()> {
        self.update_comment_impl(comment).await
    }

    async fn delete_comment(&self, comment_id: CommentId) -> AppResult<()> {
        self.delete_comment_impl(comment_id).await
    }
}

#[async_trait]
impl TaskFileRepository for PostgresTrackerRepository {
    async fn create_task_file(&self, task_file: &TaskFile) -> AppResult<()> {
        self.create_task_file_impl(task_file).await
    }

    async fn find_task_file(
        &self,
        task_id: TaskId,
        task_file_id: TaskFileId,
    ) -> AppResult<Option<TaskFile>> {
        self.find_task_file_impl(task_id, task_file_id).await
    }

    async fn list_task_files(&self, task_id: TaskId) -> AppResult<Vec<TaskFile>> {
        self.list_task_files_impl(task_id).await
    }

    async fn delete_task_file(&self, task_file_id: TaskFileId) -> AppResult<()> {
        self.delete_task_file_impl(task_file_id).await
    }

    async fn list_content_refs_for_project(&self, project_id: ProjectId) -> AppResult<Vec<String>> {
        self.list_content_refs_for_project_impl(project_id).await
    }

    async fn list_content_refs_for_task(&self, task_id: TaskId) -> AppResult<Vec<String>> {
        self.list_content_refs_for_task_impl(task_id).await
    }
}

/// Chooses the error for an update that matched no row.
async fn stale_or_missing(
    pool: &PgPool,
    table: &'static str,
    id: Uuid,
    label: &str,
) -> AppError {
    let exists = sqlx::query_scalar::<_, bool>(&format!(
        "SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1)"
    ))
    .bind(id)
    .fetch_one(pool)
    .await;

    match exists {
        Ok(true) => AppError::Conflict(format!(
            "{label} '{id}' was modified concurrently, reload and retry"
        )),
        Ok(false) => AppError::NotFound(format!("{label} '{id}' does not exist")),
        Err(error) => AppError::Internal(format!("failed to check {label} existence: {error}")),
    }
}
