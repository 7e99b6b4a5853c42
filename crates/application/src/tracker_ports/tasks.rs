use async_trait::async_trait;
use taskboard_core::AppResult;
use taskboard_domain::{ProjectId, Task, TaskId};

/// Repository port for tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a new task.
    async fn create_task(&self, task: &Task) -> AppResult<()>;

    /// Finds a task inside a project.
    async fn find_task(&self, project_id: ProjectId, task_id: TaskId) -> AppResult<Option<Task>>;

    /// Lists a project's tasks ordered by number ascending.
    async fn list_tasks(&self, project_id: ProjectId) -> AppResult<Vec<Task>>;

    /// Persists `task` under the same optimistic version rules as projects.
    async fn update_task(&self, task: &Task, expected_version: i64) -> AppResult<Task>;

    /// Deletes a task together with its comments and attachments.
    async fn delete_task(&self, project_id: ProjectId, task_id: TaskId) -> AppResult<()>;
}
