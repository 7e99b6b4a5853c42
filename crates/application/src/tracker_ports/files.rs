use async_trait::async_trait;
use taskboard_core::AppResult;
use taskboard_domain::{ProjectId, TaskFile, TaskFileId, TaskId};

/// Repository port for task attachment records.
#[async_trait]
pub trait TaskFileRepository: Send + Sync {
    /// Inserts an attachment record.
    async fn create_task_file(&self, task_file: &TaskFile) -> AppResult<()>;

    /// Finds an attachment of a task.
    async fn find_task_file(
        &self,
        task_id: TaskId,
        task_file_id: TaskFileId,
    ) -> AppResult<Option<TaskFile>>;

    /// Lists a task's attachments, oldest first.
    async fn list_task_files(&self, task_id: TaskId) -> AppResult<Vec<TaskFile>>;

    /// Deletes an attachment record.
    async fn delete_task_file(&self, task_file_id: TaskFileId) -> AppResult<()>;

    /// Lists blob references of every attachment under a project.
    async fn list_content_refs_for_project(&self, project_id: ProjectId) -> AppResult<Vec<String>>;

    /// Lists blob references of every attachment of a task.
    async fn list_content_refs_for_task(&self, task_id: TaskId) -> AppResult<Vec<String>>;
}

/// Port for opaque attachment content.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` and returns a reference for later reads.
    async fn store(&self, filename: &str, bytes: Vec<u8>) -> AppResult<String>;

    /// Loads stored bytes.
    async fn load(&self, content_ref: &str) -> AppResult<Vec<u8>>;

    /// Removes stored bytes. Removing a missing blob is not an error.
    async fn remove(&self, content_ref: &str) -> AppResult<()>;
}
