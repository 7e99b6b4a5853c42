use serde::Serialize;
use taskboard_domain::TaskFile;
use ts_rs::TS;

/// API representation of a task attachment. Content is served separately.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/task-file-response.ts"
)]
pub struct TaskFileResponse {
    pub id: String,
    pub task_id: String,
    pub filename: String,
    pub uploaded_by: String,
    pub uploaded_at: String,
}

impl From<TaskFile> for TaskFileResponse {
    fn from(task_file: TaskFile) -> Self {
        Self {
            id: task_file.id().to_string(),
            task_id: task_file.task_id().to_string(),
            filename: task_file.filename().to_owned(),
            uploaded_by: task_file.uploaded_by().to_string(),
            uploaded_at: task_file.uploaded_at().to_rfc3339(),
        }
    }
}
