use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use taskboard_application::TaskDetails;
use taskboard_core::{AppError, Patch};
use taskboard_domain::{Task, TaskDraft, TaskPatch, WorkStatus};
use ts_rs::TS;

use super::comments::CommentResponse;
use super::files::TaskFileResponse;

/// Incoming payload for task creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-task-request.ts"
)]
pub struct CreateTaskRequest {
    pub number: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<i16>,
    #[ts(type = "string")]
    pub start_date: NaiveDate,
    #[ts(type = "string")]
    pub end_date: NaiveDate,
}

impl TryFrom<CreateTaskRequest> for TaskDraft {
    type Error = AppError;

    fn try_from(value: CreateTaskRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            number: value.number,
            title: value.title,
            description: value.description,
            status: value
                .status
                .map(WorkStatus::from_code)
                .transpose()?
                .unwrap_or_default(),
            start_date: value.start_date,
            end_date: value.end_date,
        })
    }
}

/// Incoming partial update for a task.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateTaskRequest {
    pub number: Patch<i32>,
    pub title: Patch<String>,
    pub description: Patch<String>,
    pub status: Patch<WorkStatus>,
    pub start_date: Patch<NaiveDate>,
    pub end_date: Patch<NaiveDate>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(value: UpdateTaskRequest) -> Self {
        Self {
            number: value.number,
            title: value.title,
            description: value.description,
            status: value.status,
            start_date: value.start_date,
            end_date: value.end_date,
        }
    }
}

/// API representation of a task.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/task-response.ts"
)]
pub struct TaskResponse {
    pub id: String,
    pub project_id: String,
    pub number: i32,
    pub title: String,
    pub description: String,
    pub status: i16,
    pub start_date: String,
    pub end_date: String,
    pub created_at: String,
    pub version: i64,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id().to_string(),
            project_id: task.project_id().to_string(),
            number: task.number(),
            title: task.title().to_owned(),
            description: task.description().to_owned(),
            status: task.status().code(),
            start_date: task.start_date().to_string(),
            end_date: task.end_date().to_string(),
            created_at: task.created_at().to_rfc3339(),
            version: task.version(),
        }
    }
}

/// A task with its project title, attachments and comments.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/task-details-response.ts"
)]
pub struct TaskDetailsResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub task: TaskResponse,
    pub project_title: String,
    pub files: Vec<TaskFileResponse>,
    pub comments: Vec<CommentResponse>,
}

impl From<TaskDetails> for TaskDetailsResponse {
    fn from(value: TaskDetails) -> Self {
        Self {
            task: TaskResponse::from(value.task),
            project_title: value.project_title,
            files: value
                .files
                .into_iter()
                .map(TaskFileResponse::from)
                .collect(),
            comments: value
                .comments
                .into_iter()
                .map(CommentResponse::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use taskboard_domain::{TaskDraft, TaskPatch, WorkStatus};

    use super::{CreateTaskRequest, UpdateTaskRequest};
    use crate::dto::parse_patch;

    #[test]
    fn create_defaults_status_to_open() {
        let request: CreateTaskRequest = serde_json::from_value(json!({
            "number": 1,
            "title": "Survey",
            "start_date": "2026-03-01",
            "end_date": "2026-03-05",
        }))
        .unwrap_or_else(|_| panic!("task request should parse"));

        let draft = TaskDraft::try_from(request).unwrap_or_else(|_| panic!("draft"));
        assert_eq!(draft.status, WorkStatus::Open);
        assert_eq!(draft.description, "");
    }

    #[test]
    fn null_end_date_is_rejected_for_tasks() {
        assert!(parse_patch::<UpdateTaskRequest>(json!({"end_date": null})).is_err());
        let request: UpdateTaskRequest = parse_patch(json!({"number": 4}))
            .unwrap_or_else(|_| panic!("number patch should parse"));
        assert_eq!(TaskPatch::from(request).number.value(), Some(&4));
    }
}
