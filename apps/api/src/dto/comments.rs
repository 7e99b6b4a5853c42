use serde::{Deserialize, Serialize};
use taskboard_domain::Comment;
use ts_rs::TS;

/// Incoming payload for comment creation and edits.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-comment-request.ts"
)]
pub struct SaveCommentRequest {
    pub text: String,
}

/// API representation of a comment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/comment-response.ts"
)]
pub struct CommentResponse {
    pub id: String,
    pub project_id: Option<String>,
    pub task_id: Option<String>,
    pub author: String,
    pub text: String,
    pub created_at: String,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        let target = comment.target();
        Self {
            id: comment.id().to_string(),
            project_id: target.project_id().map(|id| id.to_string()),
            task_id: target.task_id().map(|id| id.to_string()),
            author: comment.author().to_string(),
            text: comment.text().to_owned(),
            created_at: comment.created_at().to_rfc3339(),
        }
    }
}
