use async_trait::async_trait;
use taskboard_core::AppResult;
use taskboard_domain::{Comment, CommentId, CommentTarget};

/// Repository port for comments.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Inserts a new comment.
    async fn create_comment(&self, comment: &Comment) -> AppResult<()>;

    /// Finds a comment attached to `target`.
    async fn find_comment(
        &self,
        target: CommentTarget,
        comment_id: CommentId,
    ) -> AppResult<Option<Comment>>;

    /// Lists comments attached to `target`, oldest first.
    async fn list_comments(&self, target: CommentTarget) -> AppResult<Vec<Comment>>;

    /// Replaces the text of a stored comment.
    async fn update_comment(&self, comment: &Comment) -> AppResult<()>;

    /// Deletes a comment.
    async fn delete_comment(&self, comment_id: CommentId) -> AppResult<()>;
}
