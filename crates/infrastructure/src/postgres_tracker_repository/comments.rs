use super::*;

const COMMENT_COLUMNS: &str = "id, project_id, task_id, author_id, text, created_at";

/// Column and key that select comments attached to `target`.
fn target_filter(target: CommentTarget) -> (&'static str, Uuid) {
    match target {
        CommentTarget::Project(project_id) => ("project_id", project_id.as_uuid()),
        CommentTarget::Task(task_id) => ("task_id", task_id.as_uuid()),
    }
}

impl PostgresTrackerRepository {
    pub(super) async fn create_comment_impl(&self, comment: &Comment) -> AppResult<()> {
        let target = comment.target();
        sqlx::query(
            r#"
            INSERT INTO comments (id, project_id, task_id, author_id, text, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.id().as_uuid())
        .bind(target.project_id().map(|project_id| project_id.as_uuid()))
        .bind(target.task_id().map(|task_id| task_id.as_uuid()))
        .bind(comment.author().as_uuid())
        .bind(comment.text())
        .bind(comment.created_at())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create comment: {error}")))?;

        Ok(())
    }

    pub(super) async fn find_comment_impl(
        &self,
        target: CommentTarget,
        comment_id: CommentId,
    ) -> AppResult<Option<Comment>> {
        let (column, key) = target_filter(target);
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1 AND {column} = $2"
        ))
        .bind(comment_id.as_uuid())
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find comment: {error}")))?;

        row.map(Comment::try_from).transpose()
    }

    pub(super) async fn list_comments_impl(
        &self,
        target: CommentTarget,
    ) -> AppResult<Vec<Comment>> {
        let (column, key) = target_filter(target);
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE {column} = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(key)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list comments: {error}")))?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    pub(super) async fn update_comment_impl(&self, comment: &Comment) -> AppResult<()> {
        let result = sqlx::query("UPDATE comments SET text = $2 WHERE id = $1")
            .bind(comment.id().as_uuid())
            .bind(comment.text())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to update comment: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "comment '{}' does not exist",
                comment.id()
            )));
        }

        Ok(())
    }

    pub(super) async fn delete_comment_impl(&self, comment_id: CommentId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete comment: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "comment '{comment_id}' does not exist"
            )));
        }

        Ok(())
    }
}
