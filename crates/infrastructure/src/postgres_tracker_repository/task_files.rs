use super::*;

impl PostgresTrackerRepository {
    pub(super) async fn create_task_file_impl(&self, task_file: &TaskFile) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO task_files (id, task_id, content_ref, filename, uploaded_by, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(task_file.id().as_uuid())
        .bind(task_file.task_id().as_uuid())
        .bind(task_file.content_ref())
        .bind(task_file.filename())
        .bind(task_file.uploaded_by().as_uuid())
        .bind(task_file.uploaded_at())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create attachment: {error}")))?;

        Ok(())
    }

    pub(super) async fn find_task_file_impl(
        &self,
        task_id: TaskId,
        task_file_id: TaskFileId,
    ) -> AppResult<Option<TaskFile>> {
        let row = sqlx::query_as::<_, TaskFileRow>(
            r#"
            SELECT id, task_id, content_ref, filename, uploaded_by, uploaded_at
            FROM task_files
            WHERE task_id = $1 AND id = $2
            "#,
        )
        .bind(task_id.as_uuid())
        .bind(task_file_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find attachment: {error}")))?;

        row.map(TaskFile::try_from).transpose()
    }

    pub(super) async fn list_task_files_impl(&self, task_id: TaskId) -> AppResult<Vec<TaskFile>> {
        let rows = sqlx::query_as::<_, TaskFileRow>(
            r#"
            SELECT id, task_id, content_ref, filename, uploaded_by, uploaded_at
            FROM task_files
            WHERE task_id = $1
            ORDER BY uploaded_at ASC, id ASC
            "#,
        )
        .bind(task_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list attachments: {error}")))?;

        rows.into_iter().map(TaskFile::try_from).collect()
    }

    pub(super) async fn delete_task_file_impl(&self, task_file_id: TaskFileId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM task_files WHERE id = $1")
            .bind(task_file_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete attachment: {error}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "attachment '{task_file_id}' does not exist"
            )));
        }

        Ok(())
    }

    pub(super) async fn list_content_refs_for_project_impl(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT task_files.content_ref
            FROM task_files
            JOIN tasks ON tasks.id = task_files.task_id
            WHERE tasks.project_id = $1
            "#,
        )
        .bind(project_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list project attachment blobs: {error}"))
        })
    }

    pub(super) async fn list_content_refs_for_task_impl(
        &self,
        task_id: TaskId,
    ) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT content_ref FROM task_files WHERE task_id = $1")
            .bind(task_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list task attachment blobs: {error}"))
            })
    }
}
