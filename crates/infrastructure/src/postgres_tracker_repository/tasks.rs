use super::*;

const TASK_COLUMNS: &str =
    "id, project_id, number, title, description, status, start_date, end_date, version, created_at";

impl PostgresTrackerRepository {
    pub(super) async fn create_task_impl(&self, task: &Task) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, project_id, number, title, description, status,
                start_date, end_date, version, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(task.id().as_uuid())
        .bind(task.project_id().as_uuid())
        .bind(task.number())
        .bind(task.title())
        .bind(task.description())
        .bind(task.status().code())
        .bind(task.start_date())
        .bind(task.end_date())
        .bind(task.version())
        .bind(task.created_at())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create task: {error}")))?;

        Ok(())
    }

    pub(super) async fn find_task_impl(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> AppResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 AND id = $2"
        ))
        .bind(project_id.as_uuid())
        .bind(task_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find task: {error}")))?;

        row.map(Task::try_from).transpose()
    }

    pub(super) async fn list_tasks_impl(&self, project_id: ProjectId) -> AppResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY number ASC, created_at ASC"
        ))
        .bind(project_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list tasks: {error}")))?;

        rows.into_iter().map(Task::try_from).collect()
    }

    pub(super) async fn update_task_impl(
        &self,
        task: &Task,
        expected_version: i64,
    ) -> AppResult<Task> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            UPDATE tasks
            SET number = $3,
                title = $4,
                description = $5,
                status = $6,
                start_date = $7,
                end_date = $8,
                version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task.id().as_uuid())
        .bind(expected_version)
        .bind(task.number())
        .bind(task.title())
        .bind(task.description())
        .bind(task.status().code())
        .bind(task.start_date())
        .bind(task.end_date())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update task: {error}")))?;

        match row {
            Some(row) => Task::try_from(row),
            None => Err(stale_or_missing(&self.pool, "tasks", task.id().as_uuid(), "task").await),
        }
    }

    pub(super) async fn delete_task_impl(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE project_id = $1 AND id = $2")
            .bind(project_id.as_uuid())
            .bind(task_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete task: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("task '{task_id}' does not exist")));
        }

        Ok(())
    }
}
