use sqlx::{Postgres, QueryBuilder};
use taskboard_application::ProjectSortField;

use super::*;

const PROJECT_COLUMNS: &str = "id, title, description, status, start_date, end_date, author_id, \
     executor_id, comment, image_ref, image_filename, version, created_at, updated_at";

impl PostgresTrackerRepository {
    pub(super) async fn create_project_impl(&self, project: &Project) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO projects (
                id, title, description, status, start_date, end_date,
                author_id, executor_id, comment, image_ref, image_filename,
                version, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(project.id().as_uuid())
        .bind(project.title())
        .bind(project.description())
        .bind(project.status().code())
        .bind(project.start_date())
        .bind(project.end_date())
        .bind(project.author().as_uuid())
        .bind(project.executor().as_uuid())
        .bind(project.comment())
        .bind(project.image().map(|image| image.content_ref.as_str()))
        .bind(project.image().map(|image| image.filename.as_str()))
        .bind(project.version())
        .bind(project.created_at())
        .bind(project.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create project: {error}")))?;

        Ok(())
    }

    pub(super) async fn find_project_impl(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(project_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find project: {error}")))?;

        row.map(Project::try_from).transpose()
    }

    pub(super) async fn list_projects_impl(
        &self,
        query: &ProjectListQuery,
    ) -> AppResult<Vec<Project>> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE TRUE"));

        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.code());
        }
        if let Some(start_date) = query.start_date {
            builder.push(" AND start_date = ").push_bind(start_date);
        }
        if let Some(end_date_until) = query.end_date_until {
            builder.push(" AND end_date <= ").push_bind(end_date_until);
        }
        if let Some(executor) = query.executor {
            builder
                .push(" AND executor_id = ")
                .push_bind(executor.as_uuid());
        }

        let column = match query.sort.field {
            ProjectSortField::CreatedAt => "created_at",
            ProjectSortField::Title => "title",
            ProjectSortField::StartDate => "start_date",
            ProjectSortField::EndDate => "end_date",
            ProjectSortField::Status => "status",
        };
        let direction = if query.sort.descending { "DESC" } else { "ASC" };
        builder.push(format!(" ORDER BY {column} {direction} NULLS LAST, id ASC"));

        let rows = builder
            .build_query_as::<ProjectRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list projects: {error}")))?;

        rows.into_iter().map(Project::try_from).collect()
    }

    pub(super) async fn update_project_impl(
        &self,
        project: &Project,
        expected_version: i64,
    ) -> AppResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects
            SET title = $3,
                description = $4,
                status = $5,
                start_date = $6,
                end_date = $7,
                executor_id = $8,
                comment = $9,
                image_ref = $10,
                image_filename = $11,
                updated_at = $12,
                version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(project.id().as_uuid())
        .bind(expected_version)
        .bind(project.title())
        .bind(project.description())
        .bind(project.status().code())
        .bind(project.start_date())
        .bind(project.end_date())
        .bind(project.executor().as_uuid())
        .bind(project.comment())
        .bind(project.image().map(|image| image.content_ref.as_str()))
        .bind(project.image().map(|image| image.filename.as_str()))
        .bind(project.updated_at())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update project: {error}")))?;

        match row {
            Some(row) => Project::try_from(row),
            None => Err(
                stale_or_missing(&self.pool, "projects", project.id().as_uuid(), "project").await,
            ),
        }
    }

    pub(super) async fn delete_project_impl(&self, project_id: ProjectId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(project_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete project: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "project '{project_id}' does not exist"
            )));
        }

        Ok(())
    }
}
