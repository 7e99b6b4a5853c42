use super::*;

impl PostgresUserRepository {
    pub(super) async fn list_groups_impl(&self, user_id: UserId) -> AppResult<Vec<GroupName>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT group_name
            FROM user_groups
            WHERE user_id = $1
            ORDER BY group_name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list user groups: {error}")))?;

        names.into_iter().map(GroupName::new).collect()
    }

    pub(super) async fn replace_groups_impl(
        &self,
        user_id: UserId,
        groups: &[GroupName],
    ) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start group transaction: {error}"))
        })?;

        sqlx::query("DELETE FROM user_groups WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to clear user groups: {error}"))
            })?;

        for group in groups {
            sqlx::query(
                r#"
                INSERT INTO user_groups (user_id, group_name)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(user_id.as_uuid())
            .bind(group.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to add user group: {error}")))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit group transaction: {error}"))
        })?;

        Ok(())
    }
}
