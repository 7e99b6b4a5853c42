use super::*;

impl PostgresUserRepository {
    pub(super) async fn create_impl(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, is_administrator, created_at
            "#,
        )
        .bind(UserId::new().as_uuid())
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| username_conflict_or_internal(error, "create user"))?;

        Ok(UserRecord::from(row))
    }

    pub(super) async fn set_administrator_impl(
        &self,
        user_id: UserId,
        is_administrator: bool,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_administrator = $2
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(is_administrator)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update administrator flag: {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        Ok(())
    }
}
