//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use taskboard_application::{UserRecord, UserRepository};
use taskboard_core::{AppError, AppResult};
use taskboard_domain::{GroupName, UserId, Username};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    username: String,
    password_hash: String,
    is_administrator: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            username: row.username,
            password_hash: row.password_hash,
            is_administrator: row.is_administrator,
            created_at: row.created_at,
        }
    }
}

mod account;
mod groups;
mod lookup;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        self.find_by_username_impl(username).await
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.find_by_id_impl(user_id).await
    }

    async fn create(&self, username: &Username, password_hash: &str) -> AppResult<UserRecord> {
        self.create_impl(username, password_hash).await
    }

    async fn list_groups(&self, user_id: UserId) -> AppResult<Vec<GroupName>> {
        self.list_groups_impl(user_id).await
    }

    async fn replace_groups(&self, user_id: UserId, groups: &[GroupName]) -> AppResult<()> {
        self.replace_groups_impl(user_id, groups).await
    }

    async fn set_administrator(&self, user_id: UserId, is_administrator: bool) -> AppResult<()> {
        self.set_administrator_impl(user_id, is_administrator).await
    }
}

fn username_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("a user with this username already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

#[cfg(test)]
mod tests;
