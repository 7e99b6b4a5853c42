use std::sync::Arc;

use sqlx::PgPool;
use taskboard_infrastructure::{PostgresTrackerRepository, PostgresUserRepository};

pub(super) struct RepositorySet {
    pub(super) user_repository: Arc<PostgresUserRepository>,
    pub(super) tracker_repository: Arc<PostgresTrackerRepository>,
}

pub(super) fn build_repository_set(pool: &PgPool) -> RepositorySet {
    RepositorySet {
        user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
        tracker_repository: Arc::new(PostgresTrackerRepository::new(pool.clone())),
    }
}
