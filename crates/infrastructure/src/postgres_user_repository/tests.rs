use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use taskboard_application::UserRepository;
use taskboard_core::AppError;
use taskboard_domain::{GroupName, Username};

use super::PostgresUserRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres user tests: {error}");
    }

    Some(pool)
}

fn unique_username(prefix: &str) -> Username {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    Username::new(format!("{prefix}-{}", &suffix[..12])).unwrap_or_else(|_| panic!("test"))
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresUserRepository::new(pool);
    let username = unique_username("dup");

    let created = repository.create(&username, "hash").await;
    assert!(created.is_ok());

    let duplicate = repository.create(&username, "hash").await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn groups_are_replaced_wholesale() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresUserRepository::new(pool);
    let user = repository
        .create(&unique_username("groups"), "hash")
        .await
        .unwrap_or_else(|_| panic!("test"));

    let author = GroupName::new("author").unwrap_or_else(|_| panic!("test"));
    let reviewer = GroupName::new("reviewer").unwrap_or_else(|_| panic!("test"));

    let first = repository
        .replace_groups(user.id, &[author.clone(), reviewer.clone()])
        .await;
    assert!(first.is_ok());

    let second = repository
        .replace_groups(user.id, std::slice::from_ref(&reviewer))
        .await;
    assert!(second.is_ok());

    let groups = repository
        .list_groups(user.id)
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(groups, vec![reviewer]);
}

#[tokio::test]
async fn administrator_flag_round_trips_through_lookup() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresUserRepository::new(pool);
    let user = repository
        .create(&unique_username("admin"), "hash")
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert!(!user.is_administrator);

    let promoted = repository.set_administrator(user.id, true).await;
    assert!(promoted.is_ok());

    let found = repository
        .find_by_username(user.username.as_str())
        .await
        .unwrap_or_else(|_| panic!("test"));
    assert!(found.is_some_and(|record| record.is_administrator));
}
