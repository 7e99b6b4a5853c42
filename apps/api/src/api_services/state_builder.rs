use std::sync::Arc;

use sqlx::PgPool;
use taskboard_application::{
    AccessGroups, ActorDirectory, AuthorizationService, BlobStore, CommentService,
    ProjectService, TaskFileService, TaskService, UserService,
};
use taskboard_core::AppError;
use taskboard_domain::GroupName;
use taskboard_infrastructure::Argon2PasswordHasher;

use crate::api_config::ApiConfig;
use crate::state::AppState;

mod repositories;

pub fn build_app_state(
    pool: PgPool,
    config: &ApiConfig,
    blobs: Arc<dyn BlobStore>,
) -> Result<AppState, AppError> {
    let repositories = repositories::build_repository_set(&pool);
    let groups = AccessGroups {
        author_group: GroupName::new(config.author_group.as_str())?,
        commenter_group: GroupName::new(config.commenter_group.as_str())?,
    };

    let actor_directory = ActorDirectory::new(repositories.user_repository.clone());
    let authorization_service = AuthorizationService::new(groups);
    let tracker = repositories.tracker_repository;

    let user_service = UserService::new(
        repositories.user_repository,
        Arc::new(Argon2PasswordHasher::new()),
    );

    Ok(AppState {
        project_service: ProjectService::new(
            actor_directory.clone(),
            authorization_service.clone(),
            tracker.clone(),
            tracker.clone(),
            tracker.clone(),
            blobs.clone(),
        ),
        task_service: TaskService::new(
            actor_directory.clone(),
            authorization_service.clone(),
            tracker.clone(),
            tracker.clone(),
            tracker.clone(),
            tracker.clone(),
            blobs.clone(),
        ),
        comment_service: CommentService::new(
            actor_directory.clone(),
            authorization_service.clone(),
            tracker.clone(),
            tracker.clone(),
            tracker.clone(),
        ),
        task_file_service: TaskFileService::new(
            actor_directory.clone(),
            authorization_service,
            tracker.clone(),
            tracker.clone(),
            tracker,
            blobs,
        ),
        actor_directory,
        user_service,
        postgres_pool: pool,
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
    })
}
