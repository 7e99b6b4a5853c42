use sqlx::PgPool;
use taskboard_application::{
    ActorDirectory, CommentService, ProjectService, TaskFileService, TaskService, UserService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub actor_directory: ActorDirectory,
    pub project_service: ProjectService,
    pub task_service: TaskService,
    pub comment_service: CommentService,
    pub task_file_service: TaskFileService,
    pub user_service: UserService,
    pub postgres_pool: PgPool,
    pub frontend_url: String,
    pub bootstrap_token: Option<String>,
}
