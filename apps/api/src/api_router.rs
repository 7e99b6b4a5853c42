mod cors;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{MethodRouter, delete, get, post, put};
use taskboard_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::api_config::ApiConfig;
use crate::state::AppState;
use crate::{auth, handlers, middleware};

use self::cors::build_cors_layer;

/// Wraps a method router so it only runs for logged-in callers.
fn authenticated(method_router: MethodRouter<AppState>) -> MethodRouter<AppState> {
    method_router.route_layer(from_fn(middleware::require_auth))
}

pub fn build_router(
    app_state: AppState,
    config: &ApiConfig,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let project_routes = Router::new()
        .route(
            "/api/projects",
            get(handlers::projects::list_projects_handler)
                .merge(authenticated(post(handlers::projects::create_project_handler))),
        )
        .route(
            "/api/projects/{project_id}",
            get(handlers::projects::get_project_handler).merge(authenticated(
                put(handlers::projects::update_project_handler)
                    .patch(handlers::projects::update_project_handler)
                    .delete(handlers::projects::delete_project_handler),
            )),
        )
        .route(
            "/api/projects/{project_id}/image",
            get(handlers::files::download_project_image_handler).merge(authenticated(
                put(handlers::files::upload_project_image_handler)
                    .delete(handlers::files::delete_project_image_handler)
                    .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
            )),
        )
        .route(
            "/api/projects/{project_id}/comments",
            get(handlers::comments::list_project_comments_handler).merge(authenticated(post(
                handlers::comments::create_project_comment_handler,
            ))),
        )
        .route(
            "/api/projects/{project_id}/comments/{comment_id}",
            authenticated(
                put(handlers::comments::update_project_comment_handler)
                    .delete(handlers::comments::delete_project_comment_handler),
            ),
        );

    let task_routes = Router::new()
        .route(
            "/api/projects/{project_id}/tasks",
            get(handlers::tasks::list_tasks_handler)
                .merge(authenticated(post(handlers::tasks::create_task_handler))),
        )
        .route(
            "/api/projects/{project_id}/tasks/{task_id}",
            get(handlers::tasks::get_task_handler).merge(authenticated(
                put(handlers::tasks::update_task_handler)
                    .patch(handlers::tasks::update_task_handler)
                    .delete(handlers::tasks::delete_task_handler),
            )),
        )
        .route(
            "/api/projects/{project_id}/tasks/{task_id}/comments",
            get(handlers::comments::list_task_comments_handler).merge(authenticated(post(
                handlers::comments::create_task_comment_handler,
            ))),
        )
        .route(
            "/api/projects/{project_id}/tasks/{task_id}/comments/{comment_id}",
            authenticated(
                put(handlers::comments::update_task_comment_handler)
                    .delete(handlers::comments::delete_task_comment_handler),
            ),
        )
        .route(
            "/api/projects/{project_id}/tasks/{task_id}/files",
            get(handlers::files::list_task_files_handler).merge(authenticated(
                post(handlers::files::upload_task_file_handler)
                    .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
            )),
        )
        .route(
            "/api/projects/{project_id}/tasks/{task_id}/files/{file_id}",
            get(handlers::files::download_task_file_handler)
                .merge(authenticated(delete(handlers::files::delete_task_file_handler))),
        );

    let mut auth_routes = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/me", authenticated(get(auth::me_handler)))
        .route(
            "/api/users/{user_id}/groups",
            authenticated(put(handlers::users::replace_user_groups_handler)),
        );
    if config.bootstrap_token.is_some() {
        auth_routes = auth_routes.route(
            "/auth/bootstrap",
            authenticated(post(auth::bootstrap_handler)),
        );
    }

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(project_routes)
        .merge(task_routes)
        .merge(auth_routes)
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
