use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use taskboard_core::{AppError, UserIdentity};

use crate::dto::AuthBootstrapRequest;
use crate::error::ApiResult;
use crate::state::AppState;

/// Promotes the logged-in user to administrator. Only mounted when a
/// bootstrap token is configured.
pub async fn bootstrap_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<AuthBootstrapRequest>,
) -> ApiResult<StatusCode> {
    let expected = state
        .bootstrap_token
        .as_deref()
        .ok_or_else(|| AppError::NotFound("bootstrap is disabled".to_owned()))?;
    let actor = state.actor_directory.resolve(&identity).await?;

    state
        .user_service
        .bootstrap_administrator(actor.user_id(), expected, &payload.token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
