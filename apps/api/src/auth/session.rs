use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use taskboard_core::{AppError, UserIdentity};
use taskboard_domain::UserId;
use tower_sessions::Session;

use crate::dto::UserIdentityResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let user_id = UserId::parse(identity.subject())
        .map_err(|_| AppError::Unauthorized("session subject is not a user id".to_owned()))?;
    let user = state
        .user_service
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("session user no longer exists".to_owned()))?;
    let groups = state.user_service.list_groups(user_id).await?;

    Ok(Json(UserIdentityResponse::from_record(user, groups)))
}
