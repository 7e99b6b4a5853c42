use axum::Json;
use axum::extract::{Extension, Path, State};
use taskboard_core::UserIdentity;
use taskboard_domain::UserId;
use uuid::Uuid;

use crate::dto::{ReplaceGroupsRequest, UserGroupsResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn replace_user_groups_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ReplaceGroupsRequest>,
) -> ApiResult<Json<UserGroupsResponse>> {
    let actor = state.actor_directory.resolve(&user).await?;
    let user_id = UserId::from_uuid(user_id);
    let groups = state
        .user_service
        .replace_groups(&actor, user_id, payload.groups)
        .await?;

    Ok(Json(UserGroupsResponse::new(user_id, groups)))
}
