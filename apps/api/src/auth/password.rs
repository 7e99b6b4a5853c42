use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use taskboard_application::{AuthOutcome, RegisterParams};
use taskboard_core::AppError;
use tower_sessions::Session;

use crate::dto::{AuthLoginRequest, AuthRegisterRequest, UserIdentityResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::start_session;

pub async fn register_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AuthRegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserIdentityResponse>)> {
    let user = state
        .user_service
        .register(RegisterParams {
            username: payload.username,
            password: payload.password,
        })
        .await?;

    start_session(&session, &user).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserIdentityResponse::from_record(user, Vec::new())),
    ))
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AuthLoginRequest>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let outcome = state
        .user_service
        .login(&payload.username, &payload.password)
        .await?;

    match outcome {
        AuthOutcome::Authenticated(user) => {
            start_session(&session, &user).await?;
            let groups = state.user_service.list_groups(user.id).await?;

            Ok(Json(UserIdentityResponse::from_record(user, groups)))
        }
        AuthOutcome::Failed => {
            Err(AppError::Unauthorized("invalid username or password".to_owned()).into())
        }
    }
}
