mod types;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use taskboard_core::AppError;
use tracing::error;

pub use types::ErrorResponse;

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
        }

        let message = self.0.to_string();
        let payload = match self.0 {
            AppError::DisallowedFields(fields) => {
                ErrorResponse::new(message).with_disallowed_fields(fields)
            }
            _ => ErrorResponse::new(message),
        };

        (status, Json(payload)).into_response()
    }
}

fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::Validation(_) | AppError::MissingAttachment(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::Forbidden(_) | AppError::DisallowedFields(_) => StatusCode::FORBIDDEN,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use taskboard_core::AppError;

    use super::ApiError;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(error).into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|_| panic!("body should be readable"));
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| panic!("body should be json"));
        (status, value)
    }

    #[tokio::test]
    async fn disallowed_fields_are_reported_with_forbidden_status() {
        let (status, body) =
            body_json(AppError::DisallowedFields(vec!["title".to_owned()])).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["disallowed_fields"], serde_json::json!(["title"]));
    }

    #[tokio::test]
    async fn other_errors_omit_the_field_list() {
        let (status, body) = body_json(AppError::NotFound("project".to_owned())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.get("disallowed_fields").is_none());
        assert_eq!(body["message"], "not found: project");
    }

    #[tokio::test]
    async fn missing_attachment_is_a_bad_request() {
        let (status, _) = body_json(AppError::MissingAttachment("file".to_owned())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
