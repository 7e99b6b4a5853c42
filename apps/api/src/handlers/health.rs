use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use sqlx::PgPool;
use tracing::warn;

use crate::dto::HealthResponse;
use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let postgres_ok = check_postgres(&state.postgres_pool).await;

    if postgres_ok {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                postgres: "ok",
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded",
                postgres: "error",
            }),
        )
    }
}

async fn check_postgres(pool: &PgPool) -> bool {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
        Ok(_) => true,
        Err(error) => {
            warn!(%error, "postgres health check failed");
            false
        }
    }
}
