use serde::Deserialize;
use ts_rs::TS;

/// Incoming payload for username/password registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-register-request.ts"
)]
pub struct AuthRegisterRequest {
    pub username: String,
    pub password: String,
}

/// Incoming payload for username/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-login-request.ts"
)]
pub struct AuthLoginRequest {
    pub username: String,
    pub password: String,
}

/// Incoming payload for administrator bootstrap.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-bootstrap-request.ts"
)]
pub struct AuthBootstrapRequest {
    pub token: String,
}
