use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    message: String,
    /// Submitted fields the caller was not allowed to change.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    disallowed_fields: Option<Vec<String>>,
}

impl ErrorResponse {
    pub(super) fn new(message: String) -> Self {
        Self {
            message,
            disallowed_fields: None,
        }
    }

    pub(super) fn with_disallowed_fields(mut self, fields: Vec<String>) -> Self {
        self.disallowed_fields = Some(fields);
        self
    }
}
