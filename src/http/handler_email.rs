//! Handles POST /email/validate - email-domain allowlist checks.

use axum::{
    extract::{Json, State},
    response::Json as ResponseJson,
};
use serde::{Deserialize, Serialize};

use crate::http::context::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateEmailRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateEmailResponse {
    pub email_valid: bool,
}

pub async fn validate_email_handler(
    State(state): State<AppState>,
    Json(request): Json<ValidateEmailRequest>,
) -> ResponseJson<ValidateEmailResponse> {
    let email_valid = state.registry.validate_email(request.email.as_deref());
    ResponseJson(ValidateEmailResponse { email_valid })
}
