//! Handlers for the application registration API under /clients.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    errors::RegistryError,
    http::context::AppState,
    registry::types::{AppRegistration, AppRegistrationRequest, AppRegistrationResponse},
};

/// Map a registry error to an HTTP status and OAuth-style error body
fn registry_error_response(error: &RegistryError) -> (StatusCode, ResponseJson<Value>) {
    let (status, error_code, description) = match error {
        RegistryError::DuplicateClientId(_) => {
            (StatusCode::CONFLICT, "duplicate_client_id", error.to_string())
        }
        RegistryError::InvalidField(_) => {
            (StatusCode::BAD_REQUEST, "invalid_field", error.to_string())
        }
        RegistryError::NotFound(_) => {
            (StatusCode::NOT_FOUND, "client_not_found", error.to_string())
        }
        RegistryError::Storage(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "server_error",
            "Internal server error".to_string(),
        ),
    };

    (
        status,
        ResponseJson(json!({
            "error": error_code,
            "error_description": description
        })),
    )
}

pub async fn app_register_client_handler(
    State(state): State<AppState>,
    Json(request): Json<AppRegistrationRequest>,
) -> Result<ResponseJson<AppRegistrationResponse>, (StatusCode, ResponseJson<Value>)> {
    let registration = request.into_registration();

    match state.registry.register(&registration).await {
        Ok(()) => Ok(ResponseJson(AppRegistrationResponse::from_registration(
            registration,
            true,
        ))),
        Err(e) => Err(registry_error_response(&e)),
    }
}

pub async fn app_get_client_handler(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<ResponseJson<AppRegistrationResponse>, (StatusCode, ResponseJson<Value>)> {
    match state.registry.lookup(&client_id).await {
        Ok(Some(registration)) => Ok(ResponseJson(AppRegistrationResponse::from_registration(
            registration,
            false,
        ))),
        Ok(None) => Err(registry_error_response(&RegistryError::NotFound(client_id))),
        Err(e) => Err(registry_error_response(&e)),
    }
}

pub async fn app_update_client_handler(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Json(request): Json<AppRegistrationRequest>,
) -> Result<ResponseJson<AppRegistrationResponse>, (StatusCode, ResponseJson<Value>)> {
    let existing = match state.registry.lookup(&client_id).await {
        Ok(Some(existing)) => existing,
        Ok(None) => return Err(registry_error_response(&RegistryError::NotFound(client_id))),
        Err(e) => return Err(registry_error_response(&e)),
    };

    // The path owns the client ID; the secret is kept unless the request
    // supplies a replacement.
    let registration = AppRegistration {
        client_id: existing.client_id.clone(),
        client_secret: request
            .client_secret
            .unwrap_or_else(|| existing.client_secret.clone()),
        tenant_id: request.tenant_id,
        redirect_uri: request.redirect_uri,
        scopes: request.scopes,
        authority: request.authority,
        app_name: request.app_name,
        app_description: request.app_description,
        grant_types: request.grant_types.unwrap_or(existing.grant_types),
        response_types: request.response_types.unwrap_or(existing.response_types),
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    };

    match state.registry.update(&registration).await {
        Ok(()) => match state.registry.lookup(&registration.client_id).await {
            Ok(Some(updated)) => Ok(ResponseJson(AppRegistrationResponse::from_registration(
                updated, false,
            ))),
            Ok(None) => Err(registry_error_response(&RegistryError::NotFound(
                registration.client_id,
            ))),
            Err(e) => Err(registry_error_response(&e)),
        },
        Err(e) => Err(registry_error_response(&e)),
    }
}

pub async fn app_rotate_secret_handler(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<ResponseJson<AppRegistrationResponse>, (StatusCode, ResponseJson<Value>)> {
    match state.registry.rotate_secret(&client_id).await {
        Ok(registration) => Ok(ResponseJson(AppRegistrationResponse::from_registration(
            registration,
            true,
        ))),
        Err(e) => Err(registry_error_response(&e)),
    }
}

pub async fn app_delete_client_handler(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<StatusCode, (StatusCode, ResponseJson<Value>)> {
    match state.registry.delete(&client_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(registry_error_response(&e)),
    }
}

#[derive(Deserialize)]
pub struct ListClientsQuery {
    pub limit: Option<usize>,
}

pub async fn app_list_clients_handler(
    State(state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
) -> Result<ResponseJson<Vec<AppRegistrationResponse>>, (StatusCode, ResponseJson<Value>)> {
    match state.registry.list(query.limit).await {
        Ok(registrations) => Ok(ResponseJson(
            registrations
                .into_iter()
                .map(|r| AppRegistrationResponse::from_registration(r, false))
                .collect(),
        )),
        Err(e) => Err(registry_error_response(&e)),
    }
}
