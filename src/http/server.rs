//! Main router configuration assembling the registration and email endpoints.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{
    context::AppState,
    handler_clients::{
        app_delete_client_handler, app_get_client_handler, app_list_clients_handler,
        app_register_client_handler, app_rotate_secret_handler, app_update_client_handler,
    },
    handler_email::validate_email_handler,
};

/// Build the application router
pub fn build_router(ctx: AppState) -> Router {
    let mut client_routes = Router::new()
        .route("/clients", get(app_list_clients_handler))
        .route("/clients/{client_id}", get(app_get_client_handler));

    // Mutating routes answer 403 when the registration API is disabled
    if *ctx.config.enable_registration_api.as_ref() {
        client_routes = client_routes
            .route("/clients", post(app_register_client_handler))
            .route("/clients/{client_id}", put(app_update_client_handler))
            .route("/clients/{client_id}", delete(app_delete_client_handler))
            .route(
                "/clients/{client_id}/rotate-secret",
                post(app_rotate_secret_handler),
            );
    } else {
        client_routes = client_routes
            .route("/clients", post(registration_disabled_handler))
            .route("/clients/{client_id}", put(registration_disabled_handler))
            .route("/clients/{client_id}", delete(registration_disabled_handler))
            .route(
                "/clients/{client_id}/rotate-secret",
                post(registration_disabled_handler),
            );
    }

    Router::new()
        .route("/health", get(health_handler))
        .route("/email/validate", post(validate_email_handler))
        .merge(client_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn registration_disabled_handler() -> (StatusCode, ResponseJson<Value>) {
    (
        StatusCode::FORBIDDEN,
        ResponseJson(json!({
            "error": "registration_disabled",
            "error_description": "The registration API is disabled"
        })),
    )
}

async fn health_handler(State(state): State<AppState>) -> ResponseJson<Value> {
    ResponseJson(json!({
        "status": "ok",
        "version": state.config.version,
    }))
}
