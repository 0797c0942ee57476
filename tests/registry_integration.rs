//! Registry integration tests.
//!
//! These tests verify the complete registration lifecycle through the
//! library API and the HTTP surface: registration, lookup, update, secret
//! rotation, deletion, and email-domain validation.

use axum_test::TestServer;
use chrono::Utc;
use idp::config::Config;
use idp::http::{AppState, build_router};
use idp::registry::types::{AppRegistration, AppRegistrationResponse};
use idp::registry::{ClientRegistry, EmailDomainPolicy};
use idp::storage::inmemory::MemoryRegistrationStore;
use serde_json::{Value, json};
use std::sync::Arc;

fn test_registry() -> Arc<ClientRegistry> {
    Arc::new(ClientRegistry::new(
        Arc::new(MemoryRegistrationStore::new()),
        EmailDomainPolicy::new(["example.com", "test.com"]),
    ))
}

fn test_registration(client_id: &str) -> AppRegistration {
    let now = Utc::now();
    AppRegistration {
        client_id: client_id.to_string(),
        client_secret: "initial-secret".to_string(),
        tenant_id: "contoso".to_string(),
        redirect_uri: "https://app.example.com/callback".to_string(),
        scopes: vec!["openid".to_string(), "profile".to_string()],
        authority: "https://login.example.com/contoso".to_string(),
        app_name: "Integration Test App".to_string(),
        app_description: None,
        grant_types: vec!["authorization_code".to_string()],
        response_types: vec!["code".to_string()],
        created_at: now,
        updated_at: now,
    }
}

fn test_server() -> TestServer {
    let state = AppState {
        config: Arc::new(Config::new().unwrap()),
        registry: test_registry(),
    };
    TestServer::new(build_router(state)).unwrap()
}

fn test_server_registration_disabled() -> TestServer {
    let config = Config {
        version: "test".to_string(),
        http_port: "8080".to_string().try_into().unwrap(),
        storage_backend: "memory".to_string(),
        database_url: None,
        allowed_email_domains: "example.com;test.com".to_string().try_into().unwrap(),
        enable_registration_api: "false".to_string().try_into().unwrap(),
    };
    let state = AppState {
        config: Arc::new(config),
        registry: test_registry(),
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn test_complete_registration_lifecycle() {
    let registry = test_registry();

    // Register and read back the exact record
    let registration = test_registration("lifecycle-app");
    registry.register(&registration).await.unwrap();

    let found = registry.lookup("lifecycle-app").await.unwrap().unwrap();
    assert_eq!(found, registration);

    // A second registration under the same client ID is rejected
    let err = registry.register(&registration).await.unwrap_err();
    assert!(matches!(
        err,
        idp::errors::RegistryError::DuplicateClientId(_)
    ));

    // Credential rotation changes the secret and persists it
    let rotated = registry.rotate_secret("lifecycle-app").await.unwrap();
    assert_ne!(rotated.client_secret, "initial-secret");
    let found = registry.lookup("lifecycle-app").await.unwrap().unwrap();
    assert_eq!(found.client_secret, rotated.client_secret);
    assert!(found.updated_at >= registration.updated_at);

    // Update replaces metadata
    let mut updated = found.clone();
    updated.app_name = "Renamed App".to_string();
    registry.update(&updated).await.unwrap();
    let found = registry.lookup("lifecycle-app").await.unwrap().unwrap();
    assert_eq!(found.app_name, "Renamed App");

    // Decommission
    registry.delete("lifecycle-app").await.unwrap();
    assert!(registry.lookup("lifecycle-app").await.unwrap().is_none());
}

#[tokio::test]
async fn test_email_validation_properties() {
    let registry = test_registry();

    assert!(!registry.validate_email(None));
    assert!(!registry.validate_email(Some("")));
    assert!(registry.validate_email(Some("user@example.com")));
    assert!(!registry.validate_email(Some("user@invalid.com")));
    assert!(!registry.validate_email(Some("invalidemail.com")));
}

#[tokio::test]
async fn test_http_register_lookup_and_redaction() {
    let server = test_server();

    let response = server
        .post("/clients")
        .json(&json!({
            "tenant_id": "contoso",
            "redirect_uri": "https://app.example.com/callback",
            "scopes": ["openid"],
            "authority": "https://login.example.com/contoso",
            "app_name": "HTTP Test App"
        }))
        .await;
    response.assert_status_ok();

    let registered: AppRegistrationResponse = response.json();
    assert!(registered.client_secret.is_some());
    assert_eq!(registered.grant_types, vec!["authorization_code"]);
    assert_eq!(registered.response_types, vec!["code"]);

    // Lookup redacts the secret
    let response = server
        .get(&format!("/clients/{}", registered.client_id))
        .await;
    response.assert_status_ok();
    let fetched: AppRegistrationResponse = response.json();
    assert_eq!(fetched.client_id, registered.client_id);
    assert!(fetched.client_secret.is_none());
}

#[tokio::test]
async fn test_http_duplicate_and_invalid_registrations() {
    let server = test_server();

    let body = json!({
        "client_id": "fixed-id",
        "tenant_id": "contoso",
        "redirect_uri": "https://app.example.com/callback",
        "scopes": ["openid"],
        "authority": "https://login.example.com/contoso",
        "app_name": "HTTP Test App"
    });

    server.post("/clients").json(&body).await.assert_status_ok();

    let response = server.post("/clients").json(&body).await;
    response.assert_status(http::StatusCode::CONFLICT);
    let error: Value = response.json();
    assert_eq!(error["error"], "duplicate_client_id");

    // Empty tenant is an invalid field
    let response = server
        .post("/clients")
        .json(&json!({
            "tenant_id": "",
            "redirect_uri": "https://app.example.com/callback",
            "scopes": ["openid"],
            "authority": "https://login.example.com/contoso",
            "app_name": "HTTP Test App"
        }))
        .await;
    response.assert_status(http::StatusCode::BAD_REQUEST);
    let error: Value = response.json();
    assert_eq!(error["error"], "invalid_field");
}

#[tokio::test]
async fn test_http_rotate_and_delete() {
    let server = test_server();

    let response = server
        .post("/clients")
        .json(&json!({
            "client_id": "rotate-me",
            "tenant_id": "contoso",
            "redirect_uri": "https://app.example.com/callback",
            "scopes": ["openid"],
            "authority": "https://login.example.com/contoso",
            "app_name": "HTTP Test App"
        }))
        .await;
    response.assert_status_ok();
    let registered: AppRegistrationResponse = response.json();

    let response = server.post("/clients/rotate-me/rotate-secret").await;
    response.assert_status_ok();
    let rotated: AppRegistrationResponse = response.json();
    assert_ne!(rotated.client_secret, registered.client_secret);

    let response = server.delete("/clients/rotate-me").await;
    response.assert_status(http::StatusCode::NO_CONTENT);

    let response = server.get("/clients/rotate-me").await;
    response.assert_status(http::StatusCode::NOT_FOUND);
    let error: Value = response.json();
    assert_eq!(error["error"], "client_not_found");
}

#[tokio::test]
async fn test_http_list_registrations() {
    let server = test_server();

    for client_id in ["app-a", "app-b", "app-c"] {
        server
            .post("/clients")
            .json(&json!({
                "client_id": client_id,
                "tenant_id": "contoso",
                "redirect_uri": "https://app.example.com/callback",
                "scopes": ["openid"],
                "authority": "https://login.example.com/contoso",
                "app_name": "HTTP Test App"
            }))
            .await
            .assert_status_ok();
    }

    let response = server.get("/clients").await;
    response.assert_status_ok();
    let all: Vec<AppRegistrationResponse> = response.json();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|r| r.client_secret.is_none()));

    let response = server.get("/clients?limit=2").await;
    response.assert_status_ok();
    let limited: Vec<AppRegistrationResponse> = response.json();
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn test_http_registration_disabled() {
    let server = test_server_registration_disabled();

    // Mutating routes answer 403 with the disabled error body
    let response = server
        .post("/clients")
        .json(&json!({
            "tenant_id": "contoso",
            "redirect_uri": "https://app.example.com/callback",
            "scopes": ["openid"],
            "authority": "https://login.example.com/contoso",
            "app_name": "HTTP Test App"
        }))
        .await;
    response.assert_status(http::StatusCode::FORBIDDEN);
    let error: Value = response.json();
    assert_eq!(error["error"], "registration_disabled");

    let response = server.delete("/clients/some-app").await;
    response.assert_status(http::StatusCode::FORBIDDEN);

    let response = server.post("/clients/some-app/rotate-secret").await;
    response.assert_status(http::StatusCode::FORBIDDEN);

    // Read-only routes stay available
    let response = server.get("/clients").await;
    response.assert_status_ok();
    let response = server.get("/clients/some-app").await;
    response.assert_status(http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_http_email_validation() {
    let server = test_server();

    let response = server
        .post("/email/validate")
        .json(&json!({"email": "user@example.com"}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["email_valid"], true);

    let response = server
        .post("/email/validate")
        .json(&json!({"email": "user@invalid.com"}))
        .await;
    let body: Value = response.json();
    assert_eq!(body["email_valid"], false);

    let response = server
        .post("/email/validate")
        .json(&json!({"email": null}))
        .await;
    let body: Value = response.json();
    assert_eq!(body["email_valid"], false);
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}
