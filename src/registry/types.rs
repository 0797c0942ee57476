//! Application registration record and field helpers.
//!
//! An [`AppRegistration`] carries the credentials and metadata an external
//! identity framework needs to recognize a registered application: client
//! credentials, tenant, redirect target, issuer authority, and the allowed
//! scope/grant/response sets.

use base64::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum stored length of `client_id`
pub const MAX_CLIENT_ID_LEN: usize = 100;
/// Maximum stored length of `client_secret`
pub const MAX_CLIENT_SECRET_LEN: usize = 200;
/// Maximum stored length of `tenant_id`
pub const MAX_TENANT_ID_LEN: usize = 100;
/// Maximum stored length of `redirect_uri`
pub const MAX_REDIRECT_URI_LEN: usize = 200;
/// Maximum stored length of `authority`
pub const MAX_AUTHORITY_LEN: usize = 200;
/// Maximum stored length of `app_name`
pub const MAX_APP_NAME_LEN: usize = 100;
/// Maximum stored length of `app_description`
pub const MAX_APP_DESCRIPTION_LEN: usize = 500;

/// Application (OAuth client) registration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppRegistration {
    /// Unique client identifier
    pub client_id: String,
    /// Client secret (confidential)
    pub client_secret: String,
    /// Tenant the application belongs to
    pub tenant_id: String,
    /// Redirect URI (absolute)
    pub redirect_uri: String,
    /// Scopes the application may request
    pub scopes: Vec<String>,
    /// Issuer authority URI
    pub authority: String,
    /// Display name of the application
    pub app_name: String,
    /// Optional free-text description
    pub app_description: Option<String>,
    /// Grant types allowed for this application
    pub grant_types: Vec<String>,
    /// Response types allowed for this application
    pub response_types: Vec<String>,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// Application registration request, as accepted by the registration API.
///
/// `client_id` and `client_secret` are generated when absent;
/// `grant_types` and `response_types` fall back to `authorization_code` /
/// `code` when not supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppRegistrationRequest {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub tenant_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub authority: String,
    pub app_name: String,
    pub app_description: Option<String>,
    pub grant_types: Option<Vec<String>>,
    pub response_types: Option<Vec<String>>,
}

impl AppRegistrationRequest {
    /// Build a full registration record, generating credentials and applying
    /// defaults where the request left fields unset
    pub fn into_registration(self) -> AppRegistration {
        let now = Utc::now();
        AppRegistration {
            client_id: self.client_id.unwrap_or_else(generate_client_id),
            client_secret: self.client_secret.unwrap_or_else(generate_client_secret),
            tenant_id: self.tenant_id,
            redirect_uri: self.redirect_uri,
            scopes: self.scopes,
            authority: self.authority,
            app_name: self.app_name,
            app_description: self.app_description,
            grant_types: self
                .grant_types
                .unwrap_or_else(|| vec!["authorization_code".to_string()]),
            response_types: self
                .response_types
                .unwrap_or_else(|| vec!["code".to_string()]),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Application registration response returned by the registration API.
///
/// The client secret is only populated on registration and rotation; reads
/// redact it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppRegistrationResponse {
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    pub tenant_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub authority: String,
    pub app_name: String,
    pub app_description: Option<String>,
    pub grant_types: Vec<String>,
    pub response_types: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppRegistrationResponse {
    /// Build a response from a stored record, including the secret only
    /// when the caller is entitled to see it
    pub fn from_registration(registration: AppRegistration, include_secret: bool) -> Self {
        Self {
            client_id: registration.client_id,
            client_secret: include_secret.then_some(registration.client_secret),
            tenant_id: registration.tenant_id,
            redirect_uri: registration.redirect_uri,
            scopes: registration.scopes,
            authority: registration.authority,
            app_name: registration.app_name,
            app_description: registration.app_description,
            grant_types: registration.grant_types,
            response_types: registration.response_types,
            created_at: registration.created_at,
            updated_at: registration.updated_at,
        }
    }
}

/// Join a set-valued field into its delimited column representation
pub fn join_delimited(values: &[String]) -> String {
    values.join(",")
}

/// Split a delimited column back into its set-valued field, dropping empty segments
pub fn split_delimited(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter_map(|s| {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        })
        .collect()
}

/// Generate a random URL-safe client secret
pub fn generate_client_secret() -> String {
    use rand::Rng;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes);
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a client ID
pub fn generate_client_id() -> String {
    Uuid::new_v4().to_string()
}
