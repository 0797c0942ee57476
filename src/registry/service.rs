//! Client registry service: validated CRUD over application registrations
//! plus email-domain validation.

use crate::errors::{RegistryError, StorageError};
use crate::registry::email::EmailDomainPolicy;
use crate::registry::types::*;
use crate::storage::traits::AppRegistrationStore;
use chrono::Utc;
use std::sync::Arc;
use url::Url;

/// Holds application registration records and validates email addresses
/// against the configured domain allowlist.
pub struct ClientRegistry {
    storage: Arc<dyn AppRegistrationStore>,
    email_policy: EmailDomainPolicy,
}

impl ClientRegistry {
    /// Create a new registry over the given storage backend
    pub fn new(storage: Arc<dyn AppRegistrationStore>, email_policy: EmailDomainPolicy) -> Self {
        Self {
            storage,
            email_policy,
        }
    }

    /// Register a new application.
    ///
    /// Fails with [`RegistryError::DuplicateClientId`] if the client ID is
    /// already taken and [`RegistryError::InvalidField`] if any required
    /// field is empty or malformed.
    pub async fn register(&self, registration: &AppRegistration) -> Result<(), RegistryError> {
        validate_registration(registration)?;

        self.storage
            .create_registration(registration)
            .await
            .map_err(|e| match e {
                StorageError::AlreadyExists(_) => {
                    RegistryError::DuplicateClientId(registration.client_id.clone())
                }
                other => RegistryError::Storage(format!("{:?}", other)),
            })?;

        tracing::info!(client_id = %registration.client_id, "registered application");
        Ok(())
    }

    /// Look up a registration by client ID. A miss is absence, not an error.
    pub async fn lookup(&self, client_id: &str) -> Result<Option<AppRegistration>, RegistryError> {
        self.storage
            .get_registration(client_id)
            .await
            .map_err(|e| RegistryError::Storage(format!("{:?}", e)))
    }

    /// Update an existing registration, bumping `updated_at`
    pub async fn update(&self, registration: &AppRegistration) -> Result<(), RegistryError> {
        validate_registration(registration)?;

        let mut registration = registration.clone();
        registration.updated_at = Utc::now();

        self.storage
            .update_registration(&registration)
            .await
            .map_err(|e| match e {
                StorageError::NotFound(_) => {
                    RegistryError::NotFound(registration.client_id.clone())
                }
                other => RegistryError::Storage(format!("{:?}", other)),
            })
    }

    /// Replace the client secret with a freshly generated one and return the
    /// updated registration
    pub async fn rotate_secret(&self, client_id: &str) -> Result<AppRegistration, RegistryError> {
        let mut registration = self
            .lookup(client_id)
            .await?
            .ok_or_else(|| RegistryError::NotFound(client_id.to_string()))?;

        registration.client_secret = generate_client_secret();
        registration.updated_at = Utc::now();

        self.storage
            .update_registration(&registration)
            .await
            .map_err(|e| match e {
                StorageError::NotFound(_) => RegistryError::NotFound(client_id.to_string()),
                other => RegistryError::Storage(format!("{:?}", other)),
            })?;

        tracing::info!(client_id = %client_id, "rotated client secret");
        Ok(registration)
    }

    /// Delete a registration on application decommission
    pub async fn delete(&self, client_id: &str) -> Result<(), RegistryError> {
        self.storage
            .delete_registration(client_id)
            .await
            .map_err(|e| match e {
                StorageError::NotFound(_) => RegistryError::NotFound(client_id.to_string()),
                other => RegistryError::Storage(format!("{:?}", other)),
            })?;

        tracing::info!(client_id = %client_id, "deleted application registration");
        Ok(())
    }

    /// List registrations, newest first
    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<AppRegistration>, RegistryError> {
        self.storage
            .list_registrations(limit)
            .await
            .map_err(|e| RegistryError::Storage(format!("{:?}", e)))
    }

    /// Validate an email address against the configured domain allowlist
    pub fn validate_email(&self, address: Option<&str>) -> bool {
        self.email_policy.validate(address)
    }
}

/// Validate the required fields of a registration record
fn validate_registration(registration: &AppRegistration) -> Result<(), RegistryError> {
    require_non_empty("client_id", &registration.client_id, MAX_CLIENT_ID_LEN)?;
    require_non_empty(
        "client_secret",
        &registration.client_secret,
        MAX_CLIENT_SECRET_LEN,
    )?;
    require_non_empty("tenant_id", &registration.tenant_id, MAX_TENANT_ID_LEN)?;
    require_non_empty(
        "redirect_uri",
        &registration.redirect_uri,
        MAX_REDIRECT_URI_LEN,
    )?;
    require_non_empty("authority", &registration.authority, MAX_AUTHORITY_LEN)?;
    require_non_empty("app_name", &registration.app_name, MAX_APP_NAME_LEN)?;

    if let Some(description) = &registration.app_description {
        if description.len() > MAX_APP_DESCRIPTION_LEN {
            return Err(RegistryError::InvalidField(format!(
                "app_description exceeds {} characters",
                MAX_APP_DESCRIPTION_LEN
            )));
        }
    }

    require_absolute_uri("redirect_uri", &registration.redirect_uri)?;
    require_absolute_uri("authority", &registration.authority)?;

    require_non_empty_set("scopes", &registration.scopes)?;
    require_non_empty_set("grant_types", &registration.grant_types)?;
    require_non_empty_set("response_types", &registration.response_types)?;

    Ok(())
}

fn require_non_empty(field: &str, value: &str, max_len: usize) -> Result<(), RegistryError> {
    if value.is_empty() {
        return Err(RegistryError::InvalidField(format!("{} is empty", field)));
    }
    if value.len() > max_len {
        return Err(RegistryError::InvalidField(format!(
            "{} exceeds {} characters",
            field, max_len
        )));
    }
    Ok(())
}

fn require_absolute_uri(field: &str, value: &str) -> Result<(), RegistryError> {
    Url::parse(value)
        .map_err(|e| RegistryError::InvalidField(format!("{} is not an absolute URI: {}", field, e)))
        .map(|_| ())
}

fn require_non_empty_set(field: &str, values: &[String]) -> Result<(), RegistryError> {
    if values.is_empty() || values.iter().all(|v| v.trim().is_empty()) {
        return Err(RegistryError::InvalidField(format!("{} is empty", field)));
    }
    // Values are stored comma-joined, so a literal ',' would split on read
    if let Some(value) = values.iter().find(|v| v.contains(',')) {
        return Err(RegistryError::InvalidField(format!(
            "{} value '{}' contains ','",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::inmemory::MemoryRegistrationStore;

    fn registry() -> ClientRegistry {
        ClientRegistry::new(
            Arc::new(MemoryRegistrationStore::new()),
            EmailDomainPolicy::new(["example.com", "test.com"]),
        )
    }

    fn registration(client_id: &str) -> AppRegistration {
        let now = Utc::now();
        AppRegistration {
            client_id: client_id.to_string(),
            client_secret: "s3cret".to_string(),
            tenant_id: "contoso".to_string(),
            redirect_uri: "https://app.example.com/callback".to_string(),
            scopes: vec!["openid".to_string(), "profile".to_string()],
            authority: "https://login.example.com/contoso".to_string(),
            app_name: "Test Application".to_string(),
            app_description: Some("An application used in tests".to_string()),
            grant_types: vec!["authorization_code".to_string()],
            response_types: vec!["code".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_register_and_lookup_round_trip() {
        let registry = registry();
        let reg = registration("app-1");

        registry.register(&reg).await.unwrap();

        let found = registry.lookup("app-1").await.unwrap().unwrap();
        assert_eq!(found, reg);
    }

    #[tokio::test]
    async fn test_duplicate_client_id_rejected() {
        let registry = registry();
        let reg = registration("app-1");

        registry.register(&reg).await.unwrap();
        let err = registry.register(&reg).await.unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateClientId(_)));
    }

    #[tokio::test]
    async fn test_lookup_miss_is_absence() {
        let registry = registry();
        assert!(registry.lookup("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_required_field_rejected() {
        let registry = registry();
        let mut reg = registration("app-1");
        reg.tenant_id = String::new();

        let err = registry.register(&reg).await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidField(_)));
    }

    #[tokio::test]
    async fn test_empty_scope_set_rejected() {
        let registry = registry();
        let mut reg = registration("app-1");
        reg.scopes = vec![];

        let err = registry.register(&reg).await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidField(_)));

        let mut reg = registration("app-2");
        reg.grant_types = vec!["".to_string(), " ".to_string()];
        let err = registry.register(&reg).await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidField(_)));
    }

    #[tokio::test]
    async fn test_delimiter_in_set_value_rejected() {
        let registry = registry();
        let mut reg = registration("app-1");
        reg.scopes = vec!["openid,profile".to_string()];

        let err = registry.register(&reg).await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidField(_)));
    }

    #[tokio::test]
    async fn test_relative_redirect_uri_rejected() {
        let registry = registry();
        let mut reg = registration("app-1");
        reg.redirect_uri = "/callback".to_string();

        let err = registry.register(&reg).await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidField(_)));
    }

    #[tokio::test]
    async fn test_over_length_field_rejected() {
        let registry = registry();
        let mut reg = registration("app-1");
        reg.app_name = "x".repeat(MAX_APP_NAME_LEN + 1);

        let err = registry.register(&reg).await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidField(_)));
    }

    #[tokio::test]
    async fn test_update_missing_registration() {
        let registry = registry();
        let reg = registration("app-1");

        let err = registry.update(&reg).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rotate_secret_replaces_secret() {
        let registry = registry();
        let reg = registration("app-1");
        registry.register(&reg).await.unwrap();

        let rotated = registry.rotate_secret("app-1").await.unwrap();
        assert_ne!(rotated.client_secret, reg.client_secret);

        let found = registry.lookup("app-1").await.unwrap().unwrap();
        assert_eq!(found.client_secret, rotated.client_secret);
    }

    #[tokio::test]
    async fn test_delete_then_lookup() {
        let registry = registry();
        let reg = registration("app-1");
        registry.register(&reg).await.unwrap();

        registry.delete("app-1").await.unwrap();
        assert!(registry.lookup("app-1").await.unwrap().is_none());

        let err = registry.delete("app-1").await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_validate_email() {
        let registry = registry();
        assert!(registry.validate_email(Some("user@example.com")));
        assert!(!registry.validate_email(Some("user@invalid.com")));
        assert!(!registry.validate_email(None));
    }
}
