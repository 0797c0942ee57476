//! Storage trait definitions for application registration data.
//!
//! Defines the async storage interface implemented by the in-memory,
//! SQLite, and PostgreSQL backends.

use crate::errors::StorageError;
use crate::registry::types::AppRegistration;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Trait for storing and retrieving application registrations.
///
/// The registry exclusively owns all registration rows; duplicate detection
/// happens here (unique key or checked insert under the store's lock) so
/// concurrent `create_registration` calls for the same client ID cannot both
/// succeed.
#[async_trait]
pub trait AppRegistrationStore: Send + Sync {
    /// Insert a new registration, failing with
    /// [`StorageError::AlreadyExists`] if the client ID is taken
    async fn create_registration(&self, registration: &AppRegistration) -> Result<()>;

    /// Retrieve a registration by client ID
    async fn get_registration(&self, client_id: &str) -> Result<Option<AppRegistration>>;

    /// Update an existing registration, failing with
    /// [`StorageError::NotFound`] if it does not exist
    async fn update_registration(&self, registration: &AppRegistration) -> Result<()>;

    /// Delete a registration, failing with [`StorageError::NotFound`] if it
    /// does not exist
    async fn delete_registration(&self, client_id: &str) -> Result<()>;

    /// List registrations newest first (for admin purposes)
    async fn list_registrations(&self, limit: Option<usize>) -> Result<Vec<AppRegistration>>;
}
