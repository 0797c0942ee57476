//! In-memory application registration storage.
//!
//! Suitable for tests and single-process deployments without persistence.

use crate::errors::StorageError;
use crate::registry::types::AppRegistration;
use crate::storage::traits::{AppRegistrationStore, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory implementation of [`AppRegistrationStore`]
#[derive(Default)]
pub struct MemoryRegistrationStore {
    registrations: Mutex<HashMap<String, AppRegistration>>,
}

impl MemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppRegistrationStore for MemoryRegistrationStore {
    async fn create_registration(&self, registration: &AppRegistration) -> Result<()> {
        let mut registrations = self
            .registrations
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        if registrations.contains_key(&registration.client_id) {
            return Err(StorageError::AlreadyExists(registration.client_id.clone()));
        }
        registrations.insert(registration.client_id.clone(), registration.clone());
        Ok(())
    }

    async fn get_registration(&self, client_id: &str) -> Result<Option<AppRegistration>> {
        let registrations = self
            .registrations
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        Ok(registrations.get(client_id).cloned())
    }

    async fn update_registration(&self, registration: &AppRegistration) -> Result<()> {
        let mut registrations = self
            .registrations
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        if let std::collections::hash_map::Entry::Occupied(mut e) =
            registrations.entry(registration.client_id.clone())
        {
            e.insert(registration.clone());
            Ok(())
        } else {
            Err(StorageError::NotFound(registration.client_id.clone()))
        }
    }

    async fn delete_registration(&self, client_id: &str) -> Result<()> {
        let mut registrations = self
            .registrations
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        match registrations.remove(client_id) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(client_id.to_string())),
        }
    }

    async fn list_registrations(&self, limit: Option<usize>) -> Result<Vec<AppRegistration>> {
        let registrations = self
            .registrations
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        let mut result: Vec<_> = registrations.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            result.truncate(limit);
        }
        Ok(result)
    }
}
