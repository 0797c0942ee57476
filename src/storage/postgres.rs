//! PostgreSQL implementation of application registration storage.

use crate::errors::StorageError;
use crate::registry::types::{AppRegistration, join_delimited, split_delimited};
use crate::storage::traits::{AppRegistrationStore, Result};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

/// PostgreSQL implementation of [`AppRegistrationStore`]
pub struct PostgresRegistrationStore {
    pool: PgPool,
}

impl PostgresRegistrationStore {
    /// Create a new PostgreSQL registration store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/postgres")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(format!("Migration failed: {}", e)))?;
        Ok(())
    }

    /// Convert a PostgreSQL row to an [`AppRegistration`]
    fn row_to_registration(row: &PgRow) -> Result<AppRegistration> {
        let client_id: String = row
            .try_get("client_id")
            .map_err(|e| StorageError::DatabaseError(format!("Failed to get client_id: {}", e)))?;
        let client_secret: String = row.try_get("client_secret").map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get client_secret: {}", e))
        })?;
        let tenant_id: String = row
            .try_get("tenant_id")
            .map_err(|e| StorageError::DatabaseError(format!("Failed to get tenant_id: {}", e)))?;
        let redirect_uri: String = row.try_get("redirect_uri").map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get redirect_uri: {}", e))
        })?;
        let scopes: String = row
            .try_get("scopes")
            .map_err(|e| StorageError::DatabaseError(format!("Failed to get scopes: {}", e)))?;
        let authority: String = row
            .try_get("authority")
            .map_err(|e| StorageError::DatabaseError(format!("Failed to get authority: {}", e)))?;
        let app_name: String = row
            .try_get("app_name")
            .map_err(|e| StorageError::DatabaseError(format!("Failed to get app_name: {}", e)))?;
        let app_description: Option<String> = row.try_get("app_description").map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get app_description: {}", e))
        })?;
        let grant_types: String = row.try_get("grant_types").map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get grant_types: {}", e))
        })?;
        let response_types: String = row.try_get("response_types").map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get response_types: {}", e))
        })?;
        let created_at: chrono::DateTime<chrono::Utc> = row
            .try_get("created_at")
            .map_err(|e| StorageError::DatabaseError(format!("Failed to get created_at: {}", e)))?;
        let updated_at: chrono::DateTime<chrono::Utc> = row
            .try_get("updated_at")
            .map_err(|e| StorageError::DatabaseError(format!("Failed to get updated_at: {}", e)))?;

        Ok(AppRegistration {
            client_id,
            client_secret,
            tenant_id,
            redirect_uri,
            scopes: split_delimited(&scopes),
            authority,
            app_name,
            app_description,
            grant_types: split_delimited(&grant_types),
            response_types: split_delimited(&response_types),
            created_at,
            updated_at,
        })
    }
}

#[async_trait]
impl AppRegistrationStore for PostgresRegistrationStore {
    async fn create_registration(&self, registration: &AppRegistration) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO app_registrations (
                client_id, client_secret, tenant_id, redirect_uri, scopes,
                authority, app_name, app_description, grant_types, response_types,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(&registration.client_id)
        .bind(&registration.client_secret)
        .bind(&registration.tenant_id)
        .bind(&registration.redirect_uri)
        .bind(join_delimited(&registration.scopes))
        .bind(&registration.authority)
        .bind(&registration.app_name)
        .bind(&registration.app_description)
        .bind(join_delimited(&registration.grant_types))
        .bind(join_delimited(&registration.response_types))
        .bind(registration.created_at)
        .bind(registration.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if e.as_database_error()
                    .is_some_and(|db| db.is_unique_violation())
                {
                    Err(StorageError::AlreadyExists(registration.client_id.clone()))
                } else {
                    Err(StorageError::DatabaseError(e.to_string()))
                }
            }
        }
    }

    async fn get_registration(&self, client_id: &str) -> Result<Option<AppRegistration>> {
        let row = sqlx::query("SELECT * FROM app_registrations WHERE client_id = $1")
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_registration(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_registration(&self, registration: &AppRegistration) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE app_registrations SET
                client_secret = $1, tenant_id = $2, redirect_uri = $3, scopes = $4,
                authority = $5, app_name = $6, app_description = $7, grant_types = $8,
                response_types = $9, updated_at = $10
            WHERE client_id = $11
            "#,
        )
        .bind(&registration.client_secret)
        .bind(&registration.tenant_id)
        .bind(&registration.redirect_uri)
        .bind(join_delimited(&registration.scopes))
        .bind(&registration.authority)
        .bind(&registration.app_name)
        .bind(&registration.app_description)
        .bind(join_delimited(&registration.grant_types))
        .bind(join_delimited(&registration.response_types))
        .bind(registration.updated_at)
        .bind(&registration.client_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(registration.client_id.clone()));
        }

        Ok(())
    }

    async fn delete_registration(&self, client_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM app_registrations WHERE client_id = $1")
            .bind(client_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(client_id.to_string()));
        }

        Ok(())
    }

    async fn list_registrations(&self, limit: Option<usize>) -> Result<Vec<AppRegistration>> {
        let sql = match limit {
            Some(limit) => format!(
                "SELECT * FROM app_registrations ORDER BY created_at DESC LIMIT {}",
                limit
            ),
            None => "SELECT * FROM app_registrations ORDER BY created_at DESC".to_string(),
        };

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        let mut registrations = Vec::new();
        for row in rows {
            registrations.push(Self::row_to_registration(&row)?);
        }

        Ok(registrations)
    }
}
