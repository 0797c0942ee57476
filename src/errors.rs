//! Standardized error types following the `error-idp-<domain>-<number>` format.

use thiserror::Error;

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when PORT cannot be parsed
    #[error("error-idp-config-1 Parsing PORT into u16 failed: {0:?}")]
    PortParsingFailed(std::num::ParseIntError),

    /// Error when version information is not available
    #[error("error-idp-config-2 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,

    /// Error when boolean string cannot be parsed
    #[error(
        "error-idp-config-3 Failed to parse boolean '{0}': expected true/false/1/0/yes/no/on/off"
    )]
    BoolParsingFailed(String),
}

/// Application registration errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A registration with the same client ID already exists
    #[error("error-idp-registry-1 Duplicate client ID: {0}")]
    DuplicateClientId(String),

    /// A required field is empty or otherwise invalid
    #[error("error-idp-registry-2 Invalid field: {0}")]
    InvalidField(String),

    /// Registration not found
    #[error("error-idp-registry-3 Registration not found: {0}")]
    NotFound(String),

    /// Underlying storage failure
    #[error("error-idp-registry-4 Storage error: {0}")]
    Storage(String),
}

/// Database/storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error when database connection fails
    #[error("error-idp-storage-1 Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Error when query execution fails
    #[error("error-idp-storage-2 Query execution failed: {0}")]
    QueryFailed(String),

    /// Error when database operation fails
    #[error("error-idp-storage-3 Database error: {0}")]
    DatabaseError(String),

    /// Error when data validation fails
    #[error("error-idp-storage-4 Invalid data: {0}")]
    InvalidData(String),

    /// Error when a row with the same key already exists
    #[error("error-idp-storage-5 Already exists: {0}")]
    AlreadyExists(String),

    /// Error when requested resource is not found
    #[error("error-idp-storage-6 Not found: {0}")]
    NotFound(String),
}
