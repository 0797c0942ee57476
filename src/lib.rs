//! Identity provider support library.
//!
//! Provides application (OAuth client) registration records, an email-domain
//! allowlist policy, and trait-based storage backends for both.

pub mod config;
pub mod errors;
pub mod http;
pub mod registry;
pub mod storage;
