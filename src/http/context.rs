//! Application state shared across request handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::registry::ClientRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Client registry holding application registrations and the email policy
    pub registry: Arc<ClientRegistry>,
}
