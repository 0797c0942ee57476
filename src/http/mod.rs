//! HTTP surface: application state, router, and request handlers.

pub mod context;
pub mod handler_clients;
pub mod handler_email;
pub mod server;

pub use context::AppState;
pub use server::build_router;
