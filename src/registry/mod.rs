//! Application registration records, the client registry, and the email-domain policy.

pub mod email;
pub mod service;
pub mod types;

pub use email::EmailDomainPolicy;
pub use service::ClientRegistry;
pub use types::{AppRegistration, AppRegistrationRequest, AppRegistrationResponse};
