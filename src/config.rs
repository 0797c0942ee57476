//! Environment-based configuration types for the identity provider runtime settings.

use anyhow::Result;

use crate::errors::ConfigError;

/// HTTP server port configuration
#[derive(Clone)]
pub struct HttpPort(u16);

/// Email domain allowlist configuration
#[derive(Clone)]
pub struct AllowedEmailDomains(Vec<String>);

/// Registration API enablement configuration
#[derive(Clone)]
pub struct EnableRegistrationApi(bool);

/// Main application configuration
#[derive(Clone)]
pub struct Config {
    pub version: String,
    pub http_port: HttpPort,
    pub storage_backend: String,
    pub database_url: Option<String>,
    pub allowed_email_domains: AllowedEmailDomains,
    pub enable_registration_api: EnableRegistrationApi,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        let http_port: HttpPort = default_env("HTTP_PORT", "8080").try_into()?;
        let storage_backend = default_env("STORAGE_BACKEND", "memory");
        let database_url = optional_env("DATABASE_URL");
        let allowed_email_domains: AllowedEmailDomains =
            default_env("EMAIL_ALLOWED_DOMAINS", "example.com;test.com").try_into()?;
        let enable_registration_api: EnableRegistrationApi =
            default_env("ENABLE_REGISTRATION_API", "true").try_into()?;

        Ok(Self {
            version: version()?,
            http_port,
            storage_backend,
            database_url,
            allowed_email_domains,
            enable_registration_api,
        })
    }
}

/// Get application version from build environment
pub fn version() -> Result<String> {
    option_env!("GIT_HASH")
        .or(option_env!("CARGO_PKG_VERSION"))
        .map(|val| val.to_string())
        .ok_or(ConfigError::VersionNotSet.into())
}

pub(crate) fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn default_env(name: &str, default_value: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default_value.to_string())
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::BoolParsingFailed(value.to_string())),
    }
}

impl TryFrom<String> for HttpPort {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Ok(Self(8080))
        } else {
            value
                .parse::<u16>()
                .map(Self)
                .map_err(|err| ConfigError::PortParsingFailed(err).into())
        }
    }
}

impl AsRef<u16> for HttpPort {
    fn as_ref(&self) -> &u16 {
        &self.0
    }
}

impl TryFrom<String> for AllowedEmailDomains {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self(
            value
                .split(';')
                .filter_map(|s| {
                    let s = s.trim();
                    if s.is_empty() {
                        None
                    } else {
                        Some(s.to_string())
                    }
                })
                .collect::<Vec<String>>(),
        ))
    }
}

impl AsRef<Vec<String>> for AllowedEmailDomains {
    fn as_ref(&self) -> &Vec<String> {
        &self.0
    }
}

impl TryFrom<String> for EnableRegistrationApi {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(Self(parse_bool(&value)?))
    }
}

impl AsRef<bool> for EnableRegistrationApi {
    fn as_ref(&self) -> &bool {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_email_domains_parsing() {
        let domains: AllowedEmailDomains = "example.com;test.com".to_string().try_into().unwrap();
        assert_eq!(domains.as_ref(), &vec!["example.com", "test.com"]);

        let domains: AllowedEmailDomains = " example.com ; ;".to_string().try_into().unwrap();
        assert_eq!(domains.as_ref(), &vec!["example.com"]);
    }

    #[test]
    fn test_enable_registration_api_parsing() {
        for value in ["true", "1", "yes", "on"] {
            let parsed: EnableRegistrationApi = value.to_string().try_into().unwrap();
            assert!(*parsed.as_ref());
        }
        for value in ["false", "0", "no", "off"] {
            let parsed: EnableRegistrationApi = value.to_string().try_into().unwrap();
            assert!(!*parsed.as_ref());
        }
        assert!(EnableRegistrationApi::try_from("maybe".to_string()).is_err());
    }
}
