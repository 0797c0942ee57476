//! Application Registration Management CLI Tool
//!
//! A command-line interface for managing application registrations held by
//! the identity provider registry. It drives the registry's HTTP API and
//! covers the full registration lifecycle: registration, retrieval, updates,
//! secret rotation, deletion, and listing, plus email-domain validation.
//!
//! ## Usage Examples
//!
//! ### Register a new application
//! ```bash
//! idp-admin --base-url http://localhost:8080 register \
//!   --app-name "My Application" \
//!   --tenant-id contoso \
//!   --redirect-uri "https://app.example.com/callback" \
//!   --authority "https://login.example.com/contoso" \
//!   --scope openid --scope profile
//! ```
//!
//! ### Get application information
//! ```bash
//! idp-admin --base-url http://localhost:8080 get --client-id "client_id_here"
//! ```
//!
//! ### Rotate a client secret
//! ```bash
//! idp-admin --base-url http://localhost:8080 rotate-secret --client-id "client_id_here"
//! ```
//!
//! ### Validate an email address
//! ```bash
//! idp-admin --base-url http://localhost:8080 validate-email --email "user@example.com"
//! ```
//!
//! ## Environment Variables
//!
//! - `IDP_BASE_URL`: Base URL of the registry server (alternative to --base-url)
//!
//! ## Exit codes
//!
//! - 0: Success
//! - 1: General error (network, parsing, etc.)
//! - 2: Registration management error

use clap::{Args, Parser, Subcommand};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::process;

/// Application registration request, mirroring the server's API shape
#[derive(Debug, Serialize)]
struct AppRegistrationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_secret: Option<String>,
    tenant_id: String,
    redirect_uri: String,
    scopes: Vec<String>,
    authority: String,
    app_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    grant_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_types: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct ValidateEmailRequest {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValidateEmailResponse {
    email_valid: bool,
}

/// Main CLI application structure
#[derive(Parser)]
#[command(
    name = "idp-admin",
    about = "Application Registration Management CLI Tool",
    long_about = "A command-line interface for managing application registrations in the identity provider registry. \
                  Supports the full registration lifecycle and email-domain validation.",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Base URL of the registry server
    #[arg(
        long,
        env = "IDP_BASE_URL",
        default_value = "http://localhost:8080",
        help = "Base URL of the registry server"
    )]
    base_url: String,

    /// Enable verbose output
    #[arg(short, long, help = "Enable verbose output for debugging")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Register a new application
    Register(RegisterArgs),
    /// Get information about an existing registration
    Get(GetArgs),
    /// Update an existing registration
    Update(UpdateArgs),
    /// Rotate the client secret of a registration
    RotateSecret(GetArgs),
    /// Delete an existing registration
    Delete(GetArgs),
    /// List all registrations
    List(ListArgs),
    /// Validate an email address against the server's domain allowlist
    ValidateEmail(ValidateEmailArgs),
}

/// Arguments for application registration
#[derive(Args)]
struct RegisterArgs {
    /// Client ID; generated by the server when omitted
    #[arg(long, help = "Client ID (generated when omitted)")]
    client_id: Option<String>,

    /// Tenant the application belongs to
    #[arg(long, help = "Tenant identifier")]
    tenant_id: String,

    /// OAuth redirect URI (absolute)
    #[arg(long = "redirect-uri", help = "Absolute redirect URI")]
    redirect_uri: String,

    /// Scopes (can be specified multiple times)
    #[arg(long = "scope", help = "Scope (can be specified multiple times)")]
    scopes: Vec<String>,

    /// Issuer authority URI
    #[arg(long, help = "Issuer authority URI")]
    authority: String,

    /// Display name of the application
    #[arg(long = "app-name", help = "Human-readable application name")]
    app_name: String,

    /// Optional free-text description
    #[arg(long = "description", help = "Application description")]
    app_description: Option<String>,

    /// Grant types (can be specified multiple times)
    #[arg(
        long = "grant-type",
        help = "Grant type (can be specified multiple times; defaults to authorization_code)"
    )]
    grant_types: Vec<String>,

    /// Response types (can be specified multiple times)
    #[arg(
        long = "response-type",
        help = "Response type (can be specified multiple times; defaults to code)"
    )]
    response_types: Vec<String>,
}

/// Arguments identifying a registration
#[derive(Args)]
struct GetArgs {
    /// Client ID
    #[arg(long, help = "Client ID of the registration")]
    client_id: String,
}

/// Arguments for registration updates
#[derive(Args)]
struct UpdateArgs {
    /// Client ID
    #[arg(long, help = "Client ID of the registration")]
    client_id: String,

    #[command(flatten)]
    fields: UpdateFields,
}

#[derive(Args)]
struct UpdateFields {
    #[arg(long, help = "Tenant identifier")]
    tenant_id: String,

    #[arg(long = "redirect-uri", help = "Absolute redirect URI")]
    redirect_uri: String,

    #[arg(long = "scope", help = "Scope (can be specified multiple times)")]
    scopes: Vec<String>,

    #[arg(long, help = "Issuer authority URI")]
    authority: String,

    #[arg(long = "app-name", help = "Human-readable application name")]
    app_name: String,

    #[arg(long = "description", help = "Application description")]
    app_description: Option<String>,

    #[arg(long = "grant-type", help = "Grant type (replaces existing set)")]
    grant_types: Vec<String>,

    #[arg(long = "response-type", help = "Response type (replaces existing set)")]
    response_types: Vec<String>,
}

/// Arguments for listing registrations
#[derive(Args)]
struct ListArgs {
    /// Maximum number of registrations to return
    #[arg(long, help = "Maximum number of registrations to return")]
    limit: Option<usize>,
}

/// Arguments for email validation
#[derive(Args)]
struct ValidateEmailArgs {
    /// Email address to validate
    #[arg(long, help = "Email address to validate")]
    email: Option<String>,
}

/// Application errors
#[derive(Debug)]
enum AppError {
    /// Network or HTTP client errors
    Network(reqwest::Error),
    /// JSON parsing or serialization errors
    Json(serde_json::Error),
    /// Registration management errors
    Management(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Network(err) => write!(f, "Network error: {}", err),
            AppError::Json(err) => write!(f, "JSON error: {}", err),
            AppError::Management(msg) => write!(f, "Registration management error: {}", msg),
        }
    }
}

/// Main application entry point
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Register(args) => register_client(&cli, args).await,
        Commands::Get(args) => get_client(&cli, args).await,
        Commands::Update(args) => update_client(&cli, args).await,
        Commands::RotateSecret(args) => rotate_secret(&cli, args).await,
        Commands::Delete(args) => delete_client(&cli, args).await,
        Commands::List(args) => list_clients(&cli, args).await,
        Commands::ValidateEmail(args) => validate_email(&cli, args).await,
    };

    match result {
        Ok(()) => process::exit(0),
        Err(err @ AppError::Management(_)) => {
            eprintln!("Error: {}", err);
            process::exit(2);
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn expect_json(
    response: reqwest::Response,
    context: &str,
) -> Result<Value, AppError> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let error_text = response.text().await?;
        Err(AppError::Management(format!(
            "{} failed with status {}: {}",
            context, status, error_text
        )))
    }
}

/// Register a new application
async fn register_client(cli: &Cli, args: &RegisterArgs) -> Result<(), AppError> {
    if cli.verbose {
        eprintln!("Registering application with registry: {}", cli.base_url);
    }

    let request = AppRegistrationRequest {
        client_id: args.client_id.clone(),
        client_secret: None,
        tenant_id: args.tenant_id.clone(),
        redirect_uri: args.redirect_uri.clone(),
        scopes: args.scopes.clone(),
        authority: args.authority.clone(),
        app_name: args.app_name.clone(),
        app_description: args.app_description.clone(),
        grant_types: if args.grant_types.is_empty() {
            None
        } else {
            Some(args.grant_types.clone())
        },
        response_types: if args.response_types.is_empty() {
            None
        } else {
            Some(args.response_types.clone())
        },
    };

    let client = Client::new();
    let url = format!("{}/clients", cli.base_url);
    let response = client.post(&url).json(&request).send().await?;
    let body = expect_json(response, "Registration").await?;
    print_json(&body)
}

/// Get information about an existing registration
async fn get_client(cli: &Cli, args: &GetArgs) -> Result<(), AppError> {
    let client = Client::new();
    let url = format!("{}/clients/{}", cli.base_url, args.client_id);
    let response = client.get(&url).send().await?;

    if response.status() == StatusCode::NOT_FOUND {
        return Err(AppError::Management(format!(
            "Registration '{}' not found",
            args.client_id
        )));
    }

    let body = expect_json(response, "Lookup").await?;
    print_json(&body)
}

/// Update an existing registration
async fn update_client(cli: &Cli, args: &UpdateArgs) -> Result<(), AppError> {
    let request = AppRegistrationRequest {
        client_id: None,
        client_secret: None,
        tenant_id: args.fields.tenant_id.clone(),
        redirect_uri: args.fields.redirect_uri.clone(),
        scopes: args.fields.scopes.clone(),
        authority: args.fields.authority.clone(),
        app_name: args.fields.app_name.clone(),
        app_description: args.fields.app_description.clone(),
        grant_types: if args.fields.grant_types.is_empty() {
            None
        } else {
            Some(args.fields.grant_types.clone())
        },
        response_types: if args.fields.response_types.is_empty() {
            None
        } else {
            Some(args.fields.response_types.clone())
        },
    };

    let client = Client::new();
    let url = format!("{}/clients/{}", cli.base_url, args.client_id);
    let response = client.put(&url).json(&request).send().await?;
    let body = expect_json(response, "Update").await?;
    print_json(&body)
}

/// Rotate the client secret of a registration
async fn rotate_secret(cli: &Cli, args: &GetArgs) -> Result<(), AppError> {
    let client = Client::new();
    let url = format!("{}/clients/{}/rotate-secret", cli.base_url, args.client_id);
    let response = client.post(&url).send().await?;
    let body = expect_json(response, "Secret rotation").await?;
    print_json(&body)
}

/// Delete an existing registration
async fn delete_client(cli: &Cli, args: &GetArgs) -> Result<(), AppError> {
    let client = Client::new();
    let url = format!("{}/clients/{}", cli.base_url, args.client_id);
    let response = client.delete(&url).send().await?;

    let status = response.status();
    if status.is_success() {
        if cli.verbose {
            eprintln!("Deleted registration '{}'", args.client_id);
        }
        Ok(())
    } else {
        let error_text = response.text().await?;
        Err(AppError::Management(format!(
            "Deletion failed with status {}: {}",
            status, error_text
        )))
    }
}

/// List registrations
async fn list_clients(cli: &Cli, args: &ListArgs) -> Result<(), AppError> {
    let client = Client::new();
    let mut url = format!("{}/clients", cli.base_url);
    if let Some(limit) = args.limit {
        url = format!("{}?limit={}", url, limit);
    }
    let response = client.get(&url).send().await?;
    let body = expect_json(response, "Listing").await?;
    print_json(&body)
}

/// Validate an email address against the server's domain allowlist
async fn validate_email(cli: &Cli, args: &ValidateEmailArgs) -> Result<(), AppError> {
    let request = ValidateEmailRequest {
        email: args.email.clone(),
    };

    let client = Client::new();
    let url = format!("{}/email/validate", cli.base_url);
    let response = client.post(&url).json(&request).send().await?;
    let body = expect_json(response, "Email validation").await?;
    let parsed: ValidateEmailResponse = serde_json::from_value(body)?;

    println!("{}", parsed.email_valid);
    if !parsed.email_valid {
        process::exit(2);
    }
    Ok(())
}
