//! Configuration management for the address service.
//!
//! Settings come from command-line arguments via clap, with environment
//! variable fallbacks using the `BOSS_` prefix.
//!
//! # Commands
//!
//! - `serve` - run the HTTP address service
//! - `parse` - parse a single path against a catalog file and print the result
//! - `check` - validate a catalog file and print a summary
//!
//! # Environment Variables
//!
//! - `BOSS_HOST` - Server bind address (default: 0.0.0.0)
//! - `BOSS_PORT` - Server port (default: 8000)
//! - `BOSS_API_VERSION` - Accepted API version path segment (default: v1)
//! - `BOSS_CATALOG` - Path to the catalog JSON document (required)
//! - `BOSS_CACHE_CHANNELS` - Max resolved channels to cache (default: 1000)
//! - `BOSS_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 3600)
//! - `BOSS_CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::address::{ParserConfig, RequestKind, DEFAULT_API_VERSION};
use crate::catalog::DEFAULT_CHANNEL_CACHE_CAPACITY;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default HTTP cache max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

// =============================================================================
// CLI
// =============================================================================

/// Boss address service - validates tile and cutout paths against a
/// volumetric resource catalog and derives their storage keys.
#[derive(Parser, Debug, Clone)]
#[command(name = "boss-address")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP address service.
    Serve(ServeConfig),

    /// Parse one path against the catalog and print the result as JSON.
    Parse(ParseConfig),

    /// Load the catalog and print a summary.
    Check(CheckConfig),
}

// =============================================================================
// Serve
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "BOSS_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "BOSS_PORT")]
    pub port: u16,

    /// API version segment accepted at the start of request paths.
    #[arg(long, default_value = DEFAULT_API_VERSION, env = "BOSS_API_VERSION")]
    pub api_version: String,

    // =========================================================================
    // Catalog Configuration
    // =========================================================================
    /// Path to the catalog JSON document.
    #[arg(long, env = "BOSS_CATALOG")]
    pub catalog: PathBuf,

    /// Maximum number of resolved channels to keep in cache.
    #[arg(long, default_value_t = DEFAULT_CHANNEL_CACHE_CAPACITY, env = "BOSS_CACHE_CHANNELS")]
    pub cache_channels: usize,

    // =========================================================================
    // HTTP Configuration
    // =========================================================================
    /// HTTP Cache-Control max-age in seconds.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "BOSS_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "BOSS_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_api_version(&self.api_version)?;
        validate_catalog_path(&self.catalog)?;

        if self.cache_channels == 0 {
            return Err("cache_channels must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig::new(&self.api_version)
    }
}

// =============================================================================
// Parse
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ParseConfig {
    /// Request path, e.g. /v1/tile/col1/exp1/channel1/xy/512/2/0/0/1/
    pub path: String,

    /// Path to the catalog JSON document.
    #[arg(long, env = "BOSS_CATALOG")]
    pub catalog: PathBuf,

    /// API version segment accepted at the start of the path.
    #[arg(long, default_value = DEFAULT_API_VERSION, env = "BOSS_API_VERSION")]
    pub api_version: String,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl ParseConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_api_version(&self.api_version)?;
        validate_catalog_path(&self.catalog)?;
        if self.path.trim().is_empty() {
            return Err("A request path is required".to_string());
        }
        Ok(())
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig::new(&self.api_version)
    }
}

// =============================================================================
// Check
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    /// Path to the catalog JSON document.
    #[arg(long, env = "BOSS_CATALOG")]
    pub catalog: PathBuf,

    /// List every channel path in the catalog.
    #[arg(long, default_value_t = false)]
    pub list_channels: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl CheckConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_catalog_path(&self.catalog)
    }
}

// =============================================================================
// Shared validation
// =============================================================================

fn validate_api_version(api_version: &str) -> Result<(), String> {
    if api_version.is_empty() {
        return Err(
            "API version must not be empty. Set --api-version or BOSS_API_VERSION".to_string(),
        );
    }
    if api_version.contains('/') {
        return Err(format!(
            "API version must be a single path segment, got '{}'",
            api_version
        ));
    }
    if let Ok(kind) = RequestKind::from_token(api_version) {
        return Err(format!(
            "API version must not be a request type, got '{}'",
            kind
        ));
    }
    Ok(())
}

fn validate_catalog_path(catalog: &std::path::Path) -> Result<(), String> {
    if catalog.as_os_str().is_empty() {
        return Err("Catalog path is required. Set --catalog or BOSS_CATALOG".to_string());
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
