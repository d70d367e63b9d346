//! HTTP request handlers for the address API.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check endpoint
//! - `GET /{version}/{tile|cutout}/...` - Parse and validate an address

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::address::AddressParser;
use crate::catalog::{CatalogRegistry, CatalogSource};
use crate::config::DEFAULT_CACHE_MAX_AGE;
use crate::error::{AddressError, CatalogError};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: CatalogSource> {
    /// Cached catalog lookups
    pub registry: Arc<CatalogRegistry<S>>,

    /// The address parser
    pub parser: Arc<AddressParser>,

    /// Cache-Control max-age in seconds for successful responses
    pub cache_max_age: u32,
}

impl<S: CatalogSource> AppState<S> {
    pub fn new(registry: CatalogRegistry<S>, parser: AddressParser) -> Self {
        Self::with_cache_max_age(registry, parser, DEFAULT_CACHE_MAX_AGE)
    }

    pub fn with_cache_max_age(
        registry: CatalogRegistry<S>,
        parser: AddressParser,
        cache_max_age: u32,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            parser: Arc::new(parser),
            cache_max_age,
        }
    }
}

impl<S: CatalogSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            parser: Arc::clone(&self.parser),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error kind identifier (e.g., "out_of_bounds", "type_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Handling
// =============================================================================

/// Convert AddressError to HTTP response.
///
/// Lookup misses are 404 and logged at DEBUG; every other rejection is a
/// client error logged at WARN.
impl IntoResponse for AddressError {
    fn into_response(self) -> Response {
        let status = match &self {
            AddressError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            AddressError::MalformedPath { .. }
            | AddressError::UnsupportedAddressForm { .. }
            | AddressError::TypeError { .. }
            | AddressError::InvalidRange { .. }
            | AddressError::ResolutionOutOfRange { .. }
            | AddressError::OutOfBounds { .. } => StatusCode::BAD_REQUEST,
        };

        error_response(status, self.kind(), self.to_string())
    }
}

/// Errors a handler can return.
#[derive(Debug)]
pub enum HandlerError {
    Address(AddressError),
    Catalog(CatalogError),
}

impl From<AddressError> for HandlerError {
    fn from(err: AddressError) -> Self {
        HandlerError::Address(err)
    }
}

impl From<CatalogError> for HandlerError {
    fn from(err: CatalogError) -> Self {
        match err {
            // A lookup miss is an address problem, not a backend failure
            CatalogError::NotFound(not_found) => HandlerError::Address(not_found.into()),
            other => HandlerError::Catalog(other),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::Address(err) => err.into_response(),
            HandlerError::Catalog(err) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "catalog_error",
                err.to_string(),
            ),
        }
    }
}

fn error_response(status: StatusCode, error_type: &str, message: String) -> Response {
    if status.is_server_error() {
        error!(
            error_type = error_type,
            status = status.as_u16(),
            "Server error: {}",
            message
        );
    } else if status == StatusCode::NOT_FOUND {
        debug!(
            error_type = error_type,
            status = status.as_u16(),
            "Resource not found: {}",
            message
        );
    } else {
        warn!(
            error_type = error_type,
            status = status.as_u16(),
            "Client error: {}",
            message
        );
    }

    let body = ErrorResponse::with_status(error_type, message, status);
    (status, Json(body)).into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Parse and validate a tile or cutout address.
///
/// The whole request path is the address, e.g.
/// `/v1/tile/col1/exp1/channel1/xy/512/2/0/0/1/` or
/// `/v1/cutout/col1/exp1/channel1/2/0:512/0:512/0:16/`.
///
/// # Response
///
/// - `200 OK`: JSON [`ParsedAddress`](crate::address::ParsedAddress)
/// - `400 Bad Request`: Malformed, mistyped or out-of-bounds address
/// - `404 Not Found`: Unknown collection, experiment or channel
/// - `500 Internal Server Error`: Catalog backend failure
///
/// # Headers
///
/// - `Cache-Control: public, max-age={cache_max_age}`
pub async fn address_handler<S: CatalogSource>(
    State(state): State<AppState<S>>,
    uri: Uri,
) -> Result<Response, HandlerError> {
    let coerced = state.parser.coerce(uri.path())?;

    let channel = state.registry.get_channel(&coerced.resource).await?;
    let parsed = state.parser.resolve(coerced, channel.as_ref())?;

    Ok((
        [(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.cache_max_age),
        )],
        Json(parsed),
    )
        .into_response())
}

/// Handle health check requests.
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
