//! HTTP server layer for the address service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │          GET /{version}/{tile|cutout}/{col}/{exp}/{chan}/...    │
//! │                                                                 │
//! │  ┌───────────────────────────┐  ┌───────────────────────────┐   │
//! │  │        handlers           │  │          routes           │   │
//! │  │ (address, health, errors) │  │  (router config, CORS)    │   │
//! │  └───────────────────────────┘  └───────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//!                │                              │
//!                ▼                              ▼
//!        CatalogRegistry                  AddressParser
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    address_handler, health_handler, AppState, ErrorResponse, HandlerError, HealthResponse,
};
pub use routes::{create_router, RouterConfig};
