//! # Boss Address
//!
//! Request-address parsing for a volumetric data service.
//!
//! Clients address 2-D tiles and 3-D cutouts of multi-resolution image
//! volumes with URL paths. This library validates such a path against a
//! catalog of collections, experiments, channels and coordinate frames
//! and produces a [`ParsedAddress`] carrying the storage keys needed to
//! fetch the data.
//!
//! ## Features
//!
//! - **Tile and cutout grammars**: `tile/{col}/{exp}/{chan}/{orientation}/...`
//!   and `cutout/{col}/{exp}/{chan}/{res}/{x0:x1}/{y0:y1}/{z0:z1}[/{t0:t1}]`
//! - **Resolution-aware bounds**: isotropic and anisotropic downsampling
//! - **Storage keys**: name-based boss key, id-based lookup key and one
//!   key per time sample
//! - **Cached catalog**: LRU registry with single-flight lookups
//! - **HTTP service**: Axum router exposing the parser as JSON
//!
//! ## Architecture
//!
//! - [`address`] - Tokenizer, grammar, coercion, bounds checks and keys
//! - [`catalog`] - Catalog records, JSON loader and cached registry
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use boss_address::{AddressParser, InMemoryCatalog, ParserConfig};
//!
//! let catalog = InMemoryCatalog::from_path("catalog.json").unwrap();
//! let parser = AddressParser::new(ParserConfig::default());
//!
//! let address = parser
//!     .parse("/v1/tile/col1/exp1/channel1/xy/512/2/0/0/1/", &catalog)
//!     .unwrap();
//! println!("{:?}", address.boss_key_list());
//! ```

pub mod address;
pub mod catalog;
pub mod config;
pub mod error;
pub mod server;

// Re-export commonly used types
pub use address::{
    AddressParser, AxisRange, CoercedAddress, Orientation, ParsedAddress, ParserConfig,
    RequestKind, DEFAULT_API_VERSION,
};
pub use catalog::{
    CatalogDocument, CatalogRegistry, CatalogSource, Channel, ChannelDatatype, Collection,
    CoordinateFrame, Experiment, HierarchyMethod, InMemoryCatalog, ResolvedChannel,
    ResourceCatalog, ResourcePath, VoxelUnit,
};
pub use config::{CheckConfig, Cli, Command, ParseConfig, ServeConfig};
pub use error::{AddressError, Axis, CatalogError, Entity, NotFound};
pub use server::{create_router, AppState, ErrorResponse, HealthResponse, RouterConfig};
