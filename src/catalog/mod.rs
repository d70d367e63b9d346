//! Resource catalog.
//!
//! The catalog owns collection, experiment, channel and coordinate-frame
//! records. The address parser only reads them, through the synchronous
//! [`ResourceCatalog`] trait.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │ get_channel().await
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            CatalogRegistry              │
//! │   (LRU of Arc<ResolvedChannel>,         │
//! │    singleflight fetches)                │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │        CatalogSource (async trait)      │
//! │        e.g. InMemoryCatalog             │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The snapshot returned by the registry is itself a [`ResourceCatalog`],
//! so the parser never awaits.

mod lookup;
mod memory;
mod model;
mod registry;

pub use lookup::{ResourceCatalog, ResourcePath};
pub use memory::{CatalogDocument, CollectionEntry, ExperimentEntry, InMemoryCatalog};
pub use model::{
    Channel, ChannelDatatype, Collection, CoordinateFrame, Experiment, HierarchyMethod,
    ResolvedChannel, VoxelUnit,
};
pub use registry::{CatalogRegistry, CatalogSource, DEFAULT_CHANNEL_CACHE_CAPACITY};
