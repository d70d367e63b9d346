//! Test utilities for integration tests.
//!
//! This module provides a fixture catalog, catalog sources with call
//! tracking and failure injection, and helpers for building constructed
//! coordinate frames.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;

use boss_address::catalog::{
    CatalogSource, Channel, ChannelDatatype, Collection, CoordinateFrame, Experiment,
    HierarchyMethod, InMemoryCatalog, ResolvedChannel, ResourcePath, VoxelUnit,
};
use boss_address::error::CatalogError;
use boss_address::{AddressParser, ParserConfig};

// =============================================================================
// Fixture Catalog
// =============================================================================

/// Catalog document shared by the integration tests.
///
/// - `col1/exp1` is anisotropic with the z break at resolution 2
/// - `col1/exp_iso` is isotropic over the same frame
/// - time samples 0..=10 are valid for both
pub const CATALOG_JSON: &str = r#"{
    "coord_frames": [
        {
            "id": 1, "name": "cf1", "description": "fixture frame",
            "x_start": 0, "x_stop": 4096,
            "y_start": 0, "y_stop": 4096,
            "z_start": 0, "z_stop": 200,
            "x_voxel_size": 4.0, "y_voxel_size": 4.0, "z_voxel_size": 35.0,
            "voxel_unit": "nanometers"
        }
    ],
    "collections": [
        {
            "id": 1, "name": "col1", "description": "fixture collection",
            "experiments": [
                {
                    "id": 7, "name": "exp1", "coord_frame": "cf1",
                    "num_hierarchy_levels": 5,
                    "hierarchy": { "method": "anisotropic", "break_resolution": 2 },
                    "max_time_sample": 10,
                    "channels": [
                        { "id": 3, "name": "channel1", "datatype": "uint8" },
                        { "id": 4, "name": "channel2", "datatype": "uint16" }
                    ]
                },
                {
                    "id": 8, "name": "exp_iso", "coord_frame": "cf1",
                    "num_hierarchy_levels": 5,
                    "hierarchy": { "method": "isotropic" },
                    "max_time_sample": 10,
                    "channels": [
                        { "id": 5, "name": "channel1", "datatype": "uint8" }
                    ]
                }
            ]
        }
    ]
}"#;

/// Load the fixture catalog.
pub fn fixture_catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_json_str(CATALOG_JSON).expect("fixture catalog should load")
}

/// Parser accepting the default `v1` prefix.
pub fn parser() -> AddressParser {
    AddressParser::new(ParserConfig::default())
}

// =============================================================================
// Constructed Frames
// =============================================================================

/// Build a one-channel catalog `c/e/ch` over a frame with the given
/// extents and hierarchy.
pub fn single_channel_catalog(
    extent: [(u64, u64); 3],
    num_hierarchy_levels: u32,
    hierarchy: HierarchyMethod,
    max_time_sample: u64,
) -> InMemoryCatalog {
    let [(x_start, x_stop), (y_start, y_stop), (z_start, z_stop)] = extent;

    let mut catalog = InMemoryCatalog::new();
    catalog
        .add_coord_frame(CoordinateFrame {
            id: 1,
            name: "frame".to_string(),
            description: String::new(),
            x_start,
            x_stop,
            y_start,
            y_stop,
            z_start,
            z_stop,
            x_voxel_size: 1.0,
            y_voxel_size: 1.0,
            z_voxel_size: 1.0,
            voxel_unit: VoxelUnit::Micrometers,
        })
        .unwrap();
    catalog
        .add_collection(Collection {
            id: 10,
            name: "c".to_string(),
            description: String::new(),
        })
        .unwrap();
    catalog
        .add_experiment(Experiment {
            id: 20,
            name: "e".to_string(),
            collection: "c".to_string(),
            coord_frame: "frame".to_string(),
            description: String::new(),
            num_hierarchy_levels,
            hierarchy,
            max_time_sample,
        })
        .unwrap();
    catalog
        .add_channel(
            "c",
            Channel {
                id: 30,
                name: "ch".to_string(),
                experiment: "e".to_string(),
                description: String::new(),
                datatype: ChannelDatatype::Uint16,
            },
        )
        .unwrap();
    catalog
}

// =============================================================================
// Catalog Sources
// =============================================================================

/// A catalog source that counts fetches.
#[derive(Clone)]
pub struct CountingSource {
    catalog: Arc<InMemoryCatalog>,
    fetch_count: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn new(catalog: InMemoryCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for CountingSource {
    async fn fetch(&self, path: &ResourcePath) -> Result<ResolvedChannel, CatalogError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.catalog.fetch(path).await
    }
}

/// A catalog source whose backend is always down.
pub struct FailingSource;

#[async_trait]
impl CatalogSource for FailingSource {
    async fn fetch(&self, _path: &ResourcePath) -> Result<ResolvedChannel, CatalogError> {
        Err(CatalogError::Backend("connection refused".to_string()))
    }
}

// =============================================================================
// HTTP Helpers
// =============================================================================

/// Build a GET request for `uri`.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).expect("response body should be JSON")
}
