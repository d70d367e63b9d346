//! Catalog loading integration tests.
//!
//! Tests verify:
//! - Loading a catalog document from disk
//! - Load-time rejection of inconsistent documents
//! - Registry behavior over a file-backed catalog

use std::io::Write;

use tempfile::NamedTempFile;

use boss_address::catalog::{CatalogRegistry, InMemoryCatalog, ResourcePath};
use boss_address::error::{CatalogError, Entity};

use super::test_utils::{parser, CATALOG_JSON};

fn write_catalog(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_catalog(CATALOG_JSON);
    let catalog = InMemoryCatalog::from_path(file.path()).unwrap();

    assert_eq!(catalog.coord_frame_count(), 1);
    assert_eq!(catalog.collection_count(), 1);
    assert_eq!(catalog.experiment_count(), 2);
    assert_eq!(catalog.channel_count(), 3);
    assert_eq!(
        catalog.channel_paths(),
        vec![
            ResourcePath::new("col1", "exp1", "channel1"),
            ResourcePath::new("col1", "exp1", "channel2"),
            ResourcePath::new("col1", "exp_iso", "channel1"),
        ]
    );

    let address = parser()
        .parse("/v1/tile/col1/exp_iso/channel1/xy/512/0/0/0/0/", &catalog)
        .unwrap();
    assert_eq!(address.lookup_key(), "1&8&5");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = InMemoryCatalog::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, CatalogError::Io(_)));
}

#[test]
fn test_invalid_json() {
    let file = write_catalog(r#"{ "collections": [ { "id": "one" } ] }"#);
    let err = InMemoryCatalog::from_path(file.path()).unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
}

#[test]
fn test_duplicate_channel() {
    let json = r#"{
        "coord_frames": [{
            "id": 1, "name": "cf",
            "x_start": 0, "x_stop": 10, "y_start": 0, "y_stop": 10, "z_start": 0, "z_stop": 10,
            "x_voxel_size": 1.0, "y_voxel_size": 1.0, "z_voxel_size": 1.0,
            "voxel_unit": "micrometers"
        }],
        "collections": [{
            "id": 1, "name": "c",
            "experiments": [{
                "id": 1, "name": "e", "coord_frame": "cf",
                "num_hierarchy_levels": 1, "hierarchy": { "method": "isotropic" },
                "channels": [
                    { "id": 1, "name": "ch", "datatype": "uint8" },
                    { "id": 2, "name": "ch", "datatype": "uint16" }
                ]
            }]
        }]
    }"#;

    let err = InMemoryCatalog::from_json_str(json).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Duplicate {
            entity: Entity::Channel,
            ..
        }
    ));
}

#[test]
fn test_empty_frame_extent() {
    let json = r#"{
        "coord_frames": [{
            "id": 1, "name": "cf",
            "x_start": 5, "x_stop": 5, "y_start": 0, "y_stop": 10, "z_start": 0, "z_stop": 10,
            "x_voxel_size": 1.0, "y_voxel_size": 1.0, "z_voxel_size": 1.0,
            "voxel_unit": "micrometers"
        }]
    }"#;

    let err = InMemoryCatalog::from_json_str(json).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::InvalidRecord {
            entity: Entity::CoordinateFrame,
            ..
        }
    ));
}

#[tokio::test]
async fn test_registry_over_file_catalog() {
    let file = write_catalog(CATALOG_JSON);
    let catalog = InMemoryCatalog::from_path(file.path()).unwrap();
    let registry = CatalogRegistry::new(catalog);

    let path = ResourcePath::new("col1", "exp1", "channel2");
    let channel = registry.get_channel(&path).await.unwrap();
    assert_eq!(channel.channel.id, 4);
    assert_eq!(registry.cached_count().await, 1);

    let err = registry
        .get_channel(&ResourcePath::new("col1", "exp2", "channel1"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(ref nf) if nf.entity == Entity::Experiment));
    assert_eq!(registry.cached_count().await, 1);

    registry.invalidate(&path).await;
    assert_eq!(registry.cached_count().await, 0);
}
