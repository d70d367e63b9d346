//! In-memory catalog loaded from a JSON document.
//!
//! # Document Format
//!
//! ```json
//! {
//!   "coord_frames": [
//!     { "id": 1, "name": "cf1", "x_start": 0, "x_stop": 2000, ... }
//!   ],
//!   "collections": [
//!     {
//!       "id": 1, "name": "col1",
//!       "experiments": [
//!         {
//!           "id": 1, "name": "exp1", "coord_frame": "cf1",
//!           "num_hierarchy_levels": 5,
//!           "hierarchy": { "method": "isotropic" },
//!           "max_time_sample": 100,
//!           "channels": [ { "id": 1, "name": "channel1", "datatype": "uint8" } ]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Experiments and channels inherit their parent's name from the nesting.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatalogError, Entity, NotFound};

use super::lookup::{ResourceCatalog, ResourcePath};
use super::model::{Channel, Collection, CoordinateFrame, Experiment, ResolvedChannel};
use super::registry::CatalogSource;

// =============================================================================
// Document
// =============================================================================

/// Serialized form of a whole catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub coord_frames: Vec<CoordinateFrame>,

    #[serde(default)]
    pub collections: Vec<CollectionEntry>,
}

/// A collection with its nested experiments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionEntry {
    #[serde(flatten)]
    pub collection: Collection,

    #[serde(default)]
    pub experiments: Vec<ExperimentEntry>,
}

/// An experiment with its nested channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentEntry {
    #[serde(flatten)]
    pub experiment: Experiment,

    #[serde(default)]
    pub channels: Vec<Channel>,
}

// =============================================================================
// InMemoryCatalog
// =============================================================================

/// Catalog held entirely in memory.
///
/// Records are validated as they are inserted, so a successful load
/// guarantees every experiment points at an existing collection and
/// coordinate frame.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    coord_frames: HashMap<String, CoordinateFrame>,
    collections: HashMap<String, Collection>,
    experiments: HashMap<(String, String), Experiment>,
    channels: HashMap<(String, String, String), Channel>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a parsed document.
    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();

        for frame in document.coord_frames {
            catalog.add_coord_frame(frame)?;
        }

        for entry in document.collections {
            let collection_name = entry.collection.name.clone();
            catalog.add_collection(entry.collection)?;

            for exp_entry in entry.experiments {
                let mut experiment = exp_entry.experiment;
                experiment.collection = collection_name.clone();
                let experiment_name = experiment.name.clone();
                catalog.add_experiment(experiment)?;

                for mut channel in exp_entry.channels {
                    channel.experiment = experiment_name.clone();
                    catalog.add_channel(&collection_name, channel)?;
                }
            }
        }

        debug!(
            collections = catalog.collections.len(),
            experiments = catalog.experiments.len(),
            channels = catalog.channels.len(),
            coord_frames = catalog.coord_frames.len(),
            "Loaded catalog"
        );

        Ok(catalog)
    }

    /// Parse a catalog from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_document(document)
    }

    /// Load a catalog from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Insert a coordinate frame.
    pub fn add_coord_frame(&mut self, frame: CoordinateFrame) -> Result<(), CatalogError> {
        frame
            .validate()
            .map_err(|reason| CatalogError::InvalidRecord {
                entity: Entity::CoordinateFrame,
                name: frame.name.clone(),
                reason,
            })?;
        if self.coord_frames.contains_key(&frame.name) {
            return Err(CatalogError::Duplicate {
                entity: Entity::CoordinateFrame,
                name: frame.name,
            });
        }
        self.coord_frames.insert(frame.name.clone(), frame);
        Ok(())
    }

    /// Insert a collection.
    pub fn add_collection(&mut self, collection: Collection) -> Result<(), CatalogError> {
        if self.collections.contains_key(&collection.name) {
            return Err(CatalogError::Duplicate {
                entity: Entity::Collection,
                name: collection.name,
            });
        }
        self.collections.insert(collection.name.clone(), collection);
        Ok(())
    }

    /// Insert an experiment under `experiment.collection`.
    pub fn add_experiment(&mut self, experiment: Experiment) -> Result<(), CatalogError> {
        experiment
            .validate()
            .map_err(|reason| CatalogError::InvalidRecord {
                entity: Entity::Experiment,
                name: experiment.name.clone(),
                reason,
            })?;
        if !self.collections.contains_key(&experiment.collection) {
            return Err(CatalogError::DanglingReference {
                entity: Entity::Experiment,
                name: experiment.name,
                parent: format!("collection '{}'", experiment.collection),
            });
        }
        if !self.coord_frames.contains_key(&experiment.coord_frame) {
            return Err(CatalogError::DanglingReference {
                entity: Entity::Experiment,
                name: experiment.name,
                parent: format!("coordinate frame '{}'", experiment.coord_frame),
            });
        }

        let key = (experiment.collection.clone(), experiment.name.clone());
        if self.experiments.contains_key(&key) {
            return Err(CatalogError::Duplicate {
                entity: Entity::Experiment,
                name: format!("{}/{}", key.0, key.1),
            });
        }
        self.experiments.insert(key, experiment);
        Ok(())
    }

    /// Insert a channel under `collection` / `channel.experiment`.
    pub fn add_channel(&mut self, collection: &str, channel: Channel) -> Result<(), CatalogError> {
        let exp_key = (collection.to_string(), channel.experiment.clone());
        if !self.experiments.contains_key(&exp_key) {
            return Err(CatalogError::DanglingReference {
                entity: Entity::Channel,
                name: channel.name,
                parent: format!("experiment '{}/{}'", exp_key.0, exp_key.1),
            });
        }

        let key = (exp_key.0, exp_key.1, channel.name.clone());
        if self.channels.contains_key(&key) {
            return Err(CatalogError::Duplicate {
                entity: Entity::Channel,
                name: format!("{}/{}/{}", key.0, key.1, key.2),
            });
        }
        self.channels.insert(key, channel);
        Ok(())
    }

    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    pub fn experiment_count(&self) -> usize {
        self.experiments.len()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn coord_frame_count(&self) -> usize {
        self.coord_frames.len()
    }

    /// All channel paths, sorted.
    pub fn channel_paths(&self) -> Vec<ResourcePath> {
        let mut paths: Vec<_> = self
            .channels
            .keys()
            .map(|(c, e, ch)| ResourcePath::new(c, e, ch))
            .collect();
        paths.sort();
        paths
    }
}

impl ResourceCatalog for InMemoryCatalog {
    fn resolve(&self, path: &ResourcePath) -> Result<ResolvedChannel, NotFound> {
        let collection = self
            .collections
            .get(&path.collection)
            .ok_or_else(|| NotFound::new(Entity::Collection, &path.collection))?;

        let experiment = self
            .experiments
            .get(&(path.collection.clone(), path.experiment.clone()))
            .ok_or_else(|| NotFound::new(Entity::Experiment, &path.experiment))?;

        let channel = self
            .channels
            .get(&(
                path.collection.clone(),
                path.experiment.clone(),
                path.channel.clone(),
            ))
            .ok_or_else(|| NotFound::new(Entity::Channel, &path.channel))?;

        let coord_frame = self
            .coord_frames
            .get(&experiment.coord_frame)
            .ok_or_else(|| NotFound::new(Entity::CoordinateFrame, &experiment.coord_frame))?;

        Ok(ResolvedChannel {
            collection: collection.clone(),
            experiment: experiment.clone(),
            channel: channel.clone(),
            coord_frame: coord_frame.clone(),
        })
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn fetch(&self, path: &ResourcePath) -> Result<ResolvedChannel, CatalogError> {
        Ok(self.resolve(path)?)
    }
}
