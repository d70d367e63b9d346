//! Synchronous catalog lookup.
//!
//! The address parser resolves names through [`ResourceCatalog`] and never
//! awaits. Callers backed by an async store fetch a [`ResolvedChannel`]
//! first (see [`super::CatalogRegistry`]) and hand that snapshot to the
//! parser, since a resolved channel is itself a one-entry catalog.

use std::fmt;

use crate::error::{Entity, NotFound};

use super::model::ResolvedChannel;

/// Names of a collection → experiment → channel chain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourcePath {
    pub collection: String,
    pub experiment: String,
    pub channel: String,
}

impl ResourcePath {
    pub fn new(
        collection: impl Into<String>,
        experiment: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            experiment: experiment.into(),
            channel: channel.into(),
        }
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.collection, self.experiment, self.channel)
    }
}

/// Read-only access to catalog records.
pub trait ResourceCatalog: Send + Sync {
    /// Resolve a channel together with its parents and coordinate frame.
    ///
    /// On a miss, the error names the first missing record walking from
    /// the collection down.
    fn resolve(&self, path: &ResourcePath) -> Result<ResolvedChannel, NotFound>;
}

impl ResourceCatalog for ResolvedChannel {
    fn resolve(&self, path: &ResourcePath) -> Result<ResolvedChannel, NotFound> {
        if path.collection != self.collection.name {
            return Err(NotFound::new(Entity::Collection, &path.collection));
        }
        if path.experiment != self.experiment.name {
            return Err(NotFound::new(Entity::Experiment, &path.experiment));
        }
        if path.channel != self.channel.name {
            return Err(NotFound::new(Entity::Channel, &path.channel));
        }
        Ok(self.clone())
    }
}

impl<C: ResourceCatalog + ?Sized> ResourceCatalog for std::sync::Arc<C> {
    fn resolve(&self, path: &ResourcePath) -> Result<ResolvedChannel, NotFound> {
        (**self).resolve(path)
    }
}
