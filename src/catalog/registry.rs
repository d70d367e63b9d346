//! Catalog registry caching request-scoped channel snapshots.
//!
//! The registry provides:
//! - LRU caching of resolved channels so repeated requests skip the backend
//! - Singleflight pattern to prevent duplicate fetches for the same channel
//!
//! The parser itself is synchronous. HTTP handlers fetch an
//! `Arc<ResolvedChannel>` here, then pass it to the parser as a one-entry
//! [`ResourceCatalog`](super::ResourceCatalog).
//!
//! # Example
//!
//! ```ignore
//! use boss_address::catalog::{CatalogRegistry, InMemoryCatalog, ResourcePath};
//!
//! let source = InMemoryCatalog::from_path("catalog.json")?;
//! let registry = CatalogRegistry::new(source);
//!
//! let snapshot = registry
//!     .get_channel(&ResourcePath::new("col1", "exp1", "channel1"))
//!     .await?;
//! ```

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::{Notify, RwLock};
use tracing::debug;

use crate::error::CatalogError;

use super::lookup::ResourcePath;
use super::model::ResolvedChannel;

/// Default capacity for the snapshot cache (number of channels).
pub const DEFAULT_CHANNEL_CACHE_CAPACITY: usize = 1000;

// =============================================================================
// CatalogSource Trait
// =============================================================================

/// Backend able to resolve a channel and its parents.
///
/// This abstraction lets the registry sit in front of any store (a file,
/// a database, a remote metadata service).
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the resolved channel for `path`.
    ///
    /// A missing record must be reported as [`CatalogError::NotFound`].
    async fn fetch(&self, path: &ResourcePath) -> Result<ResolvedChannel, CatalogError>;
}

// =============================================================================
// CatalogRegistry
// =============================================================================

/// Caching front for a [`CatalogSource`].
pub struct CatalogRegistry<S: CatalogSource> {
    source: S,

    /// Cached snapshots indexed by resource path
    cache: RwLock<LruCache<ResourcePath, Arc<ResolvedChannel>>>,

    /// In-flight fetches for singleflight pattern
    in_flight: InFlightMap,
}

type InFlightMap = Mutex<HashMap<ResourcePath, Arc<InFlightState>>>;

/// State for an in-flight fetch.
struct InFlightState {
    notify: Notify,
    outcome: Mutex<FetchOutcome>,
}

#[derive(Clone)]
enum FetchOutcome {
    Pending,
    Ready(Result<Arc<ResolvedChannel>, CatalogError>),
    /// The leader was dropped before the fetch finished.
    Abandoned,
}

impl InFlightState {
    fn new() -> Self {
        Self {
            notify: Notify::new(),
            outcome: Mutex::new(FetchOutcome::Pending),
        }
    }

    fn outcome(&self) -> FetchOutcome {
        lock(&self.outcome).clone()
    }

    fn is_abandoned(&self) -> bool {
        matches!(*lock(&self.outcome), FetchOutcome::Abandoned)
    }
}

enum Role<'a> {
    Leader(LeaderGuard<'a>),
    Waiter(Arc<InFlightState>),
}

/// Owns the leader's in-flight entry.
///
/// Dropping the guard, on completion or cancellation, removes the entry and
/// wakes every waiter.
struct LeaderGuard<'a> {
    in_flight: &'a InFlightMap,
    path: &'a ResourcePath,
    state: Arc<InFlightState>,
}

impl LeaderGuard<'_> {
    fn complete(self, result: Result<Arc<ResolvedChannel>, CatalogError>) {
        *lock(&self.state.outcome) = FetchOutcome::Ready(result);
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        {
            let mut outcome = lock(&self.state.outcome);
            if matches!(*outcome, FetchOutcome::Pending) {
                *outcome = FetchOutcome::Abandoned;
            }
        }

        {
            let mut in_flight = lock(self.in_flight);
            if in_flight
                .get(self.path)
                .is_some_and(|state| Arc::ptr_eq(state, &self.state))
            {
                in_flight.remove(self.path);
            }
        }

        self.state.notify.notify_waiters();
    }
}

/// Lock a std mutex, ignoring poisoning. No critical section here can
/// leave the guarded data half-written.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: CatalogSource> CatalogRegistry<S> {
    /// Create a registry with the default cache capacity.
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, DEFAULT_CHANNEL_CACHE_CAPACITY)
    }

    /// Create a registry caching at most `capacity` channels.
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            source,
            cache: RwLock::new(LruCache::new(capacity)),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Get a channel snapshot, fetching it if not already cached.
    ///
    /// Concurrent callers asking for the same path share a single fetch.
    /// Misses and backend failures are returned to every waiter and are
    /// not cached. If the leading caller is cancelled mid-fetch, a waiter
    /// takes over as the new leader.
    pub async fn get_channel(
        &self,
        path: &ResourcePath,
    ) -> Result<Arc<ResolvedChannel>, CatalogError> {
        // Fast path: check cache
        {
            let mut cache = self.cache.write().await;
            if let Some(snapshot) = cache.get(path) {
                debug!(resource = %path, "Catalog cache hit");
                return Ok(snapshot.clone());
            }
        }

        loop {
            let role = {
                let mut in_flight = lock(&self.in_flight);

                match in_flight.get(path) {
                    Some(state) if !state.is_abandoned() => Role::Waiter(state.clone()),
                    _ => {
                        let state = Arc::new(InFlightState::new());
                        in_flight.insert(path.clone(), state.clone());
                        Role::Leader(LeaderGuard {
                            in_flight: &self.in_flight,
                            path,
                            state,
                        })
                    }
                }
            };

            let state = match role {
                Role::Leader(guard) => return self.lead(path, guard).await,
                Role::Waiter(state) => state,
            };

            // Register interest before checking, so a notify between the
            // check and the await is not lost.
            let notified = state.notify.notified();
            match state.outcome() {
                FetchOutcome::Ready(result) => return result,
                FetchOutcome::Abandoned => continue,
                FetchOutcome::Pending => {}
            }
            notified.await;

            if let FetchOutcome::Ready(result) = state.outcome() {
                return result;
            }
            debug!(resource = %path, "Catalog fetch abandoned, retrying");
        }
    }

    /// Run the fetch as leader and publish the result to waiters.
    async fn lead(
        &self,
        path: &ResourcePath,
        guard: LeaderGuard<'_>,
    ) -> Result<Arc<ResolvedChannel>, CatalogError> {
        let result = self.source.fetch(path).await.map(Arc::new);

        if let Ok(ref snapshot) = result {
            let mut cache = self.cache.write().await;
            cache.put(path.clone(), snapshot.clone());
        }

        guard.complete(result.clone());
        result
    }

    /// Drop a cached snapshot so the next request refetches it.
    pub async fn invalidate(&self, path: &ResourcePath) {
        let mut cache = self.cache.write().await;
        cache.pop(path);
    }

    /// Clear all cached snapshots.
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
    }

    /// Number of cached snapshots.
    pub async fn cached_count(&self) -> usize {
        let cache = self.cache.read().await;
        cache.len()
    }

    /// Access the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

// =============================================================================
// Tests
// =============================================================================
