//! Query execution engine
//!
//! Runs descriptors against a [`Transport`] and merges confirmed responses
//! into the shared store.
//!
//! # Lifecycle (per dedup key)
//!
//! `Idle → InFlight → Succeeded | Failed`. While a key is in flight, further
//! queries with that key await the same request instead of sending their own.
//! The transform and merge run once per request, and never on failure.
//! Finished statuses beyond the engine's status capacity are pruned, after
//! which their keys report `Idle` again.

use crate::error::EngineError;
use crate::transport::{HttpRequest, Transport};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use lrc_query::{Descriptor, MutationDescriptor, QueryDescriptor};
use lrc_select::Selector;
use lrc_store::{ApplyReport, NormalizedStore, SharedStore};
use serde::Serialize;
use std::sync::Arc;

/// State of one dedup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// Never requested
    Idle,
    /// Request outstanding
    InFlight,
    /// Last request merged
    Succeeded,
    /// Last request failed; nothing merged
    Failed,
}

impl QueryStatus {
    /// Whether a request completed, successfully or not
    #[inline]
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// How a successful [`QueryEngine::query`] was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// This call sent the request
    Fetched,
    /// This call awaited a request already in flight
    Joined,
}

/// Finished statuses kept by [`QueryEngine::new`]
pub const DEFAULT_STATUS_CAPACITY: usize = 1024;

type InFlight = Shared<BoxFuture<'static, Result<(), EngineError>>>;

struct EngineInner {
    store: SharedStore,
    transport: Arc<dyn Transport>,
    in_flight: DashMap<String, InFlight>,
    statuses: DashMap<String, QueryStatus>,
    status_capacity: usize,
}

impl EngineInner {
    async fn send_and_merge<D>(&self, descriptor: &D) -> Result<ApplyReport, EngineError>
    where
        D: Descriptor + ?Sized,
    {
        let response = self
            .transport
            .send(HttpRequest::from_descriptor(descriptor))
            .await
            .and_then(crate::transport::HttpResponse::error_for_status);

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("{} {} failed: {}", descriptor.method(), descriptor.url(), e);
                return Err(e.into());
            }
        };

        let patch = descriptor.patch_for(response.body.as_ref());
        let report = self.store.write().apply(patch, descriptor.update());
        tracing::debug!(
            "Merged {} {}: {} table(s) changed",
            descriptor.method(),
            descriptor.url(),
            report.changed.len()
        );
        Ok(report)
    }

    async fn run_query(self: Arc<Self>, key: String, descriptor: QueryDescriptor) -> Result<(), EngineError> {
        let result = self.send_and_merge(&descriptor).await.map(|_| ());

        let status = if result.is_ok() {
            QueryStatus::Succeeded
        } else {
            QueryStatus::Failed
        };
        self.statuses.insert(key.clone(), status);
        self.in_flight.remove(&key);
        self.prune_statuses(&key);

        result
    }

    fn prune_statuses(&self, keep: &str) {
        if self.statuses.len() <= self.status_capacity {
            return;
        }
        let before = self.statuses.len();
        self.statuses
            .retain(|key, status| key == keep || !status.is_finished());
        tracing::debug!("Pruned {} finished status(es)", before - self.statuses.len());
    }
}

/// Orchestrates queries and mutations over one shared store
///
/// Cloning is cheap; clones share the store, the transport and the
/// in-flight table.
#[derive(Clone)]
pub struct QueryEngine {
    inner: Arc<EngineInner>,
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("in_flight", &self.inner.in_flight.len())
            .field("known_keys", &self.inner.statuses.len())
            .field("status_capacity", &self.inner.status_capacity)
            .finish_non_exhaustive()
    }
}

impl QueryEngine {
    /// Create engine over `store`
    #[must_use]
    pub fn new(store: SharedStore, transport: Arc<dyn Transport>) -> Self {
        Self::with_status_capacity(store, transport, DEFAULT_STATUS_CAPACITY)
    }

    /// Create engine keeping at most about `capacity` finished statuses
    ///
    /// Once exceeded, finished statuses other than the latest are dropped;
    /// in-flight keys are always kept.
    #[must_use]
    pub fn with_status_capacity(store: SharedStore, transport: Arc<dyn Transport>, capacity: usize) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                store,
                transport,
                in_flight: DashMap::new(),
                statuses: DashMap::new(),
                status_capacity: capacity.max(1),
            }),
        }
    }

    /// Run a query, sharing the request with any in-flight query of the same key
    ///
    /// # Errors
    /// Returns the transport error unmodified; the store is left untouched
    pub async fn query(&self, descriptor: QueryDescriptor) -> Result<QueryOutcome, EngineError> {
        let key = descriptor.dedup_key().to_string();

        let (request, outcome) = match self.inner.in_flight.entry(key.clone()) {
            Entry::Occupied(entry) => {
                tracing::debug!("Joining in-flight query {}", key);
                (entry.get().clone(), QueryOutcome::Joined)
            }
            Entry::Vacant(entry) => {
                tracing::info!("Query {} {} (key {})", descriptor.method, descriptor.url, key);
                self.inner.statuses.insert(key.clone(), QueryStatus::InFlight);
                let request = Arc::clone(&self.inner)
                    .run_query(key.clone(), descriptor)
                    .boxed()
                    .shared();
                entry.insert(request.clone());
                (request, QueryOutcome::Fetched)
            }
        };

        request.await.map(|()| outcome)
    }

    /// Run a mutation; its transform and merge run only on success
    ///
    /// Mutations are never de-duplicated.
    ///
    /// # Errors
    /// Returns the transport error unmodified; the store is left untouched
    pub async fn mutate(&self, descriptor: MutationDescriptor) -> Result<ApplyReport, EngineError> {
        tracing::info!("Mutation {} {}", descriptor.method, descriptor.url);
        self.inner.send_and_merge(&descriptor).await
    }

    /// Lifecycle state of a dedup key
    #[must_use]
    pub fn status(&self, key: &str) -> QueryStatus {
        self.inner
            .statuses
            .get(key)
            .map_or(QueryStatus::Idle, |status| *status)
    }

    /// Number of keys with a recorded status
    #[inline]
    #[must_use]
    pub fn known_keys(&self) -> usize {
        self.inner.statuses.len()
    }

    /// Whether the last request for `key` completed
    #[inline]
    #[must_use]
    pub fn is_finished(&self, key: &str) -> bool {
        self.status(key).is_finished()
    }

    /// Number of requests currently outstanding
    #[inline]
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.len()
    }

    /// Shared store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.inner.store
    }

    /// Read a selector against the current store
    pub fn select<S: Selector>(&self, selector: &S) -> Arc<S::Output> {
        selector.select(&self.inner.store.read())
    }

    /// Run `f` with read access to the store
    pub fn read<R>(&self, f: impl FnOnce(&NormalizedStore) -> R) -> R {
        f(&self.inner.store.read())
    }
}
