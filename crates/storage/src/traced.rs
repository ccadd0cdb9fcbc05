// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use crate::document::{Document, Filter, Precondition};
use crate::error::StoreError;
use crate::hub::Subscription;
use crate::store::DocumentStore;
use serde_json::Value;

/// Wrapper that adds tracing to any DocumentStore
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: DocumentStore> DocumentStore for TracedStore<S> {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let span = tracing::debug_span!("store.get", collection, id);
        let _guard = span.enter();

        let result = self.inner.get(collection, id);
        match &result {
            Ok(doc) => tracing::trace!(
                found = doc.is_some(),
                revision = ?doc.as_ref().map(|d| d.revision),
                "read"
            ),
            Err(e) => tracing::error!(error = %e, "get failed"),
        }
        result
    }

    fn list(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let span = tracing::debug_span!("store.list", collection);
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.list(collection, filter);
        let elapsed = start.elapsed();

        match &result {
            Ok(docs) => tracing::debug!(
                count = docs.len(),
                filtered = !filter.is_empty(),
                elapsed_ms = elapsed.as_millis() as u64,
                "listed"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "list failed"
            ),
        }
        result
    }

    fn put(
        &self,
        collection: &str,
        id: &str,
        body: Value,
        precondition: Precondition,
    ) -> Result<u64, StoreError> {
        let span = tracing::info_span!("store.put", collection, id, %precondition);
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.put(collection, id, body, precondition);
        let elapsed = start.elapsed();

        match &result {
            Ok(revision) => tracing::info!(
                revision,
                elapsed_ms = elapsed.as_millis() as u64,
                "written"
            ),
            // Conflicts are expected under contention; the caller retries
            Err(e) if e.is_conflict() => tracing::warn!(error = %e, "put conflicted"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "put failed"
            ),
        }
        result
    }

    fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.delete", collection, id);
        let _guard = span.enter();

        let result = self.inner.delete(collection, id);
        match &result {
            Ok(()) => tracing::info!("deleted"),
            Err(e) => tracing::error!(error = %e, "delete failed"),
        }
        result
    }

    fn subscribe(&self, collection: &str) -> Subscription {
        let subscription = self.inner.subscribe(collection);
        tracing::debug!(collection, subscriber = subscription.id().0, "subscribed");
        subscription
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
