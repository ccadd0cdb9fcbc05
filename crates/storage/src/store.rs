// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The document store contract

use crate::document::{Document, Filter, Precondition};
use crate::error::StoreError;
use crate::hub::Subscription;
use serde_json::Value;

/// A collection-scoped JSON document store
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// Read one document
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Read every document of a collection matching `filter`, ordered by id
    fn list(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    /// Write a document if `precondition` holds, returning its new revision
    fn put(
        &self,
        collection: &str,
        id: &str,
        body: Value,
        precondition: Precondition,
    ) -> Result<u64, StoreError>;

    /// Remove a document. Removing a missing document is not an error.
    fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Receive a change for every later put or delete in `collection`
    fn subscribe(&self, collection: &str) -> Subscription;
}

/// Reject ids that cannot safely name a document
pub(crate) fn check_key(collection: &str, id: &str) -> Result<(), StoreError> {
    check_collection(collection)?;
    check_name(id)
}

/// Reject collection names that cannot safely name a directory
pub(crate) fn check_collection(collection: &str) -> Result<(), StoreError> {
    check_name(collection)
}

fn check_name(key: &str) -> Result<(), StoreError> {
    let unsafe_key = key.is_empty() || key.starts_with('.') || key.contains(['/', '\\', '\0']);
    if unsafe_key {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
