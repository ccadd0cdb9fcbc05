// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory document store

use crate::document::{Change, Document, Filter, Precondition};
use crate::error::StoreError;
use crate::hub::{ChangeHub, Subscription};
use crate::store::{check_collection, check_key, DocumentStore};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

type Collections = HashMap<String, BTreeMap<String, Document>>;

/// Document store held in process memory. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<Collections>>,
    hub: ChangeHub,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        check_key(collection, id)?;
        let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    fn list(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        check_collection(collection)?;
        let collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| filter.matches(&doc.body))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn put(
        &self,
        collection: &str,
        id: &str,
        body: Value,
        precondition: Precondition,
    ) -> Result<u64, StoreError> {
        check_key(collection, id)?;
        let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        let docs = collections.entry(collection.to_string()).or_default();

        let current = docs.get(id).map(|doc| doc.revision);
        if !precondition.holds(current) {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                id: id.to_string(),
                expected: precondition,
                found: current,
            });
        }

        let document = Document {
            id: id.to_string(),
            revision: current.map_or(1, |r| r + 1),
            body,
        };
        let revision = document.revision;
        docs.insert(id.to_string(), document.clone());
        // Published under the lock so subscribers see changes in commit order
        self.hub.publish(&Change::put(collection, document));
        Ok(revision)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        check_key(collection, id)?;
        let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        let removed = collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id));
        if removed.is_some() {
            self.hub.publish(&Change::delete(collection, id));
        }
        Ok(())
    }

    fn subscribe(&self, collection: &str) -> Subscription {
        self.hub.subscribe(collection)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
