// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fault-injecting store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::document::{Document, Filter, Precondition};
use crate::error::StoreError;
use crate::hub::Subscription;
use crate::store::DocumentStore;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Store operation a fault can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    List,
    Put,
    Delete,
}

/// Injected failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Fail the call with [`StoreError::Unavailable`]
    Unavailable,
    /// Bump the document's revision just before the put, as a concurrent
    /// writer would, so a revision precondition no longer holds
    ConcurrentWrite,
}

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get { collection: String, id: String },
    List { collection: String },
    Put { collection: String, id: String, precondition: Precondition },
    Delete { collection: String, id: String },
}

#[derive(Debug, Clone)]
struct Injection {
    operation: Operation,
    collection: Option<String>,
    fault: Fault,
}

/// Wraps a store and fails selected calls, each injection firing once
#[derive(Clone)]
pub struct FaultyStore<S> {
    inner: S,
    injections: Arc<Mutex<Vec<Injection>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl<S: DocumentStore> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            injections: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Fail the next `operation` on any collection
    pub fn fail_next(&self, operation: Operation, fault: Fault) {
        self.inject(operation, None, fault);
    }

    /// Fail the next `operation` on `collection`
    pub fn fail_next_in(&self, operation: Operation, collection: &str, fault: Fault) {
        self.inject(operation, Some(collection.to_string()), fault);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of puts attempted against `collection`
    pub fn put_count(&self, collection: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, StoreCall::Put { collection: c, .. } if c == collection))
            .count()
    }

    fn inject(&self, operation: Operation, collection: Option<String>, fault: Fault) {
        self.injections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Injection {
                operation,
                collection,
                fault,
            });
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    /// Take the first pending fault for this call, if any
    fn take_fault(&self, operation: Operation, collection: &str) -> Option<Fault> {
        let mut injections = self.injections.lock().unwrap_or_else(|e| e.into_inner());
        let position = injections.iter().position(|i| {
            i.operation == operation && i.collection.as_deref().map_or(true, |c| c == collection)
        })?;
        Some(injections.remove(position).fault)
    }

    fn unavailable(operation: Operation, collection: &str) -> StoreError {
        StoreError::Unavailable(format!("injected {operation:?} failure on {collection}"))
    }
}

impl<S: DocumentStore> DocumentStore for FaultyStore<S> {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.record(StoreCall::Get {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        if self.take_fault(Operation::Get, collection).is_some() {
            return Err(Self::unavailable(Operation::Get, collection));
        }
        self.inner.get(collection, id)
    }

    fn list(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        self.record(StoreCall::List {
            collection: collection.to_string(),
        });
        if self.take_fault(Operation::List, collection).is_some() {
            return Err(Self::unavailable(Operation::List, collection));
        }
        self.inner.list(collection, filter)
    }

    fn put(
        &self,
        collection: &str,
        id: &str,
        body: Value,
        precondition: Precondition,
    ) -> Result<u64, StoreError> {
        self.record(StoreCall::Put {
            collection: collection.to_string(),
            id: id.to_string(),
            precondition,
        });
        match self.take_fault(Operation::Put, collection) {
            Some(Fault::Unavailable) => return Err(Self::unavailable(Operation::Put, collection)),
            Some(Fault::ConcurrentWrite) => {
                if let Some(current) = self.inner.get(collection, id)? {
                    self.inner
                        .put(collection, id, current.body, Precondition::Any)?;
                }
            }
            None => {}
        }
        self.inner.put(collection, id, body, precondition)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.record(StoreCall::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        if self.take_fault(Operation::Delete, collection).is_some() {
            return Err(Self::unavailable(Operation::Delete, collection));
        }
        self.inner.delete(collection, id)
    }

    fn subscribe(&self, collection: &str) -> Subscription {
        self.inner.subscribe(collection)
    }
}

#[cfg(test)]
#[path = "faulty_tests.rs"]
mod tests;
