// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed document access with compare-and-swap updates

use crate::error::ServiceError;
use ideaflow_core::{DomainError, Effect};
use ideaflow_storage::{Document, DocumentStore, Filter, Precondition, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read-modify-write attempts before a conflict is handed back to the caller
pub const MAX_ATTEMPTS: u32 = 5;

/// A decoded document and the revision it was read at
#[derive(Debug, Clone)]
pub(crate) struct Versioned<T> {
    pub value: T,
    pub revision: u64,
}

pub(crate) fn decode<T: DeserializeOwned>(
    collection: &'static str,
    doc: &Document,
) -> Result<T, ServiceError> {
    doc.decode().map_err(|source| ServiceError::Decode {
        collection,
        id: doc.id.clone(),
        source,
    })
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, ServiceError> {
    serde_json::to_value(value).map_err(|e| ServiceError::Storage(StoreError::Json(e)))
}

/// Load a document, failing with `NotFound` naming `kind`
pub(crate) fn load<S, T>(
    store: &S,
    collection: &'static str,
    kind: &'static str,
    id: &str,
) -> Result<Versioned<T>, ServiceError>
where
    S: DocumentStore,
    T: DeserializeOwned,
{
    let doc = store
        .get(collection, id)?
        .ok_or_else(|| DomainError::not_found(kind, id))?;
    Ok(Versioned {
        value: decode(collection, &doc)?,
        revision: doc.revision,
    })
}

pub(crate) fn list<S, T>(
    store: &S,
    collection: &'static str,
    filter: &Filter,
) -> Result<Vec<T>, ServiceError>
where
    S: DocumentStore,
    T: DeserializeOwned,
{
    store
        .list(collection, filter)?
        .iter()
        .map(|doc| decode(collection, doc))
        .collect()
}

/// Apply `transition` to the stored value and write it back at the revision
/// it was read at, retrying from a fresh read on conflict.
///
/// An unchanged value is not written.
pub(crate) fn update<S, T, F>(
    store: &S,
    collection: &'static str,
    kind: &'static str,
    id: &str,
    mut transition: F,
) -> Result<(T, Vec<Effect>), ServiceError>
where
    S: DocumentStore,
    T: Serialize + DeserializeOwned + PartialEq,
    F: FnMut(&T) -> Result<(T, Vec<Effect>), DomainError>,
{
    let mut attempt = 1;
    loop {
        let current: Versioned<T> = load(store, collection, kind, id)?;
        let (next, effects) = transition(&current.value)?;
        if next == current.value {
            return Ok((next, effects));
        }

        match store.put(
            collection,
            id,
            encode(&next)?,
            Precondition::Revision(current.revision),
        ) {
            Ok(revision) => {
                tracing::debug!(collection, id, revision, attempt, "updated");
                return Ok((next, effects));
            }
            Err(e) if e.is_conflict() && attempt < MAX_ATTEMPTS => {
                tracing::debug!(collection, id, attempt, "revision moved, retrying");
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Insert a new document, regenerating it on id collision
pub(crate) fn insert<S, T, F>(
    store: &S,
    collection: &'static str,
    mut generate: F,
) -> Result<(T, Vec<Effect>), ServiceError>
where
    S: DocumentStore,
    T: Serialize,
    F: FnMut() -> Result<(String, T, Vec<Effect>), DomainError>,
{
    let mut attempt = 1;
    loop {
        let (id, value, effects) = generate()?;
        match store.put(collection, &id, encode(&value)?, Precondition::Absent) {
            Ok(_) => return Ok((value, effects)),
            Err(e) if e.is_conflict() && attempt < MAX_ATTEMPTS => {
                tracing::warn!(collection, id = %id, attempt, "id already taken, regenerating");
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "documents_tests.rs"]
mod tests;
