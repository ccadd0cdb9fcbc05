// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-based document store
//!
//! Each document lives at `<base>/<collection>/<id>.json`. Writes go to a
//! temporary sibling first and are renamed into place.

use crate::document::{Change, Document, Filter, Precondition};
use crate::error::StoreError;
use crate::hub::{ChangeHub, Subscription};
use crate::store::{check_collection, check_key, DocumentStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// On-disk form of a document
#[derive(Serialize, Deserialize)]
struct StoredDocument {
    revision: u64,
    body: Value,
}

/// JSON file-based storage.
///
/// Clones share one write lock and one change hub. Stores opened separately
/// on the same directory do not: their writes are not serialized against
/// each other and their subscribers never see each other's changes.
#[derive(Clone)]
pub struct JsonStore {
    base_path: PathBuf,
    /// Serializes read-check-write cycles across clones of this handle
    write_lock: Arc<Mutex<()>>,
    hub: ChangeHub,
}

impl JsonStore {
    /// Open a store at the given path, with its own write lock and change hub
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            write_lock: Arc::new(Mutex::new(())),
            hub: ChangeHub::new(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.base_path.join(collection)
    }

    fn path_for(&self, collection: &str, id: &str) -> PathBuf {
        self.collection_dir(collection).join(format!("{id}.json"))
    }

    fn read(&self, path: &Path, id: &str) -> Result<Option<Document>, StoreError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredDocument = serde_json::from_str(&json)?;
        Ok(Some(Document {
            id: id.to_string(),
            revision: stored.revision,
            body: stored.body,
        }))
    }
}

impl DocumentStore for JsonStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        check_key(collection, id)?;
        self.read(&self.path_for(collection, id), id)
    }

    fn list(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        check_collection(collection)?;
        let dir = self.collection_dir(collection);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut docs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem() {
                    let id = stem.to_string_lossy().to_string();
                    // Removed between read_dir and read
                    if let Some(doc) = self.read(&path, &id)? {
                        if filter.matches(&doc.body) {
                            docs.push(doc);
                        }
                    }
                }
            }
        }
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(docs)
    }

    fn put(
        &self,
        collection: &str,
        id: &str,
        body: Value,
        precondition: Precondition,
    ) -> Result<u64, StoreError> {
        check_key(collection, id)?;
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let path = self.path_for(collection, id);
        let current = self.read(&path, id)?.map(|doc| doc.revision);
        if !precondition.holds(current) {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                id: id.to_string(),
                expected: precondition,
                found: current,
            });
        }

        let stored = StoredDocument {
            revision: current.map_or(1, |r| r + 1),
            body,
        };
        fs::create_dir_all(self.collection_dir(collection))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&stored)?)?;
        fs::rename(&tmp, &path)?;

        let revision = stored.revision;
        self.hub.publish(&Change::put(
            collection,
            Document {
                id: id.to_string(),
                revision,
                body: stored.body,
            },
        ));
        Ok(revision)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        check_key(collection, id)?;
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        match fs::remove_file(self.path_for(collection, id)) {
            Ok(()) => {
                self.hub.publish(&Change::delete(collection, id));
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn subscribe(&self, collection: &str) -> Subscription {
        self.hub.subscribe(collection)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
