// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Documents, write preconditions, query filters and change notifications

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A stored JSON document with its revision.
///
/// Revisions start at 1 and grow by one on every put. Deleting a document
/// forgets its revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub revision: u64,
    pub body: Value,
}

impl Document {
    /// Deserialize the body into a domain type
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.body)
    }
}

/// Condition a put must satisfy to be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Unconditional write
    Any,
    /// The document must not exist
    Absent,
    /// The document must exist at exactly this revision
    Revision(u64),
}

impl Precondition {
    /// Whether a document currently at `current` satisfies this precondition
    pub fn holds(&self, current: Option<u64>) -> bool {
        match (self, current) {
            (Precondition::Any, _) => true,
            (Precondition::Absent, None) => true,
            (Precondition::Revision(expected), Some(actual)) => *expected == actual,
            _ => false,
        }
    }
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::Any => f.write_str("any"),
            Precondition::Absent => f.write_str("absent"),
            Precondition::Revision(r) => write!(f, "revision {r}"),
        }
    }
}

/// Field-equality query over a collection.
///
/// Field names may be dotted to reach into nested objects (`details.location`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Match every document
    pub fn all() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, body: &Value) -> bool {
        self.clauses.iter().all(|(field, expected)| {
            let pointer = format!("/{}", field.replace('.', "/"));
            body.pointer(&pointer) == Some(expected)
        })
    }
}

/// What happened to a document
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeKind {
    Put(Document),
    Delete,
}

/// A change notification pushed to collection subscribers
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub collection: String,
    pub id: String,
    pub kind: ChangeKind,
}

impl Change {
    pub fn put(collection: &str, document: Document) -> Self {
        Self {
            collection: collection.to_string(),
            id: document.id.clone(),
            kind: ChangeKind::Put(document),
        }
    }

    pub fn delete(collection: &str, id: &str) -> Self {
        Self {
            collection: collection.to_string(),
            id: id.to_string(),
            kind: ChangeKind::Delete,
        }
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
