// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store errors

use crate::document::Precondition;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("conflict on {collection}/{id}: expected {expected}, found {found:?}")]
    Conflict {
        collection: String,
        id: String,
        expected: Precondition,
        found: Option<u64>,
    },
    #[error("invalid document key: {0:?}")]
    InvalidKey(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Io(_) | StoreError::Conflict { .. } | StoreError::Unavailable(_)
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}
