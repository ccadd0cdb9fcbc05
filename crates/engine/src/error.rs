// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine services

use ideaflow_core::{DomainError, ErrorKind};
use ideaflow_storage::StoreError;
use thiserror::Error;

/// Errors returned by the pipeline and passport services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("corrupt document {collection}/{id}: {source}")]
    Decode {
        collection: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ServiceError {
    /// Whether the caller may retry the whole operation.
    ///
    /// Only transient storage failures qualify; domain rules never change
    /// their answer on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Storage(e) => e.is_transient(),
            ServiceError::Domain(_) | ServiceError::Decode { .. } => false,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Domain(e) => e.kind(),
            ServiceError::Storage(_) | ServiceError::Decode { .. } => ErrorKind::Storage,
        }
    }

    /// The domain error, if this is one
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
