// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain error taxonomy

use crate::stage::IdeaStatus;
use thiserror::Error;

/// Failures raised by domain rules. None of them are retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("permission denied: {0}")]
    Permission(String),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("cannot {action} an idea in status {status}")]
    InvalidTransition {
        action: &'static str,
        status: IdeaStatus,
    },
}

/// Coarse error kind, for mapping failures onto user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Permission,
    NotFound,
    InvalidTransition,
    /// Persistence failure; never produced by the domain itself
    Storage,
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn permission(message: impl Into<String>) -> Self {
        DomainError::Permission(message.into())
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::Permission(_) => ErrorKind::Permission,
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
        }
    }
}
