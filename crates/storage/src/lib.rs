// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Document storage for ideaflow

mod document;
mod error;
mod hub;
mod json;
mod memory;
mod store;
mod traced;

#[cfg(test)]
mod contract;

pub use document::{Change, ChangeKind, Document, Filter, Precondition};
pub use error::StoreError;
pub use hub::{ChangeHub, SubscriberId, Subscription};
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use store::DocumentStore;
pub use traced::TracedStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod faulty;
#[cfg(any(test, feature = "test-support"))]
pub use faulty::{Fault, FaultyStore, Operation, StoreCall};
