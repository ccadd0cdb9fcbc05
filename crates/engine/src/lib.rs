// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ideaflow-engine: stateful services over a document store

mod cache;
mod documents;
mod error;
mod executor;
mod passport;
mod pipeline;

#[cfg(test)]
mod test_support;

pub use cache::IdeaCache;
pub use documents::MAX_ATTEMPTS;
pub use error::ServiceError;
pub use executor::Executor;
pub use passport::{participation_id, PassportService};
pub use pipeline::PipelineService;
