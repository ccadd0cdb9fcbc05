// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use crate::documents::encode;
use crate::error::ServiceError;
use ideaflow_core::{Effect, EVENTS};
use ideaflow_storage::{DocumentStore, Precondition};

/// Carries out the effects returned by the domain state machines
#[derive(Clone)]
pub struct Executor<S> {
    store: S,
}

impl<S: DocumentStore> Executor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Execute a single effect with tracing
    pub fn execute(&self, effect: Effect) -> Result<(), ServiceError> {
        use ideaflow_core::TracedEffect;

        let op_name = effect.name();
        let span = tracing::info_span!("effect", effect = op_name);
        let _guard = span.enter();

        tracing::info!(fields = ?effect.fields(), "executing");

        let start = std::time::Instant::now();
        let result = self.execute_inner(effect);
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "completed"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "failed"
            ),
        }

        result
    }

    /// Execute effects in order, stopping at the first failure
    pub fn execute_all(&self, effects: Vec<Effect>) -> Result<(), ServiceError> {
        for effect in effects {
            self.execute(effect)?;
        }
        Ok(())
    }

    fn execute_inner(&self, effect: Effect) -> Result<(), ServiceError> {
        match effect {
            Effect::Emit(event) => {
                tracing::info!(event = event.name(), subject = event.subject(), "event");
                Ok(())
            }

            // Keyed by event id, so writing it again after a failure is harmless
            Effect::CreateEventRecord(record) => {
                self.store
                    .put(EVENTS, &record.id, encode(&record)?, Precondition::Any)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
