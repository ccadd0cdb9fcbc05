// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline operations service
//!
//! The only component that mutates ideas. Every operation is one
//! read-modify-write against the store, guarded by the document revision
//! and retried from a fresh read when another writer got there first.

use crate::documents::{self, MAX_ATTEMPTS};
use crate::error::ServiceError;
use crate::executor::Executor;
use ideaflow_core::{
    Actor, Clock, DomainError, EventDetails, IdGen, Idea, IdeaCommand, IdeaDraft, IdeaStatus,
    PublishedEvent, Registry, EVENTS, IDEAS,
};
use ideaflow_storage::{DocumentStore, Filter};
use std::sync::Arc;

/// Runs pipeline commands against the idea collection
#[derive(Clone)]
pub struct PipelineService<S, C, I> {
    store: S,
    registry: Arc<Registry>,
    clock: C,
    id_gen: I,
    executor: Executor<S>,
}

impl<S, C, I> PipelineService<S, C, I>
where
    S: DocumentStore,
    C: Clock,
    I: IdGen,
{
    pub fn new(store: S, registry: Arc<Registry>, clock: C, id_gen: I) -> Self {
        Self {
            executor: Executor::new(store.clone()),
            store,
            registry,
            clock,
            id_gen,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Submit a new idea into the entry unit's queue
    pub fn submit(&self, draft: IdeaDraft, actor: &Actor) -> Result<Idea, ServiceError> {
        let span = tracing::info_span!(
            "pipeline.submit",
            actor = %actor.name,
            university = %draft.university
        );
        let _guard = span.enter();

        let result = self.submit_inner(draft, actor);
        match &result {
            Ok(idea) => tracing::info!(idea = %idea.id, "submitted"),
            Err(e) => tracing::warn!(error = %e, "submit refused"),
        }
        result
    }

    fn submit_inner(&self, draft: IdeaDraft, actor: &Actor) -> Result<Idea, ServiceError> {
        actor.authorize_university(&draft.university)?;
        draft.validate()?;

        let (idea, effects) = documents::insert(&self.store, IDEAS, || {
            let id = self.id_gen.next();
            let (idea, effects) = Idea::submit(id.as_str(), draft.clone(), &self.clock)?;
            Ok((id, idea, effects))
        })?;
        self.executor.execute_all(effects)?;
        Ok(idea)
    }

    pub fn approve(
        &self,
        id: &str,
        notes: Option<String>,
        actor: &Actor,
    ) -> Result<Idea, ServiceError> {
        self.run(id, IdeaCommand::Approve { notes }, actor)
    }

    /// Send an idea back to the unit owning the previous stage
    pub fn return_idea(
        &self,
        id: &str,
        reason: &str,
        actor: &Actor,
    ) -> Result<Idea, ServiceError> {
        self.run(
            id,
            IdeaCommand::Return {
                reason: reason.to_string(),
            },
            actor,
        )
    }

    pub fn reject(&self, id: &str, reason: &str, actor: &Actor) -> Result<Idea, ServiceError> {
        self.run(
            id,
            IdeaCommand::Reject {
                reason: reason.to_string(),
            },
            actor,
        )
    }

    /// Publish an idea held by Systems and create its event record
    pub fn publish(
        &self,
        id: &str,
        details: EventDetails,
        actor: &Actor,
    ) -> Result<Idea, ServiceError> {
        let event_id = self.id_gen.next();
        self.run(id, IdeaCommand::Publish { details, event_id }, actor)
    }

    /// Hand a published idea to the Passport unit
    pub fn begin_passport_verification(
        &self,
        id: &str,
        notes: Option<String>,
        actor: &Actor,
    ) -> Result<Idea, ServiceError> {
        self.run(id, IdeaCommand::BeginPassportVerification { notes }, actor)
    }

    pub fn update_ancillary_link(
        &self,
        id: &str,
        link: &str,
        actor: &Actor,
    ) -> Result<Idea, ServiceError> {
        self.run(
            id,
            IdeaCommand::SetAncillaryLink {
                link: link.to_string(),
            },
            actor,
        )
    }

    /// Rewrite the event record of a published idea.
    ///
    /// Recovers from a publish whose idea was saved but whose event record
    /// write failed.
    pub fn ensure_event_record(&self, id: &str) -> Result<PublishedEvent, ServiceError> {
        let idea = self.get(id)?;
        let invalid = || DomainError::InvalidTransition {
            action: "restore the event record of",
            status: idea.current_status,
        };
        let (Some(event_id), Some(details), Some(published_at)) = (
            idea.event_id.clone(),
            idea.event_data.clone(),
            idea.published_at,
        ) else {
            return Err(invalid().into());
        };
        let published_by = idea
            .status_history
            .iter()
            .rev()
            .find(|entry| entry.status == IdeaStatus::Published)
            .map(|entry| entry.actor.clone())
            .ok_or_else(invalid)?;

        let record = PublishedEvent {
            id: event_id,
            idea_id: idea.id.0.clone(),
            title: idea.intake.title.clone(),
            university: idea.intake.university.clone(),
            details,
            published_at,
            published_by,
        };
        self.executor
            .execute(ideaflow_core::Effect::CreateEventRecord(record.clone()))?;
        Ok(record)
    }

    pub fn get(&self, id: &str) -> Result<Idea, ServiceError> {
        Ok(documents::load::<_, Idea>(&self.store, IDEAS, "idea", id)?.value)
    }

    /// Ideas matching `filter`, ordered by id
    pub fn list(&self, filter: &Filter) -> Result<Vec<Idea>, ServiceError> {
        documents::list(&self.store, IDEAS, filter)
    }

    /// The published event record for `event_id`
    pub fn event(&self, event_id: &str) -> Result<PublishedEvent, ServiceError> {
        let record = documents::load::<_, PublishedEvent>(&self.store, EVENTS, "event", event_id)?;
        Ok(record.value)
    }

    fn run(&self, id: &str, command: IdeaCommand, actor: &Actor) -> Result<Idea, ServiceError> {
        let action = command.name();
        let span = tracing::info_span!("pipeline.command", action, idea = id, actor = %actor.name);
        let _guard = span.enter();

        let result = documents::update(&self.store, IDEAS, "idea", id, |idea: &Idea| {
            idea.apply(command.clone(), actor, &self.registry, &self.clock)
        })
        .and_then(|(idea, effects)| {
            self.executor.execute_all(effects)?;
            Ok(idea)
        });

        match &result {
            Ok(idea) => tracing::info!(
                status = %idea.current_status,
                unit = ?idea.current_unit,
                history = idea.status_history.len(),
                "applied"
            ),
            Err(e) if e.is_retryable() => tracing::error!(
                error = %e,
                max_attempts = MAX_ATTEMPTS,
                "storage failure"
            ),
            Err(e) => tracing::warn!(error = %e, "refused"),
        }
        result
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
