// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Idea state machine
//!
//! An idea is a student's event proposal travelling through the approval
//! pipeline. [`Idea::apply`] is the pure transition function: it validates
//! the command against the registry and the actor, and returns the new idea
//! together with the effects the caller must carry out. The input idea is
//! never touched, so a failed command leaves no trace.

use crate::actor::Actor;
use crate::clock::Clock;
use crate::effect::{Effect, Event};
use crate::error::DomainError;
use crate::published::{EventDetails, PublishedEvent};
use crate::registry::Registry;
use crate::stage::{IdeaStatus, Stage};
use crate::timestamp;
use crate::transition::{next_stage, previous_stage};
use crate::unit::{Capability, UnitId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Collection holding ideas
pub const IDEAS: &str = "ideas";

/// The unit that receives newly submitted ideas
pub const ENTRY_UNIT: UnitId = UnitId::Academic;

/// Unique identifier for an idea
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdeaId(pub String);

impl fmt::Display for IdeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IdeaId {
    fn from(s: String) -> Self {
        IdeaId(s)
    }
}

impl From<&str> for IdeaId {
    fn from(s: &str) -> Self {
        IdeaId(s.to_string())
    }
}

/// Whether an idea needs sign-off from outside the university.
///
/// Stored as `true`, `false` or `"unsure"`. Anything but an explicit
/// `false` routes the idea through external approvals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExternalApproval", into = "RawExternalApproval")]
pub enum ExternalApproval {
    Required,
    NotRequired,
    Unsure,
}

impl ExternalApproval {
    pub fn requires_external_approval(&self) -> bool {
        !matches!(self, ExternalApproval::NotRequired)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawExternalApproval {
    Flag(bool),
    Text(String),
}

impl TryFrom<RawExternalApproval> for ExternalApproval {
    type Error = String;

    fn try_from(raw: RawExternalApproval) -> Result<Self, Self::Error> {
        match raw {
            RawExternalApproval::Flag(true) => Ok(ExternalApproval::Required),
            RawExternalApproval::Flag(false) => Ok(ExternalApproval::NotRequired),
            RawExternalApproval::Text(text) => match text.to_ascii_lowercase().as_str() {
                "unsure" => Ok(ExternalApproval::Unsure),
                "true" | "yes" => Ok(ExternalApproval::Required),
                "false" | "no" => Ok(ExternalApproval::NotRequired),
                _ => Err(format!("invalid requiresApproval value: {text}")),
            },
        }
    }
}

impl From<ExternalApproval> for RawExternalApproval {
    fn from(value: ExternalApproval) -> Self {
        match value {
            ExternalApproval::Required => RawExternalApproval::Flag(true),
            ExternalApproval::NotRequired => RawExternalApproval::Flag(false),
            ExternalApproval::Unsure => RawExternalApproval::Text("unsure".to_string()),
        }
    }
}

/// Intake fields captured at submission. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaDraft {
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub target_audience: String,
    pub goal: String,
    pub description: String,
    #[serde(default)]
    pub estimated_attendees: u32,
    pub requires_approval: ExternalApproval,
    #[serde(default)]
    pub suggested_speakers: String,
    #[serde(default)]
    pub resources_needed: String,
    #[serde(default)]
    pub notes: String,
    pub submitted_by: String,
    pub university: String,
}

impl IdeaDraft {
    /// Check every required intake field is filled in
    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [
            ("title", &self.title),
            ("type", &self.event_type),
            ("targetAudience", &self.target_audience),
            ("goal", &self.goal),
            ("description", &self.description),
            ("submittedBy", &self.submitted_by),
            ("university", &self.university),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

/// One entry of an idea's audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub status: IdeaStatus,
    pub unit: Option<UnitId>,
    #[serde(with = "timestamp::native")]
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Commands that move an idea through the pipeline
#[derive(Debug, Clone)]
pub enum IdeaCommand {
    Approve { notes: Option<String> },
    Return { reason: String },
    Reject { reason: String },
    Publish { details: EventDetails, event_id: String },
    BeginPassportVerification { notes: Option<String> },
    SetAncillaryLink { link: String },
}

impl IdeaCommand {
    pub fn name(&self) -> &'static str {
        match self {
            IdeaCommand::Approve { .. } => "approve",
            IdeaCommand::Return { .. } => "return",
            IdeaCommand::Reject { .. } => "reject",
            IdeaCommand::Publish { .. } => "publish",
            IdeaCommand::BeginPassportVerification { .. } => "begin passport verification for",
            IdeaCommand::SetAncillaryLink { .. } => "update the ancillary link of",
        }
    }
}

/// A submitted event idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: IdeaId,
    #[serde(flatten)]
    pub intake: IdeaDraft,
    pub current_status: IdeaStatus,
    pub current_unit: Option<UnitId>,
    #[serde(default)]
    pub ancillary_link: Option<String>,
    pub status_history: Vec<HistoryEntry>,
    #[serde(default)]
    pub return_reason: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub event_data: Option<EventDetails>,
    #[serde(with = "timestamp::native_opt", default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(with = "timestamp::native")]
    pub submitted_at: DateTime<Utc>,
    #[serde(with = "timestamp::native")]
    pub updated_at: DateTime<Utc>,
}

impl Idea {
    /// Create a freshly submitted idea held by the entry unit
    pub fn submit(
        id: impl Into<IdeaId>,
        draft: IdeaDraft,
        clock: &impl Clock,
    ) -> Result<(Idea, Vec<Effect>), DomainError> {
        draft.validate()?;
        let now = clock.now();
        let id = id.into();
        let first = HistoryEntry {
            status: IdeaStatus::Submitted,
            unit: Some(ENTRY_UNIT),
            timestamp: now,
            actor: draft.submitted_by.clone(),
            notes: None,
        };
        let effects = vec![Effect::Emit(Event::IdeaSubmitted {
            id: id.0.clone(),
            university: draft.university.clone(),
        })];
        let idea = Idea {
            id,
            intake: draft,
            current_status: IdeaStatus::Submitted,
            current_unit: Some(ENTRY_UNIT),
            ancillary_link: None,
            status_history: vec![first],
            return_reason: None,
            rejection_reason: None,
            event_data: None,
            published_at: None,
            event_id: None,
            submitted_at: now,
            updated_at: now,
        };
        Ok((idea, effects))
    }

    /// Pure transition function - returns the new idea and effects
    pub fn apply(
        &self,
        command: IdeaCommand,
        actor: &Actor,
        registry: &Registry,
        clock: &impl Clock,
    ) -> Result<(Idea, Vec<Effect>), DomainError> {
        let now = clock.now();
        let action = command.name();
        match command {
            IdeaCommand::Approve { notes } => self.approve(notes, actor, registry, now),
            IdeaCommand::Return { reason } => self.return_to_previous(reason, actor, registry, now),
            IdeaCommand::Reject { reason } => self.reject(reason, actor, registry, now),
            IdeaCommand::Publish { details, event_id } => {
                self.publish(details, event_id, actor, registry, now)
            }
            IdeaCommand::BeginPassportVerification { notes } => {
                self.begin_passport_verification(notes, actor, registry, now)
            }
            IdeaCommand::SetAncillaryLink { link } => {
                self.set_ancillary_link(action, link, actor, registry, now)
            }
        }
    }

    /// The pipeline position this idea effectively occupies.
    ///
    /// A returned idea sits at the reviewing stage of the unit it was
    /// returned to.
    pub fn effective_stage(&self, registry: &Registry) -> Option<Stage> {
        match self.current_status {
            IdeaStatus::Returned => self.current_unit.map(|unit| registry.unit(unit).stage),
            status => status.stage(),
        }
    }

    /// Whether the audit trail agrees with the current status
    pub fn history_is_consistent(&self) -> bool {
        self.status_history
            .last()
            .is_some_and(|last| last.status == self.current_status)
    }

    /// The ancillary link as seen by `actor`: hidden from units that may not view it
    pub fn ancillary_link_for(&self, actor: &Actor, registry: &Registry) -> Option<&str> {
        let visible = registry.units().iter().any(|unit| {
            unit.permissions.allows(Capability::ViewAncillaryLink) && actor.acts_for(unit.id)
        });
        if visible {
            self.ancillary_link.as_deref()
        } else {
            None
        }
    }

    fn invalid(&self, action: &'static str) -> DomainError {
        DomainError::InvalidTransition {
            action,
            status: self.current_status,
        }
    }

    /// The unit that must act next, checked against the actor and its permissions
    fn acting_unit(
        &self,
        action: &'static str,
        capability: Capability,
        actor: &Actor,
        registry: &Registry,
    ) -> Result<UnitId, DomainError> {
        if self.current_status.is_terminal() {
            return Err(self.invalid(action));
        }
        let unit = self.current_unit.ok_or_else(|| self.invalid(action))?;
        actor.authorize(unit, &self.intake.university)?;
        if !registry.permissions(unit).allows(capability) {
            return Err(DomainError::permission(format!(
                "unit {unit} may not {capability}"
            )));
        }
        Ok(unit)
    }

    fn record(
        &mut self,
        status: IdeaStatus,
        unit: Option<UnitId>,
        actor: &Actor,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.current_status = status;
        self.current_unit = unit;
        self.updated_at = now;
        self.status_history.push(HistoryEntry {
            status,
            unit,
            timestamp: now,
            actor: actor.name.clone(),
            notes,
        });
    }

    fn approve(
        &self,
        notes: Option<String>,
        actor: &Actor,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<(Idea, Vec<Effect>), DomainError> {
        let unit = self.acting_unit("approve", Capability::Approve, actor, registry)?;
        if registry.permissions(unit).requires_ancillary_link && !self.has_ancillary_link() {
            return Err(DomainError::validation(format!(
                "unit {unit} requires an ancillary link before approving"
            )));
        }

        let current = self
            .effective_stage(registry)
            .ok_or_else(|| self.invalid("approve"))?;
        let requires_external = self.intake.requires_approval.requires_external_approval();
        let (status, next_unit) = match next_stage(current, requires_external) {
            None => (IdeaStatus::Completed, None),
            // Publication carries event details; Systems goes through publish
            Some(Stage::Published) => return Err(self.invalid("approve")),
            Some(stage) => (
                IdeaStatus::from(stage),
                registry.unit_for_stage(stage).map(|u| u.id),
            ),
        };

        let mut idea = self.clone();
        idea.record(status, next_unit, actor, notes, now);
        let effects = vec![Effect::Emit(Event::IdeaAdvanced {
            id: self.id.0.clone(),
            from: self.current_status,
            to: status,
            unit: next_unit,
        })];
        Ok((idea, effects))
    }

    fn return_to_previous(
        &self,
        reason: String,
        actor: &Actor,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<(Idea, Vec<Effect>), DomainError> {
        if self.current_status.is_terminal() {
            return Err(self.invalid("return"));
        }
        if reason.trim().is_empty() {
            return Err(DomainError::validation("a return reason is required"));
        }
        self.acting_unit("return", Capability::Return, actor, registry)?;

        let previous = self
            .effective_stage(registry)
            .and_then(previous_stage)
            .ok_or_else(|| self.invalid("return"))?;
        let target = registry
            .unit_for_stage(previous)
            .map(|u| u.id)
            .ok_or_else(|| self.invalid("return"))?;

        let mut idea = self.clone();
        idea.return_reason = Some(reason.clone());
        idea.record(
            IdeaStatus::Returned,
            Some(target),
            actor,
            Some(reason.clone()),
            now,
        );
        let effects = vec![Effect::Emit(Event::IdeaReturned {
            id: self.id.0.clone(),
            to_unit: target,
            reason,
        })];
        Ok((idea, effects))
    }

    fn reject(
        &self,
        reason: String,
        actor: &Actor,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<(Idea, Vec<Effect>), DomainError> {
        if self.current_status.is_terminal() {
            return Err(self.invalid("reject"));
        }
        if reason.trim().is_empty() {
            return Err(DomainError::validation("a rejection reason is required"));
        }
        let unit = self.acting_unit("reject", Capability::Reject, actor, registry)?;

        let mut idea = self.clone();
        idea.rejection_reason = Some(reason.clone());
        idea.record(
            IdeaStatus::Rejected,
            Some(unit),
            actor,
            Some(reason.clone()),
            now,
        );
        let effects = vec![Effect::Emit(Event::IdeaRejected {
            id: self.id.0.clone(),
            unit,
            reason,
        })];
        Ok((idea, effects))
    }

    fn publish(
        &self,
        details: EventDetails,
        event_id: String,
        actor: &Actor,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<(Idea, Vec<Effect>), DomainError> {
        if self.current_status != IdeaStatus::Systems || self.current_unit != Some(UnitId::Systems)
        {
            return Err(self.invalid("publish"));
        }
        self.acting_unit("publish", Capability::Approve, actor, registry)?;
        details.validate()?;

        let record = PublishedEvent {
            id: event_id.clone(),
            idea_id: self.id.0.clone(),
            title: self.intake.title.clone(),
            university: self.intake.university.clone(),
            details: details.clone(),
            published_at: now,
            published_by: actor.name.clone(),
        };

        let mut idea = self.clone();
        idea.event_data = Some(details);
        idea.published_at = Some(now);
        idea.event_id = Some(event_id.clone());
        idea.record(IdeaStatus::Published, None, actor, None, now);

        let effects = vec![
            Effect::CreateEventRecord(record),
            Effect::Emit(Event::IdeaPublished {
                id: self.id.0.clone(),
                event_id,
            }),
        ];
        Ok((idea, effects))
    }

    fn begin_passport_verification(
        &self,
        notes: Option<String>,
        actor: &Actor,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<(Idea, Vec<Effect>), DomainError> {
        let action = "begin passport verification for";
        if self.current_status != IdeaStatus::Published {
            return Err(self.invalid(action));
        }
        let unit = registry
            .unit_for_stage(Stage::PassportVerification)
            .map(|u| u.id)
            .ok_or_else(|| self.invalid(action))?;
        actor.authorize(unit, &self.intake.university)?;
        if !registry.permissions(unit).allows(Capability::Approve) {
            return Err(DomainError::permission(format!(
                "unit {unit} may not {}",
                Capability::Approve
            )));
        }

        let mut idea = self.clone();
        idea.record(IdeaStatus::PassportVerification, Some(unit), actor, notes, now);
        let effects = vec![Effect::Emit(Event::IdeaAdvanced {
            id: self.id.0.clone(),
            from: self.current_status,
            to: IdeaStatus::PassportVerification,
            unit: Some(unit),
        })];
        Ok((idea, effects))
    }

    fn set_ancillary_link(
        &self,
        action: &'static str,
        link: String,
        actor: &Actor,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<(Idea, Vec<Effect>), DomainError> {
        if self.current_status == IdeaStatus::Rejected {
            return Err(self.invalid(action));
        }
        let link = link.trim().to_string();
        if link.is_empty() {
            return Err(DomainError::validation("the ancillary link cannot be empty"));
        }
        let writer = registry.units().iter().any(|unit| {
            unit.permissions.allows(Capability::WriteAncillaryLink) && actor.acts_for(unit.id)
        });
        if !writer {
            return Err(DomainError::permission(format!(
                "{} may not {}",
                actor.name,
                Capability::WriteAncillaryLink
            )));
        }
        actor.authorize_university(&self.intake.university)?;

        if self.ancillary_link.as_deref() == Some(link.as_str()) {
            return Ok((self.clone(), vec![]));
        }
        let mut idea = self.clone();
        idea.ancillary_link = Some(link);
        idea.updated_at = now;
        let effects = vec![Effect::Emit(Event::AncillaryLinkUpdated {
            id: self.id.0.clone(),
        })];
        Ok((idea, effects))
    }

    fn has_ancillary_link(&self) -> bool {
        self.ancillary_link
            .as_deref()
            .is_some_and(|link| !link.trim().is_empty())
    }
}

#[cfg(test)]
#[path = "idea_tests.rs"]
mod tests;
