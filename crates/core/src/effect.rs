// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects and events for state machine orchestration

use crate::passport::Tier;
use crate::published::PublishedEvent;
use crate::stage::IdeaStatus;
use crate::traced::TracedEffect;
use crate::unit::UnitId;
use serde::{Deserialize, Serialize};

/// Side effects requested by a state machine transition, applied by the
/// caller after the new state is persisted
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Emit an event for other components to observe
    Emit(Event),
    /// Write the public event record created at publication
    CreateEventRecord(PublishedEvent),
}

/// Events emitted by state machines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    IdeaSubmitted {
        id: String,
        university: String,
    },
    IdeaAdvanced {
        id: String,
        from: IdeaStatus,
        to: IdeaStatus,
        unit: Option<UnitId>,
    },
    IdeaReturned {
        id: String,
        to_unit: UnitId,
        reason: String,
    },
    IdeaRejected {
        id: String,
        unit: UnitId,
        reason: String,
    },
    IdeaPublished {
        id: String,
        event_id: String,
    },
    AncillaryLinkUpdated {
        id: String,
    },

    StudentEnrolled {
        passport_number: String,
    },
    TierChanged {
        passport_number: String,
        from: Tier,
        to: Tier,
    },
    ParticipationRecorded {
        passport_number: String,
        event_id: String,
    },
    ParticipationRemoved {
        passport_number: String,
        event_id: String,
    },
    StudentDeleted {
        passport_number: String,
    },
}

impl Event {
    /// Dotted event name used for log lines
    pub fn name(&self) -> &'static str {
        match self {
            Event::IdeaSubmitted { .. } => "idea.submitted",
            Event::IdeaAdvanced { .. } => "idea.advanced",
            Event::IdeaReturned { .. } => "idea.returned",
            Event::IdeaRejected { .. } => "idea.rejected",
            Event::IdeaPublished { .. } => "idea.published",
            Event::AncillaryLinkUpdated { .. } => "idea.ancillary_link",
            Event::StudentEnrolled { .. } => "student.enrolled",
            Event::TierChanged { .. } => "student.tier",
            Event::ParticipationRecorded { .. } => "participation.recorded",
            Event::ParticipationRemoved { .. } => "participation.removed",
            Event::StudentDeleted { .. } => "student.deleted",
        }
    }

    /// The idea or student this event concerns
    pub fn subject(&self) -> &str {
        match self {
            Event::IdeaSubmitted { id, .. }
            | Event::IdeaAdvanced { id, .. }
            | Event::IdeaReturned { id, .. }
            | Event::IdeaRejected { id, .. }
            | Event::IdeaPublished { id, .. }
            | Event::AncillaryLinkUpdated { id } => id,
            Event::StudentEnrolled { passport_number }
            | Event::TierChanged {
                passport_number, ..
            }
            | Event::ParticipationRecorded {
                passport_number, ..
            }
            | Event::ParticipationRemoved {
                passport_number, ..
            }
            | Event::StudentDeleted { passport_number } => passport_number,
        }
    }
}

impl TracedEffect for Effect {
    fn name(&self) -> &'static str {
        match self {
            Effect::Emit(_) => "emit",
            Effect::CreateEventRecord(_) => "create_event_record",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Emit(event) => vec![
                ("event", event.name().to_string()),
                ("subject", event.subject().to_string()),
            ],
            Effect::CreateEventRecord(record) => vec![
                ("event_id", record.id.clone()),
                ("idea_id", record.idea_id.clone()),
            ],
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
