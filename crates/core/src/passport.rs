// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Passport program: students, participations and tiers
//!
//! A student's tier is derived from how many events they took part in.
//! Every change to the event count recomputes it, which also clears any
//! manual override.

use crate::actor::Actor;
use crate::clock::Clock;
use crate::effect::{Effect, Event};
use crate::error::DomainError;
use crate::timestamp;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Collection holding students, keyed by passport number
pub const STUDENTS: &str = "students";

/// Collection holding participations
pub const PARTICIPATIONS: &str = "participations";

// Loose address check: something@something.tld, no whitespace
#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("constant regex pattern is valid")
});

/// Passport tiers, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Explorer,
    Scholar,
    Mentor,
    Pioneer,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Explorer, Tier::Scholar, Tier::Mentor, Tier::Pioneer];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Explorer => "explorer",
            Tier::Scholar => "scholar",
            Tier::Mentor => "mentor",
            Tier::Pioneer => "pioneer",
        }
    }

    /// Fewest events that earn this tier
    pub fn min_events(&self) -> u32 {
        match self {
            Tier::Explorer => 0,
            Tier::Scholar => 5,
            Tier::Mentor => 20,
            Tier::Pioneer => 30,
        }
    }

    pub fn next(&self) -> Option<Tier> {
        match self {
            Tier::Explorer => Some(Tier::Scholar),
            Tier::Scholar => Some(Tier::Mentor),
            Tier::Mentor => Some(Tier::Pioneer),
            Tier::Pioneer => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tier earned by attending `events` events
pub fn tier_for_event_count(events: u32) -> Tier {
    Tier::ALL
        .iter()
        .rev()
        .copied()
        .find(|tier| events >= tier.min_events())
        .unwrap_or(Tier::Explorer)
}

/// Position of a student between their tier and the next one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierProgress {
    pub tier: Tier,
    pub next: Tier,
    pub events: u32,
    pub floor: u32,
    pub ceiling: u32,
    /// Always within `0.0..=100.0`
    pub percent: f64,
}

impl TierProgress {
    pub fn events_remaining(&self) -> u32 {
        self.ceiling.saturating_sub(self.events)
    }
}

/// Progress toward the next tier, or `None` once at the top tier
pub fn tier_progress(events: u32) -> Option<TierProgress> {
    let tier = tier_for_event_count(events);
    let next = tier.next()?;
    let floor = tier.min_events();
    let ceiling = next.min_events();
    let span = f64::from(ceiling - floor);
    let percent = (f64::from(events.saturating_sub(floor)) * 100.0 / span).clamp(0.0, 100.0);
    Some(TierProgress {
        tier,
        next,
        events,
        floor,
        ceiling,
        percent,
    })
}

/// An approved-on-review application to join the passport program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportApplication {
    pub full_name: String,
    pub email: String,
    pub university: String,
    pub program: String,
}

impl PassportApplication {
    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("university", &self.university),
            ("program", &self.program),
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
        if !EMAIL_PATTERN.is_match(self.email.trim()) {
            return Err(DomainError::validation(format!(
                "invalid email address: {}",
                self.email
            )));
        }
        Ok(())
    }
}

/// A passport holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub passport_number: String,
    pub full_name: String,
    pub email: String,
    pub university: String,
    pub program: String,
    pub tier: Tier,
    #[serde(default)]
    pub total_events: u32,
    #[serde(with = "timestamp::native")]
    pub created_at: DateTime<Utc>,
    /// Set by an admin override, cleared by the next event-count change
    #[serde(default)]
    pub tier_overridden: bool,
}

impl Student {
    /// Create a student from a validated application
    pub fn enroll(
        passport_number: impl Into<String>,
        application: PassportApplication,
        clock: &impl Clock,
    ) -> Result<(Student, Vec<Effect>), DomainError> {
        application.validate()?;
        let passport_number = passport_number.into();
        let effects = vec![Effect::Emit(Event::StudentEnrolled {
            passport_number: passport_number.clone(),
        })];
        let student = Student {
            passport_number,
            full_name: application.full_name.trim().to_string(),
            email: application.email.trim().to_string(),
            university: application.university,
            program: application.program,
            tier: Tier::Explorer,
            total_events: 0,
            created_at: clock.now(),
            tier_overridden: false,
        };
        Ok((student, effects))
    }

    /// Count one more event
    pub fn record_event(&self, event_id: &str) -> (Student, Vec<Effect>) {
        let (student, mut effects) = self.with_event_count(self.total_events.saturating_add(1));
        effects.insert(
            0,
            Effect::Emit(Event::ParticipationRecorded {
                passport_number: self.passport_number.clone(),
                event_id: event_id.to_string(),
            }),
        );
        (student, effects)
    }

    /// Count one event fewer, never going below zero
    pub fn remove_event(&self, event_id: &str) -> (Student, Vec<Effect>) {
        let (student, mut effects) = self.with_event_count(self.total_events.saturating_sub(1));
        effects.insert(
            0,
            Effect::Emit(Event::ParticipationRemoved {
                passport_number: self.passport_number.clone(),
                event_id: event_id.to_string(),
            }),
        );
        (student, effects)
    }

    /// Admin override of the derived tier
    pub fn override_tier(
        &self,
        tier: Tier,
        actor: &Actor,
    ) -> Result<(Student, Vec<Effect>), DomainError> {
        if !actor.is_admin() {
            return Err(DomainError::permission(format!(
                "{} may not override passport tiers",
                actor.name
            )));
        }
        let mut student = self.clone();
        student.tier = tier;
        student.tier_overridden = true;
        let effects = self.tier_change(tier);
        Ok((student, effects))
    }

    fn with_event_count(&self, total_events: u32) -> (Student, Vec<Effect>) {
        let tier = tier_for_event_count(total_events);
        let mut student = self.clone();
        student.total_events = total_events;
        student.tier = tier;
        student.tier_overridden = false;
        let effects = self.tier_change(tier);
        (student, effects)
    }

    fn tier_change(&self, to: Tier) -> Vec<Effect> {
        if self.tier == to {
            return vec![];
        }
        vec![Effect::Emit(Event::TierChanged {
            passport_number: self.passport_number.clone(),
            from: self.tier,
            to,
        })]
    }
}

/// How a student took part in an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationType {
    Attendee,
    Volunteer,
    Speaker,
    Organizer,
}

/// One student's participation in one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub id: String,
    pub passport_number: String,
    pub event_id: String,
    pub participation_type: ParticipationType,
    #[serde(default)]
    pub notes: String,
    #[serde(with = "timestamp::native")]
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "passport_tests.rs"]
mod tests;
