// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ideaflow-core: domain model for the event-idea approval pipeline
//!
//! This crate provides:
//! - The stage/unit registry and its TOML configuration
//! - The pure idea state machine and transition resolver
//! - Passport tiers, students and participations
//! - Read-side projections over ideas
//! - Effect-based orchestration (effects are carried out by the engine)

pub mod actor;
pub mod clock;
pub mod error;
pub mod id;
pub mod timestamp;
pub mod traced;

// Configuration
pub mod registry;
pub mod stage;
pub mod unit;

// State machines (order matters for dependencies)
pub mod transition;
pub mod effect;
pub mod published;
pub mod idea;
pub mod passport;

pub mod projection;

// Re-exports
pub use actor::{Actor, UnitScope};
pub use clock::{Clock, FakeClock, SystemClock};
pub use effect::{Effect, Event};
pub use error::{DomainError, ErrorKind};
pub use id::{passport_number, IdGen, SequentialIdGen, UuidIdGen};
pub use idea::{
    ExternalApproval, HistoryEntry, Idea, IdeaCommand, IdeaDraft, IdeaId, ENTRY_UNIT, IDEAS,
};
pub use passport::{
    tier_for_event_count, tier_progress, Participation, ParticipationType, PassportApplication,
    Student, Tier, TierProgress, PARTICIPATIONS, STUDENTS,
};
pub use projection::LobbyFilter;
pub use published::{EventDetails, PublishedEvent, EVENTS};
pub use registry::{ConfigError, Registry};
pub use stage::{IdeaStatus, Stage, ORDERED_STAGES};
pub use timestamp::{NativeTimestamp, TimestampError};
pub use traced::TracedEffect;
pub use transition::{next_stage, previous_stage};
pub use unit::{Capability, PermissionSet, Unit, UnitId};
