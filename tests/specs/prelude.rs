// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for the behavioral specs

pub use chrono::{TimeZone, Utc};
pub use ideaflow_core::{
    Actor, EventDetails, ExternalApproval, FakeClock, Idea, IdeaDraft, IdeaStatus,
    ParticipationType, PassportApplication, Registry, SequentialIdGen, Tier, UnitId, EVENTS,
    IDEAS, STUDENTS,
};
pub use ideaflow_engine::{IdeaCache, PassportService, PipelineService};
pub use ideaflow_storage::{DocumentStore, JsonStore, MemoryStore, TracedStore};
pub use similar_asserts::assert_eq;
pub use std::sync::{Arc, Mutex};

pub const DRIVE_LINK: &str = "https://drive.example/robotics-night";

/// Both services wired to one traced store, with a fixed clock and sequential ids
pub struct Campus<S> {
    pub store: TracedStore<S>,
    pub pipeline: PipelineService<TracedStore<S>, FakeClock, SequentialIdGen>,
    pub passport: PassportService<TracedStore<S>, FakeClock, SequentialIdGen>,
}

impl Campus<MemoryStore> {
    pub fn in_memory() -> Self {
        Self::with_registry(MemoryStore::new(), Registry::builtin())
    }
}

impl<S: DocumentStore> Campus<S> {
    pub fn with_registry(store: S, registry: Registry) -> Self {
        let store = TracedStore::new(store);
        let clock = FakeClock::at(Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap());
        Self {
            pipeline: PipelineService::new(
                store.clone(),
                Arc::new(registry),
                clock.clone(),
                SequentialIdGen::new("idea"),
            ),
            passport: PassportService::new(store.clone(), clock, SequentialIdGen::new("pp")),
            store,
        }
    }

    pub fn submit(&self, requires_approval: ExternalApproval) -> Idea {
        self.pipeline
            .submit(draft(requires_approval), &Actor::anonymous("Riley"))
            .unwrap()
    }

    /// Approve as the unit currently holding the idea
    pub fn approve(&self, idea: &Idea) -> Idea {
        let unit = idea.current_unit.unwrap();
        self.pipeline
            .approve(&idea.id.0, None, &reviewer(unit))
            .unwrap()
    }

    pub fn add_link(&self, idea: &Idea) -> Idea {
        self.pipeline
            .update_ancillary_link(&idea.id.0, DRIVE_LINK, &reviewer(UnitId::Programs))
            .unwrap()
    }

    pub fn publish(&self, idea: &Idea) -> Idea {
        self.pipeline
            .publish(&idea.id.0, details(), &reviewer(UnitId::Systems))
            .unwrap()
    }

    /// Run a fresh idea through to publication and return its event id
    pub fn published_event(&self) -> String {
        let mut idea = self.submit(ExternalApproval::NotRequired);
        while idea.current_status != IdeaStatus::Systems {
            if idea.current_status == IdeaStatus::ProgramsPackage && idea.ancillary_link.is_none() {
                idea = self.add_link(&idea);
            }
            idea = self.approve(&idea);
        }
        self.publish(&idea).event_id.unwrap()
    }
}

pub fn reviewer(unit: UnitId) -> Actor {
    Actor::member(format!("{unit} desk"), unit).at_university("north")
}

pub fn draft(requires_approval: ExternalApproval) -> IdeaDraft {
    IdeaDraft {
        title: "Robotics Night".to_string(),
        event_type: "workshop".to_string(),
        target_audience: "first years".to_string(),
        goal: "hands-on intro to embedded systems".to_string(),
        description: "Build a line-following robot in teams".to_string(),
        estimated_attendees: 40,
        requires_approval,
        suggested_speakers: String::new(),
        resources_needed: "soldering stations".to_string(),
        notes: String::new(),
        submitted_by: "Riley".to_string(),
        university: "north".to_string(),
    }
}

pub fn details() -> EventDetails {
    EventDetails {
        name: "Robotics Night".to_string(),
        starts_at: Utc.with_ymd_and_hms(2026, 4, 1, 18, 0, 0).unwrap(),
        ends_at: None,
        location: "Hall B".to_string(),
        capacity: Some(40),
        registration_link: None,
    }
}

pub fn statuses(idea: &Idea) -> Vec<IdeaStatus> {
    idea.status_history.iter().map(|h| h.status).collect()
}

/// Run a closure with tracing output captured as plain text
pub fn with_tracing<T>(f: impl FnOnce() -> T) -> (String, T) {
    let logs = Arc::new(Mutex::new(Vec::new()));
    let writer = Arc::clone(&logs);
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || CapturedLogs(Arc::clone(&writer)))
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let contents = String::from_utf8_lossy(&logs.lock().unwrap()).to_string();
    (contents, result)
}

struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
