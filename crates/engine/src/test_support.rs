// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests

use chrono::{TimeZone, Utc};
use ideaflow_core::{
    Actor, EventDetails, ExternalApproval, FakeClock, IdeaDraft, SequentialIdGen, UnitId,
};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
pub struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a closure with captured tracing output
pub fn with_tracing<T>(f: impl FnOnce() -> T) -> (String, T) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (logs.contents(), result)
}

pub fn clock() -> FakeClock {
    FakeClock::at(Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap())
}

pub fn ids() -> SequentialIdGen {
    SequentialIdGen::new("id")
}

pub fn draft(university: &str, requires_approval: ExternalApproval) -> IdeaDraft {
    IdeaDraft {
        title: "Robotics night".to_string(),
        event_type: "workshop".to_string(),
        target_audience: "first years".to_string(),
        goal: "hands-on intro".to_string(),
        description: "Build a line follower".to_string(),
        estimated_attendees: 40,
        requires_approval,
        suggested_speakers: String::new(),
        resources_needed: String::new(),
        notes: String::new(),
        submitted_by: "Riley".to_string(),
        university: university.to_string(),
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

pub fn member(unit: UnitId) -> Actor {
    Actor::member(format!("{unit} reviewer"), unit)
}

pub fn student() -> Actor {
    Actor::anonymous("Riley")
}
