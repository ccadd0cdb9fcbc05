// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::published::EventDetails;
use chrono::{TimeZone, Utc};
use yare::parameterized;

fn record() -> PublishedEvent {
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    PublishedEvent {
        id: "evt-1".to_string(),
        idea_id: "idea-1".to_string(),
        title: "Robotics night".to_string(),
        university: "north".to_string(),
        details: EventDetails {
            name: "Robotics Night".to_string(),
            starts_at: at,
            ends_at: None,
            location: "Hall B".to_string(),
            capacity: None,
            registration_link: None,
        },
        published_at: at,
        published_by: "Sky".to_string(),
    }
}

#[parameterized(
    submitted = { Event::IdeaSubmitted { id: "idea-1".into(), university: "north".into() }, "idea.submitted", "idea-1" },
    advanced = { Event::IdeaAdvanced { id: "idea-2".into(), from: IdeaStatus::Submitted, to: IdeaStatus::AcademicReview, unit: Some(UnitId::Academic) }, "idea.advanced", "idea-2" },
    returned = { Event::IdeaReturned { id: "idea-3".into(), to_unit: UnitId::Programs, reason: "why".into() }, "idea.returned", "idea-3" },
    tier = { Event::TierChanged { passport_number: "PP-2026-ABC123".into(), from: Tier::Explorer, to: Tier::Scholar }, "student.tier", "PP-2026-ABC123" },
    deleted = { Event::StudentDeleted { passport_number: "PP-2026-XYZ999".into() }, "student.deleted", "PP-2026-XYZ999" },
)]
fn event_names_and_subjects(event: Event, name: &str, subject: &str) {
    assert_eq!(event.name(), name);
    assert_eq!(event.subject(), subject);
}

#[test]
fn emit_is_traced_with_event_name_and_subject() {
    let effect = Effect::Emit(Event::IdeaPublished {
        id: "idea-1".to_string(),
        event_id: "evt-1".to_string(),
    });
    assert_eq!(effect.name(), "emit");
    assert_eq!(
        effect.fields(),
        vec![
            ("event", "idea.published".to_string()),
            ("subject", "idea-1".to_string()),
        ]
    );
}

#[test]
fn create_event_record_is_traced_with_both_ids() {
    let effect = Effect::CreateEventRecord(record());
    assert_eq!(effect.name(), "create_event_record");
    assert_eq!(
        effect.fields(),
        vec![
            ("event_id", "evt-1".to_string()),
            ("idea_id", "idea-1".to_string()),
        ]
    );
}

#[test]
fn events_serialize_with_variant_tag() {
    let event = Event::ParticipationRecorded {
        passport_number: "PP-2026-ABC123".to_string(),
        event_id: "evt-1".to_string(),
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["ParticipationRecorded"]["event_id"], "evt-1");
}
