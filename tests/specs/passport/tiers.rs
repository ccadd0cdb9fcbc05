// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Passport tier specs
//!
//! Verify tiers follow a student's participations.

use crate::prelude::*;
use crate::prelude::assert_eq;
use ideaflow_engine::participation_id;

fn application() -> PassportApplication {
    PassportApplication {
        full_name: "Sam Adeyemi".to_string(),
        email: "sam@north.example".to_string(),
        university: "north".to_string(),
        program: "Mechanical Engineering".to_string(),
    }
}

#[test]
fn fifth_event_earns_scholar_and_losing_one_drops_back() {
    let campus = Campus::in_memory();
    let student = campus
        .passport
        .approve_application(application(), &reviewer(UnitId::Passport))
        .unwrap();
    assert_eq!(student.passport_number, "PP-2026-PP1");
    assert_eq!(student.tier, Tier::Explorer);

    let events: Vec<String> = (0..5).map(|_| campus.published_event()).collect();
    for event in &events {
        campus
            .passport
            .record_participation(&student.passport_number, event, ParticipationType::Attendee, "")
            .unwrap();
    }
    let scholar = campus.passport.get_student(&student.passport_number).unwrap();
    assert_eq!(scholar.total_events, 5);
    assert_eq!(scholar.tier, Tier::Scholar);

    let explorer = campus
        .passport
        .remove_participation(&participation_id(&student.passport_number, &events[2]))
        .unwrap();
    assert_eq!(explorer.total_events, 4);
    assert_eq!(explorer.tier, Tier::Explorer);
    assert_eq!(
        campus
            .passport
            .participations_for(&student.passport_number)
            .unwrap()
            .len(),
        4
    );
}

#[test]
fn participation_requires_a_published_event() {
    let campus = Campus::in_memory();
    let student = campus
        .passport
        .approve_application(application(), &reviewer(UnitId::Passport))
        .unwrap();
    let idea = campus.submit(ExternalApproval::NotRequired);

    let err = campus
        .passport
        .record_participation(&student.passport_number, &idea.id.0, ParticipationType::Speaker, "")
        .unwrap_err();

    assert!(err.to_string().contains("not found"));
}

#[test]
fn deleted_student_takes_participations_along() {
    let campus = Campus::in_memory();
    let student = campus
        .passport
        .approve_application(application(), &reviewer(UnitId::Passport))
        .unwrap();
    let event = campus.published_event();
    campus
        .passport
        .record_participation(&student.passport_number, &event, ParticipationType::Organizer, "")
        .unwrap();

    campus
        .passport
        .delete_student(&student.passport_number, &Actor::admin("registrar"))
        .unwrap();

    assert!(campus.store.inner().is_empty(STUDENTS));
    assert!(campus
        .passport
        .participations_for(&student.passport_number)
        .unwrap()
        .is_empty());
}
