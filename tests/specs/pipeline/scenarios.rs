// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline scenario specs
//!
//! Verify ideas travel the approval pipeline end to end.

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn idea_without_external_approvals_is_published_in_six_steps() {
    let campus = Campus::in_memory();
    let idea = campus.submit(ExternalApproval::NotRequired);

    let idea = campus.approve(&idea);
    let idea = campus.approve(&idea);
    let idea = campus.add_link(&idea);
    let idea = campus.approve(&idea);
    let idea = campus.approve(&idea);
    assert_eq!(idea.current_status, IdeaStatus::Systems);
    let idea = campus.publish(&idea);

    assert_eq!(
        statuses(&idea),
        vec![
            IdeaStatus::Submitted,
            IdeaStatus::AcademicReview,
            IdeaStatus::ProgramsPackage,
            IdeaStatus::Operations,
            IdeaStatus::Systems,
            IdeaStatus::Published,
        ]
    );
    assert_eq!(idea.current_unit, None);

    let event_id = idea.event_id.clone().unwrap();
    let event = campus.pipeline.event(&event_id).unwrap();
    assert_eq!(event.idea_id, idea.id.0);
    assert_eq!(event.details, details());
    assert_eq!(campus.store.inner().len(EVENTS), 1);
}

#[test]
fn idea_needing_external_approvals_stops_there() {
    let campus = Campus::in_memory();
    let idea = campus.submit(ExternalApproval::Unsure);

    let idea = campus.approve(&idea);
    let idea = campus.approve(&idea);
    let idea = campus.add_link(&idea);
    let idea = campus.approve(&idea);
    let idea = campus.approve(&idea);

    assert_eq!(idea.current_status, IdeaStatus::ExternalApprovals);
    assert_eq!(idea.current_unit, Some(UnitId::ExternalApprovals));
}

#[test]
fn returned_idea_goes_back_then_forward_again() {
    let campus = Campus::in_memory();
    let idea = campus.submit(ExternalApproval::NotRequired);
    let idea = campus.approve(&idea);
    let idea = campus.approve(&idea);
    assert_eq!(idea.current_status, IdeaStatus::ProgramsPackage);

    let returned = campus
        .pipeline
        .return_idea(&idea.id.0, "needs a clearer goal", &reviewer(UnitId::Programs))
        .unwrap();
    assert_eq!(returned.current_status, IdeaStatus::Returned);
    assert_eq!(returned.current_unit, Some(UnitId::Academic));
    assert_eq!(returned.return_reason.as_deref(), Some("needs a clearer goal"));

    let forward = campus.approve(&returned);
    assert_eq!(forward.current_status, IdeaStatus::ProgramsPackage);
    assert_eq!(forward.current_unit, Some(UnitId::Programs));
    assert_eq!(
        statuses(&forward),
        vec![
            IdeaStatus::Submitted,
            IdeaStatus::AcademicReview,
            IdeaStatus::ProgramsPackage,
            IdeaStatus::Returned,
            IdeaStatus::ProgramsPackage,
        ]
    );
}

#[test]
fn rejected_idea_stays_rejected() {
    let campus = Campus::in_memory();
    let idea = campus.submit(ExternalApproval::Required);
    let rejected = campus
        .pipeline
        .reject(&idea.id.0, "out of scope", &reviewer(UnitId::Academic))
        .unwrap();
    assert_eq!(rejected.current_status, IdeaStatus::Rejected);

    let err = campus
        .pipeline
        .approve(&idea.id.0, None, &reviewer(UnitId::Academic))
        .unwrap_err();
    assert!(!err.is_retryable());
    assert_eq!(campus.pipeline.get(&idea.id.0).unwrap(), rejected);
}

#[test]
fn published_event_is_verified_by_passport() {
    let campus = Campus::in_memory();
    let mut idea = campus.submit(ExternalApproval::NotRequired);
    idea = campus.approve(&idea);
    idea = campus.approve(&idea);
    idea = campus.add_link(&idea);
    idea = campus.approve(&idea);
    idea = campus.approve(&idea);
    idea = campus.publish(&idea);

    let passport = reviewer(UnitId::Passport);
    let verifying = campus
        .pipeline
        .begin_passport_verification(&idea.id.0, None, &passport)
        .unwrap();
    assert_eq!(verifying.current_status, IdeaStatus::PassportVerification);

    let done = campus.pipeline.approve(&idea.id.0, None, &passport).unwrap();
    assert_eq!(done.current_status, IdeaStatus::Completed);
    assert_eq!(done.status_history.len(), 8);
}
