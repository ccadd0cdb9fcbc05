// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document persistence specs
//!
//! Verify ideas survive a file-backed store and that timestamps in any
//! store-native shape are read back the same.

use crate::prelude::*;
use crate::prelude::assert_eq;
use ideaflow_storage::Precondition;
use serde_json::json;

#[test]
fn ideas_persist_across_reopened_json_store() {
    let dir = tempfile::tempdir().unwrap();
    let (id, before) = {
        let campus = Campus::with_registry(JsonStore::open(dir.path()).unwrap(), Registry::builtin());
        let idea = campus.submit(ExternalApproval::Required);
        let idea = campus.approve(&idea);
        (idea.id.0.clone(), idea)
    };

    let campus = Campus::with_registry(JsonStore::open(dir.path()).unwrap(), Registry::builtin());
    let after = campus.pipeline.get(&id).unwrap();

    assert_eq!(after, before);
    assert!(dir.path().join(IDEAS).join(format!("{id}.json")).exists());
}

#[test]
fn native_timestamps_are_normalized_and_rewritten_as_text() {
    let campus = Campus::in_memory();
    let idea = campus.submit(ExternalApproval::NotRequired);
    let submitted_at = idea.submitted_at;

    // Rewrite the stored timestamps the way other store clients leave them
    let mut body = campus.store.get(IDEAS, &idea.id.0).unwrap().unwrap().body;
    body["submittedAt"] = json!({ "_seconds": submitted_at.timestamp(), "_nanoseconds": 0 });
    body["updatedAt"] = json!(submitted_at.timestamp_millis());
    body["statusHistory"][0]["timestamp"] =
        json!({ "seconds": submitted_at.timestamp(), "nanoseconds": 0 });
    campus
        .store
        .put(IDEAS, &idea.id.0, body, Precondition::Any)
        .unwrap();

    assert_eq!(campus.pipeline.get(&idea.id.0).unwrap(), idea);

    campus.approve(&idea);
    let stored = campus.store.get(IDEAS, &idea.id.0).unwrap().unwrap().body;
    assert_eq!(stored["submittedAt"], json!("2026-03-02T14:30:00Z"));
    assert_eq!(stored["statusHistory"][0]["timestamp"], json!("2026-03-02T14:30:00Z"));
}

#[test]
fn service_writes_go_through_the_traced_store() {
    let campus = Campus::in_memory();

    let (logs, idea) = with_tracing(|| campus.submit(ExternalApproval::NotRequired));

    assert!(logs.contains("store.put"), "{logs}");
    assert!(logs.contains("written"), "{logs}");
    assert!(logs.contains(&idea.id.0), "{logs}");
    assert_eq!(campus.store.inner().len(IDEAS), 1);
}
