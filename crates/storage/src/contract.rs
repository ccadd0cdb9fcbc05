// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavior every store implementation must share

use crate::document::{ChangeKind, Filter, Precondition};
use crate::error::StoreError;
use crate::store::DocumentStore;
use serde_json::json;

pub fn revisions_grow_from_one(store: &impl DocumentStore) {
    let first = store
        .put("ideas", "idea-1", json!({ "title": "a" }), Precondition::Absent)
        .unwrap();
    let second = store
        .put("ideas", "idea-1", json!({ "title": "b" }), Precondition::Revision(1))
        .unwrap();
    assert_eq!((first, second), (1, 2));

    let doc = store.get("ideas", "idea-1").unwrap().unwrap();
    assert_eq!(doc.revision, 2);
    assert_eq!(doc.body, json!({ "title": "b" }));
}

pub fn stale_revision_conflicts(store: &impl DocumentStore) {
    store
        .put("ideas", "idea-1", json!({}), Precondition::Any)
        .unwrap();
    store
        .put("ideas", "idea-1", json!({ "v": 2 }), Precondition::Revision(1))
        .unwrap();

    let err = store
        .put("ideas", "idea-1", json!({ "v": 3 }), Precondition::Revision(1))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Conflict {
            found: Some(2),
            ..
        }
    ));
    assert!(err.is_transient());
    assert_eq!(
        store.get("ideas", "idea-1").unwrap().unwrap().body,
        json!({ "v": 2 })
    );
}

pub fn absent_rejects_existing(store: &impl DocumentStore) {
    store
        .put("students", "PP-1", json!({}), Precondition::Absent)
        .unwrap();
    let err = store
        .put("students", "PP-1", json!({}), Precondition::Absent)
        .unwrap_err();
    assert!(err.is_conflict());
}

pub fn list_filters_and_orders_by_id(store: &impl DocumentStore) {
    for (id, university) in [("c", "north"), ("a", "north"), ("b", "south")] {
        store
            .put("ideas", id, json!({ "university": university }), Precondition::Any)
            .unwrap();
    }
    store
        .put("events", "x", json!({ "university": "north" }), Precondition::Any)
        .unwrap();

    let north = store
        .list("ideas", &Filter::all().where_eq("university", "north"))
        .unwrap();
    let ids: Vec<&str> = north.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(store.list("ideas", &Filter::all()).unwrap().len(), 3);
    assert!(store.list("missing", &Filter::all()).unwrap().is_empty());
}

pub fn delete_is_idempotent(store: &impl DocumentStore) {
    store
        .put("ideas", "idea-1", json!({}), Precondition::Any)
        .unwrap();
    store.delete("ideas", "idea-1").unwrap();
    store.delete("ideas", "idea-1").unwrap();
    assert!(store.get("ideas", "idea-1").unwrap().is_none());

    // A recreated document starts over
    let revision = store
        .put("ideas", "idea-1", json!({}), Precondition::Absent)
        .unwrap();
    assert_eq!(revision, 1);
}

pub fn unsafe_keys_rejected(store: &impl DocumentStore) {
    for (collection, id) in [("ideas", "../escape"), ("ideas", ""), ("a/b", "x")] {
        let err = store
            .put(collection, id, json!({}), Precondition::Any)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)), "{collection}/{id}");
    }
}

pub fn unsafe_keys_rejected_on_every_operation(store: &impl DocumentStore) {
    let invalid = |result: Result<(), StoreError>, what: &str| {
        assert!(matches!(result, Err(StoreError::InvalidKey(_))), "{what}");
    };
    invalid(store.get("ideas", "../escape").map(|_| ()), "get id");
    invalid(store.get("..", "ideas").map(|_| ()), "get collection");
    invalid(store.list("..", &Filter::all()).map(|_| ()), "list parent");
    invalid(store.list("a/b", &Filter::all()).map(|_| ()), "list nested");
    invalid(store.list("", &Filter::all()).map(|_| ()), "list empty");
    invalid(store.delete("ideas", "../escape"), "delete id");
    invalid(store.delete(".hidden", "x"), "delete collection");
}

pub fn subscribers_see_puts_and_deletes(store: &impl DocumentStore) {
    let mut sub = store.subscribe("ideas");
    store
        .put("ideas", "idea-1", json!({ "n": 1 }), Precondition::Any)
        .unwrap();
    store
        .put("students", "PP-1", json!({}), Precondition::Any)
        .unwrap();
    store.delete("ideas", "idea-1").unwrap();

    let changes = sub.drain();
    assert_eq!(changes.len(), 2);
    match &changes[0].kind {
        ChangeKind::Put(doc) => {
            assert_eq!(doc.revision, 1);
            assert_eq!(doc.body, json!({ "n": 1 }));
        }
        other => panic!("expected put, got {other:?}"),
    }
    assert_eq!(changes[1].kind, ChangeKind::Delete);

    sub.unsubscribe();
    store
        .put("ideas", "idea-2", json!({}), Precondition::Any)
        .unwrap();
}

pub fn failed_put_is_not_announced(store: &impl DocumentStore) {
    store
        .put("ideas", "idea-1", json!({}), Precondition::Any)
        .unwrap();
    let mut sub = store.subscribe("ideas");
    let _ = store.put("ideas", "idea-1", json!({}), Precondition::Absent);
    assert!(sub.try_next().is_none());
}
