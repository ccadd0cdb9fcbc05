// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live cache specs
//!
//! Verify the idea cache follows writes made through the services.

use crate::prelude::*;
use crate::prelude::assert_eq;
use ideaflow_core::LobbyFilter;

#[test]
fn cache_observes_pipeline_writes() {
    let campus = Campus::in_memory();
    let mut cache = IdeaCache::connect(&campus.store).unwrap();

    let idea = campus.submit(ExternalApproval::NotRequired);
    cache.sync();
    assert_eq!(cache.for_unit(UnitId::Academic, Some("north")).len(), 1);

    let idea = campus.approve(&idea);
    let idea = campus.approve(&idea);
    cache.sync();

    assert_eq!(cache.get(&idea.id.0), Some(&idea));
    assert!(cache.for_unit(UnitId::Academic, None).is_empty());
    assert_eq!(cache.pending_count_per_unit()[&UnitId::Programs], 1);
}

#[test]
fn cache_over_json_store_matches_lobby() {
    let dir = tempfile::tempdir().unwrap();
    let campus = Campus::with_registry(JsonStore::open(dir.path()).unwrap(), Registry::builtin());
    let kept = campus.submit(ExternalApproval::NotRequired);
    let dropped = campus.submit(ExternalApproval::NotRequired);

    let mut cache = IdeaCache::connect(&campus.store).unwrap();
    campus
        .pipeline
        .reject(&dropped.id.0, "duplicate", &reviewer(UnitId::Academic))
        .unwrap();
    cache.sync();

    let pending: Vec<String> = cache
        .lobby("north", LobbyFilter::Pending)
        .into_iter()
        .map(|idea| idea.id.0)
        .collect();
    assert_eq!(pending, vec![kept.id.0.clone()]);
    assert_eq!(cache.lobby("north", LobbyFilter::Rejected).len(), 1);

    cache.disconnect();
    assert!(!cache.is_connected());
}
