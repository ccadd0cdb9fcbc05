// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live, subscription-fed copy of the idea collection

use crate::documents;
use crate::error::ServiceError;
use ideaflow_core::{projection, Idea, IdeaStatus, LobbyFilter, UnitId, IDEAS};
use ideaflow_storage::{Change, ChangeKind, DocumentStore, Filter, Subscription};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Cached {
    revision: u64,
    idea: Idea,
}

/// In-memory view of every idea, kept current by store change pushes.
///
/// Pushes are applied when the owner calls [`IdeaCache::sync`] or awaits
/// [`IdeaCache::changed`]. Projections read the latest applied snapshot.
#[derive(Debug)]
pub struct IdeaCache {
    subscription: Option<Subscription>,
    ideas: BTreeMap<String, Cached>,
}

impl IdeaCache {
    /// Subscribe to the idea collection and load its current contents.
    ///
    /// The subscription is opened before the initial read so no write can
    /// fall between the two; pushes already reflected in the read are
    /// skipped by revision.
    pub fn connect<S: DocumentStore>(store: &S) -> Result<Self, ServiceError> {
        let subscription = store.subscribe(IDEAS);
        let mut cache = Self {
            subscription: Some(subscription),
            ideas: BTreeMap::new(),
        };
        for doc in store.list(IDEAS, &Filter::all())? {
            cache.apply(Change::put(IDEAS, doc));
        }
        tracing::debug!(ideas = cache.ideas.len(), "idea cache connected");
        Ok(cache)
    }

    pub fn is_connected(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stop receiving pushes and drop the cached ideas
    pub fn disconnect(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.ideas.clear();
    }

    /// Apply every pending push. Returns how many changed the snapshot.
    pub fn sync(&mut self) -> usize {
        let pending = match self.subscription.as_mut() {
            Some(subscription) => subscription.drain(),
            None => return 0,
        };
        pending
            .into_iter()
            .map(|change| self.apply(change))
            .filter(|applied| *applied)
            .count()
    }

    /// Wait for the next push, then apply it along with anything else pending.
    ///
    /// Returns `false` once disconnected or the store has gone away.
    pub async fn changed(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        let next = subscription.next().await;
        match next {
            Some(change) => {
                self.apply(change);
                self.sync();
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, change: Change) -> bool {
        match change.kind {
            ChangeKind::Put(doc) => {
                if let Some(cached) = self.ideas.get(&doc.id) {
                    if cached.revision >= doc.revision {
                        return false;
                    }
                }
                match documents::decode::<Idea>(IDEAS, &doc) {
                    Ok(idea) => {
                        self.ideas.insert(
                            doc.id.clone(),
                            Cached {
                                revision: doc.revision,
                                idea,
                            },
                        );
                        true
                    }
                    Err(e) => {
                        tracing::warn!(id = %doc.id, error = %e, "skipping undecodable idea");
                        false
                    }
                }
            }
            ChangeKind::Delete => self.ideas.remove(&change.id).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        self.ideas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ideas.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Idea> {
        self.ideas.get(id).map(|cached| &cached.idea)
    }

    /// Every cached idea, ordered by id
    pub fn snapshot(&self) -> Vec<Idea> {
        self.ideas.values().map(|cached| cached.idea.clone()).collect()
    }

    pub fn for_unit(&self, unit: UnitId, university: Option<&str>) -> Vec<Idea> {
        let ideas = self.snapshot();
        projection::ideas_for_unit(&ideas, unit, university)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn with_status(&self, status: IdeaStatus) -> Vec<Idea> {
        let ideas = self.snapshot();
        projection::ideas_with_status(&ideas, status)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn lobby(&self, university: &str, filter: LobbyFilter) -> Vec<Idea> {
        let ideas = self.snapshot();
        projection::lobby(&ideas, university, filter)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn pending_count_per_unit(&self) -> BTreeMap<UnitId, usize> {
        projection::pending_count_per_unit(&self.snapshot())
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
