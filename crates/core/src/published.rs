// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Published event records

use crate::error::DomainError;
use crate::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding published events
pub const EVENTS: &str = "events";

/// Scheduling details supplied by Systems when publishing an idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub name: String,
    #[serde(with = "timestamp::native")]
    pub starts_at: DateTime<Utc>,
    #[serde(with = "timestamp::native_opt", default)]
    pub ends_at: Option<DateTime<Utc>>,
    pub location: String,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub registration_link: Option<String>,
}

impl EventDetails {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("event name is required"));
        }
        if self.location.trim().is_empty() {
            return Err(DomainError::validation("event location is required"));
        }
        if let Some(ends_at) = self.ends_at {
            if ends_at < self.starts_at {
                return Err(DomainError::validation("event ends before it starts"));
            }
        }
        Ok(())
    }
}

/// The event record written to [`EVENTS`] when an idea is published
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedEvent {
    pub id: String,
    pub idea_id: String,
    pub title: String,
    pub university: String,
    pub details: EventDetails,
    #[serde(with = "timestamp::native")]
    pub published_at: DateTime<Utc>,
    pub published_by: String,
}
