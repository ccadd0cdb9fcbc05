// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalization of store-native timestamps
//!
//! Document stores hand timestamps back in several shapes: `{seconds,
//! nanoseconds}` objects (with or without leading underscores), epoch
//! milliseconds, or RFC 3339 strings. Everything is normalized to
//! `DateTime<Utc>` when a document is decoded, and always written back as
//! RFC 3339.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp out of range: {seconds}s {nanoseconds}ns")]
    OutOfRange { seconds: i64, nanoseconds: u32 },
    #[error("invalid timestamp text: {0}")]
    InvalidText(String),
}

/// A timestamp as it may appear in a stored document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NativeTimestamp {
    Parts {
        seconds: i64,
        #[serde(default, alias = "nanos")]
        nanoseconds: u32,
    },
    UnderscoredParts {
        #[serde(rename = "_seconds")]
        seconds: i64,
        #[serde(rename = "_nanoseconds", default)]
        nanoseconds: u32,
    },
    EpochMillis(i64),
    Text(String),
}

impl NativeTimestamp {
    pub fn normalize(&self) -> Result<DateTime<Utc>, TimestampError> {
        match self {
            NativeTimestamp::Parts {
                seconds,
                nanoseconds,
            }
            | NativeTimestamp::UnderscoredParts {
                seconds,
                nanoseconds,
            } => Utc
                .timestamp_opt(*seconds, *nanoseconds)
                .single()
                .ok_or(TimestampError::OutOfRange {
                    seconds: *seconds,
                    nanoseconds: *nanoseconds,
                }),
            NativeTimestamp::EpochMillis(millis) => Utc
                .timestamp_millis_opt(*millis)
                .single()
                .ok_or(TimestampError::OutOfRange {
                    seconds: millis.div_euclid(1000),
                    nanoseconds: 0,
                }),
            NativeTimestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| TimestampError::InvalidText(text.clone())),
        }
    }
}

/// Format a timestamp the way documents store it
pub fn to_document_text(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// `#[serde(with = "...")]` adapter for `DateTime<Utc>` fields
pub mod native {
    use super::*;

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_document_text(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        NativeTimestamp::deserialize(deserializer)?
            .normalize()
            .map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "...")]` adapter for `Option<DateTime<Utc>>` fields
pub mod native_opt {
    use super::*;

    pub fn serialize<S>(ts: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match ts {
            Some(ts) => serializer.serialize_some(&to_document_text(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<NativeTimestamp>::deserialize(deserializer)?
            .map(|raw| raw.normalize())
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "timestamp_tests.rs"]
mod tests;
