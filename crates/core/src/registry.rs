// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage/unit registry
//!
//! Read-only reference data: the ordered stage list, which unit owns each
//! reviewing stage, and what each unit may do. A registry either comes from
//! [`Registry::builtin`] or is loaded from TOML and validated up front, so
//! every unit is guaranteed an explicit permission set.

use crate::stage::{Stage, ORDERED_STAGES};
use crate::unit::{PermissionSet, Unit, UnitId};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a registry
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unit {0} has no permissions table")]
    MissingPermissions(UnitId),
    #[error("unit {0} is defined more than once")]
    DuplicateUnit(UnitId),
    #[error("unit {0} is not defined")]
    MissingUnit(UnitId),
    #[error("unit {unit} must own stage {expected}, found {found}")]
    StageMismatch {
        unit: UnitId,
        expected: Stage,
        found: Stage,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRegistry {
    #[serde(default)]
    unit: Vec<RawUnit>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUnit {
    id: UnitId,
    display_name: String,
    #[serde(default)]
    color_hint: String,
    stage: Stage,
    #[serde(default)]
    description: String,
    permissions: Option<PermissionSet>,
}

/// The immutable stage/unit table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    /// One entry per unit, in `UnitId::ALL` order
    units: Vec<Unit>,
}

impl Registry {
    /// The default unit table
    pub fn builtin() -> Self {
        let unit = |id: UnitId,
                    display_name: &str,
                    color_hint: &str,
                    description: &str,
                    permissions: PermissionSet| Unit {
            id,
            display_name: display_name.to_string(),
            color_hint: color_hint.to_string(),
            stage: id.canonical_stage(),
            description: description.to_string(),
            permissions,
        };

        let reviewer = PermissionSet {
            can_approve: true,
            can_reject: true,
            can_return: true,
            requires_ancillary_link: false,
            views_ancillary_link: true,
        };

        Self {
            units: vec![
                unit(
                    UnitId::Academic,
                    "Academic Affairs",
                    "#2563eb",
                    "Checks academic fit and learning goals",
                    PermissionSet {
                        can_return: false,
                        views_ancillary_link: false,
                        ..reviewer
                    },
                ),
                unit(
                    UnitId::Programs,
                    "Student Programs",
                    "#7c3aed",
                    "Builds the program package and shared folder",
                    PermissionSet {
                        requires_ancillary_link: true,
                        ..reviewer
                    },
                ),
                unit(
                    UnitId::Operations,
                    "Campus Operations",
                    "#ea580c",
                    "Venue, logistics and budget",
                    reviewer,
                ),
                unit(
                    UnitId::ExternalApprovals,
                    "External Approvals",
                    "#ca8a04",
                    "Approvals from outside the university",
                    reviewer,
                ),
                unit(
                    UnitId::Systems,
                    "Systems & Publishing",
                    "#0891b2",
                    "Publishes the event",
                    reviewer,
                ),
                unit(
                    UnitId::Passport,
                    "Passport Office",
                    "#16a34a",
                    "Verifies passport participation",
                    PermissionSet {
                        can_reject: false,
                        can_return: false,
                        ..reviewer
                    },
                ),
            ],
        }
    }

    /// Parse and validate a registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawRegistry = toml::from_str(content)?;
        let units = raw
            .unit
            .into_iter()
            .map(|u| {
                let permissions = u.permissions.ok_or(ConfigError::MissingPermissions(u.id))?;
                Ok(Unit {
                    id: u.id,
                    display_name: u.display_name,
                    color_hint: u.color_hint,
                    stage: u.stage,
                    description: u.description,
                    permissions,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Self::from_units(units)
    }

    /// Read and validate a registry file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Validate a set of units: each unit exactly once, each on its own stage
    pub fn from_units(units: Vec<Unit>) -> Result<Self, ConfigError> {
        let mut slots: Vec<Option<Unit>> = vec![None; UnitId::ALL.len()];
        for unit in units {
            let expected = unit.id.canonical_stage();
            if unit.stage != expected {
                return Err(ConfigError::StageMismatch {
                    unit: unit.id,
                    expected,
                    found: unit.stage,
                });
            }
            let slot = &mut slots[unit.id.index()];
            if slot.is_some() {
                return Err(ConfigError::DuplicateUnit(unit.id));
            }
            *slot = Some(unit);
        }

        let units = UnitId::ALL
            .iter()
            .zip(slots)
            .map(|(id, slot)| slot.ok_or(ConfigError::MissingUnit(*id)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { units })
    }

    pub fn ordered_stages(&self) -> &'static [Stage] {
        &ORDERED_STAGES
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.index()]
    }

    /// The unit that reviews `stage`, if any
    pub fn unit_for_stage(&self, stage: Stage) -> Option<&Unit> {
        self.units.iter().find(|u| u.stage == stage)
    }

    pub fn permissions(&self, id: UnitId) -> &PermissionSet {
        &self.unit(id).permissions
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
