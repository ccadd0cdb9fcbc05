// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Acting identity supplied by the session layer
//!
//! The pipeline trusts this input as given; it only checks that the
//! actor's membership covers the unit and university being acted on.

use crate::error::DomainError;
use crate::unit::UnitId;
use std::collections::BTreeSet;

/// Which units an actor may act for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitScope {
    All,
    Only(BTreeSet<UnitId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub units: UnitScope,
    /// `None` means every university
    pub university: Option<String>,
}

impl Actor {
    /// An administrator acting for every unit and university
    pub fn admin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: UnitScope::All,
            university: None,
        }
    }

    /// A member of a single unit
    pub fn member(name: impl Into<String>, unit: UnitId) -> Self {
        Self::with_units(name, [unit])
    }

    pub fn with_units(name: impl Into<String>, units: impl IntoIterator<Item = UnitId>) -> Self {
        Self {
            name: name.into(),
            units: UnitScope::Only(units.into_iter().collect()),
            university: None,
        }
    }

    /// Someone with no unit membership, e.g. a submitting student
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self::with_units(name, Vec::<UnitId>::new())
    }

    /// Restrict this actor to a single university
    pub fn at_university(self, university: impl Into<String>) -> Self {
        Self {
            university: Some(university.into()),
            ..self
        }
    }

    pub fn acts_for(&self, unit: UnitId) -> bool {
        match &self.units {
            UnitScope::All => true,
            UnitScope::Only(units) => units.contains(&unit),
        }
    }

    pub fn covers_university(&self, university: &str) -> bool {
        self.university
            .as_deref()
            .map_or(true, |scope| scope == university)
    }

    pub fn is_admin(&self) -> bool {
        self.units == UnitScope::All && self.university.is_none()
    }

    /// Check the actor may act for `unit` on an idea of `university`
    pub fn authorize(&self, unit: UnitId, university: &str) -> Result<(), DomainError> {
        if !self.acts_for(unit) {
            return Err(DomainError::permission(format!(
                "{} is not a member of unit {}",
                self.name, unit
            )));
        }
        self.authorize_university(university)
    }

    pub fn authorize_university(&self, university: &str) -> Result<(), DomainError> {
        if !self.covers_university(university) {
            return Err(DomainError::permission(format!(
                "{} may not act for university {}",
                self.name, university
            )));
        }
        Ok(())
    }
}
