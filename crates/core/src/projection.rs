// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-side views over the idea collection

use crate::idea::Idea;
use crate::stage::IdeaStatus;
use crate::unit::UnitId;
use std::collections::BTreeMap;

/// Filter applied to a university's lobby
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LobbyFilter {
    #[default]
    All,
    /// Still moving through the pipeline
    Pending,
    Completed,
    Rejected,
}

impl LobbyFilter {
    fn matches(&self, status: IdeaStatus) -> bool {
        match self {
            LobbyFilter::All => true,
            LobbyFilter::Pending => !status.is_terminal(),
            LobbyFilter::Completed => status == IdeaStatus::Completed,
            LobbyFilter::Rejected => status == IdeaStatus::Rejected,
        }
    }
}

/// Ideas held by `unit`, optionally restricted to one university
pub fn ideas_for_unit<'a>(
    ideas: &'a [Idea],
    unit: UnitId,
    university: Option<&str>,
) -> Vec<&'a Idea> {
    ideas
        .iter()
        .filter(|idea| idea.current_unit == Some(unit))
        .filter(|idea| university.map_or(true, |u| idea.intake.university == u))
        .collect()
}

pub fn ideas_with_status(ideas: &[Idea], status: IdeaStatus) -> Vec<&Idea> {
    ideas
        .iter()
        .filter(|idea| idea.current_status == status)
        .collect()
}

/// A university's ideas as shown in its lobby.
///
/// Published ideas are listed as events elsewhere and never appear here.
pub fn lobby<'a>(ideas: &'a [Idea], university: &str, filter: LobbyFilter) -> Vec<&'a Idea> {
    ideas
        .iter()
        .filter(|idea| idea.intake.university == university)
        .filter(|idea| idea.current_status != IdeaStatus::Published)
        .filter(|idea| filter.matches(idea.current_status))
        .collect()
}

/// Number of non-terminal ideas each unit currently holds.
///
/// Every unit has an entry, zero included.
pub fn pending_count_per_unit(ideas: &[Idea]) -> BTreeMap<UnitId, usize> {
    let mut counts: BTreeMap<UnitId, usize> = UnitId::ALL.iter().map(|u| (*u, 0)).collect();
    for idea in ideas.iter().filter(|i| !i.current_status.is_terminal()) {
        if let Some(unit) = idea.current_unit {
            *counts.entry(unit).or_default() += 1;
        }
    }
    counts
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;
