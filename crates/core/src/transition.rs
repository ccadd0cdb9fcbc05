// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage transition resolver
//!
//! Pure functions over [`ORDERED_STAGES`]. External approvals is the only
//! stage that can be skipped.

use crate::stage::{Stage, ORDERED_STAGES};

/// The stage after `current`, or `None` at the end of the pipeline
pub fn next_stage(current: Stage, requires_external_approval: bool) -> Option<Stage> {
    let index = ORDERED_STAGES.iter().position(|s| *s == current)?;
    let next = *ORDERED_STAGES.get(index + 1)?;
    if next == Stage::ExternalApprovals && !requires_external_approval {
        return ORDERED_STAGES.get(index + 2).copied();
    }
    Some(next)
}

/// The stage a return sends an idea back to.
///
/// Nothing upstream of academic review accepts returns, so `Submitted` and
/// `AcademicReview` yield `None`.
pub fn previous_stage(current: Stage) -> Option<Stage> {
    let index = ORDERED_STAGES.iter().position(|s| *s == current)?;
    if index <= 1 {
        return None;
    }
    ORDERED_STAGES.get(index - 1).copied()
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
