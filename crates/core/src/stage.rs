// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline stages and idea statuses

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in the approval pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Submitted,
    AcademicReview,
    ProgramsPackage,
    Operations,
    ExternalApprovals,
    Systems,
    Published,
    PassportVerification,
    Completed,
}

/// The canonical stage sequence
pub const ORDERED_STAGES: [Stage; 9] = [
    Stage::Submitted,
    Stage::AcademicReview,
    Stage::ProgramsPackage,
    Stage::Operations,
    Stage::ExternalApprovals,
    Stage::Systems,
    Stage::Published,
    Stage::PassportVerification,
    Stage::Completed,
];

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Submitted => "submitted",
            Stage::AcademicReview => "academic_review",
            Stage::ProgramsPackage => "programs_package",
            Stage::Operations => "operations",
            Stage::ExternalApprovals => "external_approvals",
            Stage::Systems => "systems",
            Stage::Published => "published",
            Stage::PassportVerification => "passport_verification",
            Stage::Completed => "completed",
        }
    }

    /// Position of this stage in [`ORDERED_STAGES`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The status an idea carries: a pipeline stage, or one of the
/// out-of-band `Returned`/`Rejected` overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    Submitted,
    AcademicReview,
    ProgramsPackage,
    Operations,
    ExternalApprovals,
    Systems,
    Published,
    PassportVerification,
    Completed,
    Returned,
    Rejected,
}

impl IdeaStatus {
    /// The pipeline stage this status names, if it is one
    pub fn stage(&self) -> Option<Stage> {
        match self {
            IdeaStatus::Submitted => Some(Stage::Submitted),
            IdeaStatus::AcademicReview => Some(Stage::AcademicReview),
            IdeaStatus::ProgramsPackage => Some(Stage::ProgramsPackage),
            IdeaStatus::Operations => Some(Stage::Operations),
            IdeaStatus::ExternalApprovals => Some(Stage::ExternalApprovals),
            IdeaStatus::Systems => Some(Stage::Systems),
            IdeaStatus::Published => Some(Stage::Published),
            IdeaStatus::PassportVerification => Some(Stage::PassportVerification),
            IdeaStatus::Completed => Some(Stage::Completed),
            IdeaStatus::Returned | IdeaStatus::Rejected => None,
        }
    }

    /// No transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, IdeaStatus::Completed | IdeaStatus::Rejected)
    }

    pub fn name(&self) -> &'static str {
        match self {
            IdeaStatus::Returned => "returned",
            IdeaStatus::Rejected => "rejected",
            other => other.stage().map(|s| s.name()).unwrap_or("unknown"),
        }
    }
}

impl From<Stage> for IdeaStatus {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Submitted => IdeaStatus::Submitted,
            Stage::AcademicReview => IdeaStatus::AcademicReview,
            Stage::ProgramsPackage => IdeaStatus::ProgramsPackage,
            Stage::Operations => IdeaStatus::Operations,
            Stage::ExternalApprovals => IdeaStatus::ExternalApprovals,
            Stage::Systems => IdeaStatus::Systems,
            Stage::Published => IdeaStatus::Published,
            Stage::PassportVerification => IdeaStatus::PassportVerification,
            Stage::Completed => IdeaStatus::Completed,
        }
    }
}

impl PartialEq<Stage> for IdeaStatus {
    fn eq(&self, other: &Stage) -> bool {
        self.stage() == Some(*other)
    }
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
