// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Organizational units and their permissions

use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an organizational unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitId {
    Academic,
    Programs,
    Operations,
    ExternalApprovals,
    Systems,
    Passport,
}

impl UnitId {
    pub const ALL: [UnitId; 6] = [
        UnitId::Academic,
        UnitId::Programs,
        UnitId::Operations,
        UnitId::ExternalApprovals,
        UnitId::Systems,
        UnitId::Passport,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UnitId::Academic => "academic",
            UnitId::Programs => "programs",
            UnitId::Operations => "operations",
            UnitId::ExternalApprovals => "external_approvals",
            UnitId::Systems => "systems",
            UnitId::Passport => "passport",
        }
    }

    /// The reviewing stage a unit owns
    pub fn canonical_stage(&self) -> Stage {
        match self {
            UnitId::Academic => Stage::AcademicReview,
            UnitId::Programs => Stage::ProgramsPackage,
            UnitId::Operations => Stage::Operations,
            UnitId::ExternalApprovals => Stage::ExternalApprovals,
            UnitId::Systems => Stage::Systems,
            UnitId::Passport => Stage::PassportVerification,
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a unit may do to an idea it holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionSet {
    pub can_approve: bool,
    pub can_reject: bool,
    pub can_return: bool,
    /// Approval is blocked until the ancillary link is set; also grants write access to it
    pub requires_ancillary_link: bool,
    pub views_ancillary_link: bool,
}

impl PermissionSet {
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Approve => self.can_approve,
            Capability::Reject => self.can_reject,
            Capability::Return => self.can_return,
            Capability::WriteAncillaryLink => self.requires_ancillary_link,
            Capability::ViewAncillaryLink => {
                self.views_ancillary_link || self.requires_ancillary_link
            }
        }
    }
}

/// A single permission checked by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Approve,
    Reject,
    Return,
    WriteAncillaryLink,
    ViewAncillaryLink,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::Approve => "approve",
            Capability::Reject => "reject",
            Capability::Return => "return",
            Capability::WriteAncillaryLink => "write ancillary link",
            Capability::ViewAncillaryLink => "view ancillary link",
        })
    }
}

/// A unit as described by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub display_name: String,
    pub color_hint: String,
    pub stage: Stage,
    pub description: String,
    pub permissions: PermissionSet,
}
