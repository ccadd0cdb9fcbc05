// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry configuration specs

use crate::prelude::*;
use crate::prelude::assert_eq;
use std::io::Write;

/// Every unit may approve, reject and return; nobody needs a link
fn relaxed_registry() -> String {
    [
        ("academic", "academic_review"),
        ("programs", "programs_package"),
        ("operations", "operations"),
        ("external_approvals", "external_approvals"),
        ("systems", "systems"),
        ("passport", "passport_verification"),
    ]
    .iter()
    .map(|(id, stage)| {
        format!(
            r#"
[[unit]]
id = "{id}"
display_name = "{id}"
stage = "{stage}"

[unit.permissions]
can_approve = true
can_reject = true
can_return = true
requires_ancillary_link = false
views_ancillary_link = true
"#
        )
    })
    .collect()
}

#[test]
fn registry_file_drives_permissions() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(relaxed_registry().as_bytes()).unwrap();
    let registry = Registry::load(file.path()).unwrap();

    let campus = Campus::with_registry(MemoryStore::new(), registry);
    let idea = campus.submit(ExternalApproval::NotRequired);
    let idea = campus.approve(&idea);
    let idea = campus.approve(&idea);

    // No link required by this registry
    let idea = campus.approve(&idea);
    assert_eq!(idea.current_status, IdeaStatus::Operations);
}

#[test]
fn registry_without_permissions_is_refused_at_load() {
    let broken = relaxed_registry().replacen("[unit.permissions]", "", 1);
    let broken = broken.replacen(
        "can_approve = true\ncan_reject = true\ncan_return = true\nrequires_ancillary_link = false\nviews_ancillary_link = true\n",
        "",
        1,
    );

    assert!(Registry::from_toml(&broken).is_err());
}
