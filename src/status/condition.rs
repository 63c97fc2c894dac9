//! Named predicates over a [`WholeStatus`].
//!
//! Catalog conditions are composed from these. Every predicate is pure and
//! returns `false` rather than failing when the fields it needs are absent.

use super::{ActionResult, ProjectStatus, WholeStatus};

/// Marker the Test Tool launch profiles carry in `launch.json`
const TEST_TOOL_MARKER: &str = "Test Tool";

fn project(status: &WholeStatus) -> Option<&ProjectStatus> {
    status.project_opened.as_ref()
}

pub fn is_first_installed(status: &WholeStatus) -> bool {
    status.machine.first_installed
}

pub fn is_project_opened(status: &WholeStatus) -> bool {
    status.project_opened.is_some()
}

/// Project is open and no lifecycle action has run since scaffolding
pub fn is_did_no_action_after_scaffolded(status: &WholeStatus) -> bool {
    project(status).is_some_and(|p| {
        p.action_status
            .all()
            .iter()
            .all(|a| a.result == ActionResult::NoRun)
    })
}

pub fn is_m365_account_login(status: &WholeStatus) -> bool {
    status.machine.m365_logged_in
}

pub fn is_azure_account_login(status: &WholeStatus) -> bool {
    status.machine.azure_logged_in
}

/// Local debug or Test Tool debug succeeded after the last source change
pub fn is_debug_succeeded_after_source_code_changed(status: &WholeStatus) -> bool {
    project(status).is_some_and(|p| {
        let changed = p.code_modified_time.source;
        p.action_status.debug.succeeded_after(changed)
            || p.action_status.test_tool.succeeded_after(changed)
    })
}

pub fn is_provisioned_succeeded_after_infra_code_changed(status: &WholeStatus) -> bool {
    project(status).is_some_and(|p| {
        p.action_status
            .provision
            .succeeded_after(p.code_modified_time.infra)
    })
}

pub fn is_deployed_after_source_code_changed(status: &WholeStatus) -> bool {
    project(status).is_some_and(|p| {
        p.action_status
            .deploy
            .succeeded_after(p.code_modified_time.source)
    })
}

pub fn is_published_succeeded_before(status: &WholeStatus) -> bool {
    project(status).is_some_and(|p| p.action_status.publish.result == ActionResult::Success)
}

pub fn is_have_readme(status: &WholeStatus) -> bool {
    project(status)
        .and_then(|p| p.readme_content.as_deref())
        .is_some_and(|readme| !readme.trim().is_empty())
}

pub fn can_preview_in_test_tool(status: &WholeStatus) -> bool {
    project(status)
        .and_then(|p| p.launch_json_content.as_deref())
        .is_some_and(|launch| launch.contains(TEST_TOOL_MARKER))
}
