//! Snapshot of the user's project and environment state.
//!
//! A [`WholeStatus`] is built by the host (the editor extension) once per
//! evaluation and handed to the step selector, which never mutates it.
//! The JSON shape is camelCase so the host can serialize its own view of
//! the workspace directly; the TypeScript side is generated from these
//! types by `generate_types`.

pub mod condition;
pub mod loader;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

pub use loader::{attach_project, load_status, StatusError};

/// Everything the next-step catalog can condition on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct WholeStatus {
    /// Machine-wide state (accounts, install state)
    #[serde(default)]
    pub machine: MachineStatus,
    /// The open project, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub project_opened: Option<ProjectStatus>,
}

/// Machine-wide state independent of any project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct MachineStatus {
    /// True right after the extension was installed for the first time
    #[serde(default)]
    pub first_installed: bool,
    /// Signed in to a Microsoft 365 account
    #[serde(default)]
    pub m365_logged_in: bool,
    /// Signed in to an Azure account
    #[serde(default)]
    pub azure_logged_in: bool,
    /// Output of the last prerequisite check, if one ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub result_of_prerequisites: Option<String>,
}

/// State of the currently open project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct ProjectStatus {
    /// Project root on disk
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub project_id: Option<String>,
    /// When source and infrastructure code were last modified
    #[serde(default)]
    pub code_modified_time: CodeModifiedTime,
    /// Raw README text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub readme_content: Option<String>,
    /// Raw `.vscode/launch.json` text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub launch_json_content: Option<String>,
    /// Last outcome of each lifecycle action
    #[serde(default)]
    pub action_status: ProjectActionStatus,
}

impl ProjectStatus {
    /// A freshly scaffolded project at `path`: no action has run yet
    pub fn scaffolded(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct CodeModifiedTime {
    #[serde(default)]
    pub source: DateTime<Utc>,
    #[serde(default)]
    pub infra: DateTime<Utc>,
}

/// Last outcome of each lifecycle action the catalog cares about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct ProjectActionStatus {
    /// Local debug in Teams
    #[serde(default)]
    pub debug: ActionStatus,
    /// Debug in Teams App Test Tool
    #[serde(default)]
    pub test_tool: ActionStatus,
    #[serde(default)]
    pub provision: ActionStatus,
    #[serde(default)]
    pub deploy: ActionStatus,
    #[serde(default)]
    pub publish: ActionStatus,
}

impl ProjectActionStatus {
    /// All actions, for checks that range over every one of them
    pub fn all(&self) -> [&ActionStatus; 5] {
        [
            &self.debug,
            &self.test_tool,
            &self.provision,
            &self.deploy,
            &self.publish,
        ]
    }
}

/// Result and timestamp of the last run of an action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct ActionStatus {
    #[serde(default)]
    pub result: ActionResult,
    /// When the action last finished (Unix epoch if it never ran)
    #[serde(default)]
    pub time: DateTime<Utc>,
}

impl ActionStatus {
    pub fn new(result: ActionResult, time: DateTime<Utc>) -> Self {
        Self { result, time }
    }

    /// True if the action succeeded strictly after `changed`
    pub fn succeeded_after(&self, changed: DateTime<Utc>) -> bool {
        self.result == ActionResult::Success && self.time > changed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub enum ActionResult {
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "fail")]
    Fail,
    #[default]
    #[serde(rename = "no run")]
    NoRun,
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionResult::Success => write!(f, "success"),
            ActionResult::Fail => write!(f, "fail"),
            ActionResult::NoRun => write!(f, "no run"),
        }
    }
}

impl WholeStatus {
    /// Parse a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Snapshot with `project` open and default machine state
    pub fn with_project(project: ProjectStatus) -> Self {
        Self {
            machine: MachineStatus::default(),
            project_opened: Some(project),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_snapshot_has_no_project() {
        let status = WholeStatus::default();
        assert!(status.project_opened.is_none());
        assert!(!status.machine.first_installed);
        assert!(!status.machine.m365_logged_in);
        assert!(!status.machine.azure_logged_in);
    }

    #[test]
    fn test_parse_minimal_json() {
        let status = WholeStatus::from_json("{}").unwrap();
        assert_eq!(status, WholeStatus::default());
    }

    #[test]
    fn test_parse_camel_case_and_action_results() {
        let json = r##"{
            "machine": { "firstInstalled": true, "azureLoggedIn": true },
            "projectOpened": {
                "path": "/work/app",
                "readmeContent": "# App",
                "codeModifiedTime": { "source": "2024-01-01T00:00:00Z", "infra": "2024-01-01T00:00:00Z" },
                "actionStatus": {
                    "debug": { "result": "success", "time": "2024-01-02T00:00:00Z" },
                    "provision": { "result": "fail", "time": "2024-01-02T00:00:00Z" }
                }
            }
        }"##;
        let status = WholeStatus::from_json(json).unwrap();
        assert!(status.machine.first_installed);
        assert!(status.machine.azure_logged_in);

        let project = status.project_opened.unwrap();
        assert_eq!(project.path, "/work/app");
        assert_eq!(project.readme_content.as_deref(), Some("# App"));
        assert_eq!(project.action_status.debug.result, ActionResult::Success);
        assert_eq!(project.action_status.provision.result, ActionResult::Fail);
        assert_eq!(project.action_status.deploy.result, ActionResult::NoRun);
    }

    #[test]
    fn test_no_run_serializes_with_space() {
        let json = serde_json::to_string(&ActionResult::NoRun).unwrap();
        assert_eq!(json, "\"no run\"");
        assert_eq!(ActionResult::NoRun.to_string(), "no run");
    }

    #[test]
    fn test_succeeded_after_is_strict() {
        let changed = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        assert!(ActionStatus::new(ActionResult::Success, later).succeeded_after(changed));
        assert!(!ActionStatus::new(ActionResult::Success, changed).succeeded_after(changed));
        assert!(!ActionStatus::new(ActionResult::Fail, later).succeeded_after(changed));
        assert!(!ActionStatus::new(ActionResult::NoRun, later).succeeded_after(changed));
    }

    #[test]
    fn test_scaffolded_project_has_no_runs() {
        let project = ProjectStatus::scaffolded("/tmp/app");
        assert!(project
            .action_status
            .all()
            .iter()
            .all(|a| a.result == ActionResult::NoRun));
    }

    // TypeScript binding tests
    #[test]
    fn test_export_bindings_wholestatus() {
        let _ = WholeStatus::export_to_string();
    }

    #[test]
    fn test_export_bindings_actionresult() {
        let _ = ActionResult::export_to_string();
    }
}
