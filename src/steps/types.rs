//! Catalog entry definitions and their resolved, presentable form.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::commands::CommandKey;
use crate::status::WholeStatus;

/// Pure predicate deciding whether a step applies to a snapshot
pub type Condition = fn(&WholeStatus) -> bool;

/// A step's description: fixed text, or text computed from the snapshot
#[derive(Debug, Clone, Copy)]
pub enum StepDescription {
    Static(&'static str),
    /// Only invoked after the step's condition held, so it may rely on
    /// whatever that condition checked
    Computed(fn(&WholeStatus) -> String),
}

impl StepDescription {
    pub fn resolve(&self, status: &WholeStatus) -> String {
        match self {
            StepDescription::Static(text) => (*text).to_string(),
            StepDescription::Computed(describe) => describe(status),
        }
    }
}

/// Argument handed to a step command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepArgument {
    Command(CommandKey),
    Url(&'static str),
}

impl StepArgument {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepArgument::Command(key) => key.as_str(),
            StepArgument::Url(url) => *url,
        }
    }
}

/// A button the host renders for a step
#[derive(Debug, Clone, Copy)]
pub struct StepCommand {
    pub label: &'static str,
    /// Host command id to dispatch
    pub command_id: &'static str,
    pub arguments: &'static [StepArgument],
}

/// A chat follow-up the host offers for a step
#[derive(Debug, Clone, Copy)]
pub struct StepFollowUp {
    pub label: &'static str,
    /// Chat command the follow-up triggers
    pub trigger_id: &'static str,
    /// Prompt text inserted into the chat input
    pub prompt: &'static str,
}

/// A catalog entry
#[derive(Debug, Clone, Copy)]
pub struct Step {
    /// Unique within a catalog
    pub title: &'static str,
    pub description: StepDescription,
    pub doc_link: Option<&'static str>,
    pub commands: &'static [StepCommand],
    pub follow_ups: &'static [StepFollowUp],
    pub condition: Condition,
    /// Lower is more urgent
    pub priority: u32,
}

impl Step {
    /// Resolve this step against `status`
    ///
    /// Callers must have checked `condition` first.
    pub fn resolve(&self, status: &WholeStatus) -> ResolvedStep {
        ResolvedStep {
            title: self.title.to_string(),
            description: self.description.resolve(status),
            doc_link: self.doc_link.map(str::to_string),
            commands: self.commands.iter().map(ResolvedCommand::from).collect(),
            follow_ups: self.follow_ups.iter().map(ResolvedFollowUp::from).collect(),
            priority: self.priority,
        }
    }
}

/// A step with its description resolved, ready for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct ResolvedStep {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub doc_link: Option<String>,
    pub commands: Vec<ResolvedCommand>,
    pub follow_ups: Vec<ResolvedFollowUp>,
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct ResolvedCommand {
    pub label: String,
    pub command_id: String,
    pub arguments: Vec<String>,
}

impl From<&StepCommand> for ResolvedCommand {
    fn from(command: &StepCommand) -> Self {
        Self {
            label: command.label.to_string(),
            command_id: command.command_id.to_string(),
            arguments: command
                .arguments
                .iter()
                .map(|a| a.as_str().to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[ts(rename_all = "camelCase")]
pub struct ResolvedFollowUp {
    pub label: String,
    pub trigger_id: String,
    pub prompt: String,
}

impl From<&StepFollowUp> for ResolvedFollowUp {
    fn from(follow_up: &StepFollowUp) -> Self {
        Self {
            label: follow_up.label.to_string(),
            trigger_id: follow_up.trigger_id.to_string(),
            prompt: follow_up.prompt.to_string(),
        }
    }
}
