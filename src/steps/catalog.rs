//! The step catalog: a validated, immutable, ordered list of steps.
//!
//! [`BUILTIN_STEPS`] is the single source of truth for the suggestions the
//! chat assistant offers. Catalog order matters: steps with equal priority
//! are presented in the order they appear here.

use once_cell::sync::OnceCell;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

use super::readme::{describe_extension, describe_summary};
use super::types::{Step, StepArgument, StepCommand, StepDescription, StepFollowUp};
use crate::commands::{
    CommandKey, CHAT_EXECUTE_COMMAND_ID, CREATE_FOLLOW_UP_ID, OPEN_URL_COMMAND_ID,
};
use crate::status::condition::*;
use crate::status::WholeStatus;

/// Construction-time catalog faults
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("step #{0} has an empty title")]
    EmptyTitle(usize),

    #[error("duplicate step title '{0}'")]
    DuplicateTitle(String),

    #[error("step '{0}' has an empty description")]
    EmptyDescription(String),

    #[error("step '{title}' has a command with an empty {field}")]
    IncompleteCommand { title: String, field: &'static str },

    #[error("step '{title}' has a follow-up with an empty {field}")]
    IncompleteFollowUp { title: String, field: &'static str },
}

/// An ordered set of steps with unique titles
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    steps: Vec<Step>,
}

static BUILTIN: OnceCell<Catalog> = OnceCell::new();

impl Catalog {
    /// Validate `steps` into a catalog
    pub fn new(steps: Vec<Step>) -> Result<Self, CatalogError> {
        let mut titles = HashSet::new();

        for (index, step) in steps.iter().enumerate() {
            if step.title.trim().is_empty() {
                return Err(CatalogError::EmptyTitle(index));
            }
            if !titles.insert(step.title) {
                return Err(CatalogError::DuplicateTitle(step.title.to_string()));
            }
            if let StepDescription::Static(text) = step.description {
                if text.trim().is_empty() {
                    return Err(CatalogError::EmptyDescription(step.title.to_string()));
                }
            }
            for command in step.commands {
                let field = if command.label.trim().is_empty() {
                    Some("label")
                } else if command.command_id.trim().is_empty() {
                    Some("command id")
                } else {
                    None
                };
                if let Some(field) = field {
                    return Err(CatalogError::IncompleteCommand {
                        title: step.title.to_string(),
                        field,
                    });
                }
            }
            for follow_up in step.follow_ups {
                let field = if follow_up.label.trim().is_empty() {
                    Some("label")
                } else if follow_up.trigger_id.trim().is_empty() {
                    Some("trigger id")
                } else {
                    None
                };
                if let Some(field) = field {
                    return Err(CatalogError::IncompleteFollowUp {
                        title: step.title.to_string(),
                        field,
                    });
                }
            }
        }

        Ok(Self { steps })
    }

    /// A catalog with no steps
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in catalog, validated once per process
    pub fn builtin() -> Result<&'static Catalog, CatalogError> {
        BUILTIN.get_or_try_init(|| {
            let catalog = Catalog::new(BUILTIN_STEPS.to_vec())?;
            debug!("Loaded builtin catalog with {} steps", catalog.len());
            Ok(catalog)
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, title: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.title == title)
    }
}

// === Conditions ===
//
// P = project opened, N = no action since scaffolding, D = debug succeeded
// after the last source change, V = provisioned after the last infra change,
// Y = deployed after the last source change.

fn new_project(s: &WholeStatus) -> bool {
    !is_project_opened(s)
}

fn fresh_with_readme(s: &WholeStatus) -> bool {
    is_project_opened(s) && is_did_no_action_after_scaffolded(s) && is_have_readme(s)
}

/// P && !N && !D
fn needs_debug(s: &WholeStatus) -> bool {
    is_project_opened(s)
        && !is_did_no_action_after_scaffolded(s)
        && !is_debug_succeeded_after_source_code_changed(s)
}

/// P && !N && D
fn debugged(s: &WholeStatus) -> bool {
    is_project_opened(s)
        && !is_did_no_action_after_scaffolded(s)
        && is_debug_succeeded_after_source_code_changed(s)
}

fn test_tool(s: &WholeStatus) -> bool {
    needs_debug(s) && can_preview_in_test_tool(s)
}

fn m365_signed_out(s: &WholeStatus) -> bool {
    needs_debug(s) && !is_m365_account_login(s)
}

fn preview_in_teams(s: &WholeStatus) -> bool {
    needs_debug(s) && is_m365_account_login(s)
}

fn extend(s: &WholeStatus) -> bool {
    debugged(s) && is_have_readme(s)
}

fn azure_signed_out(s: &WholeStatus) -> bool {
    debugged(s) && !is_provisioned_succeeded_after_infra_code_changed(s) && !is_azure_account_login(s)
}

fn provision(s: &WholeStatus) -> bool {
    debugged(s) && !is_provisioned_succeeded_after_infra_code_changed(s) && is_azure_account_login(s)
}

fn deploy(s: &WholeStatus) -> bool {
    debugged(s)
        && is_provisioned_succeeded_after_infra_code_changed(s)
        && !is_deployed_after_source_code_changed(s)
}

fn deployed(s: &WholeStatus) -> bool {
    debugged(s)
        && is_provisioned_succeeded_after_infra_code_changed(s)
        && is_deployed_after_source_code_changed(s)
}

fn publish(s: &WholeStatus) -> bool {
    deployed(s) && !is_published_succeeded_before(s)
}

const fn chat_command(label: &'static str, args: &'static [StepArgument]) -> StepCommand {
    StepCommand {
        label,
        command_id: CHAT_EXECUTE_COMMAND_ID,
        arguments: args,
    }
}

const OPEN_README: &[StepCommand] = &[chat_command(
    "Open README",
    &[StepArgument::Command(CommandKey::OpenReadMe)],
)];

/// Built-in next steps, in authoring order
pub static BUILTIN_STEPS: &[Step] = &[
    Step {
        title: "Teams Toolkit",
        description: StepDescription::Static(
            "Teams Toolkit makes it simple to get started with app development for Microsoft Teams using Visual Studio Code. \
             You can start with a project template for a common custom app built for your org (LOB app) scenarios or from a sample. \
             You can save setup time with automated app registration and configuration. \
             You can run and debug your app in Teams directly from familiar tools. \
             You can smart defaults for hosting in Azure using infrastructure-as-code and Bicep. \
             You can create unique configurations like dev, test, and prod using the environment features.",
        ),
        doc_link: Some("https://learn.microsoft.com/en-us/microsoftteams/platform/toolkit/install-teams-toolkit?tabs=vscode&pivots=visual-studio-code-v5"),
        commands: &[
            chat_command("Open Get-Started Page", &[StepArgument::Command(CommandKey::OpenWelcome)]),
            chat_command("Open Document", &[StepArgument::Command(CommandKey::OpenDocument)]),
        ],
        follow_ups: &[],
        condition: is_first_installed,
        priority: 0,
    },
    Step {
        title: "New Project",
        description: StepDescription::Static(
            "You can start with built-in Teams app templates or start with official Teams app samples in Teams Toolkit. \
             What's more, Teams Toolkit v5 supports starting with Outlook Add-in templates to build your own Outlook Add-ins.",
        ),
        doc_link: Some("https://learn.microsoft.com/en-us/microsoftteams/platform/toolkit/create-new-project?pivots=visual-studio-code-v5"),
        commands: &[chat_command("Open Sample Gallery", &[StepArgument::Command(CommandKey::OpenSamples)])],
        follow_ups: &[StepFollowUp {
            label: "@teams /create",
            trigger_id: CREATE_FOLLOW_UP_ID,
            prompt: "",
        }],
        condition: new_project,
        priority: 0,
    },
    Step {
        title: "Summary of README",
        description: StepDescription::Computed(describe_summary),
        doc_link: None,
        commands: OPEN_README,
        follow_ups: &[],
        condition: fresh_with_readme,
        priority: 1,
    },
    Step {
        title: "Test Tool",
        description: StepDescription::Static(
            "Teams App Test Tool (Test Tool) makes debugging bot-based apps effortless. \
             You can chat with your bot and see its messages and Adaptive Cards as they appear in Teams. \
             You don't need a Microsoft 365 developer account, tunneling, or Teams app and bot registration to use Test Tool. \
             When previewing with Test Tool, it will check all required prerequisites and guide you to fix them in output.",
        ),
        doc_link: Some("https://learn.microsoft.com/en-us/microsoftteams/platform/toolkit/debug-your-teams-app-test-tool?tabs=vscode%2Cclijs"),
        commands: &[chat_command(
            "Preview in Test Tool",
            &[StepArgument::Command(CommandKey::DebugInTestToolFromMessage)],
        )],
        follow_ups: &[],
        condition: test_tool,
        priority: 0,
    },
    Step {
        title: "Microsoft 365 Account",
        description: StepDescription::Static(
            "Preview in Teams requires a Microsoft 365 developer account. \
             If you have a Visual Studio Enterprise or Professional subscription, both programs include a free Microsoft 365 developer subscription. \
             It's active as long as your Visual Studio subscription is active.",
        ),
        doc_link: Some("https://learn.microsoft.com/en-us/microsoftteams/platform/toolkit/tools-prerequisites#microsoft-365-developer-program"),
        commands: &[chat_command(
            "Sign in to Microsoft 365 Account",
            &[StepArgument::Command(CommandKey::SigninM365)],
        )],
        follow_ups: &[],
        condition: m365_signed_out,
        priority: 1,
    },
    Step {
        title: "Microsoft 365 Developer Program",
        description: StepDescription::Static(
            "If you don't have any Microsoft 365 tenant, you might qualify for a Microsoft 365 E5 developer subscription through the Microsoft 365 Developer Program; \
             Alternatively, you can sign up for a 1-month free trial or purchase a Microsoft 365 plan.",
        ),
        doc_link: Some("https://learn.microsoft.com/en-us/microsoftteams/platform/toolkit/tools-prerequisites#microsoft-365-developer-program"),
        commands: &[StepCommand {
            label: "Join Microsoft 365 Developer Program",
            command_id: OPEN_URL_COMMAND_ID,
            arguments: &[StepArgument::Url(
                "https://developer.microsoft.com/en-us/microsoft-365/dev-program",
            )],
        }],
        follow_ups: &[],
        condition: m365_signed_out,
        priority: 2,
    },
    Step {
        title: "Preview in Microsoft Teams",
        description: StepDescription::Static(
            "Teams Toolkit helps you to debug and preview your Microsoft Teams app locally. \
             During the debugging process, Teams Toolkit automatically starts app services, launches debuggers, and uploads Teams app. \
             You can preview your Teams app in Teams web client locally after debugging. \
             When previewing with Microsoft Teams, it will check all required prerequisites and guide you to fix them in output.",
        ),
        doc_link: Some("https://learn.microsoft.com/en-us/microsoftteams/platform/toolkit/debug-local?tabs=Windows%2CWindows1&pivots=visual-studio-code-v5"),
        commands: &[chat_command(
            "Preview in Microsoft Teams",
            &[StepArgument::Command(CommandKey::LocalDebug)],
        )],
        follow_ups: &[],
        condition: preview_in_teams,
        priority: 0,
    },
    Step {
        title: "How to Extend",
        description: StepDescription::Computed(describe_extension),
        doc_link: None,
        commands: OPEN_README,
        follow_ups: &[],
        condition: extend,
        priority: 2,
    },
    Step {
        title: "CI/CD",
        description: StepDescription::Static(
            "TeamsFx helps to automate your development workflow while building Teams application. \
             The tools and templates to set up CI/CD pipelines are create workflow templates and customize CI/CD workflow with GitHub, Azure DevOps, Jenkins, and other platforms.",
        ),
        doc_link: Some("https://learn.microsoft.com/en-us/microsoftteams/platform/toolkit/use-cicd-template"),
        commands: &[],
        follow_ups: &[],
        condition: debugged,
        priority: 2,
    },
    Step {
        title: "Azure Account",
        description: StepDescription::Static(
            "An Azure account allows you to host a Teams app or the back-end resources for your Teams app to Azure. \
             You can do this using Teams Toolkit in Visual Studio Code. \
             You must have an Azure subscription in the following scenarios: \
             If you already have an existing app on a different cloud provider other than Azure, and you want to integrate the app on Teams platform. \
             If you want to host the back-end resources for your app using another cloud provider, or on your own servers if they're available in the public domain.",
        ),
        doc_link: Some("https://learn.microsoft.com/en-us/microsoftteams/platform/toolkit/tools-prerequisites#azure-account"),
        commands: &[chat_command(
            "Sign in to Azure Account",
            &[StepArgument::Command(CommandKey::SigninAzure)],
        )],
        follow_ups: &[],
        condition: azure_signed_out,
        priority: 1,
    },
    Step {
        title: "Provision Azure resources",
        description: StepDescription::Static(
            "Teams Toolkit integrates with Azure and the Microsoft 365 cloud, which allows you to place your app in Azure with a single command. \
             Teams Toolkit integrates with Azure Resource Manager (ARM) to set up Azure resources that your application needs, following a code-driven approach.",
        ),
        doc_link: Some("https://learn.microsoft.com/en-us/microsoftteams/platform/toolkit/provision?pivots=visual-studio-code-v5"),
        commands: &[chat_command(
            "Provision Azure resources",
            &[StepArgument::Command(CommandKey::Provision)],
        )],
        follow_ups: &[],
        condition: provision,
        priority: 0,
    },
    Step {
        title: "Deploy to Cloud",
        description: StepDescription::Static(
            "Teams Toolkit helps to deploy or upload the front-end and back-end code in your app to your provisioned cloud resources in Azure. \
             You can deploy to the following types of cloud resources: Azure App Services, Azure Functions, Azure Storage (as static website) and SharePoint",
        ),
        doc_link: Some("https://learn.microsoft.com/en-us/microsoftteams/platform/toolkit/deploy?pivots=visual-studio-code-v5"),
        commands: &[chat_command("Deploy to Cloud", &[StepArgument::Command(CommandKey::Deploy)])],
        follow_ups: &[],
        condition: deploy,
        priority: 0,
    },
    Step {
        title: "Publish the App",
        description: StepDescription::Static(
            "After creating the app, you can distribute your app to different scopes, such as an individual, a team, or an organization. \
             The distribution depends on multiple factors such as needs, business and technical requirements, and your goal for the app. \
             Distribution to different scope may need different review processes. \
             In general, the bigger the scope, the more review the app needs to go through for security and compliance concerns.",
        ),
        doc_link: Some("https://learn.microsoft.com/en-us/microsoftteams/platform/toolkit/publish"),
        commands: &[chat_command("Publish the App", &[StepArgument::Command(CommandKey::Publish)])],
        follow_ups: &[],
        condition: publish,
        priority: 0,
    },
    Step {
        title: "Remote Preview",
        description: StepDescription::Static(
            "After provisioning and deploying the app to the remote, you can open the app in Teams client to see the real effect.",
        ),
        doc_link: None,
        commands: &[chat_command("Remote Preview", &[StepArgument::Command(CommandKey::Preview)])],
        follow_ups: &[],
        condition: deployed,
        priority: 1,
    },
];
