//! Host command identifiers referenced by catalog entries.
//!
//! Steps never execute anything themselves. Each command names a host
//! command id plus arguments; most route through the chat bridge command,
//! which takes a [`CommandKey`] as its single argument.

use std::fmt;

/// Host command that runs a toolkit command on behalf of the chat participant
pub const CHAT_EXECUTE_COMMAND_ID: &str = "teamsAgent.executeCommand";

/// Host command that opens an external URL
pub const OPEN_URL_COMMAND_ID: &str = "teamsAgent.openUrlCommand";

/// Chat participant slash command that scaffolds a new project
pub const CREATE_FOLLOW_UP_ID: &str = "create";

/// Toolkit commands a step can ask the host to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKey {
    OpenWelcome,
    OpenDocument,
    OpenSamples,
    OpenReadMe,
    DebugInTestToolFromMessage,
    SigninM365,
    SigninAzure,
    LocalDebug,
    Provision,
    Deploy,
    Publish,
    Preview,
}

impl CommandKey {
    /// Identifier passed as the argument of [`CHAT_EXECUTE_COMMAND_ID`]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CommandKey::OpenWelcome => "fx-extension.openWelcome",
            CommandKey::OpenDocument => "fx-extension.openDocument",
            CommandKey::OpenSamples => "fx-extension.openSamples",
            CommandKey::OpenReadMe => "fx-extension.openReadMe",
            CommandKey::DebugInTestToolFromMessage => "fx-extension.debugInTestToolFromMessage",
            CommandKey::SigninM365 => "fx-extension.signinM365",
            CommandKey::SigninAzure => "fx-extension.signinAzure",
            CommandKey::LocalDebug => "fx-extension.localdebug",
            CommandKey::Provision => "fx-extension.provision",
            CommandKey::Deploy => "fx-extension.deploy",
            CommandKey::Publish => "fx-extension.publish",
            CommandKey::Preview => "fx-extension.preview",
        }
    }
}

impl fmt::Display for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
