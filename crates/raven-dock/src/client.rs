use clap::Subcommand;
use std::path::Path;

use raven_dock_core::services::request;
use raven_dock_core::DockCommand;

/// Commands sent to a running dock over its socket
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ClientCommand {
    /// Show the dock on a monitor, or every dock
    Show {
        /// Monitor index
        monitor: Option<usize>,
    },
    /// Hide the dock on a monitor, or every dock
    Hide {
        /// Monitor index
        monitor: Option<usize>,
    },
    /// Activate the nth launcher app of the main dock
    Activate {
        /// App position, starting at 1
        n: usize,
    },
    /// Fire a dock keybinding (app-hotkey-1 .. app-hotkey-10, shortcut, ...)
    Hotkey {
        /// Keybinding name
        name: String,
    },
    /// Reload settings and pinned apps
    ReloadConfig,
    /// Show the state of every dock
    Status,
}

impl From<ClientCommand> for DockCommand {
    fn from(command: ClientCommand) -> Self {
        match command {
            ClientCommand::Show { monitor } => DockCommand::Show(monitor),
            ClientCommand::Hide { monitor } => DockCommand::Hide(monitor),
            ClientCommand::Activate { n } => DockCommand::Activate(n),
            ClientCommand::Hotkey { name } => DockCommand::Hotkey(name.into()),
            ClientCommand::ReloadConfig => DockCommand::ReloadConfig,
            ClientCommand::Status => DockCommand::Status,
        }
    }
}

/// Send a command and print the reply
pub fn run(socket: &Path, command: ClientCommand) -> anyhow::Result<()> {
    let response = request(socket, &command.into())?;
    let response = response.trim();
    if let Some(message) = response.strip_prefix("error: ") {
        anyhow::bail!("{}", message);
    }
    println!("{}", response);
    Ok(())
}
