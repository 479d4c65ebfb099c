use compact_str::CompactString;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::platform::WorkspaceDirection;

/// Control commands accepted over the IPC socket, one per line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockCommand {
    /// Show the dock on a monitor, or every dock
    Show(Option<usize>),

    /// Hide the dock on a monitor, or every dock
    Hide(Option<usize>),

    /// Activate the nth launcher app of the main dock (1-based)
    Activate(usize),

    /// Fire a keybinding by name (`app-hotkey-3`, `shortcut`, ...)
    Hotkey(CompactString),

    /// Re-read the settings and pinned apps files
    ReloadConfig,

    /// Dump the dock status as JSON
    Status,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{0} requires an argument")]
    MissingArgument(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

fn parse_index(arg: &str) -> Result<usize, CommandError> {
    arg.parse::<usize>()
        .map_err(|_| CommandError::InvalidArgument(arg.to_string()))
}

impl FromStr for DockCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let cmd = parts.next().ok_or(CommandError::Empty)?;
        let arg = parts.next();

        match cmd.to_lowercase().as_str() {
            "show" => Ok(Self::Show(arg.map(parse_index).transpose()?)),
            "hide" => Ok(Self::Hide(arg.map(parse_index).transpose()?)),
            "activate" => {
                let n = parse_index(arg.ok_or(CommandError::MissingArgument("activate"))?)?;
                if n == 0 {
                    return Err(CommandError::InvalidArgument("0".into()));
                }
                Ok(Self::Activate(n))
            }
            "hotkey" => Ok(Self::Hotkey(
                arg.ok_or(CommandError::MissingArgument("hotkey"))?.into(),
            )),
            "reload-config" | "reload" => Ok(Self::ReloadConfig),
            "status" => Ok(Self::Status),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for DockCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show(Some(m)) => write!(f, "show {}", m),
            Self::Show(None) => f.write_str("show"),
            Self::Hide(Some(m)) => write!(f, "hide {}", m),
            Self::Hide(None) => f.write_str("hide"),
            Self::Activate(n) => write!(f, "activate {}", n),
            Self::Hotkey(name) => write!(f, "hotkey {}", name),
            Self::ReloadConfig => f.write_str("reload-config"),
            Self::Status => f.write_str("status"),
        }
    }
}

/// Requests FROM GTK TO the compositor service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositorCommand {
    SwitchWorkspace(WorkspaceDirection),
    /// Focus the most recent window of a class
    FocusClass(CompactString),
    /// Run a command line through the compositor
    Launch(CompactString),
    /// Report the cursor position back as `ShellEvent::CursorMoved`
    QueryCursor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!("show".parse::<DockCommand>(), Ok(DockCommand::Show(None)));
        assert_eq!("hide 1".parse::<DockCommand>(), Ok(DockCommand::Hide(Some(1))));
        assert_eq!("activate 3\n".parse::<DockCommand>(), Ok(DockCommand::Activate(3)));
        assert_eq!(
            "hotkey app-ctrl-hotkey-2".parse::<DockCommand>(),
            Ok(DockCommand::Hotkey("app-ctrl-hotkey-2".into()))
        );
        assert_eq!("RELOAD-CONFIG".parse::<DockCommand>(), Ok(DockCommand::ReloadConfig));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("".parse::<DockCommand>(), Err(CommandError::Empty));
        assert_eq!(
            "activate".parse::<DockCommand>(),
            Err(CommandError::MissingArgument("activate"))
        );
        assert!(matches!(
            "activate 0".parse::<DockCommand>(),
            Err(CommandError::InvalidArgument(_))
        ));
        assert!(matches!("dance".parse::<DockCommand>(), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn display_is_parseable() {
        for cmd in [
            DockCommand::Show(Some(2)),
            DockCommand::Hide(None),
            DockCommand::Activate(10),
            DockCommand::Hotkey("shortcut".into()),
            DockCommand::Status,
        ] {
            assert_eq!(cmd.to_string().parse::<DockCommand>(), Ok(cmd));
        }
    }
}
