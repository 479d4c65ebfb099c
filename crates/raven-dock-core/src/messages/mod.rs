mod commands;
mod events;

pub use commands::{CommandError, CompositorCommand, DockCommand};
pub use events::{DockEvent, DockNotification, MonitorSnapshot, ShellEvent, WindowSnapshot};
