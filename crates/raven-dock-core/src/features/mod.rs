//! Optional behaviour attached to the manager's docks.

mod isolation;
mod shortcuts;

pub use isolation::WorkspaceIsolation;
pub use shortcuts::{Hotkey, KeyboardShortcuts, EXTRA_SHORTCUT, NUM_HOTKEYS};
