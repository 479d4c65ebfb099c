mod launcher;
mod paths;
mod settings;

pub use launcher::{LauncherConfig, PinnedApp};
pub use paths::ConfigPaths;
pub use settings::{DockSettings, IntellihideMode, ScrollAction, SettingKey};
