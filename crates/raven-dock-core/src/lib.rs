//! Core of the Raven dock: per-monitor visibility state machines, the
//! manager that owns them, and the async services feeding them.
//!
//! Nothing in here touches GTK. The host implements [`Platform`] and the
//! collaborator traits, forwards its input as [`DockEvent`]s and applies
//! what the docks push back through their actors.

pub mod animation;
pub mod collaborators;
pub mod config;
pub mod dock;
pub mod error;
pub mod features;
pub mod geometry;
pub mod intellihide;
pub mod manager;
pub mod messages;
pub mod platform;
pub mod services;
pub mod signals;
pub mod slide;

#[cfg(test)]
mod testing;

pub use collaborators::{DockActor, DockParts, Launcher, OverlapMonitor};
pub use config::{ConfigPaths, DockSettings, IntellihideMode, LauncherConfig, PinnedApp, ScrollAction};
pub use dock::{DockSnapshot, DockedDash, VisibilityState};
pub use error::{DockError, PlatformError};
pub use geometry::{DockGeometry, Monitor, Point, Rect, Side, Size};
pub use intellihide::{WindowInfo, WindowOverlap};
pub use manager::{DockManager, DockStatus};
pub use messages::{
    CompositorCommand, DockCommand, DockEvent, DockNotification, MonitorSnapshot, ShellEvent,
    WindowSnapshot,
};
pub use platform::Platform;
pub use services::{ConfigWatcher, HyprlandService, IpcServer, ServiceHub, SharedStatus};
pub use slide::SlideContainer;
