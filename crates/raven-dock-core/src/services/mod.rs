mod config_watcher;
mod hub;
mod hyprland;
mod ipc;

pub use config_watcher::ConfigWatcher;
pub use hub::ServiceHub;
pub use hyprland::{logical_rect, work_area, HyprlandService};
pub use ipc::{request, IpcServer, SharedStatus};
