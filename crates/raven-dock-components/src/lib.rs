//! GTK4 layer-shell host of the Raven dock.
//!
//! [`GtkPlatform`] implements the core's host contracts on the GTK main
//! loop and builds one layer-shell window per dock.

pub mod common;
mod dock_window;
mod launcher;
mod overlap;
pub mod platform;
mod pointer;
pub mod theme;

pub use dock_window::DockWindow;
pub use launcher::{collect_items, LauncherBox, LauncherItem, LauncherOptions, LauncherSource};
pub use overlap::{windows_on_output, SharedOverlap};
pub use platform::{diff_outputs, GtkPlatform, OutputChanges};
pub use theme::{load_css, DOCK_CSS};
