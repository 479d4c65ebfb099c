use compact_str::CompactString;

use crate::animation::{AnimationKind, IconId};
use crate::config::{DockSettings, LauncherConfig};
use crate::dock::VisibilityState;
use crate::geometry::{Point, Rect};
use crate::platform::{BarrierId, TimerId, WatchId};

use super::DockCommand;

/// Inputs of the dock manager, delivered on the GTK main loop
#[derive(Debug, Clone)]
pub enum DockEvent {
    // =========== Layout ===========
    MonitorsChanged,
    SessionModeUpdated,
    WorkAreasChanged,
    FullscreenChanged,

    /// New settings; the manager diffs them against the current ones
    SettingsChanged(DockSettings),

    // =========== Overview ===========
    OverviewShowing,
    OverviewHiding,
    OverviewHidden,
    DragBegin,
    DragEnd,

    // =========== Per dock ===========
    Hover {
        monitor: usize,
        hovered: bool,
    },
    MenuClosed {
        monitor: usize,
    },
    OverlapChanged {
        monitor: usize,
    },
    RequiresVisibilityChanged {
        monitor: usize,
    },
    LauncherResized {
        monitor: usize,
    },
    IconAnimation {
        monitor: usize,
        icon: IconId,
        kind: AnimationKind,
        active: bool,
    },
    Scroll {
        monitor: usize,
        dx: f64,
        dy: f64,
    },

    // =========== Pointer ===========
    PressureTriggered(BarrierId),
    PointerMoved {
        watch: WatchId,
        position: Point,
    },

    // =========== Windows ===========
    Restacked,
    WorkspaceSwitched,
    WindowEnteredMonitor,

    // =========== Input ===========
    Keybinding(CompactString),
    AccessibilityFocus,

    // =========== Loop ===========
    Timer(TimerId),
    /// Animation frame tick, only requested while `wants_frames` is true
    Frame,
}

/// Outputs of the dock manager
#[derive(Debug, Clone, PartialEq)]
pub enum DockNotification {
    /// A dock starts sliding in after a show request
    Showing { monitor: usize },
    /// A dock starts sliding out after a hide request
    Hiding { monitor: usize },
    StateChanged {
        monitor: usize,
        state: VisibilityState,
    },
    /// Every dock of a rebuild has been created
    DocksReady,
    /// A coalesced rebuild finished
    Toggled,
}

/// A compositor window as seen by the Hyprland service
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    pub address: CompactString,
    pub class: CompactString,
    pub rect: Rect,
    pub monitor: i64,
    pub workspace: i32,
    pub fullscreen: bool,
    pub focused: bool,
}

/// A compositor output as seen by the Hyprland service
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSnapshot {
    pub id: i64,
    pub name: CompactString,
    /// Logical geometry
    pub rect: Rect,
    /// Geometry minus space reserved by layer surfaces
    pub work_area: Rect,
    pub focused: bool,
    pub fullscreen: bool,
    pub active_workspace: i32,
}

/// Events FROM async services TO GTK
#[derive(Debug, Clone)]
pub enum ShellEvent {
    /// Pre-routed dock input
    Dock(DockEvent),

    // =========== Hyprland Events ===========

    /// Window set or geometry changed
    WindowsChanged(Vec<WindowSnapshot>),

    /// Output layout changed
    MonitorsChanged(Vec<MonitorSnapshot>),

    /// A window asks for attention, by address
    WindowUrgent(CompactString),

    /// Cursor position in layout coordinates, answering `QueryCursor`
    CursorMoved(Point),

    /// Successfully connected to Hyprland IPC
    HyprlandConnected,

    /// Lost connection to Hyprland IPC
    HyprlandDisconnected,

    // =========== Configuration Events ===========

    /// Dock settings were reloaded
    SettingsReloaded(DockSettings),

    /// Pinned apps were reloaded
    PinnedAppsReloaded(LauncherConfig),

    // =========== Control ===========

    /// Command received over IPC
    Command(DockCommand),
}
