//! GTK implementation of the dock host services.
//!
//! Timers and the cursor poll are glib sources on the main loop; their
//! callbacks only post [`DockEvent`]s to the local channel, so no GTK
//! callback ever re-enters the dock manager.

use ahash::{AHashMap, AHashSet};
use compact_str::CompactString;
use glib::{ControlFlow, SourceId};
use gtk4::Application;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use raven_dock_core::geometry::{Monitor, Point, Rect, Side};
use raven_dock_core::platform::{
    BarrierId, BarrierSpec, Clock, DockFactory, LayoutService, PointerService, Scheduler,
    ShellHooks, ShellState, TimerId, TrackOptions, WatchId, WorkspaceDirection,
};
use raven_dock_core::{
    CompositorCommand, DockEvent, DockParts, DockSettings, IntellihideMode, LauncherConfig,
    MonitorSnapshot, PlatformError, WindowOverlap, WindowSnapshot,
};

use crate::common::gdk_monitor;
use crate::dock_window::{DockWindow, WeakDockWindow};
use crate::launcher::{LauncherBox, LauncherOptions, LauncherSource, SharedSource, WeakLauncher};
use crate::overlap::{windows_on_output, SharedOverlap};
use crate::pointer::PointerTracker;

/// What a new output snapshot changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputChanges {
    pub monitors: bool,
    pub work_areas: bool,
    pub fullscreen: bool,
}

/// Compare two output lists sorted by id
pub fn diff_outputs(old: &[MonitorSnapshot], new: &[MonitorSnapshot]) -> OutputChanges {
    let monitors = old.len() != new.len()
        || old
            .iter()
            .zip(new)
            .any(|(a, b)| a.id != b.id || a.name != b.name || a.rect != b.rect);

    OutputChanges {
        monitors,
        work_areas: old.iter().zip(new).any(|(a, b)| a.work_area != b.work_area),
        fullscreen: old.iter().zip(new).any(|(a, b)| a.fullscreen != b.fullscreen),
    }
}

fn focused_address(windows: &[WindowSnapshot]) -> Option<&CompactString> {
    windows.iter().find(|w| w.focused).map(|w| &w.address)
}

/// Host objects of a dock, kept weakly so dropped docks disappear
struct HostedDock {
    monitor: usize,
    window: WeakDockWindow,
    launcher: WeakLauncher,
    overlap: Weak<RefCell<WindowOverlap>>,
}

pub struct GtkPlatform {
    app: Application,
    /// Local channel into the dock manager
    events: async_channel::Sender<DockEvent>,
    commands: mpsc::Sender<CompositorCommand>,
    started: Instant,
    next_id: u64,

    timers: Rc<RefCell<AHashMap<TimerId, SourceId>>>,
    /// Asks the compositor for the cursor while any watch exists
    cursor_poll: Option<SourceId>,

    monitors: Vec<Monitor>,
    source: SharedSource,
    pointer: PointerTracker,
    /// Bumped whenever the focused window changes
    focus_serial: u32,

    keybindings: AHashSet<CompactString>,
    hosted: Vec<HostedDock>,
}

impl GtkPlatform {
    pub fn new(
        app: &Application,
        events: async_channel::Sender<DockEvent>,
        commands: mpsc::Sender<CompositorCommand>,
        pinned: LauncherConfig,
    ) -> Self {
        let source = LauncherSource {
            pinned,
            ..Default::default()
        };

        Self {
            app: app.clone(),
            events,
            commands,
            started: Instant::now(),
            next_id: 0,
            timers: Rc::new(RefCell::new(AHashMap::new())),
            cursor_poll: None,
            monitors: Vec::new(),
            source: Rc::new(RefCell::new(source)),
            pointer: PointerTracker::new(),
            focus_serial: 0,
            keybindings: AHashSet::new(),
            hosted: Vec::new(),
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn send(&self, event: DockEvent) {
        let _ = self.events.try_send(event);
    }

    fn hosted_window(&self, monitor: usize) -> Option<DockWindow> {
        self.hosted
            .iter()
            .filter(|h| h.monitor == monitor)
            .find_map(|h| h.window.upgrade())
    }

    // =========== Compositor state ===========

    /// Take a new output list; the caller turns the changes into dock events
    pub fn set_outputs(&mut self, mut outputs: Vec<MonitorSnapshot>) -> OutputChanges {
        outputs.sort_by_key(|o| o.id);

        let changes = diff_outputs(&self.source.borrow().outputs, &outputs);
        self.monitors = outputs
            .iter()
            .enumerate()
            .map(|(index, o)| Monitor::new(index, o.rect))
            .collect();
        self.source.borrow_mut().outputs = outputs;

        // Active workspaces may have changed
        self.refresh_overlaps();
        self.redisplay_launchers();
        changes
    }

    pub fn set_windows(&mut self, windows: Vec<WindowSnapshot>) {
        {
            let mut source = self.source.borrow_mut();
            if focused_address(&source.windows) != focused_address(&windows) {
                self.focus_serial = self.focus_serial.wrapping_add(1);
            }

            // Attention ends once the window is focused or gone
            source
                .urgent
                .retain(|address| windows.iter().any(|w| &w.address == address && !w.focused));
            source.windows = windows;
        }

        self.refresh_overlaps();
        self.redisplay_launchers();
    }

    pub fn set_urgent(&mut self, address: CompactString) {
        let known = {
            let source = self.source.borrow();
            source.windows.iter().any(|w| w.address == address && !w.focused)
        };
        if known {
            self.source.borrow_mut().urgent.insert(address);
            self.redisplay_launchers();
        }
    }

    /// Cursor sample from the compositor, forwarded to every pointer watch
    pub fn set_cursor(&mut self, position: Point) {
        for event in self.pointer.cursor_moved(position) {
            self.send(event);
        }
    }

    pub fn set_pinned(&mut self, pinned: LauncherConfig) {
        self.source.borrow_mut().pinned = pinned;
        self.redisplay_launchers();
    }

    /// Launcher listing options; the docks reset their icons themselves
    pub fn apply_settings(&mut self, settings: &DockSettings) {
        self.source.borrow_mut().options = LauncherOptions {
            show_favorites: settings.show_favorites,
            show_running: settings.show_running,
            isolate_workspaces: settings.isolate_workspaces,
            isolate_monitors: settings.isolate_monitors,
        };
    }

    fn prune(&mut self) {
        self.hosted.retain(|h| h.window.upgrade().is_some());
    }

    fn refresh_overlaps(&mut self) {
        self.prune();
        let source = self.source.borrow();

        for hosted in &self.hosted {
            let (Some(overlap), Some(output)) =
                (hosted.overlap.upgrade(), source.outputs.get(hosted.monitor))
            else {
                continue;
            };
            let windows = windows_on_output(&source.windows, output);
            if overlap.borrow_mut().set_windows(windows) {
                self.send(DockEvent::OverlapChanged {
                    monitor: hosted.monitor,
                });
            }
        }
    }

    fn redisplay_launchers(&self) {
        for launcher in self.hosted.iter().filter_map(|h| h.launcher.upgrade()) {
            launcher.redisplay(false);
        }
    }
}

impl Clock for GtkPlatform {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Scheduler for GtkPlatform {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id());
        let timers = self.timers.clone();
        let events = self.events.clone();

        let source = glib::timeout_add_local_once(delay, move || {
            timers.borrow_mut().remove(&id);
            let _ = events.try_send(DockEvent::Timer(id));
        });
        self.timers.borrow_mut().insert(id, source);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        let source = self.timers.borrow_mut().remove(&id);
        if let Some(source) = source {
            source.remove();
        }
    }
}

impl LayoutService for GtkPlatform {
    fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    /// Outputs are ordered by compositor id; the first one is primary
    fn primary_monitor(&self) -> usize {
        0
    }

    fn work_area(&self, monitor: usize) -> Rect {
        let source = self.source.borrow();
        source
            .outputs
            .get(monitor)
            .map(|o| o.work_area)
            .unwrap_or_default()
    }

    fn in_fullscreen(&self, monitor: usize) -> bool {
        self.source
            .borrow()
            .outputs
            .get(monitor)
            .is_some_and(|o| o.fullscreen)
    }

    fn track_dock(&mut self, monitor: usize, options: TrackOptions) {
        if let Some(window) = self.hosted_window(monitor) {
            window.set_reserves_space(options.affects_struts);
        }
    }

    fn untrack_dock(&mut self, monitor: usize) {
        if let Some(window) = self.hosted_window(monitor) {
            window.set_reserves_space(false);
        }
    }
}

impl PointerService for GtkPlatform {
    /// Wayland gives layer surfaces no pointer barriers
    fn supports_pressure_barriers(&self) -> bool {
        false
    }

    fn add_pressure_barrier(&mut self, _spec: BarrierSpec) -> Result<BarrierId, PlatformError> {
        Err(PlatformError::Unsupported("pressure barriers"))
    }

    fn remove_pressure_barrier(&mut self, _id: BarrierId) {}

    /// Watches share one cursor poll at the interval of the first watch
    fn add_pointer_watch(&mut self, interval: Duration) -> Result<WatchId, PlatformError> {
        let watch = WatchId(self.next_id());

        if self.pointer.add_watch(watch) {
            let commands = self.commands.clone();
            self.cursor_poll = Some(glib::timeout_add_local(interval, move || {
                if commands.try_send(CompositorCommand::QueryCursor).is_err() {
                    debug!("Cursor query dropped, compositor service busy");
                }
                // Only ever removed through remove_pointer_watch
                ControlFlow::Continue
            }));
        }
        Ok(watch)
    }

    fn remove_pointer_watch(&mut self, id: WatchId) {
        if self.pointer.remove_watch(id) {
            if let Some(source) = self.cursor_poll.take() {
                source.remove();
            }
        }
    }

    fn pointer_position(&self) -> Point {
        self.pointer.position()
    }

    fn focus_user_time(&self) -> u32 {
        self.focus_serial
    }

    fn modal_count(&self) -> u32 {
        0
    }
}

/// Hyprland has no overview
impl ShellState for GtkPlatform {
    fn overview_visible(&self) -> bool {
        false
    }

    fn overview_visible_target(&self) -> bool {
        false
    }
}

impl ShellHooks for GtkPlatform {
    fn install_dash(&mut self, main_monitor: usize) {
        info!("Main dock on monitor {}", main_monitor);
    }

    fn restore_dash(&mut self) {
        debug!("Main dock released");
    }

    fn set_panel_corners_visible(&mut self, visible: bool) {
        debug!("Panel corners visible: {}", visible);
    }

    fn set_isolated_activation(&mut self, enabled: bool) {
        self.source.borrow_mut().isolated = enabled;
        self.redisplay_launchers();
    }

    fn add_keybinding(&mut self, name: &str) -> bool {
        // Compositor binds reach the dock through `raven-dock-ctl hotkey <name>`
        let added = self.keybindings.insert(name.into());
        if !added {
            warn!("Keybinding {} registered twice", name);
        }
        added
    }

    fn remove_keybinding(&mut self, name: &str) {
        self.keybindings.remove(name);
    }

    fn register_accessibility_group(&mut self, monitor: usize) {
        if let Some(window) = self.hosted_window(monitor) {
            window.set_focusable(true);
        }
    }

    fn unregister_accessibility_group(&mut self, monitor: usize) {
        if let Some(window) = self.hosted_window(monitor) {
            window.set_focusable(false);
        }
    }

    fn switch_workspace(&mut self, direction: WorkspaceDirection) {
        if let Err(e) = self
            .commands
            .try_send(CompositorCommand::SwitchWorkspace(direction))
        {
            warn!("Failed to queue workspace switch: {}", e);
        }
    }
}

impl DockFactory for GtkPlatform {
    fn create_dock(&mut self, monitor: &Monitor, side: Side) -> DockParts {
        self.prune();

        let (output, windows) = {
            let source = self.source.borrow();
            let output = source.outputs.get(monitor.index).cloned();
            let windows = output
                .as_ref()
                .map(|o| windows_on_output(&source.windows, o))
                .unwrap_or_default();
            (output, windows)
        };
        let gdk_output = output.as_ref().and_then(|o| gdk_monitor(&o.name));
        if gdk_output.is_none() {
            warn!("No GDK monitor for output {}, using the default", monitor.index);
        }

        let launcher = LauncherBox::new(
            monitor.index,
            side,
            self.source.clone(),
            self.events.clone(),
            self.commands.clone(),
        );
        let window = DockWindow::new(
            &self.app,
            gdk_output.as_ref(),
            monitor.clone(),
            side,
            launcher.widget(),
            self.events.clone(),
            self.pointer.shared(),
        );
        let overlap = SharedOverlap::new(IntellihideMode::default());
        overlap.set_windows(windows);

        self.hosted.push(HostedDock {
            monitor: monitor.index,
            window: window.downgrade(),
            launcher: launcher.downgrade(),
            overlap: overlap.downgrade(),
        });
        debug!("Created dock window on monitor {} ({})", monitor.index, side.as_str());

        DockParts {
            actor: Box::new(window),
            launcher: Box::new(launcher),
            overlap: Box::new(overlap),
        }
    }
}
