use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{DockSettings, SettingKey};
use crate::dock::{DockContext, DockSnapshot, DockedDash};
use crate::error::DockError;
use crate::features::{KeyboardShortcuts, WorkspaceIsolation};
use crate::geometry::{Monitor, Side};
use crate::messages::{DockEvent, DockNotification};
use crate::platform::{Platform, TimerId};
use crate::signals::{Signal, SignalRegistry};

thread_local! {
    static MANAGER_ACTIVE: Cell<bool> = const { Cell::new(false) };
}

/// Marks the manager of this thread as live until dropped
struct InstanceGuard;

impl InstanceGuard {
    fn acquire() -> Result<Self, DockError> {
        MANAGER_ACTIVE.with(|active| {
            if active.get() {
                return Err(DockError::AlreadyInitialized);
            }
            active.set(true);
            Ok(InstanceGuard)
        })
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        MANAGER_ACTIVE.with(|active| active.set(false));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManagerAction {
    Toggle,
    AdjustPanelCorners,
}

/// Snapshot of every dock, as served by `status`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DockStatus {
    pub preferred_monitor: usize,
    pub docks: Vec<DockSnapshot>,
}

/// Owns one dock per configured monitor and routes host events to them.
///
/// Docks are rebuilt wholesale when the monitor layout, the session mode
/// or the placement settings change. Several triggers in one loop
/// iteration collapse into a single rebuild.
pub struct DockManager<P: Platform> {
    platform: P,
    settings: DockSettings,
    outbox: Vec<DockNotification>,

    /// Main dock first
    docks: Vec<DockedDash>,
    preferred_monitor: usize,
    signals: SignalRegistry<ManagerAction>,
    rebuild_timer: Option<TimerId>,

    isolation: Option<WorkspaceIsolation>,
    shortcuts: Option<KeyboardShortcuts>,

    shut_down: bool,
    _guard: InstanceGuard,
}

impl<P: Platform> DockManager<P> {
    /// Create the manager and its docks. Only one manager may be alive per thread.
    pub fn new(platform: P, settings: DockSettings) -> Result<Self, DockError> {
        let guard = InstanceGuard::acquire()?;

        let mut manager = Self {
            platform,
            settings,
            outbox: Vec::new(),
            docks: Vec::new(),
            preferred_monitor: 0,
            signals: SignalRegistry::new(),
            rebuild_timer: None,
            isolation: None,
            shortcuts: None,
            shut_down: false,
            _guard: guard,
        };

        manager.create_docks();
        manager.bind_settings_changes();
        Ok(manager)
    }

    fn bind_settings_changes(&mut self) {
        use ManagerAction as A;

        self.signals.add(Signal::MonitorsChanged, A::Toggle);
        self.signals.add(Signal::SessionModeUpdated, A::Toggle);
        for key in [
            SettingKey::MultiMonitor,
            SettingKey::PreferredMonitor,
            SettingKey::DockPosition,
        ] {
            self.signals.add(Signal::SettingChanged(key), A::Toggle);
        }
        self.signals
            .add(Signal::SettingChanged(SettingKey::ExtendHeight), A::AdjustPanelCorners);
        self.signals
            .add(Signal::SettingChanged(SettingKey::DockFixed), A::AdjustPanelCorners);
    }

    fn parts(&mut self) -> (&mut Vec<DockedDash>, DockContext<'_>) {
        (
            &mut self.docks,
            DockContext {
                settings: &self.settings,
                platform: &mut self.platform,
                outbox: &mut self.outbox,
            },
        )
    }

    // =========== Accessors ===========

    pub fn settings(&self) -> &DockSettings {
        &self.settings
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn docks(&self) -> &[DockedDash] {
        &self.docks
    }

    pub fn main_dock(&self) -> Option<&DockedDash> {
        self.docks.first()
    }

    pub fn dock_by_monitor(&self, monitor: usize) -> Option<&DockedDash> {
        self.docks.iter().find(|d| d.monitor_index() == monitor)
    }

    /// Monitor the main dock is placed on
    pub fn preferred_monitor(&self) -> usize {
        self.preferred_monitor
    }

    pub fn is_rebuild_pending(&self) -> bool {
        self.rebuild_timer.is_some()
    }

    /// Notifications emitted since the last call
    pub fn take_notifications(&mut self) -> Vec<DockNotification> {
        std::mem::take(&mut self.outbox)
    }

    /// True while any dock animates
    pub fn wants_frames(&self) -> bool {
        self.docks.iter().any(DockedDash::wants_frames)
    }

    pub fn status(&self) -> DockStatus {
        DockStatus {
            preferred_monitor: self.preferred_monitor,
            docks: self.docks.iter().map(DockedDash::snapshot).collect(),
        }
    }

    // =========== Control ===========

    /// Show the dock on `monitor`, or every dock
    pub fn show(&mut self, monitor: Option<usize>) {
        let (docks, mut ctx) = self.parts();
        for dock in docks.iter_mut() {
            if monitor.map_or(true, |m| dock.monitor_index() == m) {
                dock.request_show(&mut ctx);
            }
        }
    }

    /// Hide the dock on `monitor`, or every dock
    pub fn hide(&mut self, monitor: Option<usize>) {
        let (docks, mut ctx) = self.parts();
        for dock in docks.iter_mut() {
            if monitor.map_or(true, |m| dock.monitor_index() == m) {
                dock.request_hide(&mut ctx);
            }
        }
    }

    /// Activate the app at `index` on the main dock
    pub fn activate_app(&mut self, index: usize) -> bool {
        self.docks
            .first_mut()
            .is_some_and(|dock| dock.activate_app(index))
    }

    // =========== Events ===========

    pub fn handle(&mut self, event: DockEvent) {
        match event {
            DockEvent::MonitorsChanged => self.emit(Signal::MonitorsChanged),
            DockEvent::SessionModeUpdated => self.emit(Signal::SessionModeUpdated),
            DockEvent::WorkAreasChanged => self.emit(Signal::WorkAreasChanged),
            DockEvent::FullscreenChanged => self.emit(Signal::FullscreenChanged),
            DockEvent::SettingsChanged(settings) => self.apply_settings(settings),

            DockEvent::OverviewShowing => self.emit(Signal::OverviewShowing),
            DockEvent::OverviewHiding => self.emit(Signal::OverviewHiding),
            DockEvent::OverviewHidden => self.emit(Signal::OverviewHidden),
            DockEvent::DragBegin => self.emit(Signal::DragBegin),
            DockEvent::DragEnd => self.emit(Signal::DragEnd),

            DockEvent::Restacked => self.emit(Signal::Restacked),
            DockEvent::WorkspaceSwitched => self.emit(Signal::WorkspaceSwitched),
            DockEvent::WindowEnteredMonitor => self.emit(Signal::WindowEnteredMonitor),

            DockEvent::Hover { monitor, hovered } => {
                self.with_dock(monitor, |dock, ctx| dock.set_hover(hovered, ctx))
            }
            DockEvent::MenuClosed { monitor } => {
                self.with_dock(monitor, |dock, ctx| dock.emit(Signal::MenuClosed, ctx))
            }
            DockEvent::OverlapChanged { monitor } => {
                self.with_dock(monitor, |dock, ctx| dock.emit(Signal::OverlapChanged, ctx))
            }
            DockEvent::RequiresVisibilityChanged { monitor } => {
                self.with_dock(monitor, |dock, ctx| dock.emit(Signal::RequiresVisibility, ctx))
            }
            DockEvent::LauncherResized { monitor } => {
                self.with_dock(monitor, |dock, ctx| dock.emit(Signal::LauncherResized, ctx))
            }
            DockEvent::IconAnimation {
                monitor,
                icon,
                kind,
                active,
            } => self.with_dock(monitor, |dock, ctx| dock.icon_animation(icon, kind, active, ctx)),
            DockEvent::Scroll { monitor, dy, .. } => {
                self.with_dock(monitor, |dock, ctx| dock.scroll(dy, ctx))
            }

            DockEvent::PressureTriggered(id) => {
                let (docks, mut ctx) = self.parts();
                if !docks.iter_mut().any(|d| d.pressure_triggered(id, &mut ctx)) {
                    debug!("Ignoring stale barrier {:?}", id);
                }
            }
            DockEvent::PointerMoved { watch, position } => {
                let (docks, mut ctx) = self.parts();
                docks
                    .iter_mut()
                    .any(|d| d.pointer_moved(watch, position, &mut ctx));
            }

            DockEvent::Keybinding(name) => {
                let mut ctx = DockContext {
                    settings: &self.settings,
                    platform: &mut self.platform,
                    outbox: &mut self.outbox,
                };
                let handled = self
                    .shortcuts
                    .as_ref()
                    .is_some_and(|s| s.trigger(&name, &mut self.docks, &mut ctx));
                if !handled {
                    debug!("Unbound keybinding {}", name);
                }
            }
            DockEvent::AccessibilityFocus => {
                let (docks, mut ctx) = self.parts();
                if let Some(main) = docks.first_mut() {
                    main.accessibility_focus(&mut ctx);
                }
            }

            DockEvent::Timer(id) => self.handle_timer(id),
            DockEvent::Frame => {
                let (docks, mut ctx) = self.parts();
                for dock in docks.iter_mut() {
                    dock.frame(&mut ctx);
                }
            }
        }
    }

    fn with_dock<F>(&mut self, monitor: usize, f: F)
    where
        F: FnOnce(&mut DockedDash, &mut DockContext<'_>),
    {
        let (docks, mut ctx) = self.parts();
        match docks.iter_mut().find(|d| d.monitor_index() == monitor) {
            Some(dock) => f(dock, &mut ctx),
            None => debug!("No dock on monitor {}", monitor),
        }
    }

    /// Deliver `signal` to every dock, then to the manager's own handlers
    fn emit(&mut self, signal: Signal) {
        let (docks, mut ctx) = self.parts();
        for dock in docks.iter_mut() {
            dock.emit(signal, &mut ctx);
        }

        for action in self.signals.handlers(signal) {
            match action {
                ManagerAction::Toggle => self.toggle(),
                ManagerAction::AdjustPanelCorners => self.adjust_panel_corners(),
            }
        }
    }

    fn apply_settings(&mut self, settings: DockSettings) {
        let keys = DockSettings::changed_keys(&self.settings, &settings);
        if keys.is_empty() {
            return;
        }
        self.settings = settings;

        for key in keys {
            debug!("Setting changed: {}", key.as_str());

            if let Some(isolation) = self.isolation.as_mut() {
                isolation.settings_changed(key, &mut self.docks, &self.settings, &mut self.platform);
            }
            if let Some(shortcuts) = self.shortcuts.as_mut() {
                shortcuts.settings_changed(key, &self.settings, &mut self.platform);
            }
            self.emit(Signal::SettingChanged(key));
        }
    }

    fn handle_timer(&mut self, id: TimerId) {
        if self.rebuild_timer == Some(id) {
            self.rebuild_timer = None;
            self.rebuild();
            return;
        }

        let (docks, mut ctx) = self.parts();
        if !docks.iter_mut().any(|d| d.handle_timer(id, &mut ctx)) {
            debug!("Ignoring stale timer {:?}", id);
        }
    }

    // =========== Rebuild ===========

    /// Schedule a rebuild for the next loop iteration
    fn toggle(&mut self) {
        if let Some(id) = self.rebuild_timer.take() {
            self.platform.cancel(id);
        }
        self.rebuild_timer = Some(self.platform.schedule(Duration::ZERO));
    }

    fn rebuild(&mut self) {
        info!("Rebuilding docks");
        self.platform.restore_dash();
        self.delete_docks();
        self.create_docks();
        self.outbox.push(DockNotification::Toggled);
    }

    fn create_docks(&mut self) {
        let monitors: Vec<Monitor> = self.platform.monitors().to_vec();
        if monitors.is_empty() {
            // Happens while outputs are reconnected; wait for the next change
            info!("No monitors, not creating docks");
            return;
        }

        let count = monitors.len();
        let primary = self.platform.primary_monitor().min(count - 1);
        let preferred = self.settings.preferred_monitor;
        let in_range = usize::try_from(preferred).ok().filter(|p| *p < count);

        // Settings count monitors starting from the primary one
        self.preferred_monitor = match in_range {
            Some(p) if !self.settings.multi_monitor => (primary + p) % count,
            _ => primary,
        };

        let side = self.settings.dock_position;
        self.build_dock(monitors[self.preferred_monitor].clone(), side, true);
        self.platform.install_dash(self.preferred_monitor);
        self.adjust_panel_corners();

        if self.settings.multi_monitor {
            for (position, monitor) in monitors.into_iter().enumerate() {
                if position != self.preferred_monitor {
                    self.build_dock(monitor, side, false);
                }
            }
        }

        // Features bind to the complete set of docks
        self.isolation = Some(WorkspaceIsolation::new(
            &mut self.docks,
            &self.settings,
            &mut self.platform,
        ));
        self.shortcuts = Some(KeyboardShortcuts::new(&self.settings, &mut self.platform));

        info!("{} dock(s) ready", self.docks.len());
        self.outbox.push(DockNotification::DocksReady);
    }

    fn build_dock(&mut self, monitor: Monitor, side: Side, is_main: bool) {
        let parts = self.platform.create_dock(&monitor, side);
        let (docks, mut ctx) = self.parts();
        let dock = DockedDash::new(monitor, side, parts, is_main, &mut ctx);
        docks.push(dock);
    }

    fn delete_docks(&mut self) {
        if self.docks.is_empty() {
            return;
        }

        if let Some(isolation) = self.isolation.take() {
            isolation.destroy(&mut self.docks, &mut self.platform);
        }
        if let Some(shortcuts) = self.shortcuts.take() {
            shortcuts.destroy(&mut self.platform);
        }

        let docks = std::mem::take(&mut self.docks);
        let (_, mut ctx) = self.parts();
        for dock in docks {
            dock.destroy(&mut ctx);
        }
    }

    /// Hide the top panel corners under a vertical, extended, fixed dock
    /// on the primary monitor
    fn adjust_panel_corners(&mut self) {
        let vertical = !self.settings.dock_position.is_horizontal();
        let on_primary = self.settings.multi_monitor
            || self.preferred_monitor == self.platform.primary_monitor();
        let hide = vertical && on_primary && self.settings.extend_height && self.settings.dock_fixed;
        self.platform.set_panel_corners_visible(!hide);
    }

    /// Destroy every dock and revert the shell changes. Also run on drop.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        info!("Shutting down dock manager");

        if let Some(id) = self.rebuild_timer.take() {
            self.platform.cancel(id);
        }
        self.platform.restore_dash();
        self.delete_docks();
        self.platform.set_panel_corners_visible(true);
        self.signals.clear();
        self.shut_down = true;
    }
}

impl<P: Platform> Drop for DockManager<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
