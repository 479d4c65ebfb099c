//! In-memory host used by the unit tests.

use ahash::{AHashMap, AHashSet};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::time::Duration;

use crate::animation::IconId;
use crate::collaborators::{DockActor, DockParts, Launcher, OverlapMonitor};
use crate::config::{DockSettings, IntellihideMode};
use crate::dock::{DockContext, DockedDash};
use crate::error::PlatformError;
use crate::geometry::{DockGeometry, Monitor, Point, Rect, Side, Size};
use crate::messages::DockNotification;
use crate::platform::{
    BarrierId, BarrierSpec, Clock, DockFactory, LayoutService, PointerService, Scheduler,
    ShellHooks, ShellState, TimerId, TrackOptions, WatchId, WorkspaceDirection,
};
use crate::slide::SlideContainer;

/// Everything the fake collaborators of one dock saw
#[derive(Debug)]
pub struct FakeDockState {
    pub geometry: Option<DockGeometry>,
    pub slide_x: f64,
    pub styles: AHashSet<String>,
    pub max_size: Size,
    pub natural_size: Size,
    pub requires_visibility: bool,
    pub app_count: usize,
    pub activated: Vec<usize>,
    pub number_overlay: bool,
    pub resets: usize,
    pub redisplays: usize,
    pub focused_first: bool,
    pub rotations: Vec<(IconId, f64)>,
    pub icon_size: i32,
    pub overlap_enabled: bool,
    pub overlap_status: bool,
    pub overlap_mode: Option<IntellihideMode>,
    pub target_box: Option<Rect>,
    pub destroyed: bool,
}

impl Default for FakeDockState {
    fn default() -> Self {
        Self {
            geometry: None,
            slide_x: 0.0,
            styles: AHashSet::new(),
            max_size: Size::default(),
            natural_size: Size::new(480, 64),
            requires_visibility: false,
            app_count: 5,
            activated: Vec::new(),
            number_overlay: false,
            resets: 0,
            redisplays: 0,
            focused_first: false,
            rotations: Vec::new(),
            icon_size: 0,
            overlap_enabled: false,
            overlap_status: false,
            overlap_mode: None,
            target_box: None,
            destroyed: false,
        }
    }
}

/// Handle shared by the fake actor, launcher and overlap monitor of a dock
#[derive(Debug, Clone, Default)]
pub struct FakeDock(Rc<RefCell<FakeDockState>>);

impl FakeDock {
    pub fn state(&self) -> Ref<'_, FakeDockState> {
        self.0.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, FakeDockState> {
        self.0.borrow_mut()
    }
}

struct FakeActor(FakeDock);
struct FakeLauncher(FakeDock);
struct FakeOverlap(FakeDock);

impl DockActor for FakeActor {
    fn set_geometry(&mut self, geometry: &DockGeometry) {
        self.0.state_mut().geometry = Some(*geometry);
    }

    fn set_slide(&mut self, slider: &SlideContainer) {
        self.0.state_mut().slide_x = slider.slide_x();
    }

    fn set_style_class(&mut self, name: &str, enabled: bool) {
        let mut state = self.0.state_mut();
        if enabled {
            state.styles.insert(name.to_string());
        } else {
            state.styles.remove(name);
        }
    }

    fn destroy(&mut self) {
        self.0.state_mut().destroyed = true;
    }
}

impl Launcher for FakeLauncher {
    fn requires_visibility(&self) -> bool {
        self.0.state().requires_visibility
    }

    fn set_max_size(&mut self, size: Size) {
        self.0.state_mut().max_size = size;
    }

    fn natural_size(&self) -> Size {
        self.0.state().natural_size
    }

    fn app_count(&self) -> usize {
        self.0.state().app_count
    }

    fn activate_app(&mut self, index: usize) -> bool {
        let mut state = self.0.state_mut();
        if index >= state.app_count {
            return false;
        }
        state.activated.push(index);
        true
    }

    fn set_number_overlay(&mut self, visible: bool) {
        self.0.state_mut().number_overlay = visible;
    }

    fn reset_app_icons(&mut self) {
        self.0.state_mut().resets += 1;
    }

    fn queue_redisplay(&mut self) {
        self.0.state_mut().redisplays += 1;
    }

    fn focus_first(&mut self) {
        self.0.state_mut().focused_first = true;
    }

    fn apply_icon_rotation(&mut self, icon: IconId, degrees: f64) {
        self.0.state_mut().rotations.push((icon, degrees));
    }

    fn set_icon_size(&mut self, size: i32) {
        self.0.state_mut().icon_size = size;
    }
}

impl OverlapMonitor for FakeOverlap {
    fn enable(&mut self) -> bool {
        self.0.state_mut().overlap_enabled = true;
        false
    }

    fn disable(&mut self) -> bool {
        self.0.state_mut().overlap_enabled = false;
        false
    }

    fn force_update(&mut self) -> bool {
        false
    }

    fn update_target_box(&mut self, target: Rect) -> bool {
        self.0.state_mut().target_box = Some(target);
        false
    }

    fn set_mode(&mut self, mode: IntellihideMode) -> bool {
        self.0.state_mut().overlap_mode = Some(mode);
        false
    }

    fn overlap_status(&self) -> bool {
        self.0.state().overlap_status
    }
}

/// Host with a manual clock that records every registration
#[derive(Debug)]
pub struct FakePlatform {
    pub now: Duration,
    next_id: u64,
    timers: Vec<(TimerId, Duration)>,

    pub monitors: Vec<Monitor>,
    pub primary: usize,
    pub work_areas: Vec<Rect>,
    pub fullscreen: AHashSet<usize>,
    pub tracked: AHashMap<usize, TrackOptions>,

    pub barrier_support: bool,
    pub fail_barriers: bool,
    pub fail_watches: bool,
    pub barriers: Vec<(BarrierId, BarrierSpec)>,
    pub watches: Vec<(WatchId, Duration)>,
    pub pointer: Point,
    pub user_time: u32,
    pub modal_count: u32,

    pub overview_visible: bool,
    pub overview_target: bool,

    pub dash_installed: Option<usize>,
    pub panel_corners_visible: bool,
    pub isolated_activation: bool,
    pub keybindings: Vec<String>,
    pub rejected_keybindings: Vec<String>,
    pub accessibility: Vec<usize>,
    pub workspace_switches: Vec<WorkspaceDirection>,
    pub created: Vec<FakeDock>,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self::new(vec![Rect::new(0, 0, 1920, 1080)])
    }
}

impl FakePlatform {
    /// One monitor per rect, work areas equal to the monitors
    pub fn new(rects: Vec<Rect>) -> Self {
        let monitors = rects
            .iter()
            .enumerate()
            .map(|(index, rect)| Monitor::new(index, *rect))
            .collect();

        Self {
            now: Duration::ZERO,
            next_id: 0,
            timers: Vec::new(),
            monitors,
            primary: 0,
            work_areas: rects,
            fullscreen: AHashSet::new(),
            tracked: AHashMap::new(),
            barrier_support: true,
            fail_barriers: false,
            fail_watches: false,
            barriers: Vec::new(),
            watches: Vec::new(),
            pointer: Point::default(),
            user_time: 0,
            modal_count: 0,
            overview_visible: false,
            overview_target: false,
            dash_installed: None,
            panel_corners_visible: true,
            isolated_activation: false,
            keybindings: Vec::new(),
            rejected_keybindings: Vec::new(),
            accessibility: Vec::new(),
            workspace_switches: Vec::new(),
            created: Vec::new(),
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn make_parts(&mut self) -> (DockParts, FakeDock) {
        let fake = FakeDock::default();
        self.created.push(fake.clone());
        let parts = DockParts {
            actor: Box::new(FakeActor(fake.clone())),
            launcher: Box::new(FakeLauncher(fake.clone())),
            overlap: Box::new(FakeOverlap(fake.clone())),
        };
        (parts, fake)
    }

    pub fn pending_timers(&self) -> &[(TimerId, Duration)] {
        &self.timers
    }

    /// Earliest timer due at or before `until`; the clock moves to its deadline
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let pos = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, (_, due))| *due <= until)
            .min_by_key(|(_, (id, due))| (*due, *id))
            .map(|(pos, _)| pos)?;

        let (id, due) = self.timers.remove(pos);
        self.now = self.now.max(due);
        Some(id)
    }
}

impl Clock for FakePlatform {
    fn now(&self) -> Duration {
        self.now
    }
}

impl Scheduler for FakePlatform {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id());
        self.timers.push((id, self.now + delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|(t, _)| *t != id);
    }
}

impl LayoutService for FakePlatform {
    fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    fn primary_monitor(&self) -> usize {
        self.primary
    }

    fn work_area(&self, monitor: usize) -> Rect {
        self.work_areas.get(monitor).copied().unwrap_or_default()
    }

    fn in_fullscreen(&self, monitor: usize) -> bool {
        self.fullscreen.contains(&monitor)
    }

    fn track_dock(&mut self, monitor: usize, options: TrackOptions) {
        self.tracked.insert(monitor, options);
    }

    fn untrack_dock(&mut self, monitor: usize) {
        self.tracked.remove(&monitor);
    }
}

impl PointerService for FakePlatform {
    fn supports_pressure_barriers(&self) -> bool {
        self.barrier_support
    }

    fn add_pressure_barrier(&mut self, spec: BarrierSpec) -> Result<BarrierId, PlatformError> {
        if self.fail_barriers {
            return Err(PlatformError::Registration("barrier rejected".into()));
        }
        let id = BarrierId(self.next_id());
        self.barriers.push((id, spec));
        Ok(id)
    }

    fn remove_pressure_barrier(&mut self, id: BarrierId) {
        self.barriers.retain(|(b, _)| *b != id);
    }

    fn add_pointer_watch(&mut self, interval: Duration) -> Result<WatchId, PlatformError> {
        if self.fail_watches {
            return Err(PlatformError::Unsupported("pointer watch"));
        }
        let id = WatchId(self.next_id());
        self.watches.push((id, interval));
        Ok(id)
    }

    fn remove_pointer_watch(&mut self, id: WatchId) {
        self.watches.retain(|(w, _)| *w != id);
    }

    fn pointer_position(&self) -> Point {
        self.pointer
    }

    fn focus_user_time(&self) -> u32 {
        self.user_time
    }

    fn modal_count(&self) -> u32 {
        self.modal_count
    }
}

impl ShellState for FakePlatform {
    fn overview_visible(&self) -> bool {
        self.overview_visible
    }

    fn overview_visible_target(&self) -> bool {
        self.overview_target
    }
}

impl ShellHooks for FakePlatform {
    fn install_dash(&mut self, main_monitor: usize) {
        self.dash_installed = Some(main_monitor);
    }

    fn restore_dash(&mut self) {
        self.dash_installed = None;
    }

    fn set_panel_corners_visible(&mut self, visible: bool) {
        self.panel_corners_visible = visible;
    }

    fn set_isolated_activation(&mut self, enabled: bool) {
        self.isolated_activation = enabled;
    }

    fn add_keybinding(&mut self, name: &str) -> bool {
        if self.rejected_keybindings.iter().any(|k| k == name) {
            return false;
        }
        self.keybindings.push(name.to_string());
        true
    }

    fn remove_keybinding(&mut self, name: &str) {
        self.keybindings.retain(|k| k != name);
    }

    fn register_accessibility_group(&mut self, monitor: usize) {
        self.accessibility.push(monitor);
    }

    fn unregister_accessibility_group(&mut self, monitor: usize) {
        self.accessibility.retain(|m| *m != monitor);
    }

    fn switch_workspace(&mut self, direction: WorkspaceDirection) {
        self.workspace_switches.push(direction);
    }
}

impl DockFactory for FakePlatform {
    fn create_dock(&mut self, _monitor: &Monitor, _side: Side) -> DockParts {
        self.make_parts().0
    }
}

/// Single dock driven without a manager
pub struct Harness {
    pub platform: FakePlatform,
    pub settings: DockSettings,
    pub outbox: Vec<DockNotification>,
}

impl Harness {
    pub fn new(settings: DockSettings) -> Self {
        Self {
            platform: FakePlatform::default(),
            settings,
            outbox: Vec::new(),
        }
    }

    pub fn ctx(&mut self) -> DockContext<'_> {
        DockContext {
            settings: &self.settings,
            platform: &mut self.platform,
            outbox: &mut self.outbox,
        }
    }

    /// Move the clock forward, firing due timers in order
    pub fn advance(&mut self, dock: &mut DockedDash, by: Duration) {
        let until = self.platform.now + by;
        while let Some(id) = self.platform.pop_due(until) {
            dock.handle_timer(id, &mut self.ctx());
        }
        self.platform.now = until;
    }
}
