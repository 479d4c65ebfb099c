use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::edge;
use super::state::{DockModes, VisibilityState};
use super::timers::{DockTimer, DockTimers};
use super::{setting_action, DockAction, DockContext};
use crate::animation::{AnimationKind, IconAnimator, IconId, SlideTransition};
use crate::collaborators::{DockActor, DockParts, Launcher, OverlapMonitor};
use crate::config::{ScrollAction, SettingKey};
use crate::geometry::{DockGeometry, Monitor, Point, Rect, Side, Size};
use crate::messages::DockNotification;
use crate::platform::{BarrierId, TimerId, TrackOptions, WatchId, WorkspaceDirection};
use crate::signals::{Signal, SignalRegistry};
use crate::slide::SlideContainer;

/// Pointer sampling interval of the dwell fallback
const DWELL_CHECK_INTERVAL: Duration = Duration::from_millis(100);
/// Barrier is kept this long after showing so the pointer does not
/// overshoot the dock and re-hide it immediately
const BARRIER_GRACE: Duration = Duration::from_millis(100);
const PRESSURE_POLL_INTERVAL: Duration = Duration::from_millis(250);
const SCROLL_DEAD_TIME: Duration = Duration::from_millis(250);

const SCROLL_LABEL: &str = "scroll-workspace-switch";

#[derive(Debug, Clone, Copy, PartialEq)]
struct PressureConfig {
    threshold: f64,
    timeout: Duration,
}

#[derive(Debug, Default)]
struct Dwell {
    watch: Option<WatchId>,
    dwelling: bool,
    user_time: u32,
}

/// Status of one dock, as reported over IPC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockSnapshot {
    pub monitor: usize,
    pub side: Side,
    pub state: VisibilityState,
    pub slide_x: f64,
    pub modes: DockModes,
    pub main: bool,
}

/// Per-monitor dock: visibility state machine plus layout and edge sensing.
///
/// State only changes through show/hide requests and the completion of
/// the slide transition they start. Every timer is owned by `timers` and
/// every host registration (barrier, pointer watch, tracking) is undone
/// by [`DockedDash::destroy`].
pub struct DockedDash {
    monitor: Monitor,
    side: Side,
    is_main: bool,

    state: VisibilityState,
    slider: SlideContainer,
    transition: Option<SlideTransition>,
    delayed_hide: bool,

    modes: DockModes,
    hover: bool,
    ignore_hover: bool,
    old_ignore_hover: Option<bool>,

    geometry: DockGeometry,
    static_box: Rect,

    can_use_pressure: bool,
    pressure: Option<PressureConfig>,
    barrier: Option<BarrierId>,
    dwell: Dwell,
    /// Pointer entered the retracted dock; counts as hover once it is shown
    edge_hover: bool,
    scroll_delta: f64,

    timers: DockTimers,
    signals: SignalRegistry<DockAction>,
    icon_animator: IconAnimator,

    actor: Box<dyn DockActor>,
    launcher: Box<dyn Launcher>,
    overlap: Box<dyn OverlapMonitor>,
}

impl DockedDash {
    /// Create the dock for `monitor` and bring it to its initial state
    pub fn new(
        monitor: Monitor,
        side: Side,
        parts: DockParts,
        is_main: bool,
        ctx: &mut DockContext<'_>,
    ) -> Self {
        let mut slider = SlideContainer::new(side);
        slider.set_slideout_size(ctx.settings.slideout_size);

        let DockParts {
            actor,
            launcher,
            overlap,
        } = parts;

        let mut dock = Self {
            monitor,
            side,
            is_main,
            state: VisibilityState::Hidden,
            slider,
            transition: None,
            delayed_hide: false,
            modes: DockModes::default(),
            hover: false,
            ignore_hover: false,
            old_ignore_hover: None,
            geometry: DockGeometry::default(),
            static_box: Rect::default(),
            can_use_pressure: false,
            pressure: None,
            barrier: None,
            dwell: Dwell::default(),
            edge_hover: false,
            scroll_delta: 0.0,
            timers: DockTimers::default(),
            signals: SignalRegistry::new(),
            icon_animator: IconAnimator::new(),
            actor,
            launcher,
            overlap,
        };

        info!(
            "Creating {} dock on monitor {}{}",
            side.as_str(),
            dock.monitor.index,
            if is_main { " (main)" } else { "" }
        );

        dock.bind_signals();
        dock.actor.set_style_class(side.as_str(), true);
        dock.actor.set_slide(&dock.slider);
        dock.launcher.set_icon_size(ctx.settings.dash_max_icon_size);
        dock.overlap.set_mode(ctx.settings.intellihide_mode);
        dock.track(ctx);
        dock.reset_position(ctx);

        if is_main {
            ctx.platform.register_accessibility_group(dock.monitor.index);
        }
        dock.update_scroll_action(ctx);
        dock.initialize(ctx);
        dock
    }

    fn bind_signals(&mut self) {
        use DockAction as A;

        let keys = [
            SettingKey::DockFixed,
            SettingKey::Autohide,
            SettingKey::Intellihide,
            SettingKey::IntellihideMode,
            SettingKey::AutohideInFullscreen,
            SettingKey::ExtendHeight,
            SettingKey::HeightFraction,
            SettingKey::RequirePressureToShow,
            SettingKey::PressureThreshold,
            SettingKey::ShowDelay,
            SettingKey::DashMaxIconSize,
            SettingKey::ShowFavorites,
            SettingKey::ShowRunning,
            SettingKey::SlideoutSize,
            SettingKey::ScrollAction,
        ];
        for key in keys {
            if let Some(action) = setting_action(key) {
                self.signals.add(Signal::SettingChanged(key), action);
            }
        }

        self.signals.add(Signal::WorkAreasChanged, A::ResetPosition);
        self.signals.add(Signal::WorkAreasChanged, A::UpdateBarrier);
        self.signals.add(Signal::FullscreenChanged, A::UpdateBarrier);
        self.signals.add(Signal::OverlapChanged, A::UpdateDashVisibility);
        self.signals.add(Signal::MenuClosed, A::SyncHover);
        self.signals.add(Signal::RequiresVisibility, A::UpdateDashVisibility);
        self.signals.add(Signal::LauncherResized, A::UpdateStaticBox);
        self.signals.add(Signal::DragBegin, A::DragStart);
        self.signals.add(Signal::DragEnd, A::DragEnd);
        self.signals.add(Signal::OverviewShowing, A::OverviewShowing);
        self.signals.add(Signal::OverviewHiding, A::OverviewHiding);
        self.signals.add(Signal::OverviewHidden, A::OverviewHidden);
    }

    fn initialize(&mut self, ctx: &mut DockContext<'_>) {
        self.update_visibility_mode(ctx);

        // The overview may already be open, e.g. when docks are rebuilt from it
        if ctx.platform.overview_visible_target() {
            self.on_overview_showing(ctx);
        }

        self.update_pressure_barrier(ctx);
        self.update_barrier(ctx);
        self.setup_dock_dwell_if_needed(ctx);
    }

    // =========== Accessors ===========

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn monitor_index(&self) -> usize {
        self.monitor.index
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_main(&self) -> bool {
        self.is_main
    }

    pub fn dock_state(&self) -> VisibilityState {
        self.state
    }

    pub fn slide_x(&self) -> f64 {
        self.slider.slide_x()
    }

    pub fn modes(&self) -> DockModes {
        self.modes
    }

    pub fn geometry(&self) -> &DockGeometry {
        &self.geometry
    }

    /// Footprint of the dock when fully shown
    pub fn static_box(&self) -> Rect {
        self.static_box
    }

    pub fn barrier(&self) -> Option<BarrierId> {
        self.barrier
    }

    pub fn dwell_watch(&self) -> Option<WatchId> {
        self.dwell.watch
    }

    pub fn can_use_pressure(&self) -> bool {
        self.can_use_pressure
    }

    pub fn is_hide_deferred(&self) -> bool {
        self.delayed_hide
    }

    pub fn ignores_hover(&self) -> bool {
        self.ignore_hover
    }

    pub fn signals(&self) -> &SignalRegistry<DockAction> {
        &self.signals
    }

    /// Wiring added by features; removed by label
    pub fn signals_mut(&mut self) -> &mut SignalRegistry<DockAction> {
        &mut self.signals
    }

    pub fn launcher_mut(&mut self) -> &mut dyn Launcher {
        self.launcher.as_mut()
    }

    /// True while a slide or an icon animation needs frames
    pub fn wants_frames(&self) -> bool {
        self.transition.is_some() || self.icon_animator.is_running()
    }

    pub fn snapshot(&self) -> DockSnapshot {
        DockSnapshot {
            monitor: self.monitor.index,
            side: self.side,
            state: self.state,
            slide_x: self.slider.slide_x(),
            modes: self.modes,
            main: self.is_main,
        }
    }

    // =========== Dispatch ===========

    /// Run every handler connected to `signal`
    pub fn emit(&mut self, signal: Signal, ctx: &mut DockContext<'_>) {
        for action in self.signals.handlers(signal) {
            self.run(action, ctx);
        }
    }

    fn run(&mut self, action: DockAction, ctx: &mut DockContext<'_>) {
        match action {
            DockAction::ResetPosition => self.reset_position(ctx),
            DockAction::UpdateBarrier => self.update_barrier(ctx),
            DockAction::UpdateDashVisibility => self.update_dash_visibility(ctx),
            DockAction::UpdateVisibilityMode => self.update_visibility_mode(ctx),
            DockAction::UpdateStaticBox => self.update_static_box(ctx),
            DockAction::SyncHover => self.hover_changed(ctx),
            DockAction::DragStart => self.on_drag_start(ctx),
            DockAction::DragEnd => self.on_drag_end(ctx),
            DockAction::OverviewShowing => self.on_overview_showing(ctx),
            DockAction::OverviewHiding => self.on_overview_hiding(ctx),
            DockAction::OverviewHidden => self.actor.set_style_class("overview", false),
            DockAction::FixedChanged => {
                self.untrack(ctx);
                self.track(ctx);
                self.reset_position(ctx);
                self.update_barrier(ctx);
                self.update_visibility_mode(ctx);
            }
            DockAction::AutohideChanged => {
                self.update_visibility_mode(ctx);
                self.update_barrier(ctx);
            }
            DockAction::IntellihideModeChanged => {
                let changed = self.overlap.set_mode(ctx.settings.intellihide_mode);
                if self.overlap.force_update() || changed {
                    self.update_dash_visibility(ctx);
                }
            }
            DockAction::RebuildDwell => {
                self.remove_dwell_watch(ctx);
                self.setup_dock_dwell_if_needed(ctx);
                self.update_barrier(ctx);
            }
            DockAction::RebuildPressure => {
                self.update_pressure_barrier(ctx);
                self.update_barrier(ctx);
            }
            DockAction::SetIconSize => self.launcher.set_icon_size(ctx.settings.dash_max_icon_size),
            DockAction::ResetAppIcons => self.launcher.reset_app_icons(),
            DockAction::UpdateSlideout => {
                self.slider.set_slideout_size(ctx.settings.slideout_size);
                self.actor.set_slide(&self.slider);
            }
            DockAction::UpdateScrollAction => self.update_scroll_action(ctx),
            DockAction::ScrollWorkspace => self.scroll_workspace(ctx),
            DockAction::QueueRedisplay => self.launcher.queue_redisplay(),
        }
    }

    /// Handle an expired timer; false if it is not one of ours
    pub fn handle_timer(&mut self, id: TimerId, ctx: &mut DockContext<'_>) -> bool {
        let Some(kind) = self.timers.fire(id) else {
            return false;
        };

        match kind {
            DockTimer::Slide => self.finish_transition(ctx),
            DockTimer::RemoveBarrier => self.remove_barrier(ctx),
            DockTimer::Dwell => self.dwell_timeout(ctx),
            DockTimer::PressurePoll => self.poll_pressure(ctx),
            DockTimer::ScrollDeadTime => {}
            DockTimer::NumberOverlay => {
                self.launcher.set_number_overlay(false);
                // Hide the dock again if it was only shown for the overlay
                self.update_dash_visibility(ctx);
            }
        }
        true
    }

    /// Advance running animations to the current time
    pub fn frame(&mut self, ctx: &mut DockContext<'_>) {
        let now = ctx.platform.now();

        if let Some(transition) = self.transition {
            self.slider.set_slide_x(transition.value_at(now));
            self.actor.set_slide(&self.slider);
        }

        for (icon, rotation) in self.icon_animator.frame(now) {
            self.launcher.apply_icon_rotation(icon, rotation);
        }
    }

    // =========== Show / hide ===========

    fn set_state(&mut self, state: VisibilityState, ctx: &mut DockContext<'_>) {
        if self.state == state {
            return;
        }
        debug!(
            "Dock {}: {} -> {}",
            self.monitor.index,
            self.state.as_str(),
            state.as_str()
        );
        self.state = state;
        ctx.outbox.push(DockNotification::StateChanged {
            monitor: self.monitor.index,
            state,
        });
    }

    pub fn request_show(&mut self, ctx: &mut DockContext<'_>) {
        self.delayed_hide = false;

        if matches!(self.state, VisibilityState::Hidden | VisibilityState::Hiding) {
            if self.state == VisibilityState::Hiding {
                // Drop queued transitions, showing always wins
                self.remove_animations(ctx);
            }

            ctx.outbox.push(DockNotification::Showing {
                monitor: self.monitor.index,
            });
            self.animate_in(ctx.settings.animation_time(), Duration::ZERO, ctx);
        }
    }

    pub fn request_hide(&mut self, ctx: &mut DockContext<'_>) {
        match self.state {
            VisibilityState::Showing => {
                // Let the running show finish, then hide
                self.delayed_hide = true;
            }
            VisibilityState::Shown => {
                ctx.outbox.push(DockNotification::Hiding {
                    monitor: self.monitor.index,
                });
                self.animate_out(ctx.settings.animation_time(), ctx.settings.hide_delay(), ctx);
            }
            VisibilityState::Hidden | VisibilityState::Hiding => {}
        }
    }

    /// Show requested by the visibility policy
    fn force_show(&mut self, ctx: &mut DockContext<'_>) {
        match self.state {
            VisibilityState::Shown | VisibilityState::Showing => self.delayed_hide = false,
            VisibilityState::Hidden | VisibilityState::Hiding => {
                self.remove_animations(ctx);
                self.animate_in(ctx.settings.animation_time(), Duration::ZERO, ctx);
            }
        }
    }

    /// Hide requested by the visibility policy
    fn policy_hide(&mut self, ctx: &mut DockContext<'_>) {
        match self.state {
            VisibilityState::Showing => self.delayed_hide = true,
            VisibilityState::Shown => {
                self.animate_out(ctx.settings.animation_time(), Duration::ZERO, ctx)
            }
            VisibilityState::Hidden | VisibilityState::Hiding => {}
        }
    }

    fn animate_in(&mut self, time: Duration, delay: Duration, ctx: &mut DockContext<'_>) {
        self.delayed_hide = false;

        let settled = self.state == VisibilityState::Shown && self.transition.is_none();
        let heading_in = self.transition.is_some_and(|t| t.to >= 1.0);
        if settled || heading_in {
            return;
        }

        self.set_state(VisibilityState::Showing, ctx);
        self.icon_animator.start(ctx.platform.now());
        self.start_transition(1.0, time, delay, ctx);
    }

    fn animate_out(&mut self, time: Duration, delay: Duration, ctx: &mut DockContext<'_>) {
        let settled = self.state == VisibilityState::Hidden && self.transition.is_none();
        let heading_out = self.transition.is_some_and(|t| t.to <= 0.0);
        if settled || heading_out {
            return;
        }

        self.set_state(VisibilityState::Hiding, ctx);
        self.start_transition(0.0, time, delay, ctx);
    }

    fn start_transition(&mut self, to: f64, time: Duration, delay: Duration, ctx: &mut DockContext<'_>) {
        let now = ctx.platform.now();
        self.transition = Some(SlideTransition::new(self.slider.slide_x(), to, now, delay, time));
        self.timers.arm(ctx.platform, DockTimer::Slide, delay + time);
    }

    /// Stop the running transition where it is
    fn remove_animations(&mut self, ctx: &mut DockContext<'_>) {
        self.timers.cancel(ctx.platform, DockTimer::Slide);
        if let Some(transition) = self.transition.take() {
            self.slider.set_slide_x(transition.value_at(ctx.platform.now()));
            self.actor.set_slide(&self.slider);
        }
    }

    fn finish_transition(&mut self, ctx: &mut DockContext<'_>) {
        let Some(transition) = self.transition.take() else {
            return;
        };
        self.slider.set_slide_x(transition.to);
        self.actor.set_slide(&self.slider);

        if transition.to >= 1.0 {
            self.on_shown(ctx);
        } else {
            self.on_hidden(ctx);
        }
    }

    fn on_shown(&mut self, ctx: &mut DockContext<'_>) {
        self.timers.cancel(ctx.platform, DockTimer::RemoveBarrier);

        // The pointer is already inside, no enter event will follow
        if std::mem::take(&mut self.edge_hover) {
            self.hover = true;
        }

        if self.delayed_hide {
            self.delayed_hide = false;
            self.state = VisibilityState::Shown;
            self.request_hide(ctx);
        } else {
            self.set_state(VisibilityState::Shown, ctx);
            // Release the pointer so it can reach the monitor behind the dock
            self.timers.arm(ctx.platform, DockTimer::RemoveBarrier, BARRIER_GRACE);
        }
    }

    fn on_hidden(&mut self, ctx: &mut DockContext<'_>) {
        self.set_state(VisibilityState::Hidden, ctx);
        self.timers.cancel(ctx.platform, DockTimer::RemoveBarrier);
        self.update_barrier(ctx);

        self.icon_animator.pause();
        for icon in self.icon_animator.icons() {
            self.launcher.apply_icon_rotation(icon, 0.0);
        }
    }

    // =========== Visibility policy ===========

    fn update_visibility_mode(&mut self, ctx: &mut DockContext<'_>) {
        self.modes = DockModes::from_settings(ctx.settings);
        self.actor.set_style_class("autohide", self.modes.autohide);

        if self.modes.intellihide {
            self.overlap.enable();
        } else {
            self.overlap.disable();
        }

        self.update_dash_visibility(ctx);
    }

    /// Show or hide from, in order of priority: overview, fixed mode,
    /// intellihide, autohide
    pub fn update_dash_visibility(&mut self, ctx: &mut DockContext<'_>) {
        if ctx.platform.overview_visible_target() {
            self.force_show(ctx);
            return;
        }

        let requires_visibility = self.launcher.requires_visibility();

        if self.modes.fixed {
            self.force_show(ctx);
        } else if self.modes.intellihide {
            if !requires_visibility && self.overlap.overlap_status() {
                self.ignore_hover = false;
                // Keep the dock while the pointer is on it in autohide mode
                if !self.hover || !self.modes.autohide {
                    self.policy_hide(ctx);
                }
            } else {
                self.ignore_hover = true;
                self.force_show(ctx);
            }
        } else if self.modes.autohide {
            self.ignore_hover = false;
            if self.hover || requires_visibility {
                self.force_show(ctx);
            } else {
                self.policy_hide(ctx);
            }
        } else {
            self.policy_hide(ctx);
        }
    }

    pub fn set_hover(&mut self, hovered: bool, ctx: &mut DockContext<'_>) {
        // Reaching the retracted dock goes through the dwell delay like the edge does
        if hovered && self.senses_edge_by_dwell() {
            self.edge_hover = true;
            return;
        }
        self.edge_hover = false;

        if self.hover == hovered {
            return;
        }
        self.hover = hovered;
        self.hover_changed(ctx);
    }

    fn senses_edge_by_dwell(&self) -> bool {
        self.state == VisibilityState::Hidden
            && self.dwell.watch.is_some()
            && self.modes.autohide
            && !self.ignore_hover
            && !self.hover
    }

    fn hover_changed(&mut self, ctx: &mut DockContext<'_>) {
        // Hover only matters in autohide mode, intellihide may be keeping the dock up
        if self.ignore_hover || !self.modes.autohide {
            return;
        }

        if self.hover {
            self.request_show(ctx);
        } else {
            self.request_hide(ctx);
        }
    }

    fn on_overview_showing(&mut self, ctx: &mut DockContext<'_>) {
        self.actor.set_style_class("overview", true);
        self.ignore_hover = true;
        self.overlap.disable();
        self.force_show(ctx);
    }

    fn on_overview_hiding(&mut self, ctx: &mut DockContext<'_>) {
        self.ignore_hover = false;
        if self.modes.intellihide {
            self.overlap.enable();
        }
        self.update_dash_visibility(ctx);
    }

    fn on_drag_start(&mut self, ctx: &mut DockContext<'_>) {
        self.old_ignore_hover = Some(self.ignore_hover);
        self.ignore_hover = true;
        self.animate_in(ctx.settings.animation_time(), Duration::ZERO, ctx);
    }

    fn on_drag_end(&mut self, ctx: &mut DockContext<'_>) {
        if let Some(old) = self.old_ignore_hover.take() {
            self.ignore_hover = old;
        }
        self.hover_changed(ctx);
    }

    // =========== Layout ===========

    fn track(&mut self, ctx: &mut DockContext<'_>) {
        let options = TrackOptions::for_fixed(ctx.settings.dock_fixed);
        ctx.platform.track_dock(self.monitor.index, options);
    }

    fn untrack(&mut self, ctx: &mut DockContext<'_>) {
        ctx.platform.untrack_dock(self.monitor.index);
    }

    fn reset_position(&mut self, ctx: &mut DockContext<'_>) {
        self.update_visibility_mode(ctx);

        let settings = ctx.settings;
        self.actor.set_style_class("fixed", settings.dock_fixed);

        let work_area = ctx.platform.work_area(self.monitor.index);
        self.geometry = DockGeometry::compute(
            self.side,
            &self.monitor.rect,
            &work_area,
            settings.height_fraction,
            settings.extend_height,
        );
        self.actor.set_geometry(&self.geometry);
        self.actor.set_style_class("extended", settings.extend_height);

        let max_size = if self.side.is_horizontal() {
            Size::new(self.geometry.length, self.monitor.rect.height)
        } else {
            Size::new(self.monitor.rect.width, self.geometry.length)
        };
        self.launcher.set_max_size(max_size);

        self.update_static_box(ctx);
    }

    fn update_static_box(&mut self, ctx: &mut DockContext<'_>) {
        self.static_box =
            self.geometry
                .static_box(self.side, &self.monitor.rect, self.launcher.natural_size());

        if self.overlap.update_target_box(self.static_box) {
            self.update_dash_visibility(ctx);
        }
    }

    // =========== Pressure barrier ===========

    fn update_pressure_barrier(&mut self, ctx: &mut DockContext<'_>) {
        self.can_use_pressure = ctx.platform.supports_pressure_barriers();
        self.remove_barrier(ctx);

        self.pressure = self.can_use_pressure.then(|| PressureConfig {
            threshold: ctx.settings.pressure_threshold,
            timeout: ctx.settings.show_delay(),
        });
    }

    fn remove_barrier(&mut self, ctx: &mut DockContext<'_>) {
        self.timers.cancel(ctx.platform, DockTimer::RemoveBarrier);
        if let Some(id) = self.barrier.take() {
            debug!("Dock {}: removing pressure barrier", self.monitor.index);
            ctx.platform.remove_pressure_barrier(id);
        }
    }

    fn fullscreen_blocks(&self, ctx: &DockContext<'_>) -> bool {
        !ctx.settings.autohide_in_fullscreen && ctx.platform.in_fullscreen(self.monitor.index)
    }

    fn update_barrier(&mut self, ctx: &mut DockContext<'_>) {
        self.remove_barrier(ctx);

        // A barrier on a fullscreen monitor would trap the pointer
        if self.fullscreen_blocks(ctx) {
            return;
        }

        let Some(pressure) = self.pressure else {
            return;
        };
        if !self.can_use_pressure
            || !self.modes.autohide
            || !ctx.settings.require_pressure_to_show
            || self.state != VisibilityState::Hidden
        {
            return;
        }

        let work_area = ctx.platform.work_area(self.monitor.index);
        let spec = edge::barrier_spec(
            self.side,
            &self.monitor.rect,
            &work_area,
            pressure.threshold,
            pressure.timeout,
        );

        match ctx.platform.add_pressure_barrier(spec) {
            Ok(id) => {
                debug!("Dock {}: pressure barrier {:?}", self.monitor.index, id);
                self.barrier = Some(id);
            }
            Err(e) => {
                warn!(
                    "Pressure barrier unavailable on monitor {}: {}, falling back to dwell",
                    self.monitor.index, e
                );
                self.can_use_pressure = false;
                self.pressure = None;
                self.setup_dock_dwell_if_needed(ctx);
            }
        }
    }

    /// Barrier hit reported by the host; false if the barrier is not ours
    pub fn pressure_triggered(&mut self, id: BarrierId, ctx: &mut DockContext<'_>) -> bool {
        if self.barrier != Some(id) {
            return false;
        }
        if !self.fullscreen_blocks(ctx) {
            self.on_pressure_sensed(ctx);
        }
        true
    }

    fn on_pressure_sensed(&mut self, ctx: &mut DockContext<'_>) {
        if ctx.platform.overview_visible_target() {
            return;
        }

        // The pointer may leave before ever hovering the dock, in which case
        // no leave event comes and the dock would stay up forever
        self.timers.arm(ctx.platform, DockTimer::PressurePoll, PRESSURE_POLL_INTERVAL);
        self.request_show(ctx);
    }

    fn poll_pressure(&mut self, ctx: &mut DockContext<'_>) {
        let pointer = ctx.platform.pointer_position();
        if edge::pointer_in_dock_region(self.side, &self.monitor.rect, &self.static_box, pointer) {
            self.timers.arm(ctx.platform, DockTimer::PressurePoll, PRESSURE_POLL_INTERVAL);
        } else {
            self.hover_changed(ctx);
        }
    }

    // =========== Dwell fallback ===========

    fn setup_dock_dwell_if_needed(&mut self, ctx: &mut DockContext<'_>) {
        let needed = !ctx.platform.supports_pressure_barriers()
            || !self.can_use_pressure
            || !ctx.settings.require_pressure_to_show;
        if !needed {
            return;
        }

        if self.dwell.watch.is_none() {
            match ctx.platform.add_pointer_watch(DWELL_CHECK_INTERVAL) {
                Ok(id) => self.dwell.watch = Some(id),
                Err(e) => warn!(
                    "Pointer watch unavailable on monitor {}: {}, edge sensing disabled",
                    self.monitor.index, e
                ),
            }
        }
        self.dwell.dwelling = false;
        self.dwell.user_time = 0;
    }

    fn remove_dwell_watch(&mut self, ctx: &mut DockContext<'_>) {
        self.timers.cancel(ctx.platform, DockTimer::Dwell);
        if let Some(id) = self.dwell.watch.take() {
            ctx.platform.remove_pointer_watch(id);
        }
    }

    /// Pointer sample from a watch; false if the watch is not ours
    pub fn pointer_moved(&mut self, watch: WatchId, position: Point, ctx: &mut DockContext<'_>) -> bool {
        if self.dwell.watch != Some(watch) {
            return false;
        }
        self.check_dock_dwell(position, ctx);
        true
    }

    fn check_dock_dwell(&mut self, position: Point, ctx: &mut DockContext<'_>) {
        let work_area = ctx.platform.work_area(self.monitor.index);

        if edge::should_dwell(self.side, &self.monitor.rect, &work_area, position) {
            // One attempt per approach: the pointer has to leave the edge before retrying
            if !self.dwell.dwelling && !self.hover && !self.timers.is_pending(DockTimer::Dwell) {
                self.dwell.user_time = ctx.platform.focus_user_time();
                self.timers
                    .arm(ctx.platform, DockTimer::Dwell, ctx.settings.show_delay());
            }
            self.dwell.dwelling = true;
        } else {
            self.timers.cancel(ctx.platform, DockTimer::Dwell);
            self.dwell.dwelling = false;
        }
    }

    fn dwell_timeout(&mut self, ctx: &mut DockContext<'_>) {
        if self.fullscreen_blocks(ctx) {
            return;
        }

        // The overview holds one modal grab of its own
        let allowed_modals = if ctx.platform.overview_visible() { 1 } else { 0 };
        if ctx.platform.modal_count() > allowed_modals {
            return;
        }

        // The user clicked or typed in the focused window since the dwell started
        if ctx.platform.focus_user_time() != self.dwell.user_time {
            return;
        }

        self.on_pressure_sensed(ctx);
    }

    // =========== Scroll ===========

    fn update_scroll_action(&mut self, ctx: &mut DockContext<'_>) {
        self.signals.remove_with_label(SCROLL_LABEL);

        if ctx.settings.scroll_action == ScrollAction::SwitchWorkspace {
            self.signals
                .add_with_label(SCROLL_LABEL, Signal::Scroll, DockAction::ScrollWorkspace);
        } else {
            self.timers.cancel(ctx.platform, DockTimer::ScrollDeadTime);
        }
    }

    /// Scroll over the dock; negative `dy` is up
    pub fn scroll(&mut self, dy: f64, ctx: &mut DockContext<'_>) {
        self.scroll_delta = dy;
        self.emit(Signal::Scroll, ctx);
    }

    fn scroll_workspace(&mut self, ctx: &mut DockContext<'_>) {
        if ctx.platform.overview_visible() {
            return;
        }

        let direction = if self.scroll_delta < 0.0 {
            WorkspaceDirection::Previous
        } else if self.scroll_delta > 0.0 {
            WorkspaceDirection::Next
        } else {
            return;
        };

        // Touchpads emit bursts of small deltas
        if self.timers.is_pending(DockTimer::ScrollDeadTime) {
            return;
        }
        self.timers.arm(ctx.platform, DockTimer::ScrollDeadTime, SCROLL_DEAD_TIME);
        ctx.platform.switch_workspace(direction);
    }

    // =========== Launcher ===========

    /// Activate the launcher app at `index`, counting from 0
    pub fn activate_app(&mut self, index: usize) -> bool {
        if index >= self.launcher.app_count() {
            return false;
        }
        self.launcher.activate_app(index)
    }

    /// Number overlay and temporary show after a shortcut press
    pub fn show_shortcut_overlay(&mut self, ctx: &mut DockContext<'_>) {
        if ctx.settings.hotkeys_overlay {
            self.launcher.set_number_overlay(true);
        }

        // Pressing again restarts the countdown
        self.timers
            .arm(ctx.platform, DockTimer::NumberOverlay, ctx.settings.shortcut_timeout());

        if ctx.settings.hotkeys_show_dock && (self.modes.intellihide || self.modes.autohide) {
            self.request_show(ctx);
        }
    }

    pub fn accessibility_focus(&mut self, ctx: &mut DockContext<'_>) {
        self.launcher.focus_first();
        self.animate_in(ctx.settings.animation_time(), Duration::ZERO, ctx);
    }

    pub fn icon_animation(
        &mut self,
        icon: IconId,
        kind: AnimationKind,
        active: bool,
        ctx: &mut DockContext<'_>,
    ) {
        if active {
            self.icon_animator.add_animation(icon, kind, ctx.platform.now());
        } else {
            self.icon_animator.remove_animation(icon, kind);
            self.launcher.apply_icon_rotation(icon, 0.0);
        }
    }

    // =========== Teardown ===========

    /// Undo every registration made by this dock
    pub fn destroy(mut self, ctx: &mut DockContext<'_>) {
        info!("Destroying dock on monitor {}", self.monitor.index);

        self.signals.clear();
        self.timers.cancel_all(ctx.platform);
        self.transition = None;

        self.remove_barrier(ctx);
        self.remove_dwell_watch(ctx);

        if self.is_main {
            ctx.platform.unregister_accessibility_group(self.monitor.index);
        }

        self.icon_animator.destroy();
        self.overlap.disable();
        self.untrack(ctx);
        self.actor.destroy();
    }
}
