//! Host services the dock runs on.
//!
//! Everything the state machine needs from the compositor goes through
//! these traits, so the core never talks to a toolkit directly. Callbacks
//! (timer expiry, barrier hits, pointer samples) come back as
//! [`DockEvent`](crate::messages::DockEvent)s carrying the ids handed out here.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::collaborators::DockParts;
use crate::error::PlatformError;
use crate::geometry::{Monitor, Point, Rect, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarrierId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatchId(pub u64);

/// Direction the pointer has to push through a barrier to build pressure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarrierDirection {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
}

/// Edge segment registered as a pressure barrier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierSpec {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub direction: BarrierDirection,
    /// Accumulated pointer distance that triggers the barrier
    pub threshold: f64,
    /// Window in which the pressure has to build up
    pub timeout: Duration,
}

/// How the layout tracks a dock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackOptions {
    pub affects_struts: bool,
    pub track_fullscreen: bool,
    pub affects_input_region: bool,
}

impl TrackOptions {
    pub fn for_fixed(fixed: bool) -> Self {
        if fixed {
            Self {
                affects_struts: true,
                track_fullscreen: true,
                affects_input_region: true,
            }
        } else {
            Self {
                affects_struts: false,
                track_fullscreen: false,
                affects_input_region: true,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceDirection {
    Previous,
    Next,
}

pub trait Clock {
    /// Monotonic time since an arbitrary origin
    fn now(&self) -> Duration;
}

/// Single-shot timers delivered back as `DockEvent::Timer`
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId;
    /// Cancelling an expired or unknown timer is a no-op
    fn cancel(&mut self, id: TimerId);
}

pub trait LayoutService {
    fn monitors(&self) -> &[Monitor];
    /// Position of the primary monitor in `monitors()`
    fn primary_monitor(&self) -> usize;
    fn work_area(&self, monitor: usize) -> Rect;
    fn in_fullscreen(&self, monitor: usize) -> bool;
    fn track_dock(&mut self, monitor: usize, options: TrackOptions);
    fn untrack_dock(&mut self, monitor: usize);
}

pub trait PointerService {
    fn supports_pressure_barriers(&self) -> bool;
    fn add_pressure_barrier(&mut self, spec: BarrierSpec) -> Result<BarrierId, PlatformError>;
    fn remove_pressure_barrier(&mut self, id: BarrierId);
    /// Sample the pointer every `interval` while the watch lives
    fn add_pointer_watch(&mut self, interval: Duration) -> Result<WatchId, PlatformError>;
    fn remove_pointer_watch(&mut self, id: WatchId);
    fn pointer_position(&self) -> Point;
    /// Last user interaction time of the focused window, 0 without one
    fn focus_user_time(&self) -> u32;
    /// Number of modal grabs currently held by the shell
    fn modal_count(&self) -> u32;
}

pub trait ShellState {
    fn overview_visible(&self) -> bool;
    /// Whether the overview is shown or about to be
    fn overview_visible_target(&self) -> bool;
}

/// Extension points into the rest of the shell
pub trait ShellHooks {
    /// Hand the overview's dash role to the dock on `main_monitor`
    fn install_dash(&mut self, main_monitor: usize);
    fn restore_dash(&mut self);
    fn set_panel_corners_visible(&mut self, visible: bool);
    /// Switch app activation to the workspace/monitor isolated policy
    fn set_isolated_activation(&mut self, enabled: bool);
    /// Returns false if the binding could not be registered
    fn add_keybinding(&mut self, name: &str) -> bool;
    fn remove_keybinding(&mut self, name: &str);
    fn register_accessibility_group(&mut self, monitor: usize);
    fn unregister_accessibility_group(&mut self, monitor: usize);
    fn switch_workspace(&mut self, direction: WorkspaceDirection);
}

pub trait DockFactory {
    fn create_dock(&mut self, monitor: &Monitor, side: Side) -> DockParts;
}

/// Everything a dock needs from its host
pub trait Platform:
    Clock + Scheduler + LayoutService + PointerService + ShellState + ShellHooks + DockFactory
{
}

impl<T> Platform for T where
    T: Clock + Scheduler + LayoutService + PointerService + ShellState + ShellHooks + DockFactory
{
}
