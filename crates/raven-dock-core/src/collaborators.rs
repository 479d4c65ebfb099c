use crate::animation::IconId;
use crate::config::IntellihideMode;
use crate::geometry::{DockGeometry, Rect, Size};
use crate::slide::SlideContainer;

/// The on-screen container of one dock
pub trait DockActor {
    /// Position and length of the container when fully shown
    fn set_geometry(&mut self, geometry: &DockGeometry);
    /// Current slide state; the actor lays its content out through it
    fn set_slide(&mut self, slider: &SlideContainer);
    fn set_style_class(&mut self, name: &str, enabled: bool);
    fn destroy(&mut self);
}

/// The icon list shown inside a dock
pub trait Launcher {
    /// Something in the launcher (an open menu, a drag) needs the dock visible
    fn requires_visibility(&self) -> bool;
    fn set_max_size(&mut self, size: Size);
    fn natural_size(&self) -> Size;
    fn app_count(&self) -> usize;
    /// Activate the app at `index` like a left click; false if out of range
    fn activate_app(&mut self, index: usize) -> bool;
    fn set_number_overlay(&mut self, visible: bool);
    fn reset_app_icons(&mut self);
    fn queue_redisplay(&mut self);
    /// Give keyboard focus to the first item
    fn focus_first(&mut self);
    fn apply_icon_rotation(&mut self, icon: IconId, degrees: f64);
    fn set_icon_size(&mut self, size: i32);
}

/// Tracks whether windows overlap the dock's shown footprint.
///
/// Every mutating call returns true when the overlap status changed.
pub trait OverlapMonitor {
    fn enable(&mut self) -> bool;
    fn disable(&mut self) -> bool;
    fn force_update(&mut self) -> bool;
    fn update_target_box(&mut self, target: Rect) -> bool;
    fn set_mode(&mut self, mode: IntellihideMode) -> bool;
    fn overlap_status(&self) -> bool;
}

/// Host objects backing one dock
pub struct DockParts {
    pub actor: Box<dyn DockActor>,
    pub launcher: Box<dyn Launcher>,
    pub overlap: Box<dyn OverlapMonitor>,
}
