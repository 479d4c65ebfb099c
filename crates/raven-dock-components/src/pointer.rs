use smallvec::SmallVec;
use std::cell::Cell;
use std::rc::Rc;

use raven_dock_core::geometry::Point;
use raven_dock_core::platform::WatchId;
use raven_dock_core::DockEvent;

/// Reported while the cursor position is unknown; outside every monitor
pub const POINTER_UNKNOWN: Point = Point::new(i32::MIN, i32::MIN);

/// Cursor position shared with the dock windows, plus the active watches.
///
/// Dock windows only see the pointer while it is over them, so they clear
/// the position on leave. Compositor samples fill it in again and are the
/// only source of watch updates.
#[derive(Debug, Default)]
pub struct PointerTracker {
    position: Rc<Cell<Option<Point>>>,
    watches: SmallVec<[WatchId; 4]>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell written by the dock windows' motion controllers
    pub fn shared(&self) -> Rc<Cell<Option<Point>>> {
        self.position.clone()
    }

    pub fn position(&self) -> Point {
        self.position.get().unwrap_or(POINTER_UNKNOWN)
    }

    pub fn has_watches(&self) -> bool {
        !self.watches.is_empty()
    }

    /// True if this is the first watch, so sampling has to start
    pub fn add_watch(&mut self, watch: WatchId) -> bool {
        self.watches.push(watch);
        self.watches.len() == 1
    }

    /// True if the last watch went away, so sampling can stop
    pub fn remove_watch(&mut self, watch: WatchId) -> bool {
        let before = self.watches.len();
        self.watches.retain(|w| *w != watch);
        before != self.watches.len() && self.watches.is_empty()
    }

    /// Take a compositor sample; one event per watch
    pub fn cursor_moved(&self, position: Point) -> SmallVec<[DockEvent; 4]> {
        self.position.set(Some(position));
        self.watches
            .iter()
            .map(|&watch| DockEvent::PointerMoved { watch, position })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raven_dock_core::dock::pointer_in_dock_region;
    use raven_dock_core::geometry::{Rect, Side};

    #[test]
    fn leaving_the_dock_forgets_the_position() {
        let tracker = PointerTracker::new();
        let cell = tracker.shared();
        let monitor = Rect::new(0, 0, 1920, 1080);
        let static_box = Rect::new(720, 1016, 480, 64);

        // Motion over the dock, then leave along the edge row
        cell.set(Some(Point::new(900, 1079)));
        assert!(pointer_in_dock_region(Side::Bottom, &monitor, &static_box, tracker.position()));

        cell.set(None);
        assert_eq!(tracker.position(), POINTER_UNKNOWN);
        assert!(!pointer_in_dock_region(Side::Bottom, &monitor, &static_box, tracker.position()));
    }

    #[test]
    fn samples_go_to_every_watch() {
        let mut tracker = PointerTracker::new();
        assert!(tracker.cursor_moved(Point::new(1, 1)).is_empty());

        assert!(tracker.add_watch(WatchId(1)));
        assert!(!tracker.add_watch(WatchId(2)));

        let events = tracker.cursor_moved(Point::new(900, 500));
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            DockEvent::PointerMoved { watch: WatchId(2), position } if position == Point::new(900, 500)
        ));
        assert_eq!(tracker.position(), Point::new(900, 500));
    }

    #[test]
    fn sampling_stops_with_the_last_watch() {
        let mut tracker = PointerTracker::new();
        tracker.add_watch(WatchId(1));
        tracker.add_watch(WatchId(2));

        assert!(!tracker.remove_watch(WatchId(1)));
        assert!(!tracker.remove_watch(WatchId(1)));
        assert!(tracker.remove_watch(WatchId(2)));
        assert!(!tracker.has_watches());
    }
}
