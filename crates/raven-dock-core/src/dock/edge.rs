//! Screen-edge geometry used for pressure and dwell sensing.

use std::time::Duration;

use crate::geometry::{Point, Rect, Side};
use crate::platform::{BarrierDirection, BarrierSpec};

/// Barrier along the dock edge.
///
/// The segment spans the work area minus one pixel at each end so it does
/// not fight with hot corners.
pub fn barrier_spec(
    side: Side,
    monitor: &Rect,
    work_area: &Rect,
    threshold: f64,
    timeout: Duration,
) -> BarrierSpec {
    let (x1, y1, x2, y2, direction) = match side {
        Side::Left => {
            let x = monitor.x + 1;
            (x, work_area.y + 1, x, work_area.bottom() - 1, BarrierDirection::PositiveX)
        }
        Side::Right => {
            let x = monitor.right() - 1;
            (x, work_area.y + 1, x, work_area.bottom() - 1, BarrierDirection::NegativeX)
        }
        Side::Top => {
            let y = monitor.y;
            (work_area.x + 1, y, work_area.right() - 1, y, BarrierDirection::PositiveY)
        }
        Side::Bottom => {
            let y = monitor.bottom();
            (work_area.x + 1, y, work_area.right() - 1, y, BarrierDirection::NegativeY)
        }
    };

    BarrierSpec {
        x1,
        y1,
        x2,
        y2,
        direction,
        threshold,
        timeout,
    }
}

/// Whether the pointer sits on the dock's edge pixel row or column,
/// strictly inside the work area
pub fn should_dwell(side: Side, monitor: &Rect, work_area: &Rect, pos: Point) -> bool {
    let inside_x = pos.x > work_area.x && pos.x < work_area.right();
    let inside_y = pos.y > work_area.y && pos.y < work_area.bottom();

    match side {
        Side::Left => pos.x == monitor.x && inside_y,
        Side::Right => pos.x == monitor.right() - 1 && inside_y,
        Side::Top => pos.y == monitor.y && inside_x,
        Side::Bottom => pos.y == monitor.bottom() - 1 && inside_x,
    }
}

/// Whether the pointer is between the monitor edge and the inner edge of
/// the dock footprint
pub fn pointer_in_dock_region(side: Side, monitor: &Rect, static_box: &Rect, pos: Point) -> bool {
    let within_x = pos.x >= monitor.x && pos.x <= monitor.right();
    let within_y = pos.y >= monitor.y && pos.y <= monitor.bottom();

    match side {
        Side::Left => pos.x <= static_box.right() && within_x && within_y,
        Side::Right => pos.x >= static_box.x && within_x && within_y,
        Side::Top => pos.y <= static_box.bottom() && within_x && within_y,
        Side::Bottom => pos.y >= static_box.y && within_x && within_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONITOR: Rect = Rect::new(1920, 0, 1920, 1080);
    const WORK_AREA: Rect = Rect::new(1920, 32, 1920, 1048);

    #[test]
    fn bottom_barrier_sits_on_monitor_edge() {
        let spec = barrier_spec(Side::Bottom, &MONITOR, &WORK_AREA, 100.0, Duration::from_millis(250));

        assert_eq!((spec.x1, spec.x2), (1921, 3839));
        assert_eq!((spec.y1, spec.y2), (1080, 1080));
        assert_eq!(spec.direction, BarrierDirection::NegativeY);
        assert_eq!(spec.threshold, 100.0);
    }

    #[test]
    fn vertical_barriers_are_inset_into_work_area() {
        let left = barrier_spec(Side::Left, &MONITOR, &WORK_AREA, 50.0, Duration::ZERO);
        assert_eq!((left.x1, left.y1, left.x2, left.y2), (1921, 33, 1921, 1079));
        assert_eq!(left.direction, BarrierDirection::PositiveX);

        let right = barrier_spec(Side::Right, &MONITOR, &WORK_AREA, 50.0, Duration::ZERO);
        assert_eq!(right.x1, 3839);
        assert_eq!(right.direction, BarrierDirection::NegativeX);
    }

    #[test]
    fn dwell_edge_excludes_work_area_corners() {
        assert!(should_dwell(Side::Left, &MONITOR, &WORK_AREA, Point::new(1920, 500)));
        assert!(!should_dwell(Side::Left, &MONITOR, &WORK_AREA, Point::new(1921, 500)));
        assert!(!should_dwell(Side::Left, &MONITOR, &WORK_AREA, Point::new(1920, 32)));

        assert!(should_dwell(Side::Bottom, &MONITOR, &WORK_AREA, Point::new(2500, 1079)));
        assert!(!should_dwell(Side::Bottom, &MONITOR, &WORK_AREA, Point::new(1920, 1079)));
        assert!(should_dwell(Side::Right, &MONITOR, &WORK_AREA, Point::new(3839, 100)));
    }

    #[test]
    fn dock_region_reaches_inner_edge_of_footprint() {
        let footprint = Rect::new(2400, 1016, 960, 64);
        assert!(pointer_in_dock_region(Side::Bottom, &MONITOR, &footprint, Point::new(2000, 1016)));
        assert!(!pointer_in_dock_region(Side::Bottom, &MONITOR, &footprint, Point::new(2000, 1015)));
        assert!(!pointer_in_dock_region(Side::Bottom, &MONITOR, &footprint, Point::new(100, 1050)));

        let footprint = Rect::new(1920, 200, 64, 600);
        assert!(pointer_in_dock_region(Side::Left, &MONITOR, &footprint, Point::new(1984, 10)));
        assert!(!pointer_in_dock_region(Side::Left, &MONITOR, &footprint, Point::new(1985, 10)));
    }
}
