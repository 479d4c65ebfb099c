use serde::{Deserialize, Serialize};

/// Screen edge the dock is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
}

impl Side {
    /// Top and bottom docks lay their icons out horizontally
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Integer rectangle in global (layout) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// True when the two rectangles share at least one pixel
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Floating point allocation box (x1, y1) - (x2, y2) relative to the parent
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActorBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl ActorBox {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// A connected output as seen by the layout service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    pub index: usize,
    pub rect: Rect,
}

impl Monitor {
    pub fn new(index: usize, rect: Rect) -> Self {
        Self { index, rect }
    }
}

/// Where and how long the dock container is when fully shown.
///
/// `origin` is the anchor point on the monitor edge: for bottom and right
/// docks it sits on the far edge and the host translates the actor back by
/// its own size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DockGeometry {
    pub origin: Point,
    /// Extent along the dock axis (width for horizontal docks)
    pub length: i32,
    pub extended: bool,
}

impl DockGeometry {
    /// Fallback used when the configured fraction is out of range
    pub const DEFAULT_FRACTION: f64 = 0.95;

    /// Compute the shown geometry of a dock.
    ///
    /// Only the work-area components along the dock axis are read. A fixed
    /// dock reserves space on its own edge, so reading the other components
    /// would feed the reservation back into the position.
    pub fn compute(
        side: Side,
        monitor: &Rect,
        work_area: &Rect,
        height_fraction: f64,
        extend: bool,
    ) -> Self {
        let fraction = if extend {
            1.0
        } else if !(0.0..=1.0).contains(&height_fraction) {
            Self::DEFAULT_FRACTION
        } else {
            height_fraction
        };

        if side.is_horizontal() {
            let span = f64::from(work_area.width);
            let length = (fraction * span).round() as i32;
            let x = work_area.x + ((1.0 - fraction) / 2.0 * span).round() as i32;
            let y = match side {
                Side::Bottom => monitor.bottom(),
                _ => monitor.y,
            };
            Self {
                origin: Point::new(x, y),
                length,
                extended: extend,
            }
        } else {
            let span = f64::from(work_area.height);
            let length = (fraction * span).round() as i32;
            let y = work_area.y + ((1.0 - fraction) / 2.0 * span).round() as i32;
            let x = match side {
                Side::Right => monitor.right(),
                _ => monitor.x,
            };
            Self {
                origin: Point::new(x, y),
                length,
                extended: extend,
            }
        }
    }

    /// Footprint of a box of `content` size centred in this geometry and
    /// pushed against the anchored edge of `monitor`
    pub fn static_box(&self, side: Side, monitor: &Rect, content: Size) -> Rect {
        let along = if self.extended {
            0
        } else if side.is_horizontal() {
            (self.length - content.width).max(0) / 2
        } else {
            (self.length - content.height).max(0) / 2
        };

        match side {
            Side::Left => Rect::new(monitor.x, self.origin.y + along, content.width, content.height),
            Side::Right => Rect::new(
                monitor.right() - content.width,
                self.origin.y + along,
                content.width,
                content.height,
            ),
            Side::Top => Rect::new(self.origin.x + along, monitor.y, content.width, content.height),
            Side::Bottom => Rect::new(
                self.origin.x + along,
                monitor.bottom() - content.height,
                content.width,
                content.height,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONITOR: Rect = Rect::new(0, 0, 1920, 1080);

    #[test]
    fn horizontal_geometry_is_centred_on_work_area() {
        let work_area = Rect::new(0, 32, 1920, 1048);
        let geom = DockGeometry::compute(Side::Bottom, &MONITOR, &work_area, 0.5, false);

        assert_eq!(geom.length, 960);
        assert_eq!(geom.origin, Point::new(480, 1080));
    }

    #[test]
    fn extend_uses_full_span() {
        let work_area = Rect::new(0, 32, 1920, 1048);
        let geom = DockGeometry::compute(Side::Left, &MONITOR, &work_area, 0.3, true);

        assert_eq!(geom.length, 1048);
        assert_eq!(geom.origin, Point::new(0, 32));
        assert!(geom.extended);
    }

    #[test]
    fn out_of_range_fraction_falls_back() {
        let geom = DockGeometry::compute(Side::Top, &MONITOR, &MONITOR, 1.7, false);
        assert_eq!(geom.length, (0.95_f64 * 1920.0).round() as i32);
    }

    #[test]
    fn bottom_geometry_ignores_vertical_work_area() {
        // A fixed bottom dock shrinks the work area from below; the result must not move
        let before = DockGeometry::compute(Side::Bottom, &MONITOR, &MONITOR, 0.9, false);
        let reserved = Rect::new(0, 0, 1920, 1000);
        let after = DockGeometry::compute(Side::Bottom, &MONITOR, &reserved, 0.9, false);

        assert_eq!(before, after);
    }

    #[test]
    fn static_box_hugs_anchored_edge() {
        let geom = DockGeometry::compute(Side::Right, &MONITOR, &MONITOR, 1.0, false);
        let rect = geom.static_box(Side::Right, &MONITOR, Size::new(64, 400));

        assert_eq!(rect, Rect::new(1856, 340, 64, 400));
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0, 0, 100, 100);
        assert!(a.intersects(&Rect::new(99, 99, 10, 10)));
        assert!(!a.intersects(&Rect::new(100, 0, 10, 10)));
        assert!(!a.intersects(&Rect::new(10, 10, 0, 5)));
    }
}
