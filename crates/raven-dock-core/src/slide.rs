use crate::geometry::{ActorBox, Side, Size};

/// Single-child layout proxy that slides its child out of the screen edge.
///
/// The container's allocation is what the compositor tracks for input, so
/// the part of the child that is slid out must not be part of it: the
/// preferred size along the sliding axis shrinks with the slide fraction.
#[derive(Debug, Clone)]
pub struct SlideContainer {
    side: Side,
    slide_x: f64,
    /// Sliver left visible when fully retracted
    slideout_size: f64,
}

impl SlideContainer {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            slide_x: 0.0,
            slideout_size: 0.0,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn slide_x(&self) -> f64 {
        self.slide_x
    }

    pub fn set_slide_x(&mut self, value: f64) {
        self.slide_x = value.clamp(0.0, 1.0);
    }

    pub fn slideout_size(&self) -> f64 {
        self.slideout_size
    }

    pub fn set_slideout_size(&mut self, size: f64) {
        self.slideout_size = size.max(0.0);
    }

    /// Box of the child inside the container for the current slide fraction
    pub fn allocate(&self, child: Size) -> ActorBox {
        let width = f64::from(child.width);
        let height = f64::from(child.height);
        let s = self.slideout_size;
        let f = self.slide_x;

        match self.side {
            Side::Left => ActorBox {
                x1: (f - 1.0) * (width - s),
                x2: s + f * (width - s),
                y1: 0.0,
                y2: height,
            },
            Side::Top => ActorBox {
                x1: 0.0,
                x2: width,
                y1: (f - 1.0) * (height - s),
                y2: s + f * (height - s),
            },
            Side::Right | Side::Bottom => ActorBox {
                x1: 0.0,
                x2: width,
                y1: 0.0,
                y2: height,
            },
        }
    }

    /// Clip rectangle for the child, in child coordinates
    pub fn clip(&self, child: Size, available: Size) -> ActorBox {
        let child_box = self.allocate(child);
        ActorBox {
            x1: -child_box.x1,
            y1: -child_box.y1,
            x2: -child_box.x1 + f64::from(available.width),
            y2: -child_box.y1 + f64::from(available.height),
        }
    }

    /// (minimum, natural) width given the child's
    pub fn preferred_width(&self, min: f64, natural: f64) -> (f64, f64) {
        if self.side.is_horizontal() {
            (min, natural)
        } else {
            (self.scale(min), self.scale(natural))
        }
    }

    /// (minimum, natural) height given the child's
    pub fn preferred_height(&self, min: f64, natural: f64) -> (f64, f64) {
        if self.side.is_horizontal() {
            (self.scale(min), self.scale(natural))
        } else {
            (min, natural)
        }
    }

    /// Natural size of the container for a child of natural size `child`
    pub fn preferred_size(&self, child: Size) -> Size {
        let (_, width) = self.preferred_width(f64::from(child.width), f64::from(child.width));
        let (_, height) = self.preferred_height(f64::from(child.height), f64::from(child.height));
        Size::new(width.round() as i32, height.round() as i32)
    }

    /// How far the child is pushed out of the screen along the sliding axis
    pub fn offset(&self, child: Size) -> f64 {
        let extent = if self.side.is_horizontal() {
            child.height
        } else {
            child.width
        };
        (1.0 - self.slide_x) * (f64::from(extent) - self.slideout_size).max(0.0)
    }

    fn scale(&self, value: f64) -> f64 {
        (value - self.slideout_size) * self.slide_x + self.slideout_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_side_retracted_leaves_sliver() {
        let mut slider = SlideContainer::new(Side::Left);
        slider.set_slideout_size(4.0);
        slider.set_slide_x(0.0);

        let child = slider.allocate(Size::new(48, 300));
        assert_eq!(child.x1, -44.0);
        assert_eq!(child.x2, 4.0);

        slider.set_slide_x(1.0);
        let child = slider.allocate(Size::new(48, 300));
        assert_eq!(child.x1, 0.0);
        assert_eq!(child.x2, 48.0);
    }

    #[test]
    fn top_side_slides_vertically() {
        let mut slider = SlideContainer::new(Side::Top);
        slider.set_slide_x(0.5);

        let child = slider.allocate(Size::new(600, 40));
        assert_eq!(child.y1, -20.0);
        assert_eq!(child.y2, 20.0);
        assert_eq!(child.width(), 600.0);
    }

    #[test]
    fn trailing_sides_keep_child_box() {
        let mut slider = SlideContainer::new(Side::Bottom);
        slider.set_slide_x(0.25);

        let child = slider.allocate(Size::new(600, 40));
        assert_eq!(child, ActorBox { x1: 0.0, y1: 0.0, x2: 600.0, y2: 40.0 });
    }

    #[test]
    fn preferred_size_follows_fraction_on_sliding_axis() {
        let mut slider = SlideContainer::new(Side::Right);
        slider.set_slideout_size(2.0);
        slider.set_slide_x(0.5);

        assert_eq!(slider.preferred_width(10.0, 50.0), (6.0, 26.0));
        assert_eq!(slider.preferred_height(10.0, 300.0), (10.0, 300.0));

        slider.set_slide_x(0.0);
        assert_eq!(slider.preferred_size(Size::new(50, 300)), Size::new(2, 300));
    }

    #[test]
    fn fraction_is_clamped() {
        let mut slider = SlideContainer::new(Side::Bottom);
        slider.set_slide_x(3.0);
        assert_eq!(slider.slide_x(), 1.0);
        slider.set_slide_x(-1.0);
        assert_eq!(slider.slide_x(), 0.0);
    }

    #[test]
    fn offset_shrinks_to_zero_when_shown() {
        let mut slider = SlideContainer::new(Side::Bottom);
        slider.set_slideout_size(1.0);
        assert_eq!(slider.offset(Size::new(500, 41)), 40.0);
        slider.set_slide_x(1.0);
        assert_eq!(slider.offset(Size::new(500, 41)), 0.0);
    }
}
