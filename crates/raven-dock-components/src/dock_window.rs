use gtk4::prelude::*;
use gtk4::{gdk, Application, Box as GtkBox, EventControllerMotion, EventControllerScroll,
    EventControllerScrollFlags, Fixed, Orientation, Overflow};
use gtk4_layer_shell::{KeyboardMode, LayerShell};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::debug;

use raven_dock_core::geometry::{DockGeometry, Monitor, Point, Side, Size};
use raven_dock_core::{DockActor, DockEvent, SlideContainer};

use crate::common::{ExclusiveZone, LayerConfig, LayerMargins, LayerWindow};

struct DockWindowInner {
    layer: LayerWindow,
    /// Clips the content to the slid-in part
    fixed: Fixed,
    content: GtkBox,
    monitor: Monitor,
    side: Side,
    geometry: Cell<DockGeometry>,
    slider: RefCell<SlideContainer>,
    /// Global position of the window's top-left corner
    origin: Cell<Point>,
    closed: Cell<bool>,
}

/// Layer-shell surface of one dock
#[derive(Clone)]
pub struct DockWindow {
    inner: Rc<DockWindowInner>,
}

#[derive(Clone)]
pub struct WeakDockWindow(Weak<DockWindowInner>);

impl WeakDockWindow {
    pub fn upgrade(&self) -> Option<DockWindow> {
        self.0
            .upgrade()
            .filter(|inner| !inner.closed.get())
            .map(|inner| DockWindow { inner })
    }
}

impl DockWindow {
    pub fn new(
        app: &Application,
        output: Option<&gdk::Monitor>,
        monitor: Monitor,
        side: Side,
        launcher: &GtkBox,
        events: async_channel::Sender<DockEvent>,
        pointer: Rc<Cell<Option<Point>>>,
    ) -> Self {
        let layer = LayerWindow::new(app, &LayerConfig::dock(side), output);
        layer.window().add_css_class("raven-dock");

        let content = GtkBox::new(Orientation::Horizontal, 0);
        content.add_css_class("dock-content");
        content.append(launcher);

        let fixed = Fixed::new();
        fixed.set_overflow(Overflow::Hidden);
        fixed.put(&content, 0.0, 0.0);
        layer.window().set_child(Some(&fixed));

        let dock = Self {
            inner: Rc::new(DockWindowInner {
                layer,
                fixed,
                content,
                side,
                geometry: Cell::new(DockGeometry::default()),
                slider: RefCell::new(SlideContainer::new(side)),
                origin: Cell::new(Point::new(monitor.rect.x, monitor.rect.y)),
                monitor,
                closed: Cell::new(false),
            }),
        };
        dock.connect_input(events, pointer);
        dock.inner.layer.present();
        dock
    }

    pub fn downgrade(&self) -> WeakDockWindow {
        WeakDockWindow(Rc::downgrade(&self.inner))
    }

    /// Reserve the dock's space on its edge
    pub fn set_reserves_space(&self, reserve: bool) {
        let zone = if reserve {
            ExclusiveZone::Auto
        } else {
            ExclusiveZone::None
        };
        self.inner.layer.set_exclusive_zone(zone);
    }

    /// Let the dock take keyboard focus when asked to
    pub fn set_focusable(&self, focusable: bool) {
        let mode = if focusable {
            KeyboardMode::OnDemand
        } else {
            KeyboardMode::None
        };
        self.inner.layer.window().set_keyboard_mode(mode);
    }

    fn connect_input(
        &self,
        events: async_channel::Sender<DockEvent>,
        pointer: Rc<Cell<Option<Point>>>,
    ) {
        let monitor = self.inner.monitor.index;
        let window = self.inner.layer.window();

        let motion = EventControllerMotion::new();
        let weak = self.downgrade();
        let (tx, position) = (events.clone(), pointer.clone());
        motion.connect_enter(move |_, x, y| {
            if let Some(dock) = weak.upgrade() {
                position.set(Some(dock.to_global(x, y)));
            }
            let _ = tx.try_send(DockEvent::Hover {
                monitor,
                hovered: true,
            });
        });

        let (tx, position) = (events.clone(), pointer.clone());
        motion.connect_leave(move |_| {
            // Unknown until the next compositor sample
            position.set(None);
            let _ = tx.try_send(DockEvent::Hover {
                monitor,
                hovered: false,
            });
        });

        let weak = self.downgrade();
        motion.connect_motion(move |_, x, y| {
            if let Some(dock) = weak.upgrade() {
                pointer.set(Some(dock.to_global(x, y)));
            }
        });
        window.add_controller(motion);

        let scroll = EventControllerScroll::new(EventControllerScrollFlags::BOTH_AXES);
        scroll.connect_scroll(move |_, dx, dy| {
            let _ = events.try_send(DockEvent::Scroll { monitor, dx, dy });
            glib::Propagation::Stop
        });
        window.add_controller(scroll);
    }

    fn to_global(&self, x: f64, y: f64) -> Point {
        let origin = self.inner.origin.get();
        Point::new(origin.x + x.round() as i32, origin.y + y.round() as i32)
    }

    fn content_size(&self) -> Size {
        let content = &self.inner.content;
        let (_, width, _, _) = content.measure(Orientation::Horizontal, -1);
        let (_, height, _, _) = content.measure(Orientation::Vertical, -1);
        Size::new(width, height)
    }

    /// Place the window and its clipped content for the current geometry and slide
    fn relayout(&self) {
        let inner = &self.inner;
        let child = self.content_size();
        let slider = inner.slider.borrow();
        let child_box = slider.allocate(child);
        let visible = slider.preferred_size(child);

        inner.fixed.set_size_request(visible.width, visible.height);
        inner.fixed.move_(&inner.content, child_box.x1, child_box.y1);

        let geometry = inner.geometry.get();
        let rect = inner.monitor.rect;
        let (margins, origin) = if inner.side.is_horizontal() {
            let lead = geometry.origin.x - rect.x + (geometry.length - visible.width).max(0) / 2;
            let y = match inner.side {
                Side::Bottom => rect.bottom() - visible.height,
                _ => rect.y,
            };
            (
                LayerMargins {
                    left: lead,
                    ..Default::default()
                },
                Point::new(rect.x + lead, y),
            )
        } else {
            let lead = geometry.origin.y - rect.y + (geometry.length - visible.height).max(0) / 2;
            let x = match inner.side {
                Side::Right => rect.right() - visible.width,
                _ => rect.x,
            };
            (
                LayerMargins {
                    top: lead,
                    ..Default::default()
                },
                Point::new(x, rect.y + lead),
            )
        };

        inner.layer.set_margins(margins);
        inner.origin.set(origin);
    }
}

impl DockActor for DockWindow {
    fn set_geometry(&mut self, geometry: &DockGeometry) {
        let inner = &self.inner;
        inner.geometry.set(*geometry);

        let length = if geometry.extended { geometry.length } else { -1 };
        if inner.side.is_horizontal() {
            inner.content.set_size_request(length, -1);
        } else {
            inner.content.set_size_request(-1, length);
        }
        self.relayout();
    }

    fn set_slide(&mut self, slider: &SlideContainer) {
        *self.inner.slider.borrow_mut() = slider.clone();
        self.relayout();
    }

    fn set_style_class(&mut self, name: &str, enabled: bool) {
        let window = self.inner.layer.window();
        if enabled {
            window.add_css_class(name);
        } else {
            window.remove_css_class(name);
        }
    }

    fn destroy(&mut self) {
        if !self.inner.closed.replace(true) {
            debug!("Closing dock window on monitor {}", self.inner.monitor.index);
            self.inner.layer.close();
        }
    }
}
