use gtk4::prelude::*;
use gtk4::{gdk, Application, ApplicationWindow};
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};
use smallvec::SmallVec;
use tracing::debug;

use raven_dock_core::Side;

/// Layer shell window configuration
#[derive(Debug, Clone)]
pub struct LayerConfig {
    /// Layer to place the window on
    pub layer: Layer,
    /// Edges to anchor to
    pub anchors: SmallVec<[Edge; 3]>,
    /// Exclusive zone (auto, none, or specific size)
    pub exclusive_zone: ExclusiveZone,
    /// Keyboard mode
    pub keyboard_mode: KeyboardMode,
    /// Namespace for the surface
    pub namespace: &'static str,
}

/// Exclusive zone configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusiveZone {
    /// Auto-calculate based on window size
    Auto,
    /// No exclusive zone
    None,
}

/// Margins for layer shell window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerMargins {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

/// Layer shell edge of a dock side
fn edge_for(side: Side) -> Edge {
    match side {
        Side::Top => Edge::Top,
        Side::Right => Edge::Right,
        Side::Bottom => Edge::Bottom,
        Side::Left => Edge::Left,
    }
}

impl LayerConfig {
    /// Dock on one screen edge; the cross axis is positioned by margins
    /// from the leading edge
    pub fn dock(side: Side) -> Self {
        let leading = if side.is_horizontal() {
            Edge::Left
        } else {
            Edge::Top
        };

        Self {
            layer: Layer::Top,
            anchors: SmallVec::from_slice(&[edge_for(side), leading]),
            exclusive_zone: ExclusiveZone::None,
            keyboard_mode: KeyboardMode::None,
            namespace: "raven-dock",
        }
    }
}

/// Wrapper for layer-shell enabled windows
#[derive(Clone)]
pub struct LayerWindow {
    window: ApplicationWindow,
}

impl LayerWindow {
    /// Create a new layer-shell window with the given configuration
    pub fn new(app: &Application, config: &LayerConfig, monitor: Option<&gdk::Monitor>) -> Self {
        let window = ApplicationWindow::builder()
            .application(app)
            .decorated(false)
            .resizable(false)
            .build();

        window.init_layer_shell();
        window.set_layer(config.layer);
        if let Some(monitor) = monitor {
            window.set_monitor(monitor);
        }

        for edge in &config.anchors {
            window.set_anchor(*edge, true);
        }

        let layer_window = Self { window };
        layer_window.set_exclusive_zone(config.exclusive_zone);
        layer_window.window.set_keyboard_mode(config.keyboard_mode);
        layer_window.window.set_namespace(config.namespace);

        debug!(
            "Created layer window: layer={:?}, anchors={:?}, namespace={}",
            config.layer, config.anchors, config.namespace
        );

        layer_window
    }

    /// Get the underlying GTK window
    pub fn window(&self) -> &ApplicationWindow {
        &self.window
    }

    pub fn set_exclusive_zone(&self, zone: ExclusiveZone) {
        match zone {
            ExclusiveZone::Auto => self.window.auto_exclusive_zone_enable(),
            ExclusiveZone::None => self.window.set_exclusive_zone(0),
        }
    }

    /// Update margins
    pub fn set_margins(&self, margins: LayerMargins) {
        self.window.set_margin(Edge::Top, margins.top);
        self.window.set_margin(Edge::Right, margins.right);
        self.window.set_margin(Edge::Bottom, margins.bottom);
        self.window.set_margin(Edge::Left, margins.left);
    }

    pub fn present(&self) {
        self.window.present();
    }

    pub fn close(&self) {
        self.window.close();
    }
}

/// Find the GDK monitor of a compositor output by connector name
pub fn gdk_monitor(connector: &str) -> Option<gdk::Monitor> {
    let display = gdk::Display::default()?;
    let monitors = display.monitors();
    (0..monitors.n_items())
        .filter_map(|i| monitors.item(i).and_downcast::<gdk::Monitor>())
        .find(|m| m.connector().is_some_and(|c| c.as_str() == connector))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docks_anchor_to_their_edge_and_leading_side() {
        let bottom = LayerConfig::dock(Side::Bottom);
        assert_eq!(bottom.anchors.as_slice(), &[Edge::Bottom, Edge::Left]);

        let right = LayerConfig::dock(Side::Right);
        assert_eq!(right.anchors.as_slice(), &[Edge::Right, Edge::Top]);
        assert_eq!(right.exclusive_zone, ExclusiveZone::None);
    }
}
