use smallvec::SmallVec;

use crate::config::SettingKey;

/// Sources a dock reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    SettingChanged(SettingKey),
    WorkAreasChanged,
    FullscreenChanged,
    OverlapChanged,
    RequiresVisibility,
    MenuClosed,
    OverviewShowing,
    OverviewHiding,
    OverviewHidden,
    DragBegin,
    DragEnd,
    LauncherResized,
    Scroll,
    Restacked,
    WorkspaceSwitched,
    WindowEnteredMonitor,
    MonitorsChanged,
    SessionModeUpdated,
}

#[derive(Debug, Clone)]
struct Connection<H> {
    signal: Signal,
    handler: H,
    label: Option<&'static str>,
}

/// Table of (signal, handler) wiring.
///
/// Handlers are plain values dispatched by the owner, so dropping a
/// connection is just removing the entry. Labelled groups can be removed
/// together, everything else goes with `clear`.
#[derive(Debug, Clone)]
pub struct SignalRegistry<H: Copy> {
    connections: Vec<Connection<H>>,
}

impl<H: Copy> Default for SignalRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Copy> SignalRegistry<H> {
    pub fn new() -> Self {
        Self {
            connections: Vec::new(),
        }
    }

    pub fn add(&mut self, signal: Signal, handler: H) {
        self.connections.push(Connection {
            signal,
            handler,
            label: None,
        });
    }

    pub fn add_with_label(&mut self, label: &'static str, signal: Signal, handler: H) {
        self.connections.push(Connection {
            signal,
            handler,
            label: Some(label),
        });
    }

    pub fn remove_with_label(&mut self, label: &str) {
        self.connections.retain(|c| c.label != Some(label));
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.connections.iter().any(|c| c.label == Some(label))
    }

    /// Handlers connected to `signal`, in connection order
    pub fn handlers(&self, signal: Signal) -> SmallVec<[H; 4]> {
        self.connections
            .iter()
            .filter(|c| c.signal == signal)
            .map(|c| c.handler)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn clear(&mut self) {
        self.connections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handlers_keep_connection_order() {
        let mut registry = SignalRegistry::new();
        registry.add(Signal::WorkAreasChanged, 1);
        registry.add(Signal::FullscreenChanged, 2);
        registry.add(Signal::WorkAreasChanged, 3);

        assert_eq!(registry.handlers(Signal::WorkAreasChanged).as_slice(), &[1, 3]);
        assert!(registry.handlers(Signal::Scroll).is_empty());
    }

    #[test]
    fn labels_remove_only_their_group() {
        let mut registry = SignalRegistry::new();
        registry.add(Signal::Restacked, 'a');
        registry.add_with_label("isolation", Signal::Restacked, 'b');
        registry.add_with_label("isolation", Signal::WorkspaceSwitched, 'c');

        assert!(registry.has_label("isolation"));
        registry.remove_with_label("isolation");

        assert!(!registry.has_label("isolation"));
        assert_eq!(registry.handlers(Signal::Restacked).as_slice(), &['a']);
        assert!(registry.handlers(Signal::WorkspaceSwitched).is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let mut registry = SignalRegistry::new();
        registry.add(Signal::MenuClosed, ());
        registry.add_with_label("x", Signal::Scroll, ());
        registry.clear();
        assert!(registry.is_empty());
    }
}
