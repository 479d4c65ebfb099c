mod layer_window;

pub use layer_window::{gdk_monitor, ExclusiveZone, LayerConfig, LayerMargins, LayerWindow};
