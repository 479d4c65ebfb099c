use gtk4::gdk::Display;
use gtk4::CssProvider;
use tracing::debug;

/// CSS theme of the dock windows
pub const DOCK_CSS: &str = r#"
/* ========== Dock Window ========== */

window.raven-dock {
    background: transparent;
}

.dock-content {
    padding: 4px;
}

.dock-container {
    background: rgba(30, 30, 30, 0.75);
    border-radius: 14px;
    padding: 4px 6px;
    border: 1px solid rgba(255, 255, 255, 0.08);
}

window.raven-dock.fixed .dock-container,
window.raven-dock.extended .dock-container {
    border-radius: 0;
}

window.raven-dock.overview .dock-container {
    background: transparent;
    border-color: transparent;
}

/* ========== Items ========== */

.dock-item {
    background: rgba(255, 255, 255, 0.05);
    border: none;
    border-radius: 10px;
    padding: 4px;
    margin: 0 2px;
    transition: all 150ms ease;
}

.dock-item:hover {
    background: rgba(255, 255, 255, 0.18);
    box-shadow: 0 2px 8px rgba(0, 0, 0, 0.2);
}

.dock-item:active {
    background: rgba(255, 255, 255, 0.25);
}

.dock-item-running {
    border-bottom: 2px solid rgba(0, 150, 136, 0.9);
}

.dock-item-focused {
    background: rgba(0, 150, 136, 0.25);
    border-bottom: 2px solid rgba(0, 200, 180, 1.0);
}

.dock-item-attention {
    background: rgba(255, 170, 0, 0.35);
}

window.raven-dock.left .dock-item-running,
window.raven-dock.right .dock-item-running {
    border-bottom: none;
}

.dock-number {
    background: rgba(0, 150, 136, 0.95);
    color: white;
    border-radius: 8px;
    font-size: 10px;
    font-weight: 700;
    min-width: 14px;
    padding: 0 3px;
}

/* ========== Context Menu ========== */

.context-menu button {
    background: transparent;
    border-radius: 6px;
    padding: 4px 14px;
    color: rgba(255, 255, 255, 0.9);
}

.context-menu button:hover {
    background: rgba(255, 255, 255, 0.15);
}
"#;

/// Load the dock theme for the default display
pub fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_data(DOCK_CSS);

    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
        debug!("CSS theme loaded");
    }
}
