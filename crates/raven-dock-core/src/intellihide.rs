use compact_str::CompactString;
use tracing::debug;

use crate::collaborators::OverlapMonitor;
use crate::config::IntellihideMode;
use crate::geometry::Rect;

/// A window on the dock's monitor and active workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub rect: Rect,
    pub app_id: CompactString,
    pub maximized: bool,
    pub focused: bool,
}

/// Overlap detection between the dock footprint and the current windows
#[derive(Debug, Clone)]
pub struct WindowOverlap {
    enabled: bool,
    mode: IntellihideMode,
    target: Option<Rect>,
    windows: Vec<WindowInfo>,
    status: bool,
}

impl WindowOverlap {
    pub fn new(mode: IntellihideMode) -> Self {
        Self {
            enabled: false,
            mode,
            target: None,
            windows: Vec::new(),
            status: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Replace the window list; true if the status changed
    pub fn set_windows(&mut self, windows: Vec<WindowInfo>) -> bool {
        self.windows = windows;
        self.check_overlap()
    }

    fn compute(&self) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(target) = self.target else {
            return false;
        };

        let focused_app = self
            .windows
            .iter()
            .find(|w| w.focused)
            .map(|w| w.app_id.as_str());

        self.windows.iter().any(|w| {
            let counts = match self.mode {
                IntellihideMode::AllWindows => true,
                IntellihideMode::FocusApplicationWindows => focused_app == Some(w.app_id.as_str()),
                IntellihideMode::MaximizedWindows => w.maximized,
            };
            counts && w.rect.intersects(&target)
        })
    }

    fn check_overlap(&mut self) -> bool {
        let status = self.compute();
        if status == self.status {
            return false;
        }
        debug!("Overlap status changed: {}", status);
        self.status = status;
        true
    }
}

impl OverlapMonitor for WindowOverlap {
    fn enable(&mut self) -> bool {
        self.enabled = true;
        self.check_overlap()
    }

    fn disable(&mut self) -> bool {
        self.enabled = false;
        self.check_overlap()
    }

    fn force_update(&mut self) -> bool {
        self.check_overlap()
    }

    fn update_target_box(&mut self, target: Rect) -> bool {
        self.target = Some(target);
        self.check_overlap()
    }

    fn set_mode(&mut self, mode: IntellihideMode) -> bool {
        self.mode = mode;
        self.check_overlap()
    }

    fn overlap_status(&self) -> bool {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCK: Rect = Rect::new(460, 1016, 1000, 64);

    fn window(app: &str, rect: Rect, focused: bool, maximized: bool) -> WindowInfo {
        WindowInfo {
            rect,
            app_id: app.into(),
            maximized,
            focused,
        }
    }

    fn overlap(mode: IntellihideMode) -> WindowOverlap {
        let mut overlap = WindowOverlap::new(mode);
        overlap.enable();
        overlap.update_target_box(DOCK);
        overlap
    }

    #[test]
    fn all_windows_mode_sees_any_overlap() {
        let mut overlap = overlap(IntellihideMode::AllWindows);
        assert!(!overlap.overlap_status());

        let changed = overlap.set_windows(vec![window("a", Rect::new(0, 900, 800, 200), false, false)]);
        assert!(changed);
        assert!(overlap.overlap_status());
    }

    #[test]
    fn focus_mode_only_counts_focused_app() {
        let mut overlap = overlap(IntellihideMode::FocusApplicationWindows);
        overlap.set_windows(vec![
            window("editor", Rect::new(0, 0, 800, 600), true, false),
            window("term", Rect::new(0, 900, 800, 200), false, false),
        ]);
        assert!(!overlap.overlap_status());

        overlap.set_windows(vec![
            window("editor", Rect::new(0, 0, 800, 600), true, false),
            window("editor", Rect::new(0, 900, 800, 200), false, false),
        ]);
        assert!(overlap.overlap_status());
    }

    #[test]
    fn maximized_mode_ignores_floating_windows() {
        let mut overlap = overlap(IntellihideMode::MaximizedWindows);
        overlap.set_windows(vec![window("a", Rect::new(0, 900, 800, 200), true, false)]);
        assert!(!overlap.overlap_status());

        assert!(overlap.set_mode(IntellihideMode::AllWindows));
        assert!(overlap.overlap_status());
    }

    #[test]
    fn disabled_monitor_reports_no_overlap() {
        let mut overlap = overlap(IntellihideMode::AllWindows);
        overlap.set_windows(vec![window("a", Rect::new(0, 0, 1920, 1080), false, true)]);
        assert!(overlap.overlap_status());

        assert!(overlap.disable());
        assert!(!overlap.overlap_status());
        assert!(!overlap.force_update());
    }
}
