use std::cell::RefCell;
use std::rc::{Rc, Weak};

use raven_dock_core::geometry::Rect;
use raven_dock_core::{
    IntellihideMode, MonitorSnapshot, OverlapMonitor, WindowInfo, WindowOverlap, WindowSnapshot,
};

/// Windows of an output's active workspace, as the overlap model sees them
pub fn windows_on_output(windows: &[WindowSnapshot], output: &MonitorSnapshot) -> Vec<WindowInfo> {
    windows
        .iter()
        .filter(|w| w.monitor == output.id && w.workspace == output.active_workspace)
        .map(|w| WindowInfo {
            rect: w.rect,
            app_id: w.class.clone(),
            maximized: w.fullscreen || covers(&w.rect, &output.work_area),
            focused: w.focused,
        })
        .collect()
}

/// Tiled windows filling the work area count as maximized
fn covers(rect: &Rect, area: &Rect) -> bool {
    !area.is_empty() && rect.width >= area.width && rect.height >= area.height
}

/// Overlap monitor of one dock, shared with the platform that feeds it windows
#[derive(Clone)]
pub struct SharedOverlap {
    inner: Rc<RefCell<WindowOverlap>>,
}

impl SharedOverlap {
    pub fn new(mode: IntellihideMode) -> Self {
        Self {
            inner: Rc::new(RefCell::new(WindowOverlap::new(mode))),
        }
    }

    /// Replace the window list; true if the status changed
    pub fn set_windows(&self, windows: Vec<WindowInfo>) -> bool {
        self.inner.borrow_mut().set_windows(windows)
    }

    pub fn downgrade(&self) -> Weak<RefCell<WindowOverlap>> {
        Rc::downgrade(&self.inner)
    }
}

impl OverlapMonitor for SharedOverlap {
    fn enable(&mut self) -> bool {
        self.inner.borrow_mut().enable()
    }

    fn disable(&mut self) -> bool {
        self.inner.borrow_mut().disable()
    }

    fn force_update(&mut self) -> bool {
        self.inner.borrow_mut().force_update()
    }

    fn update_target_box(&mut self, target: Rect) -> bool {
        self.inner.borrow_mut().update_target_box(target)
    }

    fn set_mode(&mut self, mode: IntellihideMode) -> bool {
        self.inner.borrow_mut().set_mode(mode)
    }

    fn overlap_status(&self) -> bool {
        self.inner.borrow().overlap_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output() -> MonitorSnapshot {
        MonitorSnapshot {
            id: 1,
            name: "DP-1".into(),
            rect: Rect::new(1920, 0, 1920, 1080),
            work_area: Rect::new(1920, 32, 1920, 1048),
            focused: true,
            fullscreen: false,
            active_workspace: 3,
        }
    }

    fn window(class: &str, monitor: i64, workspace: i32, rect: Rect) -> WindowSnapshot {
        WindowSnapshot {
            address: "0x1".into(),
            class: class.into(),
            rect,
            monitor,
            workspace,
            fullscreen: false,
            focused: false,
        }
    }

    #[test]
    fn only_active_workspace_of_output_counts() {
        let windows = vec![
            window("kitty", 1, 3, Rect::new(1920, 32, 800, 600)),
            window("firefox", 1, 4, Rect::new(1920, 32, 800, 600)),
            window("thunar", 0, 3, Rect::new(0, 0, 800, 600)),
        ];

        let infos = windows_on_output(&windows, &output());
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].app_id, "kitty");
        assert!(!infos[0].maximized);
    }

    #[test]
    fn window_filling_work_area_is_maximized() {
        let mut full = window("kitty", 1, 3, Rect::new(1920, 32, 1920, 1048));
        let infos = windows_on_output(std::slice::from_ref(&full), &output());
        assert!(infos[0].maximized);

        full.rect = Rect::new(1920, 32, 960, 1048);
        full.fullscreen = true;
        let infos = windows_on_output(&[full], &output());
        assert!(infos[0].maximized);
    }

    #[test]
    fn shared_handle_sees_window_updates() {
        let mut overlap = SharedOverlap::new(IntellihideMode::AllWindows);
        overlap.enable();
        overlap.update_target_box(Rect::new(1920, 1000, 1920, 80));

        let weak = overlap.downgrade();
        let windows = vec![window("kitty", 1, 3, Rect::new(1920, 32, 1920, 1048))];
        let changed = weak
            .upgrade()
            .map(|o| o.borrow_mut().set_windows(windows_on_output(&windows, &output())));

        assert_eq!(changed, Some(true));
        assert!(overlap.overlap_status());

        assert!(overlap.set_windows(Vec::new()));
        assert!(!overlap.overlap_status());
    }
}
