use tracing::debug;

use crate::config::{DockSettings, SettingKey};
use crate::dock::{DockAction, DockedDash};
use crate::platform::Platform;
use crate::signals::Signal;

const LABEL: &str = "isolation";

/// Launchers that only show the apps of the current workspace or monitor.
///
/// Window changes re-display every launcher while enabled, and the host
/// switches app activation to the isolated policy.
#[derive(Debug, Default)]
pub struct WorkspaceIsolation {
    enabled: bool,
}

impl WorkspaceIsolation {
    pub fn new(docks: &mut [DockedDash], settings: &DockSettings, platform: &mut dyn Platform) -> Self {
        let mut isolation = Self::default();
        if settings.isolation_enabled() {
            isolation.enable(docks, settings, platform);
        }
        isolation
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self, docks: &mut [DockedDash], settings: &DockSettings, platform: &mut dyn Platform) {
        // Never wire twice
        self.disable(docks, platform);

        for dock in docks.iter_mut() {
            let signals = dock.signals_mut();
            signals.add_with_label(LABEL, Signal::Restacked, DockAction::QueueRedisplay);
            signals.add_with_label(LABEL, Signal::WorkspaceSwitched, DockAction::QueueRedisplay);

            // Windows can move between monitors without a restack
            if settings.isolate_monitors {
                signals.add_with_label(LABEL, Signal::WindowEnteredMonitor, DockAction::QueueRedisplay);
            }
        }

        platform.set_isolated_activation(true);
        self.enabled = true;
        debug!(
            "Workspace isolation enabled (monitors: {})",
            settings.isolate_monitors
        );
    }

    fn disable(&mut self, docks: &mut [DockedDash], platform: &mut dyn Platform) {
        for dock in docks.iter_mut() {
            dock.signals_mut().remove_with_label(LABEL);
        }
        if self.enabled {
            platform.set_isolated_activation(false);
            self.enabled = false;
        }
    }

    pub fn settings_changed(
        &mut self,
        key: SettingKey,
        docks: &mut [DockedDash],
        settings: &DockSettings,
        platform: &mut dyn Platform,
    ) {
        if !matches!(key, SettingKey::IsolateWorkspaces | SettingKey::IsolateMonitors) {
            return;
        }

        for dock in docks.iter_mut() {
            dock.launcher_mut().reset_app_icons();
        }

        if settings.isolation_enabled() {
            self.enable(docks, settings, platform);
        } else {
            self.disable(docks, platform);
        }
    }

    pub fn destroy(mut self, docks: &mut [DockedDash], platform: &mut dyn Platform) {
        self.disable(docks, platform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dock::DockContext;
    use crate::testing::{FakeDock, FakePlatform};

    fn setup(settings: &DockSettings) -> (FakePlatform, Vec<DockedDash>, Vec<FakeDock>) {
        let mut platform = FakePlatform::default();
        let mut outbox = Vec::new();
        let monitor = platform.monitors[0].clone();
        let (parts, fake) = platform.make_parts();
        let mut ctx = DockContext {
            settings,
            platform: &mut platform,
            outbox: &mut outbox,
        };
        let dock = DockedDash::new(monitor, settings.dock_position, parts, true, &mut ctx);
        (platform, vec![dock], vec![fake])
    }

    #[test]
    fn wiring_follows_settings() {
        let mut settings = DockSettings::default();
        let (mut platform, mut docks, fakes) = setup(&settings);

        let mut isolation = WorkspaceIsolation::new(&mut docks, &settings, &mut platform);
        assert!(!isolation.is_enabled());
        assert!(!docks[0].signals().has_label(LABEL));

        settings.isolate_monitors = true;
        isolation.settings_changed(SettingKey::IsolateMonitors, &mut docks, &settings, &mut platform);
        assert!(isolation.is_enabled());
        assert!(platform.isolated_activation);
        assert_eq!(fakes[0].state().resets, 1);
        assert_eq!(
            docks[0].signals().handlers(Signal::WindowEnteredMonitor).as_slice(),
            &[DockAction::QueueRedisplay]
        );

        settings.isolate_monitors = false;
        isolation.settings_changed(SettingKey::IsolateMonitors, &mut docks, &settings, &mut platform);
        assert!(!isolation.is_enabled());
        assert!(!platform.isolated_activation);
        assert!(!docks[0].signals().has_label(LABEL));
    }

    #[test]
    fn workspace_isolation_skips_monitor_signal() {
        let settings = DockSettings {
            isolate_workspaces: true,
            ..Default::default()
        };
        let (mut platform, mut docks, _fakes) = setup(&settings);

        let isolation = WorkspaceIsolation::new(&mut docks, &settings, &mut platform);
        assert!(docks[0].signals().handlers(Signal::WindowEnteredMonitor).is_empty());
        assert_eq!(docks[0].signals().handlers(Signal::Restacked).len(), 1);

        isolation.destroy(&mut docks, &mut platform);
        assert!(!platform.isolated_activation);
    }
}
