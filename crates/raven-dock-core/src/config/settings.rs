use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::DockError;
use crate::geometry::Side;

/// Which windows count as overlapping the dock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntellihideMode {
    AllWindows,
    #[default]
    FocusApplicationWindows,
    MaximizedWindows,
}

/// What scrolling over the dock does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollAction {
    #[default]
    DoNothing,
    CycleWindows,
    SwitchWorkspace,
}

/// Every recognised settings key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    DockFixed,
    Autohide,
    AutohideInFullscreen,
    Intellihide,
    IntellihideMode,
    ExtendHeight,
    HeightFraction,
    AnimationTime,
    HideDelay,
    ShowDelay,
    RequirePressureToShow,
    PressureThreshold,
    MultiMonitor,
    PreferredMonitor,
    DockPosition,
    ScrollAction,
    HotKeys,
    HotkeysOverlay,
    HotkeysShowDock,
    ShortcutTimeout,
    IsolateWorkspaces,
    IsolateMonitors,
    DashMaxIconSize,
    ShowFavorites,
    ShowRunning,
    SlideoutSize,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DockFixed => "dock-fixed",
            Self::Autohide => "autohide",
            Self::AutohideInFullscreen => "autohide-in-fullscreen",
            Self::Intellihide => "intellihide",
            Self::IntellihideMode => "intellihide-mode",
            Self::ExtendHeight => "extend-height",
            Self::HeightFraction => "height-fraction",
            Self::AnimationTime => "animation-time",
            Self::HideDelay => "hide-delay",
            Self::ShowDelay => "show-delay",
            Self::RequirePressureToShow => "require-pressure-to-show",
            Self::PressureThreshold => "pressure-threshold",
            Self::MultiMonitor => "multi-monitor",
            Self::PreferredMonitor => "preferred-monitor",
            Self::DockPosition => "dock-position",
            Self::ScrollAction => "scroll-action",
            Self::HotKeys => "hot-keys",
            Self::HotkeysOverlay => "hotkeys-overlay",
            Self::HotkeysShowDock => "hotkeys-show-dock",
            Self::ShortcutTimeout => "shortcut-timeout",
            Self::IsolateWorkspaces => "isolate-workspaces",
            Self::IsolateMonitors => "isolate-monitors",
            Self::DashMaxIconSize => "dash-max-icon-size",
            Self::ShowFavorites => "show-favorites",
            Self::ShowRunning => "show-running",
            Self::SlideoutSize => "slideout-size",
        }
    }

    /// Keys whose change rebuilds every dock
    pub fn requires_rebuild(&self) -> bool {
        matches!(
            self,
            Self::MultiMonitor | Self::PreferredMonitor | Self::DockPosition
        )
    }
}

/// Dock settings (dock-settings.json)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DockSettings {
    // Visibility
    pub dock_fixed: bool,
    pub autohide: bool,
    pub autohide_in_fullscreen: bool,
    pub intellihide: bool,
    pub intellihide_mode: IntellihideMode,

    // Geometry
    pub extend_height: bool,
    pub height_fraction: f64,
    pub dock_position: Side,
    pub multi_monitor: bool,
    pub preferred_monitor: i32,
    pub slideout_size: f64,

    // Timing, in seconds
    pub animation_time: f64,
    pub hide_delay: f64,
    pub show_delay: f64,

    // Edge pressure
    pub require_pressure_to_show: bool,
    pub pressure_threshold: f64,

    pub scroll_action: ScrollAction,

    // Shortcuts
    pub hot_keys: bool,
    pub hotkeys_overlay: bool,
    pub hotkeys_show_dock: bool,
    pub shortcut_timeout: f64,

    pub isolate_workspaces: bool,
    pub isolate_monitors: bool,

    // Launcher
    pub dash_max_icon_size: i32,
    pub show_favorites: bool,
    pub show_running: bool,
}

impl Default for DockSettings {
    fn default() -> Self {
        Self {
            dock_fixed: false,
            autohide: true,
            autohide_in_fullscreen: false,
            intellihide: true,
            intellihide_mode: IntellihideMode::FocusApplicationWindows,
            extend_height: false,
            height_fraction: 0.90,
            dock_position: Side::Bottom,
            multi_monitor: false,
            preferred_monitor: -1,
            slideout_size: 1.0,
            animation_time: 0.2,
            hide_delay: 0.2,
            show_delay: 0.25,
            require_pressure_to_show: true,
            pressure_threshold: 100.0,
            scroll_action: ScrollAction::DoNothing,
            hot_keys: true,
            hotkeys_overlay: true,
            hotkeys_show_dock: true,
            shortcut_timeout: 2.0,
            isolate_workspaces: false,
            isolate_monitors: false,
            dash_max_icon_size: 48,
            show_favorites: true,
            show_running: true,
        }
    }
}

fn seconds(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}

impl DockSettings {
    /// Get the default settings path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config/raven/dock-settings.json")
    }

    /// Load settings, falling back to defaults when the file is missing or invalid
    pub fn load(path: &Path) -> Self {
        std::fs::read(path)
            .ok()
            .and_then(|data| serde_json::from_slice(&data).ok())
            .unwrap_or_default()
    }

    /// Strict variant of `load` for callers that report parse errors
    pub fn try_load(path: &Path) -> Result<Self, DockError> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let dir = path.parent().ok_or_else(|| anyhow::anyhow!("Invalid path"))?;
        std::fs::create_dir_all(dir)?;
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn animation_time(&self) -> Duration {
        seconds(self.animation_time)
    }

    pub fn hide_delay(&self) -> Duration {
        seconds(self.hide_delay)
    }

    pub fn show_delay(&self) -> Duration {
        seconds(self.show_delay)
    }

    pub fn shortcut_timeout(&self) -> Duration {
        seconds(self.shortcut_timeout)
    }

    /// Either isolation key is on
    pub fn isolation_enabled(&self) -> bool {
        self.isolate_workspaces || self.isolate_monitors
    }

    /// The extra `shortcut` binding is wanted
    pub fn extra_shortcut_enabled(&self) -> bool {
        self.hot_keys && (self.hotkeys_overlay || self.hotkeys_show_dock)
    }

    /// Keys whose value differs between `old` and `new`, in `SettingKey` order
    pub fn changed_keys(old: &Self, new: &Self) -> SmallVec<[SettingKey; 8]> {
        let mut keys = SmallVec::new();

        macro_rules! diff {
            ($($field:ident => $key:ident),* $(,)?) => {
                $(
                    if old.$field != new.$field {
                        keys.push(SettingKey::$key);
                    }
                )*
            };
        }

        diff! {
            dock_fixed => DockFixed,
            autohide => Autohide,
            autohide_in_fullscreen => AutohideInFullscreen,
            intellihide => Intellihide,
            intellihide_mode => IntellihideMode,
            extend_height => ExtendHeight,
            height_fraction => HeightFraction,
            animation_time => AnimationTime,
            hide_delay => HideDelay,
            show_delay => ShowDelay,
            require_pressure_to_show => RequirePressureToShow,
            pressure_threshold => PressureThreshold,
            multi_monitor => MultiMonitor,
            preferred_monitor => PreferredMonitor,
            dock_position => DockPosition,
            scroll_action => ScrollAction,
            hot_keys => HotKeys,
            hotkeys_overlay => HotkeysOverlay,
            hotkeys_show_dock => HotkeysShowDock,
            shortcut_timeout => ShortcutTimeout,
            isolate_workspaces => IsolateWorkspaces,
            isolate_monitors => IsolateMonitors,
            dash_max_icon_size => DashMaxIconSize,
            show_favorites => ShowFavorites,
            show_running => ShowRunning,
            slideout_size => SlideoutSize,
        }

        keys
    }
}
