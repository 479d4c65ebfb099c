mod docked;
mod edge;
mod state;
mod timers;

pub use docked::{DockSnapshot, DockedDash};
pub use edge::{barrier_spec, pointer_in_dock_region, should_dwell};
pub use state::{DockModes, VisibilityState};
pub use timers::{DockTimer, DockTimers};

use crate::config::{DockSettings, SettingKey};
use crate::messages::DockNotification;
use crate::platform::Platform;

/// What a dock needs from its owner for the duration of one call
pub struct DockContext<'a> {
    pub settings: &'a DockSettings,
    pub platform: &'a mut dyn Platform,
    pub outbox: &'a mut Vec<DockNotification>,
}

/// Reactions a dock wires to signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockAction {
    ResetPosition,
    UpdateBarrier,
    UpdateDashVisibility,
    UpdateVisibilityMode,
    UpdateStaticBox,
    SyncHover,
    DragStart,
    DragEnd,
    OverviewShowing,
    OverviewHiding,
    OverviewHidden,
    FixedChanged,
    AutohideChanged,
    IntellihideModeChanged,
    RebuildDwell,
    RebuildPressure,
    SetIconSize,
    ResetAppIcons,
    UpdateSlideout,
    UpdateScrollAction,
    ScrollWorkspace,
    QueueRedisplay,
}

/// Per-dock reaction to a settings key, if any
pub fn setting_action(key: SettingKey) -> Option<DockAction> {
    let action = match key {
        SettingKey::DockFixed => DockAction::FixedChanged,
        SettingKey::Autohide => DockAction::AutohideChanged,
        SettingKey::Intellihide => DockAction::UpdateVisibilityMode,
        SettingKey::IntellihideMode => DockAction::IntellihideModeChanged,
        SettingKey::AutohideInFullscreen => DockAction::UpdateBarrier,
        SettingKey::ExtendHeight | SettingKey::HeightFraction => DockAction::ResetPosition,
        SettingKey::RequirePressureToShow => DockAction::RebuildDwell,
        SettingKey::PressureThreshold | SettingKey::ShowDelay => DockAction::RebuildPressure,
        SettingKey::DashMaxIconSize => DockAction::SetIconSize,
        SettingKey::ShowFavorites | SettingKey::ShowRunning => DockAction::ResetAppIcons,
        SettingKey::SlideoutSize => DockAction::UpdateSlideout,
        SettingKey::ScrollAction => DockAction::UpdateScrollAction,
        _ => return None,
    };
    Some(action)
}
