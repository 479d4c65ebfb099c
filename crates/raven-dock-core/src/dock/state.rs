use serde::{Deserialize, Serialize};

use crate::config::DockSettings;

/// Visibility of a dock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityState {
    #[default]
    Hidden,
    Showing,
    Shown,
    Hiding,
}

impl VisibilityState {
    /// Shown or on its way there
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Showing | Self::Shown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Showing => "showing",
            Self::Shown => "shown",
            Self::Hiding => "hiding",
        }
    }
}

/// Effective visibility modes; fixed switches the other two off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DockModes {
    pub fixed: bool,
    pub autohide: bool,
    pub intellihide: bool,
}

impl DockModes {
    pub fn from_settings(settings: &DockSettings) -> Self {
        if settings.dock_fixed {
            Self {
                fixed: true,
                autohide: false,
                intellihide: false,
            }
        } else {
            Self {
                fixed: false,
                autohide: settings.autohide,
                intellihide: settings.intellihide,
            }
        }
    }
}
