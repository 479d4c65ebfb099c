use compact_str::{format_compact, CompactString};
use tracing::{debug, warn};

use crate::config::{DockSettings, SettingKey};
use crate::dock::{DockContext, DockedDash};
use crate::platform::Platform;

/// Hotkeys per modifier group
pub const NUM_HOTKEYS: usize = 10;

const HOTKEY_PREFIXES: [&str; 3] = ["app-hotkey-", "app-shift-hotkey-", "app-ctrl-hotkey-"];

/// Binding that only shows the overlay
pub const EXTRA_SHORTCUT: &str = "shortcut";

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hotkey {
    /// Activate the app at this index on the main dock, then show the overlay
    App(usize),
    Overlay,
}

impl Hotkey {
    pub fn parse(name: &str) -> Option<Self> {
        if name == EXTRA_SHORTCUT {
            return Some(Self::Overlay);
        }

        let number = HOTKEY_PREFIXES
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix))?;
        match number.parse::<usize>() {
            Ok(n) if (1..=NUM_HOTKEYS).contains(&n) => Some(Self::App(n - 1)),
            _ => None,
        }
    }
}

/// Keyboard shortcuts for launcher apps and the number overlay
#[derive(Debug, Default)]
pub struct KeyboardShortcuts {
    hotkeys_enabled: bool,
    extra_enabled: bool,
    bound: Vec<CompactString>,
}

impl KeyboardShortcuts {
    pub fn new(settings: &DockSettings, platform: &mut dyn Platform) -> Self {
        let mut shortcuts = Self::default();
        if settings.hot_keys {
            shortcuts.enable_hotkeys(platform);
        }
        shortcuts.check_extra_shortcut(settings, platform);
        shortcuts
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bound.iter().any(|b| b == name)
    }

    pub fn bound(&self) -> &[CompactString] {
        &self.bound
    }

    fn bind(&mut self, name: CompactString, platform: &mut dyn Platform) {
        if platform.add_keybinding(&name) {
            self.bound.push(name);
        } else {
            warn!("Could not bind keyboard shortcut {}", name);
        }
    }

    fn unbind(&mut self, name: &str, platform: &mut dyn Platform) {
        if let Some(pos) = self.bound.iter().position(|b| b == name) {
            self.bound.remove(pos);
            platform.remove_keybinding(name);
        }
    }

    fn enable_hotkeys(&mut self, platform: &mut dyn Platform) {
        if self.hotkeys_enabled {
            return;
        }
        for prefix in HOTKEY_PREFIXES {
            for n in 1..=NUM_HOTKEYS {
                self.bind(format_compact!("{}{}", prefix, n), platform);
            }
        }
        self.hotkeys_enabled = true;
        debug!("App hotkeys enabled");
    }

    fn disable_hotkeys(&mut self, platform: &mut dyn Platform) {
        if !self.hotkeys_enabled {
            return;
        }
        for prefix in HOTKEY_PREFIXES {
            for n in 1..=NUM_HOTKEYS {
                self.unbind(&format_compact!("{}{}", prefix, n), platform);
            }
        }
        self.hotkeys_enabled = false;
        debug!("App hotkeys disabled");
    }

    fn check_extra_shortcut(&mut self, settings: &DockSettings, platform: &mut dyn Platform) {
        let wanted = settings.extra_shortcut_enabled();
        if wanted && !self.extra_enabled {
            self.bind(EXTRA_SHORTCUT.into(), platform);
            self.extra_enabled = true;
        } else if !wanted && self.extra_enabled {
            self.unbind(EXTRA_SHORTCUT, platform);
            self.extra_enabled = false;
        }
    }

    pub fn settings_changed(
        &mut self,
        key: SettingKey,
        settings: &DockSettings,
        platform: &mut dyn Platform,
    ) {
        match key {
            SettingKey::HotKeys => {
                if settings.hot_keys {
                    self.enable_hotkeys(platform);
                } else {
                    self.disable_hotkeys(platform);
                }
                self.check_extra_shortcut(settings, platform);
            }
            SettingKey::HotkeysOverlay | SettingKey::HotkeysShowDock => {
                self.check_extra_shortcut(settings, platform)
            }
            _ => {}
        }
    }

    /// Run a pressed binding against the docks, main dock first.
    /// Returns false for names that are not bound here.
    pub fn trigger(&self, name: &str, docks: &mut [DockedDash], ctx: &mut DockContext<'_>) -> bool {
        if !self.is_bound(name) {
            return false;
        }
        let Some(hotkey) = Hotkey::parse(name) else {
            return false;
        };

        if let Hotkey::App(index) = hotkey {
            if let Some(main) = docks.first_mut() {
                main.activate_app(index);
            }
        }
        for dock in docks.iter_mut() {
            dock.show_shortcut_overlay(ctx);
        }
        true
    }

    pub fn destroy(mut self, platform: &mut dyn Platform) {
        self.disable_hotkeys(platform);
        if self.extra_enabled {
            self.unbind(EXTRA_SHORTCUT, platform);
            self.extra_enabled = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePlatform;

    #[test]
    fn parses_binding_names() {
        assert_eq!(Hotkey::parse("app-hotkey-1"), Some(Hotkey::App(0)));
        assert_eq!(Hotkey::parse("app-ctrl-hotkey-10"), Some(Hotkey::App(9)));
        assert_eq!(Hotkey::parse("shortcut"), Some(Hotkey::Overlay));
        assert_eq!(Hotkey::parse("app-hotkey-0"), None);
        assert_eq!(Hotkey::parse("app-hotkey-11"), None);
        assert_eq!(Hotkey::parse("app-alt-hotkey-1"), None);
    }

    #[test]
    fn binds_all_groups_and_extra_shortcut() {
        let mut platform = FakePlatform::default();
        let settings = DockSettings::default();
        let shortcuts = KeyboardShortcuts::new(&settings, &mut platform);

        assert_eq!(shortcuts.bound().len(), 31);
        assert!(platform.keybindings.iter().any(|k| k == "app-shift-hotkey-7"));
        assert!(shortcuts.is_bound(EXTRA_SHORTCUT));

        shortcuts.destroy(&mut platform);
        assert!(platform.keybindings.is_empty());
    }

    #[test]
    fn extra_shortcut_follows_options() {
        let mut platform = FakePlatform::default();
        let mut settings = DockSettings::default();
        let mut shortcuts = KeyboardShortcuts::new(&settings, &mut platform);

        settings.hotkeys_overlay = false;
        shortcuts.settings_changed(SettingKey::HotkeysOverlay, &settings, &mut platform);
        assert!(shortcuts.is_bound(EXTRA_SHORTCUT));

        settings.hotkeys_show_dock = false;
        shortcuts.settings_changed(SettingKey::HotkeysShowDock, &settings, &mut platform);
        assert!(!shortcuts.is_bound(EXTRA_SHORTCUT));
        assert!(!platform.keybindings.iter().any(|k| k == EXTRA_SHORTCUT));

        settings.hot_keys = false;
        shortcuts.settings_changed(SettingKey::HotKeys, &settings, &mut platform);
        assert!(shortcuts.bound().is_empty());
    }

    #[test]
    fn rejected_bindings_are_not_tracked() {
        let mut platform = FakePlatform::default();
        platform.rejected_keybindings.push("app-hotkey-3".into());
        let shortcuts = KeyboardShortcuts::new(&DockSettings::default(), &mut platform);

        assert!(!shortcuts.is_bound("app-hotkey-3"));
        assert!(shortcuts.is_bound("app-hotkey-4"));
    }
}
