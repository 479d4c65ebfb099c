use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An application pinned to the launcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedApp {
    pub id: CompactString,
    pub name: CompactString,
    pub command: CompactString,
    #[serde(default = "default_icon")]
    pub icon: CompactString,
    /// Window class of the running application, when it differs from `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<CompactString>,
}

fn default_icon() -> CompactString {
    "application-x-executable".into()
}

impl PinnedApp {
    pub fn new(id: &str, name: &str, command: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            command: command.into(),
            icon: default_icon(),
            class: None,
        }
    }

    /// Whether a window with this class belongs to the app
    pub fn matches_class(&self, class: &str) -> bool {
        let own = self.class.as_deref().unwrap_or(&self.id);
        own.eq_ignore_ascii_case(class)
    }
}

/// Launcher configuration (pinned.json)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default)]
    pub pinned_apps: Vec<PinnedApp>,
}

impl LauncherConfig {
    pub fn load(path: &Path) -> Self {
        std::fs::read(path)
            .ok()
            .and_then(|data| serde_json::from_slice(&data).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let dir = path.parent().ok_or_else(|| anyhow::anyhow!("Invalid path"))?;
        std::fs::create_dir_all(dir)?;
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_match_falls_back_to_id() {
        let mut app = PinnedApp::new("firefox", "Firefox", "firefox");
        assert!(app.matches_class("Firefox"));

        app.class = Some("org.mozilla.firefox".into());
        assert!(!app.matches_class("firefox"));
        assert!(app.matches_class("org.mozilla.firefox"));
    }

    #[test]
    fn roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raven-dock/pinned.json");

        let config = LauncherConfig {
            pinned_apps: vec![PinnedApp::new("foot", "Terminal", "foot")],
        };
        config.save(&path).unwrap();

        assert_eq!(LauncherConfig::load(&path), config);
        assert!(LauncherConfig::load(&dir.path().join("missing.json")).pinned_apps.is_empty());
    }
}
