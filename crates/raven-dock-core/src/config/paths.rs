use std::path::{Path, PathBuf};

/// Configuration and runtime paths of the dock
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub settings: PathBuf,
    pub pinned_apps: PathBuf,
    pub socket: PathBuf,
}

impl ConfigPaths {
    pub fn new() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let runtime_dir = dirs::runtime_dir().unwrap_or_else(std::env::temp_dir);

        Self {
            settings: home_dir.join(".config/raven/dock-settings.json"),
            pinned_apps: config_dir.join("raven-dock/pinned.json"),
            socket: runtime_dir.join("raven-dock.sock"),
        }
    }

    /// Paths rooted in a single directory, used by tests and `--config-dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            settings: dir.join("dock-settings.json"),
            pinned_apps: dir.join("pinned.json"),
            socket: dir.join("raven-dock.sock"),
        }
    }

    /// Directories that hold watched files
    pub fn watch_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for file in [&self.settings, &self.pinned_apps] {
            if let Some(parent) = file.parent() {
                if !dirs.iter().any(|d| d == parent) {
                    dirs.push(parent.to_path_buf());
                }
            }
        }
        dirs
    }
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_directory_is_watched_once() {
        let paths = ConfigPaths::in_dir(Path::new("/tmp/raven"));
        assert_eq!(paths.watch_dirs(), vec![PathBuf::from("/tmp/raven")]);
    }
}
