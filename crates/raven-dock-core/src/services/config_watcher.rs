use async_channel::Sender;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{ConfigPaths, DockSettings, LauncherConfig};
use crate::messages::ShellEvent;

const DEBOUNCE: Duration = Duration::from_millis(100);

/// Which watched file a change belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchedFile {
    Settings,
    PinnedApps,
}

/// Service that watches the settings and pinned apps files using inotify
pub struct ConfigWatcher {
    paths: ConfigPaths,
    event_tx: Sender<ShellEvent>,
}

impl ConfigWatcher {
    pub fn new(paths: ConfigPaths, event_tx: Sender<ShellEvent>) -> Self {
        Self { paths, event_tx }
    }

    fn classify(&self, path: &Path) -> Option<WatchedFile> {
        if path == self.paths.settings {
            Some(WatchedFile::Settings)
        } else if path == self.paths.pinned_apps {
            Some(WatchedFile::PinnedApps)
        } else {
            None
        }
    }

    /// Run the config watcher (blocks forever)
    pub async fn run(self) -> anyhow::Result<()> {
        info!("Starting config watcher");

        let dirs = self.paths.watch_dirs();
        for dir in &dirs {
            let _ = tokio::fs::create_dir_all(dir).await;
        }

        let (notify_tx, mut notify_rx) = mpsc::channel::<PathBuf>(32);

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        for path in event.paths {
                            let _ = notify_tx.blocking_send(path);
                        }
                    }
                }
            },
            notify::Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        // Files may not exist yet, so watch their directories
        for dir in &dirs {
            if dir.exists() {
                watcher.watch(dir, RecursiveMode::NonRecursive)?;
                debug!("Watching directory: {:?}", dir);
            }
        }

        let mut debounce_deadline: Option<tokio::time::Instant> = None;
        let mut pending_settings = false;
        let mut pending_pinned = false;

        loop {
            tokio::select! {
                Some(path) = notify_rx.recv() => {
                    match self.classify(&path) {
                        Some(WatchedFile::Settings) => pending_settings = true,
                        Some(WatchedFile::PinnedApps) => pending_pinned = true,
                        None => continue,
                    }
                    debounce_deadline = Some(tokio::time::Instant::now() + DEBOUNCE);
                }

                _ = async {
                    match debounce_deadline {
                        Some(deadline) => tokio::time::sleep_until(deadline).await,
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    debounce_deadline = None;

                    if std::mem::take(&mut pending_settings) {
                        self.reload_settings().await;
                    }
                    if std::mem::take(&mut pending_pinned) {
                        self.reload_pinned_apps().await;
                    }
                }
            }
        }
    }

    async fn reload_settings(&self) {
        debug!("Reloading dock settings: {:?}", self.paths.settings);

        match read_json::<DockSettings>(&self.paths.settings).await {
            Ok(Some(settings)) => {
                info!("Dock settings reloaded");
                let _ = self.event_tx.send(ShellEvent::SettingsReloaded(settings)).await;
            }
            Ok(None) => {}
            // Keep the current settings while the file is half written
            Err(e) => warn!("Failed to parse dock settings: {}", e),
        }
    }

    async fn reload_pinned_apps(&self) {
        debug!("Reloading pinned apps: {:?}", self.paths.pinned_apps);

        match read_json::<LauncherConfig>(&self.paths.pinned_apps).await {
            Ok(Some(config)) => {
                info!("Pinned apps reloaded ({} apps)", config.pinned_apps.len());
                let _ = self
                    .event_tx
                    .send(ShellEvent::PinnedAppsReloaded(config))
                    .await;
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to parse pinned apps: {}", e),
        }
    }
}

/// Read and parse a JSON file; a missing or unreadable file is `None`
async fn read_json<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, serde_json::Error> {
    match tokio::fs::read(path).await {
        Ok(data) => serde_json::from_slice(&data).map(Some),
        Err(e) => {
            debug!("Could not read {:?}: {}", path, e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn classifies_watched_files_only() {
        let (tx, _rx) = async_channel::bounded(4);
        let watcher = ConfigWatcher::new(ConfigPaths::in_dir(Path::new("/tmp/dock")), tx);

        assert_eq!(
            watcher.classify(Path::new("/tmp/dock/dock-settings.json")),
            Some(WatchedFile::Settings)
        );
        assert_eq!(
            watcher.classify(Path::new("/tmp/dock/pinned.json")),
            Some(WatchedFile::PinnedApps)
        );
        assert_eq!(watcher.classify(Path::new("/tmp/dock/other.json")), None);
    }

    #[test]
    fn reload_sends_parsed_settings() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::in_dir(dir.path());
        std::fs::write(&paths.settings, r#"{ "dock-fixed": true }"#).unwrap();

        let (tx, rx) = async_channel::bounded(4);
        let watcher = ConfigWatcher::new(paths, tx);

        runtime().block_on(watcher.reload_settings());
        match rx.try_recv() {
            Ok(ShellEvent::SettingsReloaded(settings)) => assert!(settings.dock_fixed),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn invalid_file_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::in_dir(dir.path());
        std::fs::write(&paths.pinned_apps, "{ not json").unwrap();

        let (tx, rx) = async_channel::bounded(4);
        let watcher = ConfigWatcher::new(paths, tx);

        runtime().block_on(watcher.reload_pinned_apps());
        assert!(rx.try_recv().is_err());
    }
}
