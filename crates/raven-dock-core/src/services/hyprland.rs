use async_channel::Sender;
use hyprland::data::{Clients, CursorPosition, Monitors, Workspaces};
use hyprland::dispatch::{Dispatch, DispatchType, WindowIdentifier, WorkspaceIdentifierWithSpecial};
use hyprland::event_listener::EventListener;
use hyprland::shared::HyprData;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::geometry::{Point, Rect};
use crate::messages::{CompositorCommand, DockEvent, MonitorSnapshot, ShellEvent, WindowSnapshot};
use crate::platform::WorkspaceDirection;

/// Bursts of compositor events are folded into one state query
const REFRESH_DEBOUNCE: Duration = Duration::from_millis(30);
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Logical geometry of an output from its pixel size and scale
pub fn logical_rect(x: i32, y: i32, width: i32, height: i32, scale: f64) -> Rect {
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    Rect::new(
        x,
        y,
        (f64::from(width) / scale).round() as i32,
        (f64::from(height) / scale).round() as i32,
    )
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Output geometry minus the space layer surfaces reserve,
/// given as (left, top, right, bottom)
pub fn work_area(rect: Rect, reserved: (i32, i32, i32, i32)) -> Rect {
    let (left, top, right, bottom) = reserved;
    Rect::new(
        rect.x + left,
        rect.y + top,
        (rect.width - left - right).max(0),
        (rect.height - top - bottom).max(0),
    )
}

/// Async service for Hyprland IPC communication
pub struct HyprlandService {
    event_tx: Sender<ShellEvent>,
    command_rx: mpsc::Receiver<CompositorCommand>,
}

impl HyprlandService {
    pub fn new(event_tx: Sender<ShellEvent>, command_rx: mpsc::Receiver<CompositorCommand>) -> Self {
        Self {
            event_tx,
            command_rx,
        }
    }

    /// Check if Hyprland is running by looking for its socket
    fn is_hyprland_running() -> bool {
        let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") else {
            return false;
        };
        if let Ok(sig) = std::env::var("HYPRLAND_INSTANCE_SIGNATURE") {
            let socket_path = format!("{}/hypr/{}/.socket.sock", runtime_dir, sig);
            return std::path::Path::new(&socket_path).exists();
        }

        let hypr_dir = format!("{}/hypr", runtime_dir);
        std::fs::read_dir(&hypr_dir)
            .map(|entries| {
                entries
                    .flatten()
                    .any(|entry| entry.path().join(".socket.sock").exists())
            })
            .unwrap_or(false)
    }

    /// Main run loop - syncs initial state, starts the event listener, handles commands
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("Starting Hyprland service");

        loop {
            if Self::is_hyprland_running() {
                match Self::sync_state(&self.event_tx).await {
                    Ok(()) => break,
                    Err(e) => warn!("Failed to connect to Hyprland: {}, retrying in 2s", e),
                }
            } else {
                warn!("Hyprland not running, waiting...");
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
        let _ = self.event_tx.send(ShellEvent::HyprlandConnected).await;
        info!("Connected to Hyprland IPC");

        let (refresh_tx, refresh_rx) = mpsc::channel::<()>(16);
        let refresh_handle = tokio::spawn(Self::run_refresher(self.event_tx.clone(), refresh_rx));

        let event_tx = self.event_tx.clone();
        let listener_handle = tokio::spawn(async move {
            loop {
                if let Err(e) = Self::run_event_listener(event_tx.clone(), refresh_tx.clone()).await {
                    error!("Event listener error: {}, reconnecting...", e);
                    let _ = event_tx.send(ShellEvent::HyprlandDisconnected).await;
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    let _ = refresh_tx.try_send(());
                }
            }
        });

        while let Some(cmd) = self.command_rx.recv().await {
            if let Err(e) = Self::handle_command(cmd, &self.event_tx).await {
                error!("Failed to execute command: {}", e);
            }
        }

        listener_handle.abort();
        refresh_handle.abort();
        Ok(())
    }

    /// Query windows and outputs and forward them as snapshots
    async fn sync_state(tx: &Sender<ShellEvent>) -> anyhow::Result<()> {
        let workspaces = Workspaces::get_async().await?;
        let fullscreen_workspaces: Vec<i32> = workspaces
            .into_iter()
            .filter(|w| w.fullscreen)
            .map(|w| w.id)
            .collect();

        let monitors: Vec<MonitorSnapshot> = Monitors::get_async()
            .await?
            .into_iter()
            .map(|m| {
                let rect = logical_rect(
                    m.x as i32,
                    m.y as i32,
                    m.width as i32,
                    m.height as i32,
                    m.scale as f64,
                );
                let (left, top, right, bottom) = m.reserved;
                MonitorSnapshot {
                    id: m.id as i64,
                    name: m.name.as_str().into(),
                    rect,
                    work_area: work_area(
                        rect,
                        (left as i32, top as i32, right as i32, bottom as i32),
                    ),
                    focused: m.focused,
                    fullscreen: fullscreen_workspaces.contains(&m.active_workspace.id),
                    active_workspace: m.active_workspace.id,
                }
            })
            .collect();

        let windows: Vec<WindowSnapshot> = Clients::get_async()
            .await?
            .into_iter()
            .filter(|c| !c.workspace.name.starts_with("special:"))
            .map(|c| WindowSnapshot {
                address: c.address.to_string().into(),
                class: c.class.as_str().into(),
                rect: Rect::new(c.at.0 as i32, c.at.1 as i32, c.size.0 as i32, c.size.1 as i32),
                monitor: c.monitor as i64,
                workspace: c.workspace.id,
                fullscreen: c.fullscreen,
                focused: c.focus_history_id == 0,
            })
            .collect();

        debug!(
            "Synced {} monitor(s) and {} window(s)",
            monitors.len(),
            windows.len()
        );
        let _ = tx.send(ShellEvent::MonitorsChanged(monitors)).await;
        let _ = tx.send(ShellEvent::WindowsChanged(windows)).await;
        Ok(())
    }

    async fn run_refresher(tx: Sender<ShellEvent>, mut rx: mpsc::Receiver<()>) {
        while rx.recv().await.is_some() {
            tokio::time::sleep(REFRESH_DEBOUNCE).await;
            while rx.try_recv().is_ok() {}

            if let Err(e) = Self::sync_state(&tx).await {
                warn!("Failed to query Hyprland state: {}", e);
            }
        }
    }

    /// Run the event listener (blocks until error)
    async fn run_event_listener(tx: Sender<ShellEvent>, refresh: mpsc::Sender<()>) -> anyhow::Result<()> {
        let mut listener = EventListener::new();

        // Window set changes restack the launcher and move overlap targets
        let (tx1, r1) = (tx.clone(), refresh.clone());
        listener.add_window_open_handler(move |_| {
            let _ = tx1.send_blocking(ShellEvent::Dock(DockEvent::Restacked));
            let _ = r1.try_send(());
        });

        let (tx2, r2) = (tx.clone(), refresh.clone());
        listener.add_window_close_handler(move |_| {
            let _ = tx2.send_blocking(ShellEvent::Dock(DockEvent::Restacked));
            let _ = r2.try_send(());
        });

        let (tx3, r3) = (tx.clone(), refresh.clone());
        listener.add_active_window_change_handler(move |_| {
            let _ = tx3.send_blocking(ShellEvent::Dock(DockEvent::Restacked));
            let _ = r3.try_send(());
        });

        let (tx4, r4) = (tx.clone(), refresh.clone());
        listener.add_window_moved_handler(move |_| {
            let _ = tx4.send_blocking(ShellEvent::Dock(DockEvent::WindowEnteredMonitor));
            let _ = r4.try_send(());
        });

        let (tx5, r5) = (tx.clone(), refresh.clone());
        listener.add_workspace_change_handler(move |_| {
            let _ = tx5.send_blocking(ShellEvent::Dock(DockEvent::WorkspaceSwitched));
            let _ = r5.try_send(());
        });

        let r6 = refresh.clone();
        listener.add_fullscreen_state_change_handler(move |_| {
            let _ = r6.try_send(());
        });

        let r7 = refresh.clone();
        listener.add_monitor_added_handler(move |_| {
            let _ = r7.try_send(());
        });

        let r8 = refresh.clone();
        listener.add_monitor_removed_handler(move |_| {
            let _ = r8.try_send(());
        });

        let r9 = refresh.clone();
        listener.add_float_state_handler(move |_| {
            let _ = r9.try_send(());
        });

        let r10 = refresh;
        listener.add_active_monitor_change_handler(move |_| {
            let _ = r10.try_send(());
        });

        let tx11 = tx.clone();
        listener.add_urgent_state_handler(move |address| {
            let _ = tx11.send_blocking(ShellEvent::WindowUrgent(address.to_string().into()));
        });

        debug!("Starting Hyprland event listener");
        listener.start_listener_async().await?;

        Ok(())
    }

    async fn handle_command(cmd: CompositorCommand, tx: &Sender<ShellEvent>) -> anyhow::Result<()> {
        match cmd {
            CompositorCommand::SwitchWorkspace(direction) => {
                let offset = match direction {
                    WorkspaceDirection::Previous => -1,
                    WorkspaceDirection::Next => 1,
                };
                debug!("Switching workspace by {}", offset);
                Dispatch::call_async(DispatchType::Workspace(
                    WorkspaceIdentifierWithSpecial::Relative(offset),
                ))
                .await?;
            }

            CompositorCommand::FocusClass(class) => {
                debug!("Focusing class: {}", class);
                let pattern = format!("^{}$", class);
                Dispatch::call_async(DispatchType::FocusWindow(
                    WindowIdentifier::ClassRegularExpression(&pattern),
                ))
                .await?;
            }

            CompositorCommand::Launch(command) => {
                info!("Launching: {}", command);
                Dispatch::call_async(DispatchType::Exec(&command)).await?;
            }

            CompositorCommand::QueryCursor => {
                let cursor = CursorPosition::get_async().await?;
                let position = Point::new(saturate(cursor.x), saturate(cursor.y));
                let _ = tx.send(ShellEvent::CursorMoved(position)).await;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_outputs_use_logical_size() {
        assert_eq!(
            logical_rect(1920, 0, 3840, 2160, 2.0),
            Rect::new(1920, 0, 1920, 1080)
        );
        assert_eq!(logical_rect(0, 0, 2560, 1440, 1.25), Rect::new(0, 0, 2048, 1152));
        assert_eq!(logical_rect(0, 0, 1920, 1080, 0.0), Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn work_area_removes_reserved_edges() {
        let rect = Rect::new(1920, 0, 1920, 1080);
        assert_eq!(work_area(rect, (0, 32, 0, 0)), Rect::new(1920, 32, 1920, 1048));
        assert_eq!(work_area(rect, (64, 0, 0, 48)), Rect::new(1984, 0, 1856, 1032));
        assert_eq!(work_area(rect, (2000, 0, 0, 0)).width, 0);
    }
}
