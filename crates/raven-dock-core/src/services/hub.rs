use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{error, info};

use super::{ConfigWatcher, HyprlandService, IpcServer, SharedStatus};
use crate::config::ConfigPaths;
use crate::messages::{CompositorCommand, ShellEvent};

/// Central hub for managing all async services
pub struct ServiceHub {
    /// Event sender for broadcasting to GTK
    event_tx: async_channel::Sender<ShellEvent>,
    /// Event receiver for the GTK loop
    event_rx: async_channel::Receiver<ShellEvent>,
    /// Requests for the compositor
    command_tx: mpsc::Sender<CompositorCommand>,
    /// Dock status served over IPC
    status: SharedStatus,
    runtime: Arc<Runtime>,
}

impl ServiceHub {
    /// Create a new ServiceHub with its own tokio runtime
    pub fn new(paths: ConfigPaths) -> anyhow::Result<Self> {
        let runtime = Arc::new(Runtime::new()?);

        let (event_tx, event_rx) = async_channel::bounded::<ShellEvent>(64);
        let (command_tx, command_rx) = mpsc::channel::<CompositorCommand>(64);
        let status = SharedStatus::default();

        let event_tx_hyprland = event_tx.clone();
        runtime.spawn(async move {
            let service = HyprlandService::new(event_tx_hyprland, command_rx);
            if let Err(e) = service.run().await {
                error!("Hyprland service error: {}", e);
            }
        });

        let event_tx_config = event_tx.clone();
        let watcher_paths = paths.clone();
        runtime.spawn(async move {
            let watcher = ConfigWatcher::new(watcher_paths, event_tx_config);
            if let Err(e) = watcher.run().await {
                error!("Config watcher error: {}", e);
            }
        });

        let event_tx_ipc = event_tx.clone();
        let ipc_status = status.clone();
        runtime.spawn(async move {
            let server = IpcServer::new(paths.socket, event_tx_ipc, ipc_status);
            if let Err(e) = server.run().await {
                error!("IPC server error: {}", e);
            }
        });

        info!("ServiceHub initialized with all services");

        Ok(Self {
            event_tx,
            event_rx,
            command_tx,
            status,
            runtime,
        })
    }

    /// Get a clone of the event receiver for the GTK loop
    pub fn event_receiver(&self) -> async_channel::Receiver<ShellEvent> {
        self.event_rx.clone()
    }

    /// Get a clone of the compositor command sender
    pub fn command_sender(&self) -> mpsc::Sender<CompositorCommand> {
        self.command_tx.clone()
    }

    /// Get a clone of the event sender (for internal use)
    pub fn event_sender(&self) -> async_channel::Sender<ShellEvent> {
        self.event_tx.clone()
    }

    /// Status snapshot the IPC server answers from
    pub fn status(&self) -> SharedStatus {
        self.status.clone()
    }

    /// Enter the runtime context (for GTK callbacks)
    pub fn enter_runtime(&self) -> tokio::runtime::EnterGuard<'_> {
        self.runtime.enter()
    }

    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }
}
