use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use glib::{ControlFlow, SourceId};
use gtk4::prelude::*;
use gtk4::gio::ApplicationHoldGuard;
use gtk4::Application;
use tracing::{debug, error, info, warn};

use raven_dock_components::{load_css, GtkPlatform};
use raven_dock_core::{
    ConfigPaths, DockCommand, DockEvent, DockManager, DockSettings, LauncherConfig, ServiceHub,
    SharedStatus, ShellEvent,
};

const APP_ID: &str = "org.ravenlinux.dock";

/// Animation frame interval
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Everything the GTK loop owns once the application is active
struct DockHost {
    manager: DockManager<GtkPlatform>,
    paths: ConfigPaths,
    status: SharedStatus,
    dock_tx: async_channel::Sender<DockEvent>,
    frame_source: Option<SourceId>,
    /// The docks are layer surfaces, not toplevels the app would wait for
    _hold: ApplicationHoldGuard,
}

impl DockHost {
    fn dispatch(&mut self, event: DockEvent) {
        self.manager.handle(event);
        self.after_dispatch();
    }

    fn handle_shell(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::Dock(event) => self.manager.handle(event),
            ShellEvent::MonitorsChanged(outputs) => {
                let changes = self.manager.platform_mut().set_outputs(outputs);
                if changes.monitors {
                    self.manager.handle(DockEvent::MonitorsChanged);
                } else {
                    if changes.work_areas {
                        self.manager.handle(DockEvent::WorkAreasChanged);
                    }
                    if changes.fullscreen {
                        self.manager.handle(DockEvent::FullscreenChanged);
                    }
                }
            }
            ShellEvent::WindowsChanged(windows) => {
                self.manager.platform_mut().set_windows(windows);
            }
            ShellEvent::WindowUrgent(address) => {
                self.manager.platform_mut().set_urgent(address);
            }
            ShellEvent::CursorMoved(position) => {
                self.manager.platform_mut().set_cursor(position);
            }
            ShellEvent::HyprlandConnected => info!("Connected to Hyprland"),
            ShellEvent::HyprlandDisconnected => warn!("Lost connection to Hyprland"),
            ShellEvent::SettingsReloaded(settings) => self.apply_settings(settings),
            ShellEvent::PinnedAppsReloaded(pinned) => {
                self.manager.platform_mut().set_pinned(pinned);
            }
            ShellEvent::Command(command) => self.handle_command(command),
        }
        self.after_dispatch();
    }

    fn handle_command(&mut self, command: DockCommand) {
        debug!("IPC command: {}", command);
        match command {
            DockCommand::Show(monitor) => self.manager.show(monitor),
            DockCommand::Hide(monitor) => self.manager.hide(monitor),
            DockCommand::Activate(n) => {
                if n == 0 || !self.manager.activate_app(n - 1) {
                    debug!("No app at position {}", n);
                }
            }
            DockCommand::Hotkey(name) => self.manager.handle(DockEvent::Keybinding(name)),
            DockCommand::ReloadConfig => {
                let settings = DockSettings::load(&self.paths.settings);
                let pinned = LauncherConfig::load(&self.paths.pinned_apps);
                self.manager.platform_mut().set_pinned(pinned);
                self.apply_settings(settings);
            }
            // Answered by the IPC server from the shared status
            DockCommand::Status => {}
        }
    }

    fn apply_settings(&mut self, settings: DockSettings) {
        self.manager.platform_mut().apply_settings(&settings);
        self.manager.handle(DockEvent::SettingsChanged(settings));
    }

    fn after_dispatch(&mut self) {
        for notification in self.manager.take_notifications() {
            debug!("Dock notification: {:?}", notification);
        }
        *self.status.write() = self.manager.status();

        let wants_frames = self.manager.wants_frames();
        match (wants_frames, self.frame_source.is_some()) {
            (true, false) => {
                let tx = self.dock_tx.clone();
                self.frame_source = Some(glib::timeout_add_local(FRAME_INTERVAL, move || {
                    let _ = tx.try_send(DockEvent::Frame);
                    ControlFlow::Continue
                }));
            }
            (false, true) => {
                if let Some(source) = self.frame_source.take() {
                    source.remove();
                }
            }
            _ => {}
        }
    }

    fn shutdown(&mut self) {
        if let Some(source) = self.frame_source.take() {
            source.remove();
        }
        self.manager.shutdown();
    }
}

/// Run the dock daemon
pub fn run(paths: ConfigPaths) -> anyhow::Result<()> {
    info!("Initializing Raven dock daemon");

    // Create service hub (starts tokio runtime and services)
    let services = Rc::new(ServiceHub::new(paths.clone())?);
    let _guard = services.enter_runtime();

    let settings = DockSettings::load(&paths.settings);
    let pinned = LauncherConfig::load(&paths.pinned_apps);

    let app = Application::builder()
        .application_id(APP_ID)
        .flags(gtk4::gio::ApplicationFlags::NON_UNIQUE)
        .build();

    let host: Rc<RefCell<Option<DockHost>>> = Rc::new(RefCell::new(None));

    let services_clone = services.clone();
    let host_clone = host.clone();
    app.connect_activate(move |app| {
        if host_clone.borrow().is_some() {
            return;
        }
        load_css();

        let (dock_tx, dock_rx) = async_channel::unbounded::<DockEvent>();
        let mut platform = GtkPlatform::new(
            app,
            dock_tx.clone(),
            services_clone.command_sender(),
            pinned.clone(),
        );
        platform.apply_settings(&settings);

        let manager = match DockManager::new(platform, settings.clone()) {
            Ok(manager) => manager,
            Err(e) => {
                error!("Failed to create dock manager: {}", e);
                app.quit();
                return;
            }
        };

        *host_clone.borrow_mut() = Some(DockHost {
            manager,
            paths: paths.clone(),
            status: services_clone.status(),
            dock_tx,
            frame_source: None,
            _hold: app.hold(),
        });

        let dock_host = host_clone.clone();
        glib::spawn_future_local(async move {
            while let Ok(event) = dock_rx.recv().await {
                if let Some(host) = dock_host.borrow_mut().as_mut() {
                    host.dispatch(event);
                }
            }
        });

        let shell_host = host_clone.clone();
        let event_rx = services_clone.event_receiver();
        glib::spawn_future_local(async move {
            while let Ok(event) = event_rx.recv().await {
                if let Some(host) = shell_host.borrow_mut().as_mut() {
                    host.handle_shell(event);
                }
            }
        });

        info!("Raven dock daemon activated");
    });

    let host_clone = host.clone();
    app.connect_shutdown(move |_| {
        let taken = host_clone.borrow_mut().take();
        if let Some(mut host) = taken {
            host.shutdown();
        }
    });

    // Run GTK main loop; our own arguments are already parsed
    let exit_code = app.run_with_args(&["raven-dock"]);

    info!("Raven dock daemon exiting");

    std::process::exit(exit_code.into());
}
