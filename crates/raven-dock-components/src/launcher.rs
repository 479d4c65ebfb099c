use ahash::{AHashMap, AHashSet};
use compact_str::CompactString;
use gtk4::prelude::*;
use gtk4::{Align, Box as GtkBox, Button, GestureClick, Image, Label, Orientation, Overlay, Popover};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use raven_dock_core::animation::{AnimationKind, IconId};
use raven_dock_core::features::NUM_HOTKEYS;
use raven_dock_core::geometry::Size;
use raven_dock_core::{
    CompositorCommand, DockEvent, Launcher, LauncherConfig, MonitorSnapshot, PinnedApp, Side,
    WindowSnapshot,
};

const MIN_ICON_SIZE: i32 = 16;
/// Button padding and spacing around each icon
const ITEM_PADDING: i32 = 16;

/// Which apps the launcher lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LauncherOptions {
    pub show_favorites: bool,
    pub show_running: bool,
    pub isolate_workspaces: bool,
    pub isolate_monitors: bool,
}

impl Default for LauncherOptions {
    fn default() -> Self {
        Self {
            show_favorites: true,
            show_running: true,
            isolate_workspaces: false,
            isolate_monitors: false,
        }
    }
}

/// Compositor and config state every launcher is built from
#[derive(Debug, Default)]
pub struct LauncherSource {
    pub outputs: Vec<MonitorSnapshot>,
    pub windows: Vec<WindowSnapshot>,
    pub pinned: LauncherConfig,
    pub options: LauncherOptions,
    /// Activation and listing restricted to the dock's workspace/monitor
    pub isolated: bool,
    /// Addresses of windows asking for attention
    pub urgent: AHashSet<CompactString>,
}

pub type SharedSource = Rc<RefCell<LauncherSource>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherItem {
    pub id: CompactString,
    pub name: CompactString,
    pub icon: CompactString,
    pub command: CompactString,
    /// Window class used to focus the running app
    pub class: CompactString,
    pub pinned: bool,
    pub running: bool,
    pub focused: bool,
    pub urgent: bool,
}

impl LauncherItem {
    fn pinned(app: &PinnedApp) -> Self {
        Self {
            id: app.id.clone(),
            name: app.name.clone(),
            icon: app.icon.clone(),
            command: app.command.clone(),
            class: app.class.clone().unwrap_or_else(|| app.id.clone()),
            pinned: true,
            running: false,
            focused: false,
            urgent: false,
        }
    }

    fn running(class: &CompactString) -> Self {
        let lower: CompactString = class.to_lowercase().into();
        Self {
            id: class.clone(),
            name: class.clone(),
            icon: lower.clone(),
            command: lower,
            class: class.clone(),
            pinned: false,
            running: false,
            focused: false,
            urgent: false,
        }
    }

    fn absorb(&mut self, window: &WindowSnapshot, urgent: &AHashSet<CompactString>) {
        self.running = true;
        self.focused |= window.focused;
        self.urgent |= urgent.contains(&window.address);
    }
}

/// Whether a window is listed on the dock of `output`
fn in_scope(window: &WindowSnapshot, output: Option<&MonitorSnapshot>, source: &LauncherSource) -> bool {
    let Some(output) = output.filter(|_| source.isolated) else {
        return true;
    };
    if source.options.isolate_monitors && window.monitor != output.id {
        return false;
    }
    if source.options.isolate_workspaces && window.workspace != output.active_workspace {
        return false;
    }
    true
}

/// Items of the dock on output `monitor`: pinned apps first, then other running apps
pub fn collect_items(source: &LauncherSource, monitor: usize) -> Vec<LauncherItem> {
    let output = source.outputs.get(monitor);
    let mut items: Vec<LauncherItem> = Vec::new();

    if source.options.show_favorites {
        items.extend(source.pinned.pinned_apps.iter().map(LauncherItem::pinned));
    }

    let mut running: AHashMap<CompactString, usize> = AHashMap::new();
    for window in source.windows.iter().filter(|w| in_scope(w, output, source)) {
        if let Some(item) = items
            .iter_mut()
            .filter(|i| i.pinned)
            .find(|i| i.class.eq_ignore_ascii_case(&window.class))
        {
            item.absorb(window, &source.urgent);
            continue;
        }
        if !source.options.show_running {
            continue;
        }

        let index = *running.entry(window.class.clone()).or_insert_with(|| {
            items.push(LauncherItem::running(&window.class));
            items.len() - 1
        });
        items[index].absorb(window, &source.urgent);
    }

    items
}

struct ItemWidgets {
    root: Overlay,
    button: Button,
    image: Image,
    number: Label,
}

struct LauncherInner {
    monitor: usize,
    orientation: Orientation,
    container: GtkBox,
    source: SharedSource,
    items: RefCell<Vec<LauncherItem>>,
    widgets: RefCell<Vec<ItemWidgets>>,
    icon_size: Cell<i32>,
    max_size: Cell<Option<Size>>,
    numbers_visible: Cell<bool>,
    menu_open: Cell<bool>,
    natural: Cell<Size>,
    /// Icons reported as dancing, by item id
    animating: RefCell<AHashMap<CompactString, IconId>>,
    events: async_channel::Sender<DockEvent>,
    commands: mpsc::Sender<CompositorCommand>,
}

/// Icon list of one dock
#[derive(Clone)]
pub struct LauncherBox {
    inner: Rc<LauncherInner>,
}

/// Handle the platform keeps to refresh live launchers
#[derive(Clone)]
pub struct WeakLauncher(Weak<LauncherInner>);

impl WeakLauncher {
    pub fn upgrade(&self) -> Option<LauncherBox> {
        self.0.upgrade().map(|inner| LauncherBox { inner })
    }
}

impl LauncherBox {
    pub fn new(
        monitor: usize,
        side: Side,
        source: SharedSource,
        events: async_channel::Sender<DockEvent>,
        commands: mpsc::Sender<CompositorCommand>,
    ) -> Self {
        let orientation = if side.is_horizontal() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };

        let container = GtkBox::new(orientation, 4);
        container.add_css_class("dock-container");

        let launcher = Self {
            inner: Rc::new(LauncherInner {
                monitor,
                orientation,
                container,
                source,
                items: RefCell::new(Vec::new()),
                widgets: RefCell::new(Vec::new()),
                icon_size: Cell::new(48),
                max_size: Cell::new(None),
                numbers_visible: Cell::new(false),
                menu_open: Cell::new(false),
                natural: Cell::new(Size::default()),
                animating: RefCell::new(AHashMap::new()),
                events,
                commands,
            }),
        };
        launcher.redisplay(true);
        launcher
    }

    pub fn widget(&self) -> &GtkBox {
        &self.inner.container
    }

    pub fn downgrade(&self) -> WeakLauncher {
        WeakLauncher(Rc::downgrade(&self.inner))
    }

    fn send(&self, event: DockEvent) {
        let _ = self.inner.events.try_send(event);
    }

    /// Rebuild the item list from the source; `force` recreates every widget
    pub fn redisplay(&self, force: bool) {
        let items = collect_items(&self.inner.source.borrow(), self.inner.monitor);

        let same_apps = {
            let current = self.inner.items.borrow();
            current.len() == items.len() && current.iter().zip(&items).all(|(a, b)| a.id == b.id)
        };

        if force || !same_apps {
            self.rebuild(&items);
        } else {
            for (widgets, item) in self.inner.widgets.borrow().iter().zip(&items) {
                apply_state(&widgets.button, item);
            }
        }
        *self.inner.items.borrow_mut() = items;

        self.update_animations();
        self.check_resize();
    }

    fn rebuild(&self, items: &[LauncherItem]) {
        let container = &self.inner.container;
        for widgets in self.inner.widgets.borrow_mut().drain(..) {
            container.remove(&widgets.root);
        }

        let mut widgets = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let item_widgets = self.create_item(index, item);
            container.append(&item_widgets.root);
            widgets.push(item_widgets);
        }
        *self.inner.widgets.borrow_mut() = widgets;

        self.apply_icon_size();
        debug!("Launcher on monitor {} rebuilt with {} items", self.inner.monitor, items.len());
    }

    fn create_item(&self, index: usize, item: &LauncherItem) -> ItemWidgets {
        let image = Image::from_icon_name(&item.icon);
        image.set_pixel_size(self.inner.icon_size.get());

        let button = Button::new();
        button.set_child(Some(&image));
        button.set_tooltip_text(Some(item.name.as_str()));
        button.add_css_class("dock-item");
        apply_state(&button, item);

        let number = Label::new(Some(hotkey_label(index).as_str()));
        number.add_css_class("dock-number");
        number.set_halign(Align::End);
        number.set_valign(Align::Start);
        number.set_can_target(false);
        number.set_visible(self.inner.numbers_visible.get() && index < NUM_HOTKEYS);

        let root = Overlay::new();
        root.set_child(Some(&button));
        root.add_overlay(&number);

        let weak = self.downgrade();
        button.connect_clicked(move |_| {
            if let Some(launcher) = weak.upgrade() {
                launcher.activate(index);
            }
        });

        // Right click: context menu
        let gesture = GestureClick::new();
        gesture.set_button(3);
        let weak = self.downgrade();
        let anchor = button.clone();
        gesture.connect_pressed(move |_, _, _, _| {
            if let Some(launcher) = weak.upgrade() {
                launcher.show_context_menu(&anchor, index);
            }
        });
        button.add_controller(gesture);

        ItemWidgets {
            root,
            button,
            image,
            number,
        }
    }

    fn show_context_menu(&self, anchor: &Button, index: usize) {
        let Some(item) = self.inner.items.borrow().get(index).cloned() else {
            return;
        };

        let popover = Popover::new();
        popover.set_parent(anchor);
        popover.add_css_class("context-menu");

        let menu_box = GtkBox::new(Orientation::Vertical, 2);

        let new_window = Button::with_label("New Window");
        let commands = self.inner.commands.clone();
        let popover_clone = popover.clone();
        let command = item.command.clone();
        new_window.connect_clicked(move |_| {
            send_command(&commands, CompositorCommand::Launch(command.clone()));
            popover_clone.popdown();
        });
        menu_box.append(&new_window);

        if item.running {
            let focus = Button::with_label("Show Windows");
            let commands = self.inner.commands.clone();
            let popover_clone = popover.clone();
            let class = item.class.clone();
            focus.connect_clicked(move |_| {
                send_command(&commands, CompositorCommand::FocusClass(class.clone()));
                popover_clone.popdown();
            });
            menu_box.append(&focus);
        }

        popover.set_child(Some(&menu_box));

        let weak = self.downgrade();
        popover.connect_closed(move |popover| {
            if let Some(launcher) = weak.upgrade() {
                launcher.set_menu_open(false);
                launcher.send(DockEvent::MenuClosed {
                    monitor: launcher.inner.monitor,
                });
            }
            let popover = popover.clone();
            glib::idle_add_local_once(move || popover.unparent());
        });

        self.set_menu_open(true);
        popover.popup();
    }

    fn set_menu_open(&self, open: bool) {
        if self.inner.menu_open.replace(open) != open {
            self.send(DockEvent::RequiresVisibilityChanged {
                monitor: self.inner.monitor,
            });
        }
    }

    fn activate(&self, index: usize) -> bool {
        let Some(item) = self.inner.items.borrow().get(index).cloned() else {
            return false;
        };

        let command = if item.running {
            CompositorCommand::FocusClass(item.class)
        } else {
            CompositorCommand::Launch(item.command)
        };
        send_command(&self.inner.commands, command);
        true
    }

    /// Start or stop the dance of items whose windows want attention
    fn update_animations(&self) {
        let items = self.inner.items.borrow();
        let mut animating = self.inner.animating.borrow_mut();

        let stale: Vec<(CompactString, IconId)> = animating
            .iter()
            .filter(|(id, icon)| {
                items
                    .get(icon.0 as usize)
                    .map_or(true, |item| &item.id != *id || !item.urgent)
            })
            .map(|(id, icon)| (id.clone(), *icon))
            .collect();
        for (id, icon) in stale {
            animating.remove(&id);
            self.send_animation(icon, false);
        }

        for (index, item) in items.iter().enumerate() {
            if item.urgent && !animating.contains_key(&item.id) {
                let icon = IconId(index as u32);
                animating.insert(item.id.clone(), icon);
                self.send_animation(icon, true);
            }
        }
    }

    fn send_animation(&self, icon: IconId, active: bool) {
        self.send(DockEvent::IconAnimation {
            monitor: self.inner.monitor,
            icon,
            kind: AnimationKind::Dance,
            active,
        });
    }

    fn measure(&self) -> Size {
        let container = &self.inner.container;
        let (_, width, _, _) = container.measure(Orientation::Horizontal, -1);
        let (_, height, _, _) = container.measure(Orientation::Vertical, -1);
        Size::new(width, height)
    }

    fn check_resize(&self) {
        let size = self.measure();
        if self.inner.natural.replace(size) != size {
            self.send(DockEvent::LauncherResized {
                monitor: self.inner.monitor,
            });
        }
    }

    /// Icon size actually used: the configured one, shrunk to fit the maximum length
    fn effective_icon_size(&self) -> i32 {
        let configured = self.inner.icon_size.get();
        let Some(max) = self.inner.max_size.get() else {
            return configured;
        };
        let along = if self.inner.orientation == Orientation::Horizontal {
            max.width
        } else {
            max.height
        };
        let count = self.inner.items.borrow().len().max(1) as i32;
        configured.min(along / count - ITEM_PADDING).max(MIN_ICON_SIZE)
    }

    fn apply_icon_size(&self) {
        let size = self.effective_icon_size();
        for widgets in self.inner.widgets.borrow().iter() {
            widgets.image.set_pixel_size(size);
        }
    }
}

fn hotkey_label(index: usize) -> String {
    ((index + 1) % 10).to_string()
}

fn apply_state(button: &Button, item: &LauncherItem) {
    for (class, on) in [
        ("dock-item-pinned", item.pinned),
        ("dock-item-running", item.running),
        ("dock-item-focused", item.focused),
    ] {
        if on {
            button.add_css_class(class);
        } else {
            button.remove_css_class(class);
        }
    }
}

fn send_command(commands: &mpsc::Sender<CompositorCommand>, command: CompositorCommand) {
    if let Err(e) = commands.try_send(command) {
        warn!("Failed to queue compositor command: {}", e);
    }
}

impl Launcher for LauncherBox {
    fn requires_visibility(&self) -> bool {
        self.inner.menu_open.get()
    }

    fn set_max_size(&mut self, size: Size) {
        if self.inner.max_size.replace(Some(size)) != Some(size) {
            self.apply_icon_size();
        }
    }

    fn natural_size(&self) -> Size {
        self.measure()
    }

    fn app_count(&self) -> usize {
        self.inner.items.borrow().len()
    }

    fn activate_app(&mut self, index: usize) -> bool {
        self.activate(index)
    }

    fn set_number_overlay(&mut self, visible: bool) {
        self.inner.numbers_visible.set(visible);
        for (index, widgets) in self.inner.widgets.borrow().iter().enumerate() {
            widgets.number.set_visible(visible && index < NUM_HOTKEYS);
        }
    }

    fn reset_app_icons(&mut self) {
        self.redisplay(true);
    }

    fn queue_redisplay(&mut self) {
        self.redisplay(false);
    }

    fn focus_first(&mut self) {
        if let Some(widgets) = self.inner.widgets.borrow().first() {
            widgets.button.grab_focus();
        }
    }

    fn apply_icon_rotation(&mut self, icon: IconId, degrees: f64) {
        if let Some(widgets) = self.inner.widgets.borrow().get(icon.0 as usize) {
            if degrees.abs() > 0.5 {
                widgets.button.add_css_class("dock-item-attention");
            } else {
                widgets.button.remove_css_class("dock-item-attention");
            }
        }
    }

    fn set_icon_size(&mut self, size: i32) {
        self.inner.icon_size.set(size.max(MIN_ICON_SIZE));
        self.apply_icon_size();
        self.check_resize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raven_dock_core::geometry::Rect;

    fn output(id: i64, workspace: i32) -> MonitorSnapshot {
        MonitorSnapshot {
            id,
            name: "DP-1".into(),
            rect: Rect::new(0, 0, 1920, 1080),
            work_area: Rect::new(0, 0, 1920, 1080),
            focused: true,
            fullscreen: false,
            active_workspace: workspace,
        }
    }

    fn window(address: &str, class: &str, monitor: i64, workspace: i32) -> WindowSnapshot {
        WindowSnapshot {
            address: address.into(),
            class: class.into(),
            rect: Rect::new(0, 0, 800, 600),
            monitor,
            workspace,
            fullscreen: false,
            focused: false,
        }
    }

    fn source() -> LauncherSource {
        LauncherSource {
            outputs: vec![output(0, 1), output(1, 2)],
            windows: vec![
                window("0xa", "firefox", 0, 1),
                window("0xb", "kitty", 1, 2),
                window("0xc", "kitty", 0, 1),
            ],
            pinned: LauncherConfig {
                pinned_apps: vec![
                    PinnedApp::new("firefox", "Firefox", "firefox"),
                    PinnedApp::new("thunar", "Files", "thunar"),
                ],
            },
            ..Default::default()
        }
    }

    fn ids(items: &[LauncherItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn pinned_apps_come_first_and_running_apps_follow_once() {
        let items = collect_items(&source(), 0);

        assert_eq!(ids(&items), vec!["firefox", "thunar", "kitty"]);
        assert!(items[0].running && items[0].pinned);
        assert!(!items[1].running);
        assert!(items[2].running && !items[2].pinned);
        assert_eq!(items[2].command, "kitty");
    }

    #[test]
    fn options_hide_favorites_or_running_apps() {
        let mut source = source();
        source.options.show_running = false;
        assert_eq!(ids(&collect_items(&source, 0)), vec!["firefox", "thunar"]);

        source.options.show_running = true;
        source.options.show_favorites = false;
        assert_eq!(ids(&collect_items(&source, 0)), vec!["firefox", "kitty"]);
    }

    #[test]
    fn isolation_restricts_windows_to_the_dock_output() {
        let mut source = source();
        source.windows.remove(2);
        source.options.isolate_monitors = true;

        // Ignored until the host switches to isolated activation
        assert_eq!(ids(&collect_items(&source, 0)), vec!["firefox", "thunar", "kitty"]);

        source.isolated = true;
        assert_eq!(ids(&collect_items(&source, 0)), vec!["firefox", "thunar"]);
        let items = collect_items(&source, 1);
        assert_eq!(ids(&items), vec!["firefox", "thunar", "kitty"]);
        assert!(!items[0].running);
    }

    #[test]
    fn urgent_windows_mark_their_item() {
        let mut source = source();
        source.urgent.insert("0xb".into());

        let items = collect_items(&source, 0);
        let kitty = items.iter().find(|i| i.id == "kitty").map(|i| i.urgent);
        assert_eq!(kitty, Some(true));
        assert!(!items[0].urgent);
    }

    #[test]
    fn hotkey_labels_wrap_to_zero() {
        assert_eq!(hotkey_label(0), "1");
        assert_eq!(hotkey_label(9), "0");
    }
}
