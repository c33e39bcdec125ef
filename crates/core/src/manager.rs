//! The window-manager context: registry tables, focus state, settings, and
//! the operations that populate and mutate them.
//!
//! All four tables, the focus record, and the configuration flags live in one
//! explicitly owned [`WindowManager`] passed by reference to every operation.
//! Everything here runs on the single control thread; no locking.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use aerie_ipc::{ChannelCommand, ControlChannel};

use crate::geometry::{Point, Size};
use crate::model::{pid_t, Application, ProcessHandle, SpaceId, View, Window, WindowId};
use crate::platform::{Platform, TilingEngine};
use crate::registry::Registry;

/// Focus-follows-mouse behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusFollowsMouse {
    #[default]
    Disabled,
    /// Focus the hovered window without raising it.
    Autofocus,
    /// Focus and raise the hovered window.
    Autoraise,
}

/// Shadow suppression for newly registered windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurifyMode {
    Disabled,
    #[default]
    Always,
}

/// Which path performs window moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStrategy {
    /// Write the position attribute through the accessibility interface.
    #[default]
    Accessibility,
    /// Route the move over the privileged control channel.
    Channel,
}

/// Which path performs raise-focus.
///
/// The direct accessibility raise does not reliably bring the window to the
/// front across all target applications, so the channel is the default; the
/// accessibility path remains selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaiseStrategy {
    #[default]
    Channel,
    Accessibility,
}

/// Border decoration parameters for the focused window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSettings {
    pub enabled: bool,
    pub width: u32,
    /// ARGB color of the focused window's border.
    pub active_color: u32,
    /// ARGB color of unfocused window borders.
    pub normal_color: u32,
}

impl Default for BorderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 4,
            active_color: 0xff77_5759,
            normal_color: 0xff55_5555,
        }
    }
}

/// Process-wide configuration, resolved once at startup and read-only after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub focus_follows_mouse: FocusFollowsMouse,
    pub purify: PurifyMode,
    /// Recenter the cursor on a newly focused window.
    pub mouse_follows_focus: bool,
    pub border: BorderSettings,
    pub move_strategy: MoveStrategy,
    pub raise_strategy: RaiseStrategy,
}

/// Marker recorded for a window whose focus loss is still pending delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LostFocusMarker;

/// Startup cannot proceed without a valid focus state to resume from.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("no focused window could be resolved at startup")]
    NoFocusedWindow,
}

/// The owned context bundling the four registry tables, the focus record,
/// and the settings.
pub struct WindowManager {
    applications: Registry<pid_t, Application>,
    windows: Registry<WindowId, Window>,
    managed: Registry<WindowId, View>,
    lost_focus: Registry<WindowId, LostFocusMarker>,
    focused: Option<(WindowId, pid_t)>,
    settings: Settings,
}

impl WindowManager {
    pub fn new(settings: Settings) -> Self {
        Self {
            applications: Registry::new(),
            windows: Registry::new(),
            managed: Registry::new(),
            lost_focus: Registry::new(),
            focused: None,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The recorded focus state, if any.
    pub fn focused(&self) -> Option<(WindowId, pid_t)> {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, focused: Option<(WindowId, pid_t)>) {
        self.focused = focused;
    }

    // ---- window table ----

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    /// Register a window. Purifies it first when purify mode requires it.
    pub fn add_window(&mut self, channel: &dyn ControlChannel, window: Window) {
        if self.settings.purify != PurifyMode::Disabled {
            self.purify_window(channel, window.id);
        }
        self.windows.insert(window.id, window);
    }

    pub fn remove_window(&mut self, id: WindowId) -> Option<Window> {
        self.windows.remove(id)
    }

    /// Forget a window the OS reports as destroyed, along with its managed
    /// entry. A pending lost-focus marker survives until the matching focus
    /// notification drains it.
    pub fn forget_window(&mut self, id: WindowId) {
        self.managed.remove(id);
        if self.windows.remove(id).is_some() {
            debug!("window {} destroyed", id);
        }
    }

    // ---- application table ----

    pub fn application(&self, pid: pid_t) -> Option<&Application> {
        self.applications.get(pid)
    }

    pub fn add_application(&mut self, application: Application) {
        self.applications.insert(application.pid, application);
    }

    pub fn remove_application(&mut self, pid: pid_t) -> Option<Application> {
        self.applications.remove(pid)
    }

    /// The application's window set, derived from the window table.
    pub fn windows_for_application(&self, pid: pid_t) -> impl Iterator<Item = &Window> {
        self.windows.iter().filter_map(
            move |(_, window)| {
                if window.pid == pid {
                    Some(window)
                } else {
                    None
                }
            },
        )
    }

    /// Drop an exited application and every window it owned.
    pub fn retire_application(&mut self, pid: pid_t) {
        let owned: Vec<WindowId> = self
            .windows_for_application(pid)
            .map(|window| window.id)
            .collect();
        for id in owned {
            self.managed.remove(id);
            self.lost_focus.remove(id);
            self.windows.remove(id);
        }
        if let Some(application) = self.applications.remove(pid) {
            info!("application {} ({}) retired", application.name, pid);
        }
    }

    // ---- managed-window table ----

    pub fn managed_view(&self, id: WindowId) -> Option<&View> {
        self.managed.get(id)
    }

    pub fn add_managed_window(&mut self, id: WindowId, view: View) {
        self.managed.insert(id, view);
    }

    pub fn remove_managed_window(&mut self, id: WindowId) -> Option<View> {
        self.managed.remove(id)
    }

    pub fn managed_count(&self) -> usize {
        self.managed.len()
    }

    // ---- lost-focus markers ----

    pub fn mark_lost_focus(&mut self, id: WindowId) {
        self.lost_focus.insert(id, LostFocusMarker);
    }

    pub fn has_lost_focus_marker(&self, id: WindowId) -> bool {
        self.lost_focus.contains(id)
    }

    pub fn clear_lost_focus_marker(&mut self, id: WindowId) -> bool {
        self.lost_focus.remove(id).is_some()
    }

    // ---- bootstrap ----

    /// Track a newly observed process and adopt its windows. Returns whether
    /// the application was registered.
    pub fn bootstrap_application(&mut self, platform: &Platform, process: ProcessHandle) -> bool {
        let application = Application::from(process);
        if !platform.accessibility.observe_application(&application) {
            debug!(
                "application {} ({}) could not be observed, discarding",
                application.name, application.pid
            );
            platform.accessibility.unobserve_application(&application);
            return false;
        }

        let pid = application.pid;
        self.add_application(application);
        self.adopt_application_windows(platform, pid);
        true
    }

    /// Enumerate and register an application's windows. A rejected window
    /// never aborts enumeration of the rest.
    pub fn adopt_application_windows(&mut self, platform: &Platform, pid: pid_t) {
        let Some(application) = self.application(pid).cloned() else {
            return;
        };

        for window in platform.accessibility.application_windows(&application) {
            self.adopt_window(platform, window);
        }
    }

    /// Validate and register a single enumerated window. Returns whether the
    /// window was registered.
    pub fn adopt_window(&mut self, platform: &Platform, window: Window) -> bool {
        if window.id == WindowId(0) {
            debug!("discarding window with null id from pid {}", window.pid);
            return false;
        }

        if self.windows.contains(window.id) {
            debug!("window {} is already tracked", window.id);
            return false;
        }

        if !platform.accessibility.observe_window(&window) {
            debug!("window {} could not be observed, discarding", window.id);
            platform.accessibility.unobserve_window(&window);
            return false;
        }

        self.add_window(platform.channel, window);
        true
    }

    /// Full startup: track every known process, then seed the focus state
    /// from the OS and activate the focused window's border. Failing to
    /// resolve a focused window is fatal.
    pub fn begin(&mut self, platform: &Platform) -> Result<(), BootstrapError> {
        for process in platform.processes.known_processes() {
            self.bootstrap_application(platform, process);
        }

        let Some(window) = self.focused_window(platform).cloned() else {
            return Err(BootstrapError::NoFocusedWindow);
        };

        self.focused = Some((window.id, window.pid));
        platform.decorations.activate_border(&window);
        info!(
            "tracking {} applications, {} windows; window {} focused",
            self.applications.len(),
            self.windows.len(),
            window.id
        );
        Ok(())
    }

    // ---- managed-window reconciliation ----

    /// Bring every eligible window on `space` under tiling control.
    /// Re-running with unchanged topology is a no-op.
    pub fn reconcile_space(
        &mut self,
        platform: &Platform,
        tiling: &mut dyn TilingEngine,
        space: SpaceId,
    ) {
        for id in platform.window_server.windows_on_space(space) {
            let Some(window) = self.windows.get(id) else {
                continue;
            };
            if !window.is_standard {
                continue;
            }
            if self.managed.contains(id) {
                continue;
            }

            let window = window.clone();
            let view = tiling.tile_window(&window, space);
            self.managed.insert(id, view);
            debug!("window {} now managed on space {}", id, space);
        }
    }

    // ---- geometry/visibility mutation ----

    /// Move a window. The accessibility path is best-effort: a failed
    /// attribute write is dropped, never retried.
    pub fn move_window(&self, platform: &Platform, window: &Window, x: f64, y: f64) {
        match self.settings.move_strategy {
            MoveStrategy::Accessibility => {
                if let Err(err) = platform
                    .accessibility
                    .set_window_position(window, Point::new(x, y))
                {
                    debug!("position write for window {} dropped: {}", window.id, err);
                }
            }
            MoveStrategy::Channel => {
                if let Err(err) = platform.channel.request(&ChannelCommand::WindowMove {
                    id: window.id.0,
                    x,
                    y,
                }) {
                    warn!("privileged move of window {} skipped: {}", window.id, err);
                }
            }
        }
    }

    /// Resize a window through the accessibility interface, best-effort.
    pub fn resize_window(&self, platform: &Platform, window: &Window, width: f64, height: f64) {
        if let Err(err) = platform
            .accessibility
            .set_window_size(window, Size::new(width, height))
        {
            debug!("size write for window {} dropped: {}", window.id, err);
        }
    }

    /// Suppress the window's shadow over the privileged channel. Channel
    /// failure degrades to a no-op.
    pub fn purify_window(&self, channel: &dyn ControlChannel, id: WindowId) {
        if let Err(err) = channel.request(&ChannelCommand::WindowShadow {
            id: id.0,
            shadow: false,
        }) {
            debug!("purify of window {} skipped: {}", id, err);
        }
    }

    /// Resolve the window under a screen point, if it is tracked.
    pub fn find_window_at_point(&self, platform: &Platform, point: Point) -> Option<&Window> {
        let id = platform.window_server.window_at_point(point)?;
        self.windows.get(id)
    }
}
