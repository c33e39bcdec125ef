//! Aerie Platform (macOS)
//!
//! Live implementations of the core's collaborator traits. This is where the
//! window-server and accessibility bindings land:
//!
//! - Process discovery via the Carbon process list
//! - Window-server queries and synthetic event posting (SkyLight)
//! - Accessibility observation and attribute writes (AXUIElement)
//! - Notification hooks feeding the daemon's event loop
//!
//! The FFI surface is not linked in this scaffold; every entry point logs
//! and returns its empty/no-op result so the daemon wires up and runs end to
//! end while the bindings are brought up behind the same signatures.

use thiserror::Error;
use tracing::warn;

use aerie_core::platform::ControlChannel;
use aerie_core::{
    pid_t, Accessibility, Activation, Application, AxError, ConnectionId, Decorations, DisplayId,
    DisplayServer, EventRecord, Platform, Point, ProcessDirectory, ProcessHandle, Psn, Rect, Size,
    SpaceId, TilingEngine, View, Window, WindowId, WindowServer,
};

/// Errors surfaced while wiring the platform layer.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to install notification hooks: {0}")]
    HookInstallFailed(String),
}

/// Process discovery backed by the OS process list.
#[derive(Debug, Default)]
pub struct SystemProcessDirectory;

impl ProcessDirectory for SystemProcessDirectory {
    fn known_processes(&self) -> Vec<ProcessHandle> {
        // TODO: enumerate via GetNextProcess/GetProcessPID once the Carbon
        // bindings are linked.
        warn!("process enumeration is not available in this build");
        Vec::new()
    }

    fn process_for_psn(&self, _psn: Psn) -> Option<ProcessHandle> {
        warn!("psn resolution is not available in this build");
        None
    }
}

/// Display and space geometry queries.
#[derive(Debug, Default)]
pub struct SystemDisplayServer;

impl DisplayServer for SystemDisplayServer {
    fn bounds(&self, _display: DisplayId) -> Option<Rect> {
        // TODO: CGDisplayBounds.
        None
    }

    fn uuid(&self, _display: DisplayId) -> Option<String> {
        // TODO: CGDisplayCreateUUIDFromDisplayID.
        None
    }

    fn spaces(&self, _display: DisplayId) -> Vec<SpaceId> {
        // TODO: SLSCopyManagedDisplaySpaces.
        Vec::new()
    }

    fn arrangement(&self, _display: DisplayId) -> Option<usize> {
        None
    }

    fn display_for_window(&self, _window: WindowId) -> Option<DisplayId> {
        None
    }
}

/// Window-server queries and synthetic event injection.
#[derive(Debug, Default)]
pub struct SystemWindowServer;

impl WindowServer for SystemWindowServer {
    fn front_process(&self) -> Option<Psn> {
        // TODO: _SLPSGetFrontProcess.
        warn!("front-process lookup is not available in this build");
        None
    }

    fn set_front_process(&self, _psn: Psn, _window: Option<WindowId>, _activation: Activation) {
        // TODO: _SLPSSetFrontProcessWithOptions.
        warn!("front-process activation is not available in this build");
    }

    fn window_connection(&self, _window: WindowId) -> Option<ConnectionId> {
        // TODO: SLSGetWindowOwner.
        None
    }

    fn connection_psn(&self, _connection: ConnectionId) -> Option<Psn> {
        // TODO: SLSGetConnectionPSN.
        None
    }

    fn connection_pid(&self, _connection: ConnectionId) -> Option<pid_t> {
        // TODO: SLSConnectionGetPID.
        None
    }

    fn post_event(&self, _psn: Psn, record: &EventRecord) {
        // TODO: SLPSPostEventRecordTo with record.encode().
        let _ = record.encode();
        warn!("synthetic event posting is not available in this build");
    }

    fn windows_on_space(&self, _space: SpaceId) -> Vec<WindowId> {
        Vec::new()
    }

    fn window_at_point(&self, _point: Point) -> Option<WindowId> {
        // TODO: SLSFindWindowByGeometry.
        None
    }

    fn cursor_location(&self) -> Option<Point> {
        // TODO: SLSGetCurrentCursorLocation.
        None
    }

    fn warp_cursor(&self, _point: Point) {
        // TODO: CGWarpMouseCursorPosition.
        warn!("cursor warping is not available in this build");
    }
}

/// Accessibility observation and attribute writes.
#[derive(Debug, Default)]
pub struct SystemAccessibility;

impl Accessibility for SystemAccessibility {
    fn observe_application(&self, application: &Application) -> bool {
        warn!(
            "accessibility observation of {} is not available in this build",
            application.name
        );
        false
    }

    fn unobserve_application(&self, _application: &Application) {}

    fn application_windows(&self, _application: &Application) -> Vec<Window> {
        Vec::new()
    }

    fn application_main_window(&self, _application: &Application) -> Option<WindowId> {
        None
    }

    fn observe_window(&self, _window: &Window) -> bool {
        false
    }

    fn unobserve_window(&self, _window: &Window) {}

    fn set_window_position(&self, _window: &Window, _position: Point) -> Result<(), AxError> {
        // TODO: AXValueCreate + AXUIElementSetAttributeValue(kAXPosition).
        Err(AxError::ValueConstruction)
    }

    fn set_window_size(&self, _window: &Window, _size: Size) -> Result<(), AxError> {
        Err(AxError::ValueConstruction)
    }

    fn raise_window(&self, _window: &Window) -> Result<(), AxError> {
        // TODO: AXUIElementPerformAction(kAXRaiseAction).
        Err(AxError::Action)
    }
}

/// Border decoration for the focused window.
#[derive(Debug, Default)]
pub struct SystemDecorations;

impl Decorations for SystemDecorations {
    fn activate_border(&self, window: &Window) {
        warn!(
            "border activation for window {} is not available in this build",
            window.id
        );
    }
}

/// Tiling bridge handing placement requests to the layout engine.
#[derive(Debug, Default)]
pub struct TilingBridge {
    next_view: u64,
}

impl TilingEngine for TilingBridge {
    fn tile_window(&mut self, window: &Window, space: SpaceId) -> View {
        warn!(
            "layout engine is not attached; issuing placeholder view for window {} on space {}",
            window.id, space
        );
        self.next_view += 1;
        View(self.next_view)
    }
}

/// Notifications marshaled from the OS onto the daemon's control thread.
#[derive(Debug, Clone)]
pub enum PlatformEvent {
    /// A process launched (also sent for every running process at startup).
    ApplicationLaunched(ProcessHandle),
    /// A process exited.
    ApplicationTerminated(pid_t),
    /// A window appeared.
    WindowCreated(Window),
    /// A window was destroyed.
    WindowDestroyed(WindowId),
    /// The OS reports a new focused window.
    FocusChanged { window: WindowId, pid: pid_t },
    /// The active space changed.
    SpaceChanged(SpaceId),
    /// The cursor moved (delivered only while focus-follows-mouse is on).
    MouseMoved(Point),
}

/// Handle keeping the installed notification hooks alive.
pub struct NotificationHookHandle {
    _private: (),
}

impl Drop for NotificationHookHandle {
    fn drop(&mut self) {
        // TODO: tear down the AXObserver/SLS notification registrations.
    }
}

/// Install the accessibility/process notification hooks. Events are
/// delivered on OS callback threads; the caller forwards them onto its
/// single control thread.
pub fn install_notification_hooks<F>(_callback: F) -> Result<NotificationHookHandle, PlatformError>
where
    F: Fn(PlatformEvent) + Send + 'static,
{
    // TODO: AXObserverCreate per application, kAXWindowCreatedNotification
    // and friends, plus the SLS space-change notification.
    warn!("notification hooks are not available in this build");
    Ok(NotificationHookHandle { _private: () })
}

/// The live collaborator set, bundled for handing to the core.
#[derive(Debug, Default)]
pub struct SystemPlatform {
    pub processes: SystemProcessDirectory,
    pub displays: SystemDisplayServer,
    pub window_server: SystemWindowServer,
    pub accessibility: SystemAccessibility,
    pub decorations: SystemDecorations,
}

impl SystemPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the collaborators as a [`Platform`] bundle.
    pub fn platform<'a>(&'a self, channel: &'a dyn ControlChannel) -> Platform<'a> {
        Platform {
            processes: &self.processes,
            displays: &self.displays,
            window_server: &self.window_server,
            accessibility: &self.accessibility,
            channel,
            decorations: &self.decorations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hooks_install_and_stubs_stay_empty() {
        let _handle = install_notification_hooks(|_event| {}).unwrap();

        let directory = SystemProcessDirectory;
        assert!(directory.known_processes().is_empty());

        let server = SystemWindowServer;
        assert!(server.front_process().is_none());
        assert!(server.windows_on_space(SpaceId(1)).is_empty());
    }
}
