//! Collaborator interfaces supplied by the platform layer.
//!
//! Process discovery, display geometry, the window server, the accessibility
//! API, the tiling engine, and border decoration are all external subsystems.
//! The core consumes them through these narrow traits; the daemon wires in
//! the live implementations, tests substitute recording mocks.

use thiserror::Error;

pub use aerie_ipc::ControlChannel;

use crate::events::EventRecord;
use crate::geometry::{Point, Rect, Size};
use crate::model::{
    pid_t, Application, ConnectionId, DisplayId, ProcessHandle, Psn, SpaceId, View, Window,
    WindowId,
};

/// Accessibility attribute operations are best-effort; these are the ways
/// they fail. Callers log and continue, never retry.
#[derive(Debug, Error)]
pub enum AxError {
    #[error("attribute value could not be constructed")]
    ValueConstruction,

    #[error("attribute write was rejected")]
    AttributeWrite,

    #[error("action was rejected")]
    Action,
}

/// How a front-process switch is presented to the window server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Behaves like a user-initiated switch.
    UserGenerated,
    /// Switch without bringing the process's window list forward.
    NoWindows,
}

/// Process discovery and psn resolution.
pub trait ProcessDirectory {
    /// Every process known to the session, used once at bootstrap.
    fn known_processes(&self) -> Vec<ProcessHandle>;

    /// Resolve a process serial number to its process.
    fn process_for_psn(&self, psn: Psn) -> Option<ProcessHandle>;
}

/// Display and space geometry queries.
pub trait DisplayServer {
    fn bounds(&self, display: DisplayId) -> Option<Rect>;

    /// Stable identifier for the display, valid across reconfiguration.
    fn uuid(&self, display: DisplayId) -> Option<String>;

    /// The workspaces assigned to the display.
    fn spaces(&self, display: DisplayId) -> Vec<SpaceId>;

    /// Position of the display in the user's arrangement.
    fn arrangement(&self, display: DisplayId) -> Option<usize>;

    /// The display a window currently resides on.
    fn display_for_window(&self, window: WindowId) -> Option<DisplayId>;
}

/// Window-server queries and synthetic event injection.
pub trait WindowServer {
    /// The psn of the frontmost process.
    fn front_process(&self) -> Option<Psn>;

    /// Make `psn` the frontmost process. `window` accompanies user-generated
    /// activation; the no-windows variant passes none.
    fn set_front_process(&self, psn: Psn, window: Option<WindowId>, activation: Activation);

    fn window_connection(&self, window: WindowId) -> Option<ConnectionId>;

    fn connection_psn(&self, connection: ConnectionId) -> Option<Psn>;

    fn connection_pid(&self, connection: ConnectionId) -> Option<pid_t>;

    /// Inject a synthetic event record, addressed by psn. Fire-and-forget:
    /// no acknowledgment exists and delivery order is the call order.
    fn post_event(&self, psn: Psn, record: &EventRecord);

    /// Window ids the OS reports on a space, front to back.
    fn windows_on_space(&self, space: SpaceId) -> Vec<WindowId>;

    /// The topmost window id under a screen point.
    fn window_at_point(&self, point: Point) -> Option<WindowId>;

    fn cursor_location(&self) -> Option<Point>;

    fn warp_cursor(&self, point: Point);
}

/// Accessibility observation and attribute mutation.
pub trait Accessibility {
    /// Establish observation of an application. Returns false when the
    /// application cannot be observed, in which case it is not tracked.
    fn observe_application(&self, application: &Application) -> bool;

    fn unobserve_application(&self, application: &Application);

    /// Enumerate the application's current windows.
    fn application_windows(&self, application: &Application) -> Vec<Window>;

    /// The application's main window id, if it has one.
    fn application_main_window(&self, application: &Application) -> Option<WindowId>;

    /// Establish observation of a window. Returns false when the window
    /// cannot be observed, in which case it is discarded.
    fn observe_window(&self, window: &Window) -> bool;

    fn unobserve_window(&self, window: &Window);

    fn set_window_position(&self, window: &Window, position: Point) -> Result<(), AxError>;

    fn set_window_size(&self, window: &Window, size: Size) -> Result<(), AxError>;

    /// The accessibility raise action. Present but unused by the default
    /// raise strategy.
    fn raise_window(&self, window: &Window) -> Result<(), AxError>;
}

/// The tiling engine: decides where a window goes on a space.
pub trait TilingEngine {
    fn tile_window(&mut self, window: &Window, space: SpaceId) -> View;
}

/// Border decoration for the focused window.
pub trait Decorations {
    fn activate_border(&self, window: &Window);
}

/// The collaborator bundle passed into every core operation.
#[derive(Clone, Copy)]
pub struct Platform<'a> {
    pub processes: &'a dyn ProcessDirectory,
    pub displays: &'a dyn DisplayServer,
    pub window_server: &'a dyn WindowServer,
    pub accessibility: &'a dyn Accessibility,
    pub channel: &'a dyn ControlChannel,
    pub decorations: &'a dyn Decorations,
}
