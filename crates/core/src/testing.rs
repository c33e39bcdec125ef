//! Recording collaborator implementations for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::io;

use aerie_ipc::{ChannelCommand, ChannelError, ControlChannel};

use crate::events::EventRecord;
use crate::geometry::{Point, Rect, Size};
use crate::model::{
    pid_t, Application, ConnectionId, DisplayId, ProcessHandle, Psn, SpaceId, View, Window,
    WindowId,
};
use crate::platform::{
    Accessibility, Activation, AxError, Decorations, DisplayServer, Platform, ProcessDirectory,
    TilingEngine, WindowServer,
};

pub(crate) fn window(id: u32, pid: pid_t, frame: Rect, is_standard: bool) -> Window {
    Window {
        id: WindowId(id),
        pid,
        frame,
        is_standard,
    }
}

pub(crate) fn process(pid: pid_t, name: &str) -> ProcessHandle {
    ProcessHandle {
        pid,
        psn: Psn::new(0, pid as u32),
        name: name.to_string(),
    }
}

#[derive(Default)]
pub(crate) struct MockProcesses {
    pub processes: Vec<ProcessHandle>,
}

impl ProcessDirectory for MockProcesses {
    fn known_processes(&self) -> Vec<ProcessHandle> {
        self.processes.clone()
    }

    fn process_for_psn(&self, psn: Psn) -> Option<ProcessHandle> {
        self.processes.iter().find(|p| p.psn == psn).cloned()
    }
}

#[derive(Default)]
pub(crate) struct MockDisplays {
    pub bounds: HashMap<u32, Rect>,
    pub window_display: HashMap<WindowId, DisplayId>,
}

impl DisplayServer for MockDisplays {
    fn bounds(&self, display: DisplayId) -> Option<Rect> {
        self.bounds.get(&display.0).copied()
    }

    fn uuid(&self, display: DisplayId) -> Option<String> {
        self.bounds
            .contains_key(&display.0)
            .then(|| format!("mock-display-{}", display.0))
    }

    fn spaces(&self, _display: DisplayId) -> Vec<SpaceId> {
        Vec::new()
    }

    fn arrangement(&self, display: DisplayId) -> Option<usize> {
        self.bounds.contains_key(&display.0).then_some(0)
    }

    fn display_for_window(&self, window: WindowId) -> Option<DisplayId> {
        self.window_display.get(&window).copied()
    }
}

pub(crate) struct ConnectionEntry {
    pub connection: ConnectionId,
    pub psn: Psn,
    pub pid: pid_t,
}

#[derive(Default)]
pub(crate) struct MockWindowServer {
    pub front: Cell<Option<Psn>>,
    pub connections: HashMap<WindowId, ConnectionEntry>,
    pub space_windows: HashMap<u64, Vec<WindowId>>,
    pub at_point: Option<WindowId>,
    pub cursor: Cell<Option<Point>>,
    pub posted: RefCell<Vec<(Psn, EventRecord)>>,
    pub activations: RefCell<Vec<(Psn, Option<WindowId>, Activation)>>,
    pub warped: RefCell<Vec<Point>>,
}

impl MockWindowServer {
    /// Wire up owner resolution for a window.
    pub fn connect_window(&mut self, window: WindowId, connection: i32, psn: Psn, pid: pid_t) {
        self.connections.insert(
            window,
            ConnectionEntry {
                connection: ConnectionId(connection),
                psn,
                pid,
            },
        );
    }

    pub fn posted_kinds(&self) -> Vec<(crate::events::RecordKind, WindowId)> {
        self.posted
            .borrow()
            .iter()
            .map(|(_, record)| (record.kind, record.window_id))
            .collect()
    }
}

impl WindowServer for MockWindowServer {
    fn front_process(&self) -> Option<Psn> {
        self.front.get()
    }

    fn set_front_process(&self, psn: Psn, window: Option<WindowId>, activation: Activation) {
        self.activations.borrow_mut().push((psn, window, activation));
    }

    fn window_connection(&self, window: WindowId) -> Option<ConnectionId> {
        self.connections.get(&window).map(|entry| entry.connection)
    }

    fn connection_psn(&self, connection: ConnectionId) -> Option<Psn> {
        self.connections
            .values()
            .find(|entry| entry.connection == connection)
            .map(|entry| entry.psn)
    }

    fn connection_pid(&self, connection: ConnectionId) -> Option<pid_t> {
        self.connections
            .values()
            .find(|entry| entry.connection == connection)
            .map(|entry| entry.pid)
    }

    fn post_event(&self, psn: Psn, record: &EventRecord) {
        self.posted.borrow_mut().push((psn, *record));
    }

    fn windows_on_space(&self, space: SpaceId) -> Vec<WindowId> {
        self.space_windows.get(&space.0).cloned().unwrap_or_default()
    }

    fn window_at_point(&self, _point: Point) -> Option<WindowId> {
        self.at_point
    }

    fn cursor_location(&self) -> Option<Point> {
        self.cursor.get()
    }

    fn warp_cursor(&self, point: Point) {
        self.warped.borrow_mut().push(point);
    }
}

#[derive(Default)]
pub(crate) struct MockAccessibility {
    pub app_windows: HashMap<pid_t, Vec<Window>>,
    pub main_windows: HashMap<pid_t, WindowId>,
    pub unobservable_apps: HashSet<pid_t>,
    pub unobservable_windows: HashSet<WindowId>,
    pub fail_position_writes: bool,
    pub observed_windows: RefCell<Vec<WindowId>>,
    pub unobserved_windows: RefCell<Vec<WindowId>>,
    pub positions: RefCell<Vec<(WindowId, Point)>>,
    pub sizes: RefCell<Vec<(WindowId, Size)>>,
    pub raised: RefCell<Vec<WindowId>>,
}

impl Accessibility for MockAccessibility {
    fn observe_application(&self, application: &Application) -> bool {
        !self.unobservable_apps.contains(&application.pid)
    }

    fn unobserve_application(&self, _application: &Application) {}

    fn application_windows(&self, application: &Application) -> Vec<Window> {
        self.app_windows
            .get(&application.pid)
            .cloned()
            .unwrap_or_default()
    }

    fn application_main_window(&self, application: &Application) -> Option<WindowId> {
        self.main_windows.get(&application.pid).copied()
    }

    fn observe_window(&self, window: &Window) -> bool {
        if self.unobservable_windows.contains(&window.id) {
            return false;
        }
        self.observed_windows.borrow_mut().push(window.id);
        true
    }

    fn unobserve_window(&self, window: &Window) {
        self.unobserved_windows.borrow_mut().push(window.id);
    }

    fn set_window_position(&self, window: &Window, position: Point) -> Result<(), AxError> {
        if self.fail_position_writes {
            return Err(AxError::ValueConstruction);
        }
        self.positions.borrow_mut().push((window.id, position));
        Ok(())
    }

    fn set_window_size(&self, window: &Window, size: Size) -> Result<(), AxError> {
        self.sizes.borrow_mut().push((window.id, size));
        Ok(())
    }

    fn raise_window(&self, window: &Window) -> Result<(), AxError> {
        self.raised.borrow_mut().push(window.id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MockChannel {
    pub fail: bool,
    pub requests: RefCell<Vec<ChannelCommand>>,
}

impl ControlChannel for MockChannel {
    fn request(&self, command: &ChannelCommand) -> Result<(), ChannelError> {
        if self.fail {
            return Err(ChannelError::Connect(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "helper absent",
            )));
        }
        self.requests.borrow_mut().push(*command);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MockTiling {
    pub tiled: Vec<(WindowId, SpaceId)>,
    next_view: u64,
}

impl TilingEngine for MockTiling {
    fn tile_window(&mut self, window: &Window, space: SpaceId) -> View {
        self.tiled.push((window.id, space));
        self.next_view += 1;
        View(self.next_view)
    }
}

#[derive(Default)]
pub(crate) struct MockDecorations {
    pub activated: RefCell<Vec<WindowId>>,
}

impl Decorations for MockDecorations {
    fn activate_border(&self, window: &Window) {
        self.activated.borrow_mut().push(window.id);
    }
}

/// One bundle owning every mock, handed out as a [`Platform`] view.
#[derive(Default)]
pub(crate) struct TestPlatform {
    pub processes: MockProcesses,
    pub displays: MockDisplays,
    pub window_server: MockWindowServer,
    pub accessibility: MockAccessibility,
    pub channel: MockChannel,
    pub decorations: MockDecorations,
}

impl TestPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platform(&self) -> Platform<'_> {
        Platform {
            processes: &self.processes,
            displays: &self.displays,
            window_server: &self.window_server,
            accessibility: &self.accessibility,
            channel: &self.channel,
            decorations: &self.decorations,
        }
    }
}
