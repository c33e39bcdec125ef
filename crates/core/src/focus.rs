//! Focus queries and focus transfer.
//!
//! Transferring focus between windows of the same application must not pay
//! the latency or visual side effects of a full application switch, so the
//! engine injects a synthetic pre/lost/gained/post event sequence addressed
//! to the owner instead. Crossing an application boundary falls back to an
//! explicit front-process activation. The event ordering is interpreted by
//! the window server as a unit and is preserved exactly.

use tracing::{debug, warn};

use aerie_ipc::ChannelCommand;

use crate::events::{EventRecord, RecordKind};
use crate::manager::{RaiseStrategy, WindowManager};
use crate::model::{pid_t, Application, Window, WindowId};
use crate::platform::{Activation, Platform};

impl WindowManager {
    /// The application owning the frontmost process, if tracked.
    pub fn focused_application(&self, platform: &Platform) -> Option<&Application> {
        let psn = platform.window_server.front_process()?;
        let process = platform.processes.process_for_psn(psn)?;
        self.application(process.pid)
    }

    /// The currently focused window: frontmost process → tracked application
    /// → its main window → the window table. Any miss means "no focused
    /// window", never an error.
    pub fn focused_window(&self, platform: &Platform) -> Option<&Window> {
        let application = self.focused_application(platform)?;
        let id = platform.accessibility.application_main_window(application)?;
        self.window(id)
    }

    /// Record the focus state reported by the OS notification plumbing. This
    /// and bootstrap seeding are the only focus-state mutations.
    pub fn note_focused_window(&mut self, id: WindowId, pid: pid_t) {
        self.set_focused(Some((id, pid)));
    }

    /// Transfer focus to `id` without raising it.
    ///
    /// Within the currently focused application this is the synthetic-event
    /// fast path; across applications it activates the owning process. Any
    /// resolution failure degrades to a logged no-op.
    pub fn focus_window_without_raise(&self, platform: &Platform, id: WindowId) {
        let server = platform.window_server;

        let Some(connection) = server.window_connection(id) else {
            debug!("no connection for window {}, focus transfer skipped", id);
            return;
        };
        let Some(psn) = server.connection_psn(connection) else {
            debug!("no psn for window {}, focus transfer skipped", id);
            return;
        };
        let Some(pid) = server.connection_pid(connection) else {
            debug!("no pid for window {}, focus transfer skipped", id);
            return;
        };

        server.post_event(psn, &EventRecord::new(RecordKind::PreFocus, id));

        match self.focused() {
            Some((previous, focused_pid)) if focused_pid == pid => {
                // Same application: hand focus over inside the process, no
                // application switch.
                server.post_event(psn, &EventRecord::new(RecordKind::LostFocus, previous));
                server.post_event(psn, &EventRecord::new(RecordKind::GainedFocus, id));
            }
            _ => {
                server.set_front_process(psn, Some(id), Activation::UserGenerated);
            }
        }

        server.post_event(psn, &EventRecord::new(RecordKind::PostFocusDown, id));
        server.post_event(psn, &EventRecord::new(RecordKind::PostFocusUp, id));
    }

    /// Transfer focus to `id` and raise it, using the strategy resolved at
    /// startup.
    pub fn focus_window_with_raise(&self, platform: &Platform, id: WindowId) {
        match self.settings().raise_strategy {
            RaiseStrategy::Channel => {
                if let Err(err) = platform
                    .channel
                    .request(&ChannelCommand::WindowFocus { id: id.0 })
                {
                    warn!("privileged raise-focus of window {} skipped: {}", id, err);
                }
            }
            RaiseStrategy::Accessibility => {
                let Some(window) = self.window(id) else {
                    return;
                };
                let Some(application) = self.application(window.pid) else {
                    return;
                };
                if let Err(err) = platform.accessibility.raise_window(window) {
                    debug!("raise action for window {} dropped: {}", id, err);
                }
                platform
                    .window_server
                    .set_front_process(application.psn, None, Activation::NoWindows);
            }
        }
    }

    /// Recenter the cursor on a newly focused window when mouse-follows-focus
    /// is enabled. The cursor never warps across displays: a center falling
    /// outside the window's own display bounds leaves the cursor alone.
    pub fn center_mouse(&self, platform: &Platform, window: &Window) {
        if !self.settings().mouse_follows_focus {
            return;
        }

        let Some(cursor) = platform.window_server.cursor_location() else {
            return;
        };
        if window.frame.contains(cursor) {
            return;
        }

        let Some(display) = platform.displays.display_for_window(window.id) else {
            return;
        };

        let center = window.frame.center();
        let Some(bounds) = platform.displays.bounds(display) else {
            return;
        };
        if !bounds.contains(center) {
            return;
        }

        platform.window_server.warp_cursor(center);
    }
}
