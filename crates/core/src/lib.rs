//! Aerie Core
//!
//! The runtime core of the Aerie window manager.
//!
//! This crate owns the session state: which applications and windows exist,
//! which windows are under tiling control, and which window currently holds
//! focus. It drives focus transfers (including the synthetic-event fast path
//! for same-application switches) and performs geometry/visibility mutations
//! either through the accessibility interface or over the privileged control
//! channel.
//!
//! Everything the operating system supplies — process discovery, window
//! observation, display geometry, the tiling engine — is consumed through the
//! collaborator traits in [`platform`]. All state lives in a single
//! [`WindowManager`] context and is mutated from exactly one control thread.

pub mod events;
pub mod focus;
pub mod geometry;
pub mod manager;
pub mod model;
pub mod platform;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use events::{EventRecord, RecordKind, RECORD_LEN};
pub use geometry::{Point, Rect, Size};
pub use manager::{
    BootstrapError, BorderSettings, FocusFollowsMouse, MoveStrategy, PurifyMode, RaiseStrategy,
    Settings, WindowManager,
};
pub use model::{
    pid_t, Application, ConnectionId, DisplayId, ProcessHandle, Psn, SpaceId, View, Window,
    WindowId,
};
pub use platform::{
    Accessibility, Activation, AxError, Decorations, DisplayServer, Platform, ProcessDirectory,
    TilingEngine, WindowServer,
};
