//! Session objects tracked by the window manager.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::registry::RegistryKey;

/// OS process id.
#[allow(non_camel_case_types)]
pub type pid_t = i32;

/// Window identifier assigned by the owning process. Ids may be reused after
/// a window is destroyed and are never persisted beyond the window's OS
/// lifetime. Id 0 is invalid and rejected at bootstrap.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct WindowId(pub u32);

impl RegistryKey for WindowId {
    fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Workspace (space) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceId(pub u64);

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Physical display identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayId(pub u32);

/// Window-server connection identifier, resolved per window owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub i32);

/// Process serial number: the session-scoped address the window server uses
/// for activation and event delivery. Distinct from the pid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Psn {
    pub high: u32,
    pub low: u32,
}

impl Psn {
    pub fn new(high: u32, low: u32) -> Self {
        Self { high, low }
    }
}

/// A running process as reported by the process collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pub pid: pid_t,
    pub psn: Psn,
    pub name: String,
}

/// A tracked application. Its window set is not stored here; it is derived by
/// iterating the window table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub pid: pid_t,
    pub psn: Psn,
    pub name: String,
}

impl From<ProcessHandle> for Application {
    fn from(process: ProcessHandle) -> Self {
        Self {
            pid: process.pid,
            psn: process.psn,
            name: process.name,
        }
    }
}

/// A tracked window. `is_standard` distinguishes ordinary resizable document
/// windows from utility panels, tooltips, and decorations; only standard
/// windows are eligible for tiling.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub id: WindowId,
    pub pid: pid_t,
    pub frame: Rect,
    pub is_standard: bool,
}

/// Opaque placement handle owned by the tiling engine. The core stores the
/// association and never interprets the contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View(pub u64);
