//! Aerie privileged control channel.
//!
//! Some window operations — forced moves, forced raises, shadow suppression —
//! cannot be performed reliably through the accessibility interface. They are
//! routed instead over a local TCP connection to a helper listening on a
//! fixed port, speaking a line-oriented text protocol:
//!
//! ```text
//! window_move <id> <x> <y>
//! window_focus <id>
//! window_shadow <id> <0|1>
//! ```
//!
//! Every request is synchronous: connect, write one command line, block until
//! the helper acknowledges (any response byte, or an orderly close), then
//! close the connection. Waits are bounded; a failure at any step degrades
//! the operation to a no-op at the call site.

use std::fmt;
use std::io::{self, Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::trace;

/// Port the privileged helper listens on.
pub const CONTROL_PORT: u16 = 5050;

/// Default bound on each of connect, write, and acknowledgment.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// A command understood by the privileged helper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelCommand {
    /// Move a window to `(x, y)` in global coordinates.
    WindowMove { id: u32, x: f64, y: f64 },
    /// Focus a window and bring it to the front.
    WindowFocus { id: u32 },
    /// Enable or disable a window's shadow.
    WindowShadow { id: u32, shadow: bool },
}

impl fmt::Display for ChannelCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ChannelCommand::WindowMove { id, x, y } => {
                write!(f, "window_move {} {:.2} {:.2}", id, x, y)
            }
            ChannelCommand::WindowFocus { id } => write!(f, "window_focus {}", id),
            ChannelCommand::WindowShadow { id, shadow } => {
                write!(f, "window_shadow {} {}", id, u8::from(shadow))
            }
        }
    }
}

/// A command line that did not parse.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed control command: {0:?}")]
pub struct ParseCommandError(String);

impl FromStr for ChannelCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseCommandError(line.to_string());
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or_else(malformed)?;
        let id: u32 = parts
            .next()
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(malformed)?;

        let command = match verb {
            "window_move" => {
                let x: f64 = parts
                    .next()
                    .and_then(|raw| raw.parse().ok())
                    .ok_or_else(malformed)?;
                let y: f64 = parts
                    .next()
                    .and_then(|raw| raw.parse().ok())
                    .ok_or_else(malformed)?;
                ChannelCommand::WindowMove { id, x, y }
            }
            "window_focus" => ChannelCommand::WindowFocus { id },
            "window_shadow" => {
                let shadow = match parts.next() {
                    Some("0") => false,
                    Some("1") => true,
                    _ => return Err(malformed()),
                };
                ChannelCommand::WindowShadow { id, shadow }
            }
            _ => return Err(malformed()),
        };

        if parts.next().is_some() {
            return Err(malformed());
        }
        Ok(command)
    }
}

/// Ways a channel request can fail. All of them leave the requested
/// operation un-performed; none are retried.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("control channel connect failed: {0}")]
    Connect(#[source] io::Error),

    #[error("control channel write failed: {0}")]
    Write(#[source] io::Error),

    #[error("control channel acknowledgment failed: {0}")]
    Acknowledge(#[source] io::Error),
}

/// The seam the core uses to issue privileged requests.
pub trait ControlChannel {
    fn request(&self, command: &ChannelCommand) -> Result<(), ChannelError>;
}

/// Synchronous client for the privileged helper: one connection per command,
/// bounded waits throughout.
#[derive(Debug, Clone)]
pub struct ChannelClient {
    addr: SocketAddr,
    timeout: Duration,
}

impl ChannelClient {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, port)),
            timeout,
        }
    }

    /// Client for the helper on the well-known local port.
    pub fn local() -> Self {
        Self::new(CONTROL_PORT, DEFAULT_TIMEOUT)
    }
}

impl Default for ChannelClient {
    fn default() -> Self {
        Self::local()
    }
}

impl ControlChannel for ChannelClient {
    fn request(&self, command: &ChannelCommand) -> Result<(), ChannelError> {
        let mut stream =
            TcpStream::connect_timeout(&self.addr, self.timeout).map_err(ChannelError::Connect)?;
        stream
            .set_write_timeout(Some(self.timeout))
            .map_err(ChannelError::Connect)?;
        stream
            .set_read_timeout(Some(self.timeout))
            .map_err(ChannelError::Connect)?;

        let line = format!("{}\n", command);
        trace!("control channel request: {}", line.trim_end());
        stream
            .write_all(line.as_bytes())
            .map_err(ChannelError::Write)?;

        // The helper acknowledges with a response byte or by closing the
        // connection; either unblocks the wait.
        let mut ack = [0u8; 32];
        stream.read(&mut ack).map_err(ChannelError::Acknowledge)?;
        Ok(())
    }
}
