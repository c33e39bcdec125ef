//! Configuration management for the Aerie daemon.
//!
//! Configuration is loaded from TOML files in the following locations
//! (first match wins):
//! 1. the platform config directory (`~/Library/Application Support/aerie`
//!    or `~/.config/aerie`), file `config.toml`
//! 2. `./aerie.toml` (current directory, for development)
//!
//! A missing file is not an error; defaults apply.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use aerie_core::{
    BorderSettings, FocusFollowsMouse, MoveStrategy, PurifyMode, RaiseStrategy, Settings,
};

/// Main configuration structure for the daemon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Focus behavior.
    pub focus: FocusConfig,
    /// Window registration and mutation behavior.
    pub windows: WindowConfig,
    /// Border decoration.
    pub border: BorderConfig,
    /// Privileged control channel endpoint.
    pub channel: ChannelConfig,
}

/// Focus-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Focus-follows-mouse mode: `disabled`, `autofocus`, or `autoraise`.
    #[serde(default)]
    pub follows_mouse: FocusFollowsMouse,

    /// Recenter the cursor on a newly focused window.
    #[serde(default = "default_true")]
    pub mouse_follows_focus: bool,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            follows_mouse: FocusFollowsMouse::default(),
            mouse_follows_focus: true,
        }
    }
}

/// Window registration and mutation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Shadow suppression for newly registered windows: `disabled` or
    /// `always`.
    #[serde(default)]
    pub purify: PurifyMode,

    /// Path used for window moves: `accessibility` or `channel`.
    #[serde(default)]
    pub move_strategy: MoveStrategy,

    /// Path used for raise-focus: `channel` or `accessibility`.
    #[serde(default)]
    pub raise_strategy: RaiseStrategy,
}

/// Border decoration configuration. Colors are ARGB hex strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_border_width")]
    pub width: u32,

    #[serde(default = "default_active_color")]
    pub active_color: String,

    #[serde(default = "default_normal_color")]
    pub normal_color: String,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: default_border_width(),
            active_color: default_active_color(),
            normal_color: default_normal_color(),
        }
    }
}

/// Privileged control channel endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    #[serde(default = "default_channel_port")]
    pub port: u16,

    /// Bound on each of connect, write, and acknowledgment, in milliseconds.
    #[serde(default = "default_channel_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            port: default_channel_port(),
            timeout_ms: default_channel_timeout_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_border_width() -> u32 {
    4
}

fn default_active_color() -> String {
    "ff775759".to_string()
}

fn default_normal_color() -> String {
    "ff555555".to_string()
}

fn default_channel_port() -> u16 {
    aerie_ipc::CONTROL_PORT
}

fn default_channel_timeout_ms() -> u64 {
    1000
}

impl Config {
    /// Candidate configuration file paths, in priority order.
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dirs) = ProjectDirs::from("", "", "aerie") {
            paths.push(dirs.config_dir().join("config.toml"));
        }
        paths.push(PathBuf::from("aerie.toml"));
        paths
    }

    /// Load configuration from the first existing candidate path, falling
    /// back to defaults when none exists.
    pub fn load() -> Result<Self> {
        for path in Self::candidate_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load and parse a specific configuration file.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the core settings from this configuration.
    pub fn settings(&self) -> Settings {
        let defaults = BorderSettings::default();
        Settings {
            focus_follows_mouse: self.focus.follows_mouse,
            purify: self.windows.purify,
            mouse_follows_focus: self.focus.mouse_follows_focus,
            border: BorderSettings {
                enabled: self.border.enabled,
                width: self.border.width,
                active_color: parse_color(&self.border.active_color, defaults.active_color),
                normal_color: parse_color(&self.border.normal_color, defaults.normal_color),
            },
            move_strategy: self.windows.move_strategy,
            raise_strategy: self.windows.raise_strategy,
        }
    }

    /// Duration form of the channel timeout.
    pub fn channel_timeout(&self) -> Duration {
        Duration::from_millis(self.channel.timeout_ms)
    }
}

/// Parse an ARGB hex color string, keeping `fallback` on malformed input.
fn parse_color(raw: &str, fallback: u32) -> u32 {
    match u32::from_str_radix(raw.trim_start_matches("0x"), 16) {
        Ok(color) => color,
        Err(_) => {
            warn!("invalid border color {:?}, keeping default", raw);
            fallback
        }
    }
}
