//! Aerie Daemon
//!
//! Main daemon process for the Aerie window manager.
//!
//! Responsibilities:
//! - Load configuration and resolve the core settings
//! - Install platform notification hooks and marshal their callbacks onto a
//!   single control thread
//! - Bootstrap the window/application registry
//! - Drive the core: reconciliation, focus transfer, mouse follow
//!
//! All core state is mutated from the single event-loop consumer below;
//! platform callbacks arrive on OS threads and are forwarded through a
//! channel before any core code runs.

mod config;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use aerie_core::{FocusFollowsMouse, Platform, WindowManager};
use aerie_ipc::ChannelClient;
use aerie_platform_macos::{
    install_notification_hooks, PlatformEvent, SystemPlatform, TilingBridge,
};
use config::Config;

/// Events the daemon event loop processes.
enum DaemonEvent {
    /// A marshaled platform notification.
    Platform(PlatformEvent),
    /// Shutdown signal.
    Shutdown,
}

/// Depth of the event queue between OS callbacks and the control thread.
const EVENT_QUEUE_DEPTH: usize = 256;

/// Spawn a named forwarding thread that receives events from a
/// `std::sync::mpsc` channel and forwards them to a tokio mpsc sender.
/// Returns the JoinHandle for graceful shutdown.
fn spawn_forwarding_thread<T: Send + 'static>(
    name: &str,
    receiver: std::sync::mpsc::Receiver<T>,
    sender: mpsc::Sender<DaemonEvent>,
    map_fn: impl Fn(T) -> DaemonEvent + Send + 'static,
) -> Result<std::thread::JoinHandle<()>> {
    let thread_name = name.to_string();
    std::thread::Builder::new()
        .name(thread_name.clone())
        .spawn(move || {
            while let Ok(event) = receiver.recv() {
                if sender.blocking_send(map_fn(event)).is_err() {
                    break; // Channel closed, daemon shutting down
                }
            }
        })
        .map_err(|e| anyhow::anyhow!("Failed to spawn {} thread: {}", thread_name, e))
}

/// Apply one marshaled platform notification to the core.
fn handle_platform_event(
    wm: &mut WindowManager,
    platform: &Platform,
    tiling: &mut TilingBridge,
    event: PlatformEvent,
) {
    match event {
        PlatformEvent::ApplicationLaunched(process) => {
            wm.bootstrap_application(platform, process);
        }
        PlatformEvent::ApplicationTerminated(pid) => {
            wm.retire_application(pid);
        }
        PlatformEvent::WindowCreated(window) => {
            wm.adopt_window(platform, window);
        }
        PlatformEvent::WindowDestroyed(id) => {
            // A focus notification for the dead window may still be in
            // flight; mark it so the notification is dropped on arrival.
            if wm.focused().map(|(focused, _)| focused) == Some(id) {
                wm.mark_lost_focus(id);
            }
            wm.forget_window(id);
        }
        PlatformEvent::FocusChanged { window: id, pid } => {
            if wm.clear_lost_focus_marker(id) {
                debug!("dropping stale focus notification for window {}", id);
                return;
            }
            wm.note_focused_window(id, pid);
            if let Some(window) = wm.window(id).cloned() {
                if wm.settings().border.enabled {
                    platform.decorations.activate_border(&window);
                }
                wm.center_mouse(platform, &window);
            }
        }
        PlatformEvent::SpaceChanged(space) => {
            wm.reconcile_space(platform, tiling, space);
        }
        PlatformEvent::MouseMoved(point) => {
            let mode = wm.settings().focus_follows_mouse;
            if mode == FocusFollowsMouse::Disabled {
                return;
            }
            let Some(target) = wm.find_window_at_point(platform, point) else {
                return;
            };
            let target = target.id;
            if wm.focused().map(|(focused, _)| focused) == Some(target) {
                return;
            }
            match mode {
                FocusFollowsMouse::Autofocus => wm.focus_window_without_raise(platform, target),
                _ => wm.focus_window_with_raise(platform, target),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load().unwrap_or_else(|err| {
        warn!("failed to load configuration: {:#}; using defaults", err);
        Config::default()
    });
    let settings = config.settings();
    info!(
        "starting aerie (purify: {:?}, move: {:?}, raise: {:?})",
        settings.purify, settings.move_strategy, settings.raise_strategy
    );

    let channel = ChannelClient::new(config.channel.port, config.channel_timeout());
    let system = SystemPlatform::new();
    let platform = system.platform(&channel);
    let mut tiling = TilingBridge::default();
    let mut wm = WindowManager::new(settings);

    let (event_tx, mut event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);

    // Platform callbacks land on OS threads; forward them to the single
    // consumer below.
    let (hook_tx, hook_rx) = std::sync::mpsc::channel();
    let _hooks = install_notification_hooks(move |event| {
        let _ = hook_tx.send(event);
    })
    .context("installing notification hooks")?;
    let _forwarder =
        spawn_forwarding_thread("platform-fwd", hook_rx, event_tx.clone(), DaemonEvent::Platform)?;

    let shutdown_tx = event_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(DaemonEvent::Shutdown).await;
        }
    });

    // Without a resolvable focus state there is nothing to resume from.
    wm.begin(&platform).context("bootstrap failed")?;
    info!("aerie is running");

    while let Some(event) = event_rx.recv().await {
        match event {
            DaemonEvent::Platform(event) => {
                handle_platform_event(&mut wm, &platform, &mut tiling, event);
            }
            DaemonEvent::Shutdown => {
                info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}
