//! Background mode supervisor
//!
//! Keeps a long-running worker bound while the host application is in the
//! background, and tells a single listener when the mode activates,
//! deactivates or fails.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   background_mode                        │
//! ├─────────────────────────────────────────────────────────┤
//! │  controller.rs - State machine (enabled × in background) │
//! │  commands.rs   - configure / enable / disable dispatch   │
//! │  connection.rs - Worker connection callbacks, handle slot│
//! │  events/       - Event types, listener bus               │
//! │  host.rs       - Host, Worker, Listener traits           │
//! │  main_loop.rs  - Tokio main thread for plain embedders   │
//! │  options.rs    - Settings and controller options         │
//! │  logging.rs    - log4rs setup                            │
//! └─────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

pub mod commands;
pub mod connection;
pub mod controller;
pub mod error;
pub mod events;
pub mod host;
pub mod logging;
pub mod main_loop;
pub mod options;

#[cfg(test)]
mod test_support;

// Re-export key types for convenience
pub use commands::{Command, CommandResult};
pub use connection::{ServiceConnection, WorkerSlot};
pub use controller::{BackgroundModeController, ControllerStatus};
pub use error::{BackgroundError, Result};
pub use events::{Delivery, Event, EventBus, Notification};
pub use host::{Host, Listener, MainTask, MainThread, Worker};
pub use main_loop::MainLoop;
pub use options::{ControllerOptions, Settings, DEFAULT_JS_NAMESPACE};

/// Build a controller seeded with the defaults from `options`
pub fn create_controller<W: Worker, H: Host + 'static>(
    worker: W,
    host: Arc<H>,
    options: &ControllerOptions,
) -> BackgroundModeController<W, H> {
    log::info!(
        "Creating background mode controller (namespace={})",
        options.js_namespace
    );
    BackgroundModeController::with_settings(worker, host, options.defaults.clone())
}
