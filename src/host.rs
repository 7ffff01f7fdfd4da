//! Collaborator traits
//!
//! The controller never talks to a platform directly. The host application
//! supplies a [`Host`], the background task is a [`Worker`], and events go
//! to a single [`Listener`].

use crate::connection::ServiceConnection;
use crate::error::Result;
use crate::events::Notification;
use crate::options::Settings;

/// Task posted to the host's UI thread
pub type MainTask = Box<dyn FnOnce() + Send + 'static>;

/// The host's UI/main execution context
pub trait MainThread: Send + Sync {
    /// Queue `task` to run on the main thread. Must not block on the task.
    fn run_on_main_thread(&self, task: MainTask) -> Result<()>;
}

/// The surrounding application runtime
pub trait Host: MainThread {
    /// Clear any always-on-screen display flags (keyguard, screen-on)
    fn clear_host_chrome(&self) -> Result<()>;

    /// Kill the process. Called after the app has been destroyed.
    fn terminate_process(&self);
}

/// A long-running background task
pub trait Worker: Send + Sync {
    /// Reference to the running task, delivered through the connection
    type Handle: Send + 'static;

    /// Bind and start the task. The handle may arrive later, on any thread,
    /// through `connection`.
    fn bind(&self, settings: &Settings, connection: ServiceConnection<Self::Handle>)
        -> Result<()>;

    /// Push new settings to the running task
    fn update_config(&self, handle: &Self::Handle, settings: &Settings) -> Result<()>;

    /// Unbind and stop the task. `handle` is `None` when the platform never
    /// connected.
    fn unbind(&self, handle: Option<Self::Handle>) -> Result<()>;
}

/// Recipient of lifecycle events
pub trait Listener: Send + Sync {
    fn notify(&self, notification: &Notification);
}
