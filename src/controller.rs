//! Background mode controller
//!
//! Keeps a worker bound exactly while the app is in the background and the
//! mode is enabled. All public operations are expected on the host's main
//! thread; none of them return errors. Failures are reported to the listener
//! as `Failure` events.

use crate::connection::{ServiceConnection, WorkerSlot};
use crate::events::{Event, EventBus};
use crate::host::{Host, Listener, MainThread, Worker};
use crate::options::Settings;
use serde::Serialize;
use std::sync::Arc;

/// Snapshot of the controller flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerStatus {
    pub in_background: bool,
    pub enabled: bool,
    pub bound: bool,
    /// The platform has delivered the worker handle
    pub connected: bool,
}

impl ControllerStatus {
    /// Worker bound and mode enabled
    pub fn is_active(&self) -> bool {
        self.enabled && self.bound
    }
}

/// Runs the host's cleanup hook when dropped, including during unwinding
struct ChromeGuard<H: Host> {
    host: Arc<H>,
    events: EventBus,
    operation: &'static str,
}

impl<H: Host> Drop for ChromeGuard<H> {
    fn drop(&mut self) {
        if let Err(e) = self.host.clear_host_chrome() {
            log::warn!("{}: failed to clear host chrome: {}", self.operation, e);
            self.events.fire(Event::failure(self.operation, e));
        }
    }
}

/// Terminates the process when dropped
struct TerminateGuard<H: Host>(Arc<H>);

impl<H: Host> Drop for TerminateGuard<H> {
    fn drop(&mut self) {
        log::info!("Host destroyed, terminating process");
        self.0.terminate_process();
    }
}

/// Supervises the background worker
pub struct BackgroundModeController<W: Worker, H: Host> {
    worker: W,
    host: Arc<H>,
    events: EventBus,
    slot: WorkerSlot<W::Handle>,
    in_background: bool,
    enabled: bool,
    bound: bool,
    default_settings: Settings,
}

impl<W: Worker, H: Host + 'static> BackgroundModeController<W, H> {
    pub fn new(worker: W, host: Arc<H>) -> Self {
        Self::with_settings(worker, host, Settings::default())
    }

    /// Create a controller whose first activation uses `defaults`
    pub fn with_settings(worker: W, host: Arc<H>, defaults: Settings) -> Self {
        let main: Arc<dyn MainThread> = host.clone();
        Self {
            worker,
            events: EventBus::new(main),
            host,
            slot: WorkerSlot::default(),
            in_background: false,
            enabled: false,
            bound: false,
            default_settings: defaults,
        }
    }

    /// Register the event listener (last registration wins)
    pub fn set_listener(&self, listener: Arc<dyn Listener>) {
        self.events.set_listener(listener);
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            in_background: self.in_background,
            enabled: self.enabled,
            bound: self.bound,
            connected: self.slot.is_connected(),
        }
    }

    pub fn default_settings(&self) -> &Settings {
        &self.default_settings
    }

    // ========================================================================
    // Client operations
    // ========================================================================

    /// Replace the defaults (`update == false`) or push `settings` to the
    /// running worker (`update == true`)
    pub fn configure(&mut self, settings: Settings, update: bool) {
        if update {
            self.update_worker(&settings);
        } else {
            log::debug!("Default settings replaced");
            self.default_settings = settings;
        }
    }

    pub fn enable(&mut self) {
        log::info!("Background mode enabled");
        self.enabled = true;

        if self.in_background {
            self.start_service();
        }
    }

    pub fn disable(&mut self) {
        log::info!("Background mode disabled");
        self.stop_service();
        self.enabled = false;
    }

    // ========================================================================
    // Host lifecycle
    // ========================================================================

    /// The app went to the background
    pub fn on_host_paused(&mut self) {
        let _chrome = ChromeGuard {
            host: self.host.clone(),
            events: self.events.clone(),
            operation: "onPause",
        };

        log::info!("Host paused");
        self.in_background = true;
        self.start_service();
    }

    /// The app is no longer visible
    pub fn on_host_stopped(&mut self) {
        log::debug!("Host stopped");
        let _chrome = ChromeGuard {
            host: self.host.clone(),
            events: self.events.clone(),
            operation: "onStop",
        };
    }

    /// The app is back in the foreground
    pub fn on_host_resumed(&mut self) {
        log::info!("Host resumed");
        self.in_background = false;
        self.stop_service();
    }

    /// The app is being destroyed. The process is terminated afterwards,
    /// even if stopping the worker fails.
    pub fn on_host_destroyed(&mut self) {
        let _terminate = TerminateGuard(self.host.clone());
        self.stop_service();
    }

    // ========================================================================
    // Guarded transitions
    // ========================================================================

    fn start_service(&mut self) {
        if !self.enabled || self.bound {
            log::debug!(
                "Start skipped (enabled={}, bound={})",
                self.enabled,
                self.bound
            );
            return;
        }

        // Set even when bind fails; resume and disable still go through unbind.
        self.bound = true;

        let connection = ServiceConnection::new(self.slot.clone(), self.events.clone());
        match self.worker.bind(&self.default_settings, connection) {
            Ok(()) => {
                log::info!("Background worker bound, activating");
                self.events.fire(Event::Activate);
            }
            Err(e) => {
                log::warn!("Failed to bind background worker: {}", e);
                self.events.fire(Event::failure("startService", e));
            }
        }
    }

    fn stop_service(&mut self) {
        if !self.bound {
            log::debug!("Stop skipped, worker not bound");
            return;
        }

        log::info!("Deactivating background worker");
        self.events.fire(Event::Deactivate);

        let handle = self.slot.take();
        // `bound` is false from here on, whatever unbind does
        self.bound = false;

        if let Err(e) = self.worker.unbind(handle) {
            log::warn!("Failed to unbind background worker: {}", e);
            self.events.fire(Event::failure("stopService", e));
        }
    }

    fn update_worker(&self, settings: &Settings) {
        if !self.bound {
            log::debug!("Settings update skipped, worker not bound");
            return;
        }

        let result = self
            .slot
            .with(|handle| self.worker.update_config(handle, settings));

        match result {
            Some(Ok(())) => log::debug!("Worker settings updated"),
            Some(Err(e)) => {
                log::warn!("Failed to update worker settings: {}", e);
                self.events.fire(Event::failure("updateNotification", e));
            }
            None => {
                log::warn!("Settings update before worker connected");
                self.events
                    .fire(Event::failure("updateNotification", "worker not connected"));
            }
        }
    }

    pub(crate) fn report(&self, event: Event) {
        self.events.fire(event);
    }
}
