//! Event bus: single listener slot, deliveries marshaled to the main thread

use super::{Event, Notification};
use crate::host::{Listener, MainThread};
use std::sync::{Arc, Mutex};

type ListenerSlot = Arc<Mutex<Option<Arc<dyn Listener>>>>;

/// Routes events to the registered listener on the host's main thread
///
/// Cheap to clone; clones share the listener slot, so a
/// [`ServiceConnection`](crate::connection::ServiceConnection) can fire
/// events from a platform thread.
#[derive(Clone)]
pub struct EventBus {
    main: Arc<dyn MainThread>,
    listener: ListenerSlot,
}

impl EventBus {
    pub fn new(main: Arc<dyn MainThread>) -> Self {
        Self {
            main,
            listener: Arc::new(Mutex::new(None)),
        }
    }

    /// Register the listener, replacing any previous one
    pub fn set_listener(&self, listener: Arc<dyn Listener>) {
        match self.listener.lock() {
            Ok(mut slot) => {
                if slot.replace(listener).is_some() {
                    log::debug!("Replaced background mode listener");
                }
            }
            Err(e) => log::error!("Failed to register listener: {}", e),
        }
    }

    pub fn has_listener(&self) -> bool {
        self.listener.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }

    /// Fire `event`. Returns immediately; delivery happens on the main thread.
    pub fn fire(&self, event: Event) {
        log::debug!("Firing background mode event: {}", event.name());

        let notification = Notification::new(event);
        let listener = self.listener.clone();

        // The listener is resolved on the main thread so a registration made
        // before the task runs still receives it.
        let task = Box::new(move || {
            let current = match listener.lock() {
                Ok(slot) => slot.clone(),
                Err(_) => None,
            };
            match current {
                Some(listener) => listener.notify(&notification),
                None => log::debug!(
                    "No listener registered, dropping '{}' event",
                    notification.event.name()
                ),
            }
        });

        if let Err(e) = self.main.run_on_main_thread(task) {
            log::error!("Failed to deliver background mode event: {}", e);
        }
    }
}
