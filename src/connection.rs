//! Worker connection callbacks
//!
//! The platform binds the worker asynchronously and reports back on its own
//! thread. The handle lives in a mutex-guarded slot; that slot is the only
//! state those callbacks touch.

use crate::events::{Event, EventBus};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared slot holding the connected worker handle
pub struct WorkerSlot<H>(Arc<Mutex<Option<H>>>);

impl<H> Clone for WorkerSlot<H> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<H> Default for WorkerSlot<H> {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(None)))
    }
}

impl<H> WorkerSlot<H> {
    /// Lock the slot. A panic inside `with` poisons the mutex; the slot
    /// contents stay valid, so the guard is recovered.
    fn lock(&self) -> MutexGuard<'_, Option<H>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_connected(&self) -> bool {
        self.lock().is_some()
    }

    /// Run `f` against the handle if one is connected
    pub fn with<T>(&self, f: impl FnOnce(&H) -> T) -> Option<T> {
        self.lock().as_ref().map(f)
    }

    pub(crate) fn store(&self, handle: H) {
        *self.lock() = Some(handle);
    }

    pub(crate) fn take(&self) -> Option<H> {
        self.lock().take()
    }
}

/// Callbacks handed to [`Worker::bind`](crate::host::Worker::bind)
pub struct ServiceConnection<H> {
    slot: WorkerSlot<H>,
    events: EventBus,
}

impl<H> Clone for ServiceConnection<H> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            events: self.events.clone(),
        }
    }
}

impl<H: Send + 'static> ServiceConnection<H> {
    pub(crate) fn new(slot: WorkerSlot<H>, events: EventBus) -> Self {
        Self { slot, events }
    }

    /// The worker is up; keep its handle
    pub fn connected(&self, handle: H) {
        self.slot.store(handle);
        log::info!("Background worker connected");
    }

    /// The platform could not hand over the worker
    pub fn connect_failed(&self, error: impl std::fmt::Display) {
        log::warn!("Background worker connection failed: {}", error);
        self.events.fire(Event::failure("onServiceConnected", error));
    }

    /// The worker went away without being unbound
    pub fn disconnected(&self) {
        log::warn!("Background worker disconnected unexpectedly");
        self.slot.take();
        self.events
            .fire(Event::Failure("Service disconnected unexpectedly".to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InlineMainThread, RecordingListener};
    use std::thread;

    fn bus_with_listener() -> (EventBus, Arc<RecordingListener>) {
        let bus = EventBus::new(Arc::new(InlineMainThread));
        let listener = Arc::new(RecordingListener::default());
        bus.set_listener(listener.clone());
        (bus, listener)
    }

    #[test]
    fn test_connected_from_other_thread() {
        let (bus, listener) = bus_with_listener();
        let slot = WorkerSlot::<u32>::default();
        let connection = ServiceConnection::new(slot.clone(), bus);

        thread::spawn(move || connection.connected(7))
            .join()
            .unwrap();

        assert!(slot.is_connected());
        assert_eq!(slot.with(|h| *h), Some(7));
        assert!(listener.events().is_empty());
    }

    #[test]
    fn test_connect_failed_fires_failure() {
        let (bus, listener) = bus_with_listener();
        let connection = ServiceConnection::new(WorkerSlot::<u32>::default(), bus);

        connection.connect_failed("bad binder");

        assert_eq!(
            listener.events(),
            vec![Event::Failure("onServiceConnected error: bad binder".to_string())]
        );
    }

    #[test]
    fn test_slot_usable_after_panic_inside_with() {
        let slot = WorkerSlot::<u32>::default();
        slot.store(3);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            slot.with::<()>(|_| panic!("update failed hard"));
        }));
        assert!(result.is_err());

        assert!(slot.is_connected());
        assert_eq!(slot.take(), Some(3));
        slot.store(4);
        assert_eq!(slot.with(|h| *h), Some(4));
    }

    #[test]
    fn test_disconnected_clears_slot() {
        let (bus, listener) = bus_with_listener();
        let slot = WorkerSlot::<u32>::default();
        let connection = ServiceConnection::new(slot.clone(), bus);

        connection.connected(1);
        connection.disconnected();

        assert!(!slot.is_connected());
        assert_eq!(
            listener.events(),
            vec![Event::Failure("Service disconnected unexpectedly".to_string())]
        );
    }
}
