//! Recording fakes for the collaborator traits

use crate::connection::ServiceConnection;
use crate::controller::BackgroundModeController;
use crate::error::{BackgroundError, Result};
use crate::events::{Event, Notification};
use crate::host::{Host, Listener, MainTask, MainThread, Worker};
use crate::options::Settings;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Runs tasks immediately on the calling thread
pub struct InlineMainThread;

impl MainThread for InlineMainThread {
    fn run_on_main_thread(&self, task: MainTask) -> Result<()> {
        task();
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingListener {
    received: Mutex<Vec<Notification>>,
}

impl RecordingListener {
    pub fn notifications(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.notifications().into_iter().map(|n| n.event).collect()
    }
}

impl Listener for RecordingListener {
    fn notify(&self, notification: &Notification) {
        self.received.lock().unwrap().push(notification.clone());
    }
}

#[derive(Default)]
pub struct FakeHost {
    chrome_clears: AtomicUsize,
    terminations: AtomicUsize,
    chrome_error: Mutex<Option<String>>,
}

impl FakeHost {
    pub fn chrome_clears(&self) -> usize {
        self.chrome_clears.load(Ordering::SeqCst)
    }

    pub fn terminations(&self) -> usize {
        self.terminations.load(Ordering::SeqCst)
    }

    pub fn fail_chrome(&self, message: &str) {
        *self.chrome_error.lock().unwrap() = Some(message.to_string());
    }
}

impl MainThread for FakeHost {
    fn run_on_main_thread(&self, task: MainTask) -> Result<()> {
        task();
        Ok(())
    }
}

impl Host for FakeHost {
    fn clear_host_chrome(&self) -> Result<()> {
        self.chrome_clears.fetch_add(1, Ordering::SeqCst);
        match self.chrome_error.lock().unwrap().clone() {
            Some(message) => Err(BackgroundError::HostChrome(message)),
            None => Ok(()),
        }
    }

    fn terminate_process(&self) {
        self.terminations.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct WorkerLog {
    bound_with: Vec<Settings>,
    updates: Vec<Settings>,
    unbound: Vec<Option<u32>>,
    bind_error: Option<String>,
    unbind_error: Option<String>,
    update_error: Option<BackgroundError>,
    panic_on_bind: bool,
    panic_on_unbind: bool,
    panic_on_update: bool,
    deferred: bool,
    pending: Option<ServiceConnection<u32>>,
}

/// Worker that records calls. Connects immediately unless deferred.
#[derive(Clone, Default)]
pub struct FakeWorker(Arc<Mutex<WorkerLog>>);

impl FakeWorker {
    /// Worker whose connection only arrives on `connect_pending`
    pub fn deferred() -> Self {
        let worker = Self::default();
        worker.0.lock().unwrap().deferred = true;
        worker
    }

    pub fn connect_pending(&self, handle: u32) {
        let pending = self.0.lock().unwrap().pending.take();
        if let Some(connection) = pending {
            connection.connected(handle);
        }
    }

    pub fn fail_bind(&self, message: &str) {
        self.0.lock().unwrap().bind_error = Some(message.to_string());
    }

    pub fn fail_unbind(&self, message: &str) {
        self.0.lock().unwrap().unbind_error = Some(message.to_string());
    }

    pub fn fail_update(&self, error: BackgroundError) {
        self.0.lock().unwrap().update_error = Some(error);
    }

    pub fn panic_on_bind(&self) {
        self.0.lock().unwrap().panic_on_bind = true;
    }

    pub fn panic_on_update(&self) {
        self.0.lock().unwrap().panic_on_update = true;
    }

    pub fn panic_on_unbind(&self) {
        self.0.lock().unwrap().panic_on_unbind = true;
    }

    pub fn bind_count(&self) -> usize {
        self.0.lock().unwrap().bound_with.len()
    }

    pub fn bound_with(&self) -> Vec<Settings> {
        self.0.lock().unwrap().bound_with.clone()
    }

    pub fn updates(&self) -> Vec<Settings> {
        self.0.lock().unwrap().updates.clone()
    }

    pub fn unbind_count(&self) -> usize {
        self.0.lock().unwrap().unbound.len()
    }

    pub fn unbound_handles(&self) -> Vec<Option<u32>> {
        self.0.lock().unwrap().unbound.clone()
    }
}

impl Worker for FakeWorker {
    type Handle = u32;

    fn bind(&self, settings: &Settings, connection: ServiceConnection<u32>) -> Result<()> {
        let (panic, error, deferred, handle) = {
            let mut log = self.0.lock().unwrap();
            log.bound_with.push(settings.clone());
            (
                log.panic_on_bind,
                log.bind_error.clone(),
                log.deferred,
                log.bound_with.len() as u32,
            )
        };

        if panic {
            panic!("worker exploded during bind");
        }
        if let Some(message) = error {
            return Err(BackgroundError::ServiceBind(message));
        }

        if deferred {
            self.0.lock().unwrap().pending = Some(connection);
        } else {
            connection.connected(handle);
        }
        Ok(())
    }

    fn update_config(&self, _handle: &u32, settings: &Settings) -> Result<()> {
        if self.0.lock().unwrap().panic_on_update {
            panic!("worker exploded during update");
        }

        let mut log = self.0.lock().unwrap();
        if let Some(error) = log.update_error.clone() {
            return Err(error);
        }
        log.updates.push(settings.clone());
        Ok(())
    }

    fn unbind(&self, handle: Option<u32>) -> Result<()> {
        let (panic, error) = {
            let mut log = self.0.lock().unwrap();
            log.unbound.push(handle);
            (log.panic_on_unbind, log.unbind_error.clone())
        };

        if panic {
            panic!("worker exploded during unbind");
        }
        match error {
            Some(message) => Err(BackgroundError::ServiceUnbind(message)),
            None => Ok(()),
        }
    }
}

/// Controller wired to fresh fakes with a registered listener
pub fn controller() -> (
    BackgroundModeController<FakeWorker, FakeHost>,
    FakeWorker,
    Arc<FakeHost>,
    Arc<RecordingListener>,
) {
    let worker = FakeWorker::default();
    let host = Arc::new(FakeHost::default());
    let listener = Arc::new(RecordingListener::default());

    let controller = BackgroundModeController::new(worker.clone(), host.clone());
    controller.set_listener(listener.clone());

    (controller, worker, host, listener)
}
