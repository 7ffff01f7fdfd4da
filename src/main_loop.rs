//! Tokio-backed main thread for embedders without a UI thread
//!
//! Tasks run one at a time, in submission order, on a single spawned task.

use crate::error::{BackgroundError, Result};
use crate::host::{MainTask, MainThread};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle used to post tasks to the loop
#[derive(Clone)]
pub struct MainLoop {
    tx: mpsc::UnboundedSender<MainTask>,
}

impl MainLoop {
    /// Spawn the loop on the current tokio runtime.
    ///
    /// The loop ends once every `MainLoop` clone has been dropped and the
    /// queue is drained.
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<MainTask>();

        let handle = tokio::spawn(async move {
            log::debug!("Main loop started");
            while let Some(task) = rx.recv().await {
                task();
            }
            log::debug!("Main loop stopped");
        });

        (Self { tx }, handle)
    }
}

impl MainThread for MainLoop {
    fn run_on_main_thread(&self, task: MainTask) -> Result<()> {
        self.tx
            .send(task)
            .map_err(|_| BackgroundError::MainThread("main loop has stopped".to_string()))
    }
}
