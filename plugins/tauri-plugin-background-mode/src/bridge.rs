//! Tauri implementations of the controller's collaborators

use background_mode::{
    BackgroundError, Host, Listener, MainTask, MainThread, Notification, ServiceConnection,
    Settings, Worker,
};
use tauri::{AppHandle, Emitter, Manager, Runtime};

/// Event name for structured notifications
pub const EVENT_NAME: &str = "background-mode://event";

/// Handle of the bound foreground service
#[derive(Debug)]
pub struct ServiceHandle;

/// Host backed by the Tauri app handle
pub struct TauriHost<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> TauriHost<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> MainThread for TauriHost<R> {
    fn run_on_main_thread(&self, task: MainTask) -> background_mode::Result<()> {
        self.app
            .run_on_main_thread(task)
            .map_err(|e| BackgroundError::MainThread(e.to_string()))
    }
}

impl<R: Runtime> Host for TauriHost<R> {
    fn clear_host_chrome(&self) -> background_mode::Result<()> {
        #[cfg(target_os = "android")]
        {
            crate::mobile::clear_keyguard_flags(&self.app).map_err(BackgroundError::HostChrome)
        }

        #[cfg(not(target_os = "android"))]
        {
            Ok(())
        }
    }

    fn terminate_process(&self) {
        log::info!("Terminating process");
        std::process::exit(0);
    }
}

/// Delivers notifications to every web view as one script, and as a
/// structured Tauri event
pub struct WebviewListener<R: Runtime> {
    app: AppHandle<R>,
    namespace: String,
}

impl<R: Runtime> WebviewListener<R> {
    pub fn new(app: AppHandle<R>, namespace: String) -> Self {
        Self { app, namespace }
    }
}

impl<R: Runtime> Listener for WebviewListener<R> {
    fn notify(&self, notification: &Notification) {
        let script = notification.to_script(&self.namespace);

        for (label, window) in self.app.webview_windows() {
            if let Err(e) = window.eval(&script) {
                log::warn!("Failed to notify webview '{}': {}", label, e);
            }
        }

        if let Err(e) = self.app.emit(EVENT_NAME, notification) {
            log::warn!("Failed to emit '{}': {}", EVENT_NAME, e);
        }
    }
}

/// Worker backed by the Android foreground service. Elsewhere the app
/// process itself keeps running, so binding only connects.
pub struct PlatformWorker<R: Runtime> {
    #[cfg_attr(not(target_os = "android"), allow(dead_code))]
    app: AppHandle<R>,
}

impl<R: Runtime> PlatformWorker<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> Worker for PlatformWorker<R> {
    type Handle = ServiceHandle;

    fn bind(
        &self,
        settings: &Settings,
        connection: ServiceConnection<ServiceHandle>,
    ) -> background_mode::Result<()> {
        #[cfg(target_os = "android")]
        {
            crate::mobile::bind_service(&self.app, settings)
                .map_err(BackgroundError::ServiceBind)?;
        }

        #[cfg(not(target_os = "android"))]
        {
            let _ = settings;
        }

        connection.connected(ServiceHandle);
        Ok(())
    }

    fn update_config(
        &self,
        _handle: &ServiceHandle,
        settings: &Settings,
    ) -> background_mode::Result<()> {
        #[cfg(target_os = "android")]
        {
            crate::mobile::update_notification(&self.app, settings)
                .map_err(BackgroundError::Configuration)
        }

        #[cfg(not(target_os = "android"))]
        {
            let _ = settings;
            Ok(())
        }
    }

    fn unbind(&self, _handle: Option<ServiceHandle>) -> background_mode::Result<()> {
        #[cfg(target_os = "android")]
        {
            crate::mobile::unbind_service(&self.app).map_err(BackgroundError::ServiceUnbind)
        }

        #[cfg(not(target_os = "android"))]
        {
            Ok(())
        }
    }
}
