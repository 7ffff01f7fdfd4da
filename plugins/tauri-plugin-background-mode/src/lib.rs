//! Tauri plugin for background mode
//!
//! Keeps the Android foreground service bound while the app is in the
//! background. The state machine lives in the `background_mode` crate; this
//! plugin wires it to window focus, app exit, the web view and the Kotlin
//! service.

use background_mode::options::{default_options_path, load_options_from_file};
use background_mode::{
    create_controller, BackgroundModeController, CommandResult, ControllerOptions,
    ControllerStatus,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tauri::{
    plugin::{Builder, TauriPlugin},
    AppHandle, Manager, RunEvent, Runtime, WindowEvent,
};

mod bridge;
#[cfg(target_os = "android")]
mod mobile;

pub use bridge::{PlatformWorker, ServiceHandle, TauriHost, WebviewListener, EVENT_NAME};

type Controller<R> = BackgroundModeController<PlatformWorker<R>, TauriHost<R>>;

/// Controller managed in app state
pub struct BackgroundModeState<R: Runtime>(Mutex<Controller<R>>);

impl<R: Runtime> BackgroundModeState<R> {
    fn with<T>(&self, f: impl FnOnce(&mut Controller<R>) -> T) -> Result<T, String> {
        let mut controller = self
            .0
            .lock()
            .map_err(|e| format!("Failed to lock background mode state: {}", e))?;
        Ok(f(&mut controller))
    }
}

fn dispatch<R: Runtime>(app: &AppHandle<R>, action: &str, args: &[Value]) -> CommandResult<()> {
    let Some(state) = app.try_state::<BackgroundModeState<R>>() else {
        return CommandResult::err("Background mode plugin not initialized");
    };
    match state.with(|controller| controller.execute(action, args)) {
        Ok(result) => result,
        Err(e) => CommandResult::err(e),
    }
}

fn read_status<R: Runtime>(app: &AppHandle<R>) -> Result<ControllerStatus, String> {
    let state = app
        .try_state::<BackgroundModeState<R>>()
        .ok_or("Background mode plugin not initialized")?;
    state.with(|controller| controller.status())
}

/// Set the default notification settings, or update the live notification
/// when `update` is true
#[tauri::command]
async fn configure<R: Runtime>(
    app: AppHandle<R>,
    settings: Value,
    update: Option<bool>,
) -> CommandResult<()> {
    dispatch(
        &app,
        "configure",
        &[settings, Value::Bool(update.unwrap_or(false))],
    )
}

/// Enable background mode
#[tauri::command]
async fn enable<R: Runtime>(app: AppHandle<R>) -> CommandResult<()> {
    dispatch(&app, "enable", &[])
}

/// Disable background mode and stop the service
#[tauri::command]
async fn disable<R: Runtime>(app: AppHandle<R>) -> CommandResult<()> {
    dispatch(&app, "disable", &[])
}

/// Run a command by name (for the Cordova-style `exec` bridge)
#[tauri::command]
async fn execute<R: Runtime>(
    app: AppHandle<R>,
    action: String,
    args: Vec<Value>,
) -> CommandResult<()> {
    dispatch(&app, &action, &args)
}

/// Check if background mode is active (enabled and bound)
#[tauri::command]
async fn is_active<R: Runtime>(app: AppHandle<R>) -> CommandResult<bool> {
    match read_status(&app) {
        Ok(status) => CommandResult::ok(status.is_active()),
        Err(e) => CommandResult::err(e),
    }
}

/// Get the controller flags
#[tauri::command]
async fn get_status<R: Runtime>(app: AppHandle<R>) -> CommandResult<ControllerStatus> {
    match read_status(&app) {
        Ok(status) => CommandResult::ok(status),
        Err(e) => CommandResult::err(e),
    }
}

fn with_controller<R: Runtime>(app: &AppHandle<R>, f: impl FnOnce(&mut Controller<R>)) {
    let Some(state) = app.try_state::<BackgroundModeState<R>>() else {
        return;
    };
    if let Err(e) = state.with(f) {
        log::error!("{}", e);
    }
}

/// Initialize the background mode plugin
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("background-mode")
        .invoke_handler(tauri::generate_handler![
            configure,
            enable,
            disable,
            execute,
            is_active,
            get_status
        ])
        .setup(|app, _api| {
            #[cfg(target_os = "android")]
            {
                let handle = _api.register_android_plugin(
                    "de.appplant.backgroundmode",
                    "BackgroundModePlugin",
                )?;
                // Wrap in unique type so we can retrieve the correct handle from app state
                app.manage(mobile::BackgroundModeHandle(handle));
            }

            let options = default_options_path()
                .and_then(|path| load_options_from_file(&path))
                .unwrap_or_else(ControllerOptions::default);

            let controller = create_controller(
                PlatformWorker::new(app.clone()),
                Arc::new(TauriHost::new(app.clone())),
                &options,
            );
            controller.set_listener(Arc::new(WebviewListener::new(
                app.clone(),
                options.js_namespace.clone(),
            )));

            app.manage(BackgroundModeState(Mutex::new(controller)));
            log::info!("Background mode plugin initialized");
            Ok(())
        })
        .on_event(|app, event| match event {
            RunEvent::WindowEvent {
                event: WindowEvent::Focused(false),
                ..
            } => with_controller(app, |controller| {
                controller.on_host_paused();
                controller.on_host_stopped();
            }),
            RunEvent::WindowEvent {
                event: WindowEvent::Focused(true),
                ..
            } => with_controller(app, |controller| controller.on_host_resumed()),
            RunEvent::Exit => with_controller(app, |controller| controller.on_host_destroyed()),
            _ => {}
        })
        .build()
}
