//! Android-specific implementation using Tauri's mobile plugin system

use background_mode::Settings;
use serde::{Deserialize, Serialize};
use tauri::{plugin::PluginHandle, AppHandle, Manager, Runtime};

/// Wrapper type for the background mode plugin handle
/// This ensures we get the correct plugin handle from app state
pub struct BackgroundModeHandle<R: Runtime>(pub PluginHandle<R>);

/// Empty response for commands that return JSObject() from Kotlin
#[derive(Deserialize)]
struct EmptyResponse {}

/// Arguments carrying notification settings
#[derive(Serialize)]
struct SettingsArgs<'a> {
    settings: &'a Settings,
}

fn run<R: Runtime, A: Serialize>(app: &AppHandle<R>, method: &str, args: A) -> Result<(), String> {
    let handle = app
        .try_state::<BackgroundModeHandle<R>>()
        .ok_or("Background mode plugin not initialized")?;

    let _: EmptyResponse = handle
        .0
        .run_mobile_plugin(method, args)
        .map_err(|e| format!("{} failed: {}", method, e))?;

    Ok(())
}

/// Bind and start the foreground service
pub fn bind_service<R: Runtime>(app: &AppHandle<R>, settings: &Settings) -> Result<(), String> {
    run(app, "bindService", SettingsArgs { settings })
}

/// Push new notification settings to the running service
pub fn update_notification<R: Runtime>(
    app: &AppHandle<R>,
    settings: &Settings,
) -> Result<(), String> {
    run(app, "updateNotification", SettingsArgs { settings })
}

/// Unbind and stop the foreground service
pub fn unbind_service<R: Runtime>(app: &AppHandle<R>) -> Result<(), String> {
    run(app, "unbindService", ())
}

/// Clear the keyguard and screen-on window flags
pub fn clear_keyguard_flags<R: Runtime>(app: &AppHandle<R>) -> Result<(), String> {
    run(app, "clearKeyguardFlags", ())
}
