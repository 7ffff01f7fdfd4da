//! Client command surface
//!
//! Three commands reach the controller: `configure`, `enable` and `disable`.
//! Only an unknown command name is reported through the command result.
//! Everything that goes wrong while running a known command is reported to
//! the listener instead.

use crate::controller::BackgroundModeController;
use crate::error::BackgroundError;
use crate::events::Event;
use crate::host::{Host, Worker};
use crate::options::Settings;
use serde::Serialize;
use serde_json::{Map, Value};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Result wrapper for commands
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// A recognized client command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Configure {
        /// Raw settings argument; validated when the command runs
        settings: Option<Value>,
        update: bool,
    },
    Enable,
    Disable,
}

impl Command {
    /// Parse an action name and its JSON arguments
    pub fn parse(action: &str, args: &[Value]) -> Result<Self, BackgroundError> {
        match action {
            "configure" => Ok(Command::Configure {
                settings: args.first().cloned(),
                update: args.get(1).and_then(Value::as_bool).unwrap_or(false),
            }),
            "enable" => Ok(Command::Enable),
            "disable" => Ok(Command::Disable),
            other => Err(BackgroundError::Dispatch(other.to_string())),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl<W: Worker, H: Host + 'static> BackgroundModeController<W, H> {
    /// Run a client command by name
    pub fn execute(&mut self, action: &str, args: &[Value]) -> CommandResult<()> {
        let command = match Command::parse(action, args) {
            Ok(command) => command,
            Err(e) => {
                log::warn!("Rejected command: {}", e);
                return CommandResult::err(e.to_string());
            }
        };

        log::debug!("Executing command: {}", action);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(command)));

        match outcome {
            Ok(()) => CommandResult::ok(()),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("Command '{}' panicked: {}", action, message);
                self.report(Event::failure("execute", &message));
                CommandResult::err(format!("Error executing action: {}", message))
            }
        }
    }

    /// Run an already parsed command
    pub fn run(&mut self, command: Command) {
        match command {
            Command::Configure { settings, update } => {
                if update && !self.status().bound {
                    log::debug!("Settings update skipped, worker not bound");
                    return;
                }

                // A null or missing argument means empty settings
                let settings = match settings {
                    None | Some(Value::Null) => Value::Object(Map::new()),
                    Some(value) => value,
                };

                match Settings::try_from(settings) {
                    Ok(settings) => self.configure(settings, update),
                    Err(e) => {
                        log::warn!("Rejected settings: {}", e);
                        self.report(Event::failure("configure", e));
                    }
                }
            }
            Command::Enable => self.enable(),
            Command::Disable => self.disable(),
        }
    }
}
