//! Lifecycle events and their delivery
//!
//! Each event becomes one [`Notification`]: an active-state update, a named
//! `on` notification and a generic `fireEvent` call, always delivered
//! together and in that order.

mod bus;

pub use bus::EventBus;

use serde::Serialize;

/// Event reported to the listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "message", rename_all = "lowercase")]
pub enum Event {
    Activate,
    Deactivate,
    Failure(String),
}

impl Event {
    /// Name used on the JavaScript side
    pub fn name(&self) -> &'static str {
        match self {
            Event::Activate => "activate",
            Event::Deactivate => "deactivate",
            Event::Failure(_) => "failure",
        }
    }

    pub fn params(&self) -> Option<&str> {
        match self {
            Event::Failure(message) => Some(message),
            _ => None,
        }
    }

    /// Build a failure event for `operation`
    pub fn failure(operation: &str, error: impl std::fmt::Display) -> Self {
        Event::Failure(format!("{} error: {}", operation, error))
    }
}

/// One step of a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery<'a> {
    SetActive(bool),
    On {
        event: &'static str,
        params: Option<&'a str>,
    },
    Fire {
        event: &'static str,
        params: Option<&'a str>,
    },
}

/// The atomic message handed to the listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub active: bool,
    pub event: Event,
}

impl Notification {
    pub fn new(event: Event) -> Self {
        Self {
            active: event == Event::Activate,
            event,
        }
    }

    /// The three steps in delivery order
    pub fn deliveries(&self) -> [Delivery<'_>; 3] {
        let event = self.event.name();
        let params = self.event.params();
        [
            Delivery::SetActive(self.active),
            Delivery::On { event, params },
            Delivery::Fire { event, params },
        ]
    }

    /// Render as a single script for a web view listener
    pub fn to_script(&self, namespace: &str) -> String {
        let event = self.event.name();
        let params = match self.event.params() {
            Some(message) => serde_json::Value::from(message).to_string(),
            None => "null".to_string(),
        };

        format!(
            "{ns}._setActive({active});{ns}.on('{event}', {params});{ns}.fireEvent('{event}',{params});",
            ns = namespace,
            active = self.active,
            event = event,
            params = params,
        )
    }
}
