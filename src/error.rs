//! Error types for background mode operations
//!
//! None of these reach the client except `Dispatch`. Everything else is
//! turned into a `Failure` event by the controller.

use thiserror::Error;

/// Errors raised inside the controller and its collaborators
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackgroundError {
    /// Settings were malformed or could not be applied
    #[error("{0}")]
    Configuration(String),

    /// The worker could not be bound or started
    #[error("{0}")]
    ServiceBind(String),

    /// The worker could not be unbound or stopped
    #[error("{0}")]
    ServiceUnbind(String),

    /// Unknown command name
    #[error("Invalid action: {0}")]
    Dispatch(String),

    /// The platform's connection callback failed
    #[error("{0}")]
    Callback(String),

    /// A task could not be posted to the host's main thread
    #[error("main thread unavailable: {0}")]
    MainThread(String),

    /// The host's display cleanup hook failed
    #[error("{0}")]
    HostChrome(String),
}

pub type Result<T> = std::result::Result<T, BackgroundError>;
