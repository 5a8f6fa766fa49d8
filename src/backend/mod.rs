//! Remote command service
//!
//! The coordinator fires [`CommandRequest`]s through a [`CommandBackend`] and
//! later receives the matching [`RemoteEvent`] on a channel it drains each
//! frame.

pub mod client;
pub mod dispatcher;
pub mod types;

pub use client::{normalize_base_url, BackendClient, DEFAULT_BASE_URL};
pub use dispatcher::HttpCommandBackend;
pub use types::CommandResponse;

use std::time::Duration;

/// Why a command was sent; decides how its result is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandPurpose {
    /// Operator command forwarded verbatim
    Dispatch,
    /// Start-up name lookup for the greeting
    Greeting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub command: String,
    pub purpose: CommandPurpose,
    /// Wait this long before sending
    pub delay: Option<Duration>,
}

impl CommandRequest {
    pub fn dispatch(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            purpose: CommandPurpose::Dispatch,
            delay: None,
        }
    }

    pub fn greeting(command: impl Into<String>, delay: Duration) -> Self {
        Self {
            command: command.into(),
            purpose: CommandPurpose::Greeting,
            delay: Some(delay),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    Response(CommandResponse),
    /// Network error, timeout or unparseable body
    TransportFailure(String),
}

/// Completion of a [`CommandRequest`]
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEvent {
    pub purpose: CommandPurpose,
    pub outcome: RemoteOutcome,
}

/// Sends commands without blocking the caller.
pub trait CommandBackend: Send {
    fn send(&self, request: CommandRequest);
}
