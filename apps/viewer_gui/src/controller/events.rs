//! UI/backend events and error modeling for the viewer GUI.

use client_core::{QueryError, QueryId};
use shared::protocol::SimulationResponse;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    SimulationSettled {
        query: QueryId,
        outcome: Result<SimulationResponse, QueryError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Configuration,
    Transport,
    Server,
    Response,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Simulate,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("simulator url") {
            UiErrorCategory::Configuration
        } else if message_lower.contains("malformed")
            || message_lower.contains("invalid")
            || message_lower.contains("exponent")
        {
            UiErrorCategory::Response
        } else if message_lower.contains("http 5") || message_lower.contains("http 4") {
            UiErrorCategory::Server
        } else if message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("request failed")
            || message_lower.contains("disconnected")
            || message_lower.contains("queue")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_query(err: &QueryError) -> Self {
        let category = match err {
            QueryError::Transport(_) | QueryError::Timeout(_) => UiErrorCategory::Transport,
            QueryError::Status { .. } => UiErrorCategory::Server,
            QueryError::Malformed(_) => UiErrorCategory::Response,
            QueryError::Busy
            | QueryError::NavigationUnavailable { .. }
            | QueryError::Cancelled => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context: UiErrorContext::Simulate,
            message: err.to_string(),
        }
    }

    /// Hint shown next to the error; every failure is recovered by resubmitting.
    pub fn guidance(&self) -> &'static str {
        match self.category {
            UiErrorCategory::Configuration => {
                "Fix the simulator URL (--server-url, viewer.toml or APP__SERVER_URL) and relaunch."
            }
            UiErrorCategory::Transport => "Simulator unreachable; check the server URL and press Simulate.",
            UiErrorCategory::Server => "Simulator rejected the parameters; adjust them and press Simulate.",
            UiErrorCategory::Response => "Simulator sent an unexpected response; press Simulate to retry.",
            UiErrorCategory::Unknown => "Press Simulate to retry.",
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn classifies_query_errors() {
        assert_eq!(
            UiError::from_query(&QueryError::Timeout(Duration::from_secs(1))).category(),
            UiErrorCategory::Transport
        );
        assert_eq!(
            UiError::from_query(&QueryError::Status {
                status: 500,
                body: String::new()
            })
            .category(),
            UiErrorCategory::Server
        );
        assert_eq!(
            UiError::from_query(&QueryError::Malformed("x".to_string())).category(),
            UiErrorCategory::Response
        );
    }

    #[test]
    fn classifies_queue_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::Simulate,
            "Backend command processor disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.context(), UiErrorContext::Simulate);
    }

    #[test]
    fn classifies_bad_url_as_configuration_problem() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "invalid simulator url 'x': relative URL without a base",
        );
        assert_eq!(err.category(), UiErrorCategory::Configuration);
    }
}
