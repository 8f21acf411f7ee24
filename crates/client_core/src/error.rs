use std::{fmt, time::Duration};

use thiserror::Error;

use crate::{format::ExponentError, render::RenderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Previous => f.write_str("previous"),
            Direction::Next => f.write_str("next"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("simulator request failed: {0}")]
    Transport(String),
    #[error("simulator returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed simulator response: {0}")]
    Malformed(String),
    #[error("a simulation query is already in flight")]
    Busy,
    #[error("{direction} page is not available")]
    NavigationUnavailable { direction: Direction },
    #[error("simulation query timed out after {0:?}")]
    Timeout(Duration),
    #[error("simulation query was cancelled")]
    Cancelled,
}

impl QueryError {
    /// Rejections never leave Idle, so they do not touch the controls.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            QueryError::Busy | QueryError::NavigationUnavailable { .. }
        )
    }
}

impl From<ExponentError> for QueryError {
    fn from(value: ExponentError) -> Self {
        QueryError::Malformed(value.to_string())
    }
}

impl From<RenderError> for QueryError {
    fn from(value: RenderError) -> Self {
        QueryError::Malformed(value.to_string())
    }
}
