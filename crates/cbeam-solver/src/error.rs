//! Error types for cbeam-solver

use thiserror::Error;

use crate::backend::BackendError;

pub type Result<T> = std::result::Result<T, BeamError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BeamError {
    /// A required property is missing and cannot be derived, or inputs disagree.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Element formulation or geometry the solver does not implement.
    #[error("Not implemented: {0}")]
    Unsupported(String),

    #[error("Dimension mismatch: {0}")]
    Dimension(String),

    #[error("Solver backend error: {0}")]
    Backend(#[from] BackendError),
}

impl BeamError {
    pub fn config(msg: impl Into<String>) -> Self {
        BeamError::Config(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        BeamError::Unsupported(msg.into())
    }

    pub fn dimension(msg: impl Into<String>) -> Self {
        BeamError::Dimension(msg.into())
    }
}
