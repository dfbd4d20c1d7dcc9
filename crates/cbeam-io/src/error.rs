//! Error types for cbeam-io

use cbeam_solver::BeamError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid deck: {0}")]
    Deck(String),

    #[error("Solver error: {0}")]
    Solver(#[from] BeamError),
}
