//! Backend trait definitions for the dense solvers used by the beam model.
//!
//! These traits abstract over the concrete numerical library used for the
//! global operations (generalized eigenproblem, flexibility solve). Element-level
//! computations stay in nalgebra fixed-size matrices.

use nalgebra::DMatrix;
use thiserror::Error;

/// Error type for backend operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct BackendError(pub String);

impl From<String> for BackendError {
    fn from(s: String) -> Self {
        BackendError(s)
    }
}

impl From<&str> for BackendError {
    fn from(s: &str) -> Self {
        BackendError(s.to_string())
    }
}

/// Results from a generalized eigenvalue solve.
#[derive(Debug, Clone)]
pub struct EigenResult {
    /// Eigenvalues (lambda = omega^2), sorted ascending
    pub eigenvalues: Vec<f64>,
    /// Mass-normalized eigenvectors as columns (n x n)
    pub eigenvectors: DMatrix<f64>,
    /// Natural frequencies [Hz], `sqrt(max(lambda, 0)) / 2pi`
    pub frequencies: Vec<f64>,
}

impl EigenResult {
    pub fn num_modes(&self) -> usize {
        self.eigenvalues.len()
    }
}

/// Trait for a dense linear solver backend.
pub trait LinearSolver {
    /// Solve `K X = B` for every column of `B`.
    fn solve_linear(&self, k: &DMatrix<f64>, b: &DMatrix<f64>)
    -> Result<DMatrix<f64>, BackendError>;
}

/// Trait for a generalized eigenvalue solver backend.
///
/// Implementations solve `K v = lambda M v` and return every pair, rigid-body
/// (zero) eigenvalues included, in ascending order.
pub trait EigenSolver {
    fn solve_generalized(
        &self,
        k: &DMatrix<f64>,
        m: &DMatrix<f64>,
    ) -> Result<EigenResult, BackendError>;
}

/// Combined backend providing both solvers.
pub trait SolverBackend: LinearSolver + EigenSolver {
    /// Human-readable name of this backend.
    fn name(&self) -> &str;
}
