//! Numerical backend abstraction layer.
//!
//! The beam pipeline only needs two global operations: the generalized
//! eigenproblem on the reduced system and a linear solve for the flexibility
//! matrix used by geometrical stiffening. Both are reached through traits so a
//! caller can plug in another library.
//!
//! ```text
//! Element providers (nalgebra SMatrix, 12x12)
//!         │
//!         ▼
//! Assembler + BC reduction (dense DMatrix)
//!         │
//!         ▼
//! Backend Trait Layer (LinearSolver, EigenSolver)
//!         │
//!         ▼
//!   NativeBackend
//! ```

pub mod native;
pub mod traits;

pub use native::NativeBackend;
pub use traits::*;

/// Returns the default solver backend.
pub fn default_backend() -> Box<dyn SolverBackend> {
    Box::new(NativeBackend)
}
