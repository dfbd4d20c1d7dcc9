//! Frame element library for beam models.
//!
//! Every element has two nodes with six DOFs each, ordered
//! `(ux, uy, uz, θx, θy, θz)` per node. Matrices are returned in the element's
//! local frame, local x running from the first to the second node. The
//! assembler rotates them with the element DCM.

use crate::types::{ElementType, Matrix12};

pub mod factory;
pub mod frame3d;
pub mod frame3dlin;
pub mod section;
pub mod shape;

pub use factory::DynamicFrame;
pub use frame3d::Frame3d;
pub use frame3dlin::{Frame3dLin, MassCross};
pub use section::{BeamSection, Material};

/// Local element matrices (12x12).
#[derive(Debug, Clone, PartialEq)]
pub struct ElementMatrices {
    pub stiffness: Matrix12,
    pub mass: Matrix12,
    /// Geometric stiffness for the element's axial load (zero when unloaded)
    pub geometric: Matrix12,
}

impl ElementMatrices {
    pub fn zeros() -> Self {
        Self {
            stiffness: Matrix12::zeros(),
            mass: Matrix12::zeros(),
            geometric: Matrix12::zeros(),
        }
    }
}

/// Element-matrix provider for a two-node frame element.
pub trait FrameElement {
    /// Formulation implemented by this element
    fn element_type(&self) -> ElementType;

    /// Element length [m]
    fn length(&self) -> f64;

    /// Compute stiffness, mass and geometric stiffness in local coordinates
    fn matrices(&self) -> ElementMatrices;

    /// Total element mass [kg]
    fn total_mass(&self) -> f64;
}

/// Local DOF indices of the bending plane x-y: `(uy1, θz1, uy2, θz2)`.
pub(crate) const XY_PLANE: [usize; 4] = [1, 5, 7, 11];
/// Local DOF indices of the bending plane x-z: `(uz1, θy1, uz2, θy2)`.
pub(crate) const XZ_PLANE: [usize; 4] = [2, 4, 8, 10];
/// Sign pattern mapping an x-y plane block onto the x-z plane (θy = -dw/dx).
pub(crate) const XZ_SIGNS: [f64; 4] = [1.0, -1.0, 1.0, -1.0];

/// Add a 4x4 bending block on the given local DOFs, with optional sign flips.
pub(crate) fn add_plane_block(
    target: &mut Matrix12,
    dofs: [usize; 4],
    signs: [f64; 4],
    block: &[[f64; 4]; 4],
) {
    for i in 0..4 {
        for j in 0..4 {
            target[(dofs[i], dofs[j])] += signs[i] * signs[j] * block[i][j];
        }
    }
}

/// Add a 2x2 two-node block `c * [a b; b a]` on local DOFs `(i, j)`.
pub(crate) fn add_pair_block(target: &mut Matrix12, i: usize, j: usize, diag: f64, off: f64) {
    target[(i, i)] += diag;
    target[(j, j)] += diag;
    target[(i, j)] += off;
    target[(j, i)] += off;
}
