//! Frame element with section properties varying linearly between its nodes.
//!
//! Matrices are integrated with a 4-point Gauss rule, which is exact for the
//! polynomial integrands of this element (linear property times products of
//! cubic shape functions). With uniform properties the element reproduces
//! [`Frame3d`](super::Frame3d).

use nalgebra::Matrix3;

use crate::elements::section::{BeamSection, Material};
use crate::elements::shape::{
    curvature_rows, displacement_matrix, gauss4, linear_gradient_row, linear_row, slope_matrix,
};
use crate::elements::{ElementMatrices, FrameElement};
use crate::types::{ElementType, Matrix12};

/// Mass cross tensor: `C3[k][l] = ∫ m Φ_kᵀ Φ_l dx` for displacement rows `k, l`.
pub type MassCross = [[Matrix12; 3]; 3];

/// Two-node frame element with linearly varying properties
#[derive(Debug, Clone, PartialEq)]
pub struct Frame3dLin {
    pub length: f64,
    pub material: Material,
    /// Section at the first node
    pub start: BeamSection,
    /// Section at the second node
    pub end: BeamSection,
}

impl Frame3dLin {
    pub fn new(length: f64, material: Material, start: BeamSection, end: BeamSection) -> Self {
        Self {
            length,
            material,
            start,
            end,
        }
    }

    pub fn local_stiffness(&self) -> Matrix12 {
        let l = self.length;
        let g = self.material.g;
        let b_axial = linear_gradient_row(0, 6, l);
        let b_twist = linear_gradient_row(3, 9, l);
        let mut k = Matrix12::zeros();

        for (xi, w) in gauss4() {
            let s = self.start.lerp(&self.end, xi);
            let dx = w * l;
            let (by, bz) = curvature_rows(xi, l);
            k += b_axial.transpose() * b_axial * (s.ea * dx);
            k += b_twist.transpose() * b_twist * (g * s.kt * dx);
            k += by.transpose() * by * (s.eiz * dx);
            k += bz.transpose() * bz * (s.eiy * dx);
        }
        k
    }

    pub fn local_mass(&self) -> Matrix12 {
        let c3 = self.mass_cross();
        let mut m = c3[0][0] + c3[1][1] + c3[2][2];

        // Torsional rotary inertia, linear between the end values
        let j1 = self.start.polar_inertia_per_length(&self.material);
        let j2 = self.end.polar_inertia_per_length(&self.material);
        for (xi, w) in gauss4() {
            let n = linear_row(3, 9, xi);
            let j = j1 + xi * (j2 - j1);
            m += n.transpose() * n * (j * w * self.length);
        }
        m
    }

    /// Mass cross tensor of the element in local coordinates.
    pub fn mass_cross(&self) -> MassCross {
        let l = self.length;
        let mut c3: MassCross = [[Matrix12::zeros(); 3]; 3];
        for (xi, w) in gauss4() {
            let mass = self.start.m + xi * (self.end.m - self.start.m);
            let phi = displacement_matrix(xi, l);
            let dx = w * l;
            for (k, row_k) in c3.iter_mut().enumerate() {
                let phi_k = phi.row(k);
                for (ll, block) in row_k.iter_mut().enumerate() {
                    *block += phi_k.transpose() * phi.row(ll) * (mass * dx);
                }
            }
        }
        c3
    }
}

/// Axial geometric stiffness of a frame element in local coordinates.
///
/// The axial force `N = E (A1 + A2) / 2 (u2 - u1) / L` follows from the end
/// displacements `u1`, `u2` along the element axis.
pub fn geometric_stiffness(e: f64, a1: f64, a2: f64, l: f64, u1: f64, u2: f64) -> Matrix12 {
    let n = e * 0.5 * (a1 + a2) * (u2 - u1) / l;
    let mut kg = Matrix12::zeros();
    if n == 0.0 {
        return kg;
    }
    for (xi, w) in gauss4() {
        let d = slope_matrix(xi, l);
        let dy = d.row(1);
        let dz = d.row(2);
        kg += (dy.transpose() * dy + dz.transpose() * dz) * (n * w * l);
    }
    kg
}

/// Rotate a local 12x12 element matrix to global axes: `RRᵀ K RR`.
pub fn rotate_to_global(k_local: &Matrix12, dcm: &Matrix3<f64>) -> Matrix12 {
    let rr = block_rotation(dcm);
    rr.transpose() * k_local * rr
}

/// `blockdiag(R, R, R, R)` for the four 3-vectors of a frame element.
pub fn block_rotation(dcm: &Matrix3<f64>) -> Matrix12 {
    let mut rr = Matrix12::zeros();
    for b in 0..4 {
        rr.fixed_view_mut::<3, 3>(3 * b, 3 * b).copy_from(dcm);
    }
    rr
}

impl FrameElement for Frame3dLin {
    fn element_type(&self) -> ElementType {
        ElementType::Frame3dLin
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn matrices(&self) -> ElementMatrices {
        ElementMatrices {
            stiffness: self.local_stiffness(),
            mass: self.local_mass(),
            geometric: Matrix12::zeros(),
        }
    }

    fn total_mass(&self) -> f64 {
        0.5 * (self.start.m + self.end.m) * self.length
    }
}
