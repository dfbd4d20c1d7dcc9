//! Shape functions of the two-node frame element and Gauss quadrature on [0, 1].
//!
//! Axial displacement and twist use linear functions, lateral displacements use
//! cubic Hermite functions. With `ξ = x / L`:
//!
//! ```text
//! ux = N1 u1 + N2 u2
//! uy = H1 v1 + H2 θz1 + H3 v2 + H4 θz2
//! uz = H1 w1 - H2 θy1 + H3 w2 - H4 θy2
//! ```

use nalgebra::SMatrix;

use crate::types::Matrix3x12;

pub type Row12 = SMatrix<f64, 1, 12>;

/// 4-point Gauss-Legendre rule mapped to `[0, 1]`: `(ξ, weight)`.
pub fn gauss4() -> [(f64, f64); 4] {
    const P: [f64; 4] = [
        -0.861_136_311_594_052_6,
        -0.339_981_043_584_856_3,
        0.339_981_043_584_856_3,
        0.861_136_311_594_052_6,
    ];
    const W: [f64; 4] = [
        0.347_854_845_137_453_9,
        0.652_145_154_862_546_1,
        0.652_145_154_862_546_1,
        0.347_854_845_137_453_9,
    ];
    let mut rule = [(0.0, 0.0); 4];
    for i in 0..4 {
        rule[i] = (0.5 * (P[i] + 1.0), 0.5 * W[i]);
    }
    rule
}

/// Hermite functions `[H1, H2, H3, H4]` at `ξ` for an element of length `l`.
pub fn hermite(xi: f64, l: f64) -> [f64; 4] {
    let x2 = xi * xi;
    let x3 = x2 * xi;
    [
        1.0 - 3.0 * x2 + 2.0 * x3,
        l * (xi - 2.0 * x2 + x3),
        3.0 * x2 - 2.0 * x3,
        l * (x3 - x2),
    ]
}

/// First derivatives of the Hermite functions with respect to x.
pub fn hermite_dx(xi: f64, l: f64) -> [f64; 4] {
    let x2 = xi * xi;
    [
        (6.0 * x2 - 6.0 * xi) / l,
        1.0 - 4.0 * xi + 3.0 * x2,
        (6.0 * xi - 6.0 * x2) / l,
        3.0 * x2 - 2.0 * xi,
    ]
}

/// Second derivatives of the Hermite functions with respect to x.
pub fn hermite_dxx(xi: f64, l: f64) -> [f64; 4] {
    [
        (12.0 * xi - 6.0) / (l * l),
        (6.0 * xi - 4.0) / l,
        (6.0 - 12.0 * xi) / (l * l),
        (6.0 * xi - 2.0) / l,
    ]
}

fn fill(target: &mut Matrix3x12, lin: [f64; 2], herm: [f64; 4]) {
    target[(0, 0)] = lin[0];
    target[(0, 6)] = lin[1];

    target[(1, 1)] = herm[0];
    target[(1, 5)] = herm[1];
    target[(1, 7)] = herm[2];
    target[(1, 11)] = herm[3];

    target[(2, 2)] = herm[0];
    target[(2, 4)] = -herm[1];
    target[(2, 8)] = herm[2];
    target[(2, 10)] = -herm[3];
}

/// Displacement interpolation matrix `Φ(ξ)` (3x12): rows ux, uy, uz.
pub fn displacement_matrix(xi: f64, l: f64) -> Matrix3x12 {
    let mut phi = Matrix3x12::zeros();
    fill(&mut phi, [1.0 - xi, xi], hermite(xi, l));
    phi
}

/// Slope matrix `dΦ/dx` (3x12).
pub fn slope_matrix(xi: f64, l: f64) -> Matrix3x12 {
    let mut phi = Matrix3x12::zeros();
    fill(&mut phi, [-1.0 / l, 1.0 / l], hermite_dx(xi, l));
    phi
}

/// Curvature rows `(d²uy/dx², d²uz/dx²)` as two 1x12 rows.
pub fn curvature_rows(xi: f64, l: f64) -> (Row12, Row12) {
    let h = hermite_dxx(xi, l);
    let mut by = Row12::zeros();
    by[1] = h[0];
    by[5] = h[1];
    by[7] = h[2];
    by[11] = h[3];

    let mut bz = Row12::zeros();
    bz[2] = h[0];
    bz[4] = -h[1];
    bz[8] = h[2];
    bz[10] = -h[3];
    (by, bz)
}

/// Strain row of a linear field on local DOFs `(i, j)`: `[-1/L, 1/L]`.
pub fn linear_gradient_row(i: usize, j: usize, l: f64) -> Row12 {
    let mut b = Row12::zeros();
    b[i] = -1.0 / l;
    b[j] = 1.0 / l;
    b
}

/// Linear interpolation row on local DOFs `(i, j)`: `[1 - ξ, ξ]`.
pub fn linear_row(i: usize, j: usize, xi: f64) -> Row12 {
    let mut n = Row12::zeros();
    n[i] = 1.0 - xi;
    n[j] = xi;
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauss4_integrates_degree_seven_exactly() {
        let rule = gauss4();
        let total: f64 = rule.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-14);
        let int7: f64 = rule.iter().map(|(x, w)| w * x.powi(7)).sum();
        assert!((int7 - 1.0 / 8.0).abs() < 1e-14);
    }

    #[test]
    fn hermite_end_values() {
        let l = 2.0;
        let h0 = hermite(0.0, l);
        let h1 = hermite(1.0, l);
        assert_eq!(h0, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(h1, [0.0, 0.0, 1.0, 0.0]);
        let d0 = hermite_dx(0.0, l);
        let d1 = hermite_dx(1.0, l);
        assert_eq!(d0, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(d1, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn displacement_matrix_reproduces_nodal_values() {
        let l = 3.0;
        let mut q = nalgebra::SVector::<f64, 12>::zeros();
        q[0] = 0.1;
        q[7] = 0.2;
        q[8] = -0.3;
        let u_end = displacement_matrix(1.0, l) * q;
        assert!((u_end[0] - 0.0).abs() < 1e-14);
        assert!((u_end[1] - 0.2).abs() < 1e-14);
        assert!((u_end[2] + 0.3).abs() < 1e-14);
        let u_start = displacement_matrix(0.0, l) * q;
        assert!((u_start[0] - 0.1).abs() < 1e-14);
    }

    #[test]
    fn positive_theta_y_lowers_z() {
        // θy = -dw/dx
        let l = 1.0;
        let mut q = nalgebra::SVector::<f64, 12>::zeros();
        q[4] = 1.0;
        let slope = slope_matrix(0.0, l) * q;
        assert!((slope[2] + 1.0).abs() < 1e-14);
    }
}
