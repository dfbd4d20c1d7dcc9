//! Rigid-body mass matrix of a point body expressed at a reference point.

use nalgebra::{Matrix3, Matrix6, Vector3};
use serde::{Deserialize, Serialize};

/// Inertia tensor of a body about its center of gravity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Inertia {
    /// Principal moments `[Jxx, Jyy, Jzz]`
    Diagonal([f64; 3]),
    /// Full symmetric tensor, row-major
    Full([[f64; 3]; 3]),
}

impl Inertia {
    pub fn to_matrix(&self) -> Matrix3<f64> {
        match self {
            Inertia::Diagonal(d) => Matrix3::from_diagonal(&Vector3::new(d[0], d[1], d[2])),
            Inertia::Full(j) => Matrix3::from_fn(|r, c| j[r][c]),
        }
    }
}

impl Default for Inertia {
    fn default() -> Self {
        Inertia::Diagonal([0.0; 3])
    }
}

/// 6x6 mass matrix at a reference point P of a body of mass `m`, inertia `j_g`
/// about its COG, located at `ref_to_cog` from P.
///
/// Missing inputs default to zero. Only the upper triangle of the inertia is
/// read, so the result is symmetric.
pub fn rigid_body_mass_matrix_at_p(
    m: Option<f64>,
    j_g: Option<&Inertia>,
    ref_to_cog: Option<&Vector3<f64>>,
) -> Matrix6<f64> {
    let m = m.unwrap_or(0.0);
    let j = j_g.map(Inertia::to_matrix).unwrap_or_else(Matrix3::zeros);
    let (x, y, z) = ref_to_cog.map(|r| (r.x, r.y, r.z)).unwrap_or((0.0, 0.0, 0.0));

    let (jxx, jxy, jxz) = (j[(0, 0)], j[(0, 1)], j[(0, 2)]);
    let (jyy, jyz) = (j[(1, 1)], j[(1, 2)]);
    let jzz = j[(2, 2)];

    #[rustfmt::skip]
    let m66 = Matrix6::new(
        m,      0.0,    0.0,    0.0,                     z * m,                   -y * m,
        0.0,    m,      0.0,    -z * m,                  0.0,                     x * m,
        0.0,    0.0,    m,      y * m,                   -x * m,                  0.0,
        0.0,    -z * m, y * m,  jxx + m * (y * y + z * z), jxy - m * x * y,       jxz - m * x * z,
        z * m,  0.0,    -x * m, jxy - m * x * y,         jyy + m * (x * x + z * z), jyz - m * y * z,
        -y * m, x * m,  0.0,    jxz - m * x * z,         jyz - m * y * z,         jzz + m * (x * x + y * y),
    );
    m66
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_mass_offset_along_x() {
        let j = Inertia::Diagonal([10.0, 20.0, 30.0]);
        let r = Vector3::new(1.0, 0.0, 0.0);
        let m = rigid_body_mass_matrix_at_p(Some(100.0), Some(&j), Some(&r));

        assert_eq!(m[(0, 0)], 100.0);
        assert_eq!(m[(3, 3)], 10.0);
        assert_eq!(m[(4, 4)], 120.0);
        assert_eq!(m[(5, 5)], 130.0);
        // Coupling: a y-translation of the reference point drags the COG around z
        assert_eq!(m[(1, 5)], 100.0);
        assert_eq!(m[(2, 4)], -100.0);
        assert!((m - m.transpose()).norm() < 1e-14);
    }

    #[test]
    fn defaults_are_zero() {
        assert_eq!(rigid_body_mass_matrix_at_p(None, None, None), Matrix6::zeros());
    }

    #[test]
    fn full_inertia_keeps_products() {
        let j = Inertia::Full([[1.0, 0.1, 0.2], [0.1, 2.0, 0.3], [0.2, 0.3, 3.0]]);
        let m = rigid_body_mass_matrix_at_p(Some(2.0), Some(&j), None);
        assert_eq!(m[(3, 4)], 0.1);
        assert_eq!(m[(4, 5)], 0.3);
        assert_eq!(m[(5, 3)], 0.2);
        assert_eq!(m[(2, 2)], 2.0);
    }

    #[test]
    fn inertia_parses_both_shapes() {
        let d: Inertia = serde_json::from_str("[1.0, 2.0, 3.0]").unwrap();
        assert_eq!(d, Inertia::Diagonal([1.0, 2.0, 3.0]));
        let f: Inertia = serde_json::from_str("[[1,0,0],[0,2,0],[0,0,3]]").unwrap();
        assert_eq!(f.to_matrix(), d.to_matrix());
    }
}
