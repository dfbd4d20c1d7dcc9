/// 3D Euler-Bernoulli frame element with constant section properties.
///
/// Each node has 6 degrees of freedom:
/// - 3 translations (ux, uy, uz)
/// - 3 rotations (θx, θy, θz)
///
/// The section is sampled once per element (at its midpoint). Bending in the
/// local x-y plane uses `EIz`, bending in the x-z plane uses `EIy`.
///
/// References:
/// - Przemieniecki, "Theory of Matrix Structural Analysis"
/// - Cook et al., "Concepts and Applications of Finite Element Analysis"

use crate::elements::{
    ElementMatrices, FrameElement, XY_PLANE, XZ_PLANE, XZ_SIGNS, add_pair_block,
    add_plane_block,
};
use crate::elements::section::{BeamSection, Material};
use crate::types::{ElementType, Matrix12};

/// Two-node frame element with uniform properties
#[derive(Debug, Clone, PartialEq)]
pub struct Frame3d {
    pub length: f64,
    pub material: Material,
    pub section: BeamSection,
    /// Axial load T used for the geometric stiffness [N]
    pub axial_load: f64,
}

impl Frame3d {
    pub fn new(length: f64, material: Material, section: BeamSection) -> Self {
        Self {
            length,
            material,
            section,
            axial_load: 0.0,
        }
    }

    /// Same element carrying a constant axial load `t` (tension positive).
    pub fn with_axial_load(mut self, t: f64) -> Self {
        self.axial_load = t;
        self
    }

    /// Local stiffness matrix (12x12)
    ///
    /// Combines axial, torsional and bending stiffness in both planes.
    pub fn local_stiffness(&self) -> Matrix12 {
        let s = &self.section;
        let l = self.length;
        let mut k = Matrix12::zeros();

        // Axial stiffness (DOFs 0, 6)
        let k_axial = s.ea / l;
        add_pair_block(&mut k, 0, 6, k_axial, -k_axial);

        // Torsional stiffness (DOFs 3, 9)
        let k_torsion = self.material.g * s.kt / l;
        add_pair_block(&mut k, 3, 9, k_torsion, -k_torsion);

        // Bending in XY plane (DOFs 1, 5, 7, 11)
        add_plane_block(&mut k, XY_PLANE, [1.0; 4], &bending_block(s.eiz, l));

        // Bending in XZ plane (DOFs 2, 4, 8, 10)
        add_plane_block(&mut k, XZ_PLANE, XZ_SIGNS, &bending_block(s.eiy, l));

        k
    }

    /// Consistent mass matrix (12x12), total mass `m L`
    pub fn local_mass(&self) -> Matrix12 {
        let l = self.length;
        let ml = self.total_mass();
        let mut m = Matrix12::zeros();

        add_pair_block(&mut m, 0, 6, ml / 3.0, ml / 6.0);

        // Torsional rotary inertia, rx² = Ix / A
        let jl = self.section.polar_inertia_per_length(&self.material) * l;
        add_pair_block(&mut m, 3, 9, jl / 3.0, jl / 6.0);

        let c = ml / 420.0;
        let block = [
            [156.0 * c, 22.0 * l * c, 54.0 * c, -13.0 * l * c],
            [22.0 * l * c, 4.0 * l * l * c, 13.0 * l * c, -3.0 * l * l * c],
            [54.0 * c, 13.0 * l * c, 156.0 * c, -22.0 * l * c],
            [-13.0 * l * c, -3.0 * l * l * c, -22.0 * l * c, 4.0 * l * l * c],
        ];
        add_plane_block(&mut m, XY_PLANE, [1.0; 4], &block);
        add_plane_block(&mut m, XZ_PLANE, XZ_SIGNS, &block);

        m
    }

    /// Lateral geometric stiffness for the axial load (12x12)
    pub fn local_geometric_stiffness(&self) -> Matrix12 {
        let mut kg = Matrix12::zeros();
        if self.axial_load == 0.0 {
            return kg;
        }
        let l = self.length;
        let c = self.axial_load / (30.0 * l);
        let block = [
            [36.0 * c, 3.0 * l * c, -36.0 * c, 3.0 * l * c],
            [3.0 * l * c, 4.0 * l * l * c, -3.0 * l * c, -l * l * c],
            [-36.0 * c, -3.0 * l * c, 36.0 * c, -3.0 * l * c],
            [3.0 * l * c, -l * l * c, -3.0 * l * c, 4.0 * l * l * c],
        ];
        add_plane_block(&mut kg, XY_PLANE, [1.0; 4], &block);
        add_plane_block(&mut kg, XZ_PLANE, XZ_SIGNS, &block);
        kg
    }
}

/// Euler-Bernoulli bending block on `(v1, θ1, v2, θ2)` for stiffness `ei`.
fn bending_block(ei: f64, l: f64) -> [[f64; 4]; 4] {
    let k_bend = 12.0 * ei / l.powi(3);
    let k_rot = 6.0 * ei / l.powi(2);
    let k_rr = 4.0 * ei / l;
    let k_rr2 = 2.0 * ei / l;
    [
        [k_bend, k_rot, -k_bend, k_rot],
        [k_rot, k_rr, -k_rot, k_rr2],
        [-k_bend, -k_rot, k_bend, -k_rot],
        [k_rot, k_rr2, -k_rot, k_rr],
    ]
}

impl FrameElement for Frame3d {
    fn element_type(&self) -> ElementType {
        ElementType::Frame3d
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn matrices(&self) -> ElementMatrices {
        ElementMatrices {
            stiffness: self.local_stiffness(),
            mass: self.local_mass(),
            geometric: self.local_geometric_stiffness(),
        }
    }

    fn total_mass(&self) -> f64 {
        self.section.m * self.length
    }
}
