//! Cross-section and material records consumed by the frame elements.

use serde::{Deserialize, Serialize};

use crate::types::{DEFAULT_POISSON_RATIO, DEFAULT_YOUNG_MODULUS};

/// Isotropic material constants shared by the whole beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Young's modulus E [Pa]
    pub e: f64,
    /// Shear modulus G [Pa]
    pub g: f64,
}

impl Material {
    pub fn new(e: f64, g: f64) -> Self {
        Self { e, g }
    }

    /// Material with `G = E / (2 (1 + nu))` and `nu = 0.3`.
    pub fn from_young(e: f64) -> Self {
        Self {
            e,
            g: e / (2.0 * (1.0 + DEFAULT_POISSON_RATIO)),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::from_young(DEFAULT_YOUNG_MODULUS)
    }
}

/// Beam section properties at one station (element midpoint or node).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BeamSection {
    /// Mass per unit length [kg/m]
    pub m: f64,
    /// Polar stiffness term E Ix [N m²]
    pub eix: f64,
    /// Bending stiffness about local y, E Iy [N m²]
    pub eiy: f64,
    /// Bending stiffness about local z, E Iz [N m²]
    pub eiz: f64,
    /// Axial stiffness E A [N]
    pub ea: f64,
    /// Cross-sectional area [m²]
    pub area: f64,
    /// Saint-Venant torsion constant [m⁴]
    pub kt: f64,
}

impl BeamSection {
    /// Torsional mass moment per unit length, `m Ix / A` with `Ix = EIx / E`.
    pub fn polar_inertia_per_length(&self, material: &Material) -> f64 {
        if self.area <= 0.0 || material.e <= 0.0 {
            return 0.0;
        }
        self.m * (self.eix / material.e) / self.area
    }

    /// Linear blend between two stations, `t` in `[0, 1]`.
    pub fn lerp(&self, other: &BeamSection, t: f64) -> BeamSection {
        let f = |a: f64, b: f64| a + t * (b - a);
        BeamSection {
            m: f(self.m, other.m),
            eix: f(self.eix, other.eix),
            eiy: f(self.eiy, other.eiy),
            eiz: f(self.eiz, other.eiz),
            ea: f(self.ea, other.ea),
            area: f(self.area, other.area),
            kt: f(self.kt, other.kt),
        }
    }
}
