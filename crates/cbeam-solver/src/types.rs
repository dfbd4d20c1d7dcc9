//! Type aliases, constants, and core enums shared across the beam solver.

use std::fmt;
use std::str::FromStr;

use nalgebra::SMatrix;
use serde::{Deserialize, Serialize};

use crate::error::BeamError;

pub type Matrix12 = SMatrix<f64, 12, 12>;
pub type Matrix3x12 = SMatrix<f64, 3, 12>;

// Core constants
pub const DOF_PER_NODE: usize = 6;
pub const NODES_PER_ELEMENT: usize = 2;
pub const DOF_PER_ELEMENT: usize = DOF_PER_NODE * NODES_PER_ELEMENT;

/// Young's modulus used when none is supplied (steel) [Pa].
pub const DEFAULT_YOUNG_MODULUS: f64 = 211e9;
/// Poisson's ratio used to derive the shear modulus when G is not supplied.
pub const DEFAULT_POISSON_RATIO: f64 = 0.3;
/// Placeholder cross-section area when none is supplied [m²].
pub const DEFAULT_AREA: f64 = 100.0;
/// Placeholder Saint-Venant torsion constant when none is supplied [m⁴].
pub const DEFAULT_TORSION_CONSTANT: f64 = 100.0;

/// Number of modes identified and normalized by default.
pub const DEFAULT_IDENTIFIED_MODES: usize = 20;

/// Tangent-change norm below which the previous secondary axis is reused.
pub const DCM_TANGENT_CHANGE_TOL: f64 = 1e-8;
/// Component magnitude below which a DOF type is ignored for rigid-body detection.
pub const RIGID_COMPONENT_TOL: f64 = 1e-6;
/// Tip-to-peak ratio factor below which a mode is normalized by its peak.
pub const TIP_NORMALIZATION_FACTOR: f64 = 100.0;

/// Element formulation used along the beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ElementType {
    /// Frame element with constant properties, sampled at element midpoints.
    #[default]
    #[serde(rename = "frame3d")]
    Frame3d,
    /// Frame element with properties varying linearly between its two nodes.
    #[serde(rename = "frame3dlin")]
    Frame3dLin,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Frame3d => "frame3d",
            ElementType::Frame3dLin => "frame3dlin",
        }
    }

    /// True when the formulation samples section properties at the nodes.
    pub fn samples_at_nodes(self) -> bool {
        matches!(self, ElementType::Frame3dLin)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = BeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frame3d" => Ok(ElementType::Frame3d),
            "frame3dlin" => Ok(ElementType::Frame3dLin),
            other => Err(BeamError::unsupported(format!("Element type: {other}"))),
        }
    }
}

/// Physical meaning of one of the six DOFs carried by each node.
///
/// `U*` are displacements, `V*` are slopes (rotations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DofKind {
    Ux,
    Uy,
    Uz,
    Vx,
    Vy,
    Vz,
}

impl DofKind {
    pub const ALL: [DofKind; DOF_PER_NODE] = [
        DofKind::Ux,
        DofKind::Uy,
        DofKind::Uz,
        DofKind::Vx,
        DofKind::Vy,
        DofKind::Vz,
    ];

    /// Offset of this DOF inside a node's block of six.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            DofKind::Ux => "ux",
            DofKind::Uy => "uy",
            DofKind::Uz => "uz",
            DofKind::Vx => "vx",
            DofKind::Vy => "vy",
            DofKind::Vz => "vz",
        }
    }

    pub fn is_translation(self) -> bool {
        self.index() < 3
    }
}

impl fmt::Display for DofKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_element_types() {
        assert_eq!("frame3d".parse::<ElementType>().unwrap(), ElementType::Frame3d);
        assert_eq!(" Frame3DLin ".parse::<ElementType>().unwrap(), ElementType::Frame3dLin);
    }

    #[test]
    fn rejects_unimplemented_element_type() {
        let err = "beam2d".parse::<ElementType>().unwrap_err();
        assert!(matches!(err, BeamError::Unsupported(_)));
    }

    #[test]
    fn dof_kind_indices_follow_node_layout() {
        for (i, kind) in DofKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(DofKind::from_index(i), Some(*kind));
        }
        assert_eq!(DofKind::from_index(6), None);
        assert!(DofKind::Uz.is_translation());
        assert!(!DofKind::Vx.is_translation());
        assert_eq!(DofKind::Vy.to_string(), "vy");
    }
}
