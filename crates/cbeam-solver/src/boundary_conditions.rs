//! Boundary conditions at the beam ends and reduction of the global system.
//!
//! This module handles:
//! - Root/tip constraint profiles (clamped-free, free-free, per-DOF flags)
//! - Rigid-body masses and stiffness added at the end nodes
//! - The reduction matrix `Tr` with `Mr = Trᵀ MM Tr`, `Kr = Trᵀ KK Tr`

use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, Matrix6, Vector3};
use serde::{Deserialize, Serialize};

use crate::dof_map::DofMap;
use crate::error::{BeamError, Result};
use crate::rigid_body::{Inertia, rigid_body_mass_matrix_at_p};
use crate::types::DOF_PER_NODE;

/// State of one DOF at a beam end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DofConstraint {
    Fixed,
    Free,
}

pub const CLAMPED: [DofConstraint; DOF_PER_NODE] = [DofConstraint::Fixed; DOF_PER_NODE];
pub const FREE: [DofConstraint; DOF_PER_NODE] = [DofConstraint::Free; DOF_PER_NODE];

/// Constraint profile of the beam ends
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryCondition {
    /// Clamped at the root, free at the tip
    #[default]
    #[serde(alias = "clamped-free")]
    ClampedFree,
    /// Free at both ends
    #[serde(alias = "free-free")]
    FreeFree,
    /// Explicit per-DOF flags at root and tip
    Custom {
        root: [DofConstraint; DOF_PER_NODE],
        tip: [DofConstraint; DOF_PER_NODE],
    },
}

impl BoundaryCondition {
    /// Per-DOF flags `(root, tip)`
    pub fn flags(&self) -> ([DofConstraint; DOF_PER_NODE], [DofConstraint; DOF_PER_NODE]) {
        match self {
            BoundaryCondition::ClampedFree => (CLAMPED, FREE),
            BoundaryCondition::FreeFree => (FREE, FREE),
            BoundaryCondition::Custom { root, tip } => (*root, *tip),
        }
    }
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryCondition::ClampedFree => f.write_str("clamped-free"),
            BoundaryCondition::FreeFree => f.write_str("free-free"),
            BoundaryCondition::Custom { .. } => f.write_str("custom"),
        }
    }
}

impl FromStr for BoundaryCondition {
    type Err = BeamError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamped-free" => Ok(BoundaryCondition::ClampedFree),
            "free-free" => Ok(BoundaryCondition::FreeFree),
            other => Err(BeamError::unsupported(format!("Boundary condition: {other}"))),
        }
    }
}

/// Rigid body attached at a beam end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndMass {
    /// 6x6 mass matrix at the end node, row-major
    Matrix([[f64; 6]; 6]),
    /// Point mass with inertia about its COG, offset from the end node
    Point {
        mass: f64,
        #[serde(default)]
        inertia: Option<Inertia>,
        #[serde(default)]
        cog: Option<[f64; 3]>,
    },
}

impl EndMass {
    /// 6x6 mass matrix at the end node
    pub fn matrix(&self) -> Matrix6<f64> {
        match self {
            EndMass::Matrix(m) => Matrix6::from_fn(|r, c| m[r][c]),
            EndMass::Point { mass, inertia, cog } => {
                let offset = cog.map(|[x, y, z]| Vector3::new(x, y, z));
                rigid_body_mass_matrix_at_p(Some(*mass), inertia.as_ref(), offset.as_ref())
            }
        }
    }
}

/// Mass and stiffness added at one beam end
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndCondition {
    pub mass: Option<EndMass>,
    /// 6x6 stiffness matrix at the end node, row-major
    pub stiffness: Option<[[f64; 6]; 6]>,
}

impl EndCondition {
    pub fn is_empty(&self) -> bool {
        self.mass.is_none() && self.stiffness.is_none()
    }
}

/// System reduced by the boundary conditions
#[derive(Debug, Clone)]
pub struct ReducedSystem {
    /// Reduced mass matrix `Trᵀ MM Tr`
    pub mr: DMatrix<f64>,
    /// Reduced stiffness matrix `Trᵀ KK Tr`
    pub kr: DMatrix<f64>,
    /// Reduction matrix (nDOF x nReduced)
    pub tr: DMatrix<f64>,
    /// Global DOFs kept, in order (column `j` of `Tr` selects `kept_dofs[j]`)
    pub kept_dofs: Vec<usize>,
}

impl ReducedSystem {
    pub fn num_reduced(&self) -> usize {
        self.kept_dofs.len()
    }

    /// Full-space vectors from reduced ones: `Tr * q`
    pub fn expand(&self, q: &DMatrix<f64>) -> DMatrix<f64> {
        &self.tr * q
    }

    /// Reduced vectors from full-space ones: `Trᵀ * u`
    pub fn restrict(&self, u: &DMatrix<f64>) -> DMatrix<f64> {
        self.tr.transpose() * u
    }
}

/// Identity with the columns of the `constrained` DOFs removed
pub fn reduction_matrix(num_dofs: usize, constrained: &[usize]) -> (DMatrix<f64>, Vec<usize>) {
    let kept: Vec<usize> = (0..num_dofs).filter(|d| !constrained.contains(d)).collect();
    let mut tr = DMatrix::zeros(num_dofs, kept.len());
    for (j, &dof) in kept.iter().enumerate() {
        tr[(dof, j)] = 1.0;
    }
    (tr, kept)
}

fn add_block(target: &mut DMatrix<f64>, dofs: &[usize], block: &Matrix6<f64>) {
    for (i_local, &i_global) in dofs.iter().enumerate() {
        for (j_local, &j_global) in dofs.iter().enumerate() {
            target[(i_global, j_global)] += block[(i_local, j_local)];
        }
    }
}

/// Insert end masses and stiffness into `mm`/`kk` and reduce the system
///
/// `mm` and `kk` are modified in place: the end contributions stay in the full
/// matrices returned to the caller.
pub fn apply_bc(
    mm: &mut DMatrix<f64>,
    kk: &mut DMatrix<f64>,
    dof_map: &DofMap,
    bc: &BoundaryCondition,
    root: &EndCondition,
    tip: &EndCondition,
) -> Result<ReducedSystem> {
    let n = mm.nrows();
    if mm.ncols() != n || kk.nrows() != n || kk.ncols() != n {
        return Err(BeamError::dimension(format!(
            "Mass ({}x{}) and stiffness ({}x{}) must be square and equal in size",
            mm.nrows(),
            mm.ncols(),
            kk.nrows(),
            kk.ncols()
        )));
    }
    if dof_map.num_dofs() != n {
        return Err(BeamError::dimension(format!(
            "DOF map has {} DOFs, matrices have {}",
            dof_map.num_dofs(),
            n
        )));
    }
    let root_dofs = dof_map.root_dofs().to_vec();
    let tip_dofs = dof_map.tip_dofs().to_vec();
    if root_dofs.len() != DOF_PER_NODE || tip_dofs.len() != DOF_PER_NODE {
        return Err(BeamError::dimension("End nodes must carry 6 DOFs"));
    }

    // Insert root/tip inertia and stiffness
    for (dofs, end) in [(&root_dofs, root), (&tip_dofs, tip)] {
        if let Some(mass) = &end.mass {
            add_block(mm, dofs, &mass.matrix());
        }
        if let Some(k) = &end.stiffness {
            add_block(kk, dofs, &Matrix6::from_fn(|r, c| k[r][c]));
        }
    }

    // Constrained DOFs from root and tip flags, then one pass over the kept list
    let (root_flags, tip_flags) = bc.flags();
    let mut constrained: Vec<usize> = root_dofs
        .iter()
        .zip(root_flags.iter())
        .chain(tip_dofs.iter().zip(tip_flags.iter()))
        .filter(|(_, flag)| **flag == DofConstraint::Fixed)
        .map(|(dof, _)| *dof)
        .collect();
    constrained.sort_unstable();
    constrained.dedup();

    let (tr, kept_dofs) = reduction_matrix(n, &constrained);
    if kept_dofs.is_empty() {
        return Err(BeamError::config("Every DOF is constrained"));
    }
    let mr = tr.transpose() * &*mm * &tr;
    let kr = tr.transpose() * &*kk * &tr;

    Ok(ReducedSystem {
        mr,
        kr,
        tr,
        kept_dofs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spd(n: usize) -> DMatrix<f64> {
        DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                4.0 + i as f64
            } else if i.abs_diff(j) == 1 {
                -1.0
            } else {
                0.0
            }
        })
    }

    #[test]
    fn clamped_free_removes_root_dofs() {
        let map = DofMap::frame(2);
        let mut mm = spd(18);
        let mut kk = spd(18);
        let red = apply_bc(
            &mut mm,
            &mut kk,
            &map,
            &BoundaryCondition::ClampedFree,
            &EndCondition::default(),
            &EndCondition::default(),
        )
        .unwrap();
        assert_eq!(red.num_reduced(), 12);
        assert_eq!(red.kept_dofs, (6..18).collect::<Vec<_>>());
        assert_eq!(red.mr[(0, 0)], mm[(6, 6)]);

        // Orthonormal selection columns
        let gram = red.tr.transpose() * &red.tr;
        assert!((gram - DMatrix::<f64>::identity(12, 12)).norm() < 1e-15);
    }

    #[test]
    fn clamped_clamped_combines_root_and_tip() {
        let map = DofMap::frame(3);
        let mut mm = spd(24);
        let mut kk = spd(24);
        let bc = BoundaryCondition::Custom {
            root: CLAMPED,
            tip: CLAMPED,
        };
        let red = apply_bc(
            &mut mm,
            &mut kk,
            &map,
            &bc,
            &EndCondition::default(),
            &EndCondition::default(),
        )
        .unwrap();
        assert_eq!(red.kept_dofs, (6..18).collect::<Vec<_>>());
        for (j, &dof) in red.kept_dofs.iter().enumerate() {
            assert_eq!(red.tr[(dof, j)], 1.0);
            assert_eq!(red.tr.column(j).sum(), 1.0);
        }
    }

    #[test]
    fn end_mass_and_stiffness_are_inserted() {
        let map = DofMap::frame(1);
        let mut mm = DMatrix::zeros(12, 12);
        let mut kk = DMatrix::zeros(12, 12);
        let tip = EndCondition {
            mass: Some(EndMass::Point {
                mass: 5.0,
                inertia: None,
                cog: Some([1.0, 0.0, 0.0]),
            }),
            stiffness: None,
        };
        let mut k_root = [[0.0; 6]; 6];
        k_root[2][2] = 1e3;
        let root = EndCondition {
            mass: None,
            stiffness: Some(k_root),
        };
        apply_bc(&mut mm, &mut kk, &map, &BoundaryCondition::FreeFree, &root, &tip).unwrap();
        assert_eq!(mm[(6, 6)], 5.0);
        assert_eq!(mm[(10, 10)], 5.0); // m x² about y
        assert_eq!(mm[(0, 0)], 0.0);
        assert_eq!(kk[(2, 2)], 1e3);
    }

    #[test]
    fn reduce_then_expand_round_trip() {
        let map = DofMap::frame(2);
        let mut mm = spd(18);
        let mut kk = spd(18);
        let red = apply_bc(
            &mut mm,
            &mut kk,
            &map,
            &BoundaryCondition::ClampedFree,
            &EndCondition::default(),
            &EndCondition::default(),
        )
        .unwrap();
        let q = DMatrix::from_fn(12, 2, |i, j| (i * 3 + j) as f64 - 5.0);
        let back = red.restrict(&red.expand(&q));
        assert_eq!(back, q);
    }

    #[test]
    fn boundary_condition_names() {
        assert_eq!("clamped-free".parse::<BoundaryCondition>().unwrap(), BoundaryCondition::ClampedFree);
        assert_eq!(BoundaryCondition::FreeFree.to_string(), "free-free");
        assert!("pinned".parse::<BoundaryCondition>().is_err());
    }
}
