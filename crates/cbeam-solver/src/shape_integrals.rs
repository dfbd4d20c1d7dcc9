//! Generalized mass matrix, shape integrals and geometrical stiffening.
//!
//! These quantities project the finite-element beam onto a set of elastic shape
//! functions `Se` (full-space columns, usually normalized modes) for flexible
//! multibody formulations:
//!
//! - [`generalized_mass_matrix`]: rigid/flexible blocks of `MM` seen through the
//!   rigid-body shapes `St`, `Sr` and the elastic shapes `Se`
//! - [`shape_integrals`]: inertial coupling tensors built from the element mass
//!   cross tensors `C3` (gyroscopic `Kr`, `C4`, centrifugal `Kom`, `Kom0`)
//! - [`geometrical_stiffening`]: geometric stiffness of the shapes under a unit
//!   tip load, an axial inertial load and the six angular-velocity products
//!
//! Axis pairs follow the cyclic convention: for axis `l`, the companions are
//! `(m, n) = ((l + 1) % 3, (l + 2) % 3)`.

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

use crate::assembly::{cbeam_frame3dlin_kg, scatter_add};
use crate::backend::LinearSolver;
use crate::dcm::skew;
use crate::dof_map::DofMap;
use crate::elements::frame3dlin::rotate_to_global;
use crate::elements::{BeamSection, Frame3dLin, MassCross, Material};
use crate::error::{BeamError, Result};
use crate::types::DOF_PER_NODE;

/// Generalized mass of an undeflected beam
#[derive(Debug, Clone)]
pub struct GeneralizedMass {
    /// Translational mass `Stᵀ MM St`
    pub mtt: Matrix3<f64>,
    /// Rotational inertia about the origin `Srᵀ MM Sr`
    pub j0: Matrix3<f64>,
    /// Rotation/translation coupling `Srᵀ MM St`
    pub mrt: Matrix3<f64>,
    /// Elastic/translation coupling `Seᵀ MM St` (nShapes x 3)
    pub mgt: DMatrix<f64>,
    /// Elastic/rotation coupling `Seᵀ MM Sr` (nShapes x 3)
    pub mgr: DMatrix<f64>,
    /// Elastic mass `Seᵀ MM Se`
    pub mgg: DMatrix<f64>,
    /// Rigid translation shapes (nDOF x 3)
    pub st: DMatrix<f64>,
    /// Rigid rotation shapes about the origin (nDOF x 3)
    pub sr: DMatrix<f64>,
}

/// Shape integrals of the elastic shapes
#[derive(Debug, Clone)]
pub struct ShapeIntegrals {
    /// Element mass cross tensors, one per element
    pub c3: Vec<MassCross>,
    /// Gyroscopic matrices per axis `SeᵀKFr[a]Se` (antisymmetric)
    pub kr: [DMatrix<f64>; 3],
    /// `C4[l][(a, b)] = -Sr[:, a]ᵀ KFr[b] Se[:, l]`, one 3x3 block per shape
    pub c4: Vec<Matrix3<f64>>,
    /// Full-space centrifugal tensors per axis pair (nDOF x nDOF)
    pub kfom_ab: [[DMatrix<f64>; 3]; 3],
    /// Centrifugal stiffness for `xx, yy, zz, xy, yz, zx` angular products
    pub kom: [DMatrix<f64>; 6],
    /// Centrifugal load of the undeflected shape on `Se` (nShapes x 6)
    pub kom0: DMatrix<f64>,
    /// Centrifugal load of the undeflected shape on the reduced DOFs (nReduced x 6)
    pub kom0_reduced: DMatrix<f64>,
}

/// Geometric stiffness of the elastic shapes for each stiffening load case
#[derive(Debug, Clone)]
pub struct GeometricStiffening {
    /// Unit load at the tip along the main beam axis
    pub fend: DMatrix<f64>,
    /// Unit acceleration along the main beam axis
    pub t_ax: DMatrix<f64>,
    pub omxx: DMatrix<f64>,
    pub omyy: DMatrix<f64>,
    pub omzz: DMatrix<f64>,
    pub omxy: DMatrix<f64>,
    pub omxz: DMatrix<f64>,
    pub omyz: DMatrix<f64>,
}

impl GeometricStiffening {
    /// Load cases with their names
    pub fn cases(&self) -> [(&'static str, &DMatrix<f64>); 8] {
        [
            ("fend", &self.fend),
            ("t_ax", &self.t_ax),
            ("omxx", &self.omxx),
            ("omyy", &self.omyy),
            ("omzz", &self.omzz),
            ("omxy", &self.omxy),
            ("omxz", &self.omxz),
            ("omyz", &self.omyz),
        ]
    }
}

/// Rigid-body shapes `(St, Sr)` of a node table, 6 DOFs per node
pub fn rigid_body_shapes(nodes: &[Vector3<f64>]) -> (DMatrix<f64>, DMatrix<f64>) {
    let n_dof = nodes.len() * DOF_PER_NODE;
    let mut st = DMatrix::zeros(n_dof, 3);
    let mut sr = DMatrix::zeros(n_dof, 3);
    for (i, x) in nodes.iter().enumerate() {
        let r = i * DOF_PER_NODE;
        st.fixed_view_mut::<3, 3>(r, 0).copy_from(&Matrix3::identity());
        sr.fixed_view_mut::<3, 3>(r, 0).copy_from(&(-skew(x)));
        sr.fixed_view_mut::<3, 3>(r + 3, 0).copy_from(&Matrix3::identity());
    }
    (st, sr)
}

fn to_matrix3(a: &DMatrix<f64>) -> Matrix3<f64> {
    a.fixed_view::<3, 3>(0, 0).into_owned()
}

fn check_shapes(se: &DMatrix<f64>, n_dof: usize) -> Result<()> {
    if se.nrows() != n_dof {
        return Err(BeamError::dimension(format!(
            "Shape functions have {} rows, model has {} DOFs",
            se.nrows(),
            n_dof
        )));
    }
    Ok(())
}

/// Generalized mass matrix of the undeflected beam
///
/// # Errors
/// `Dimension` when `MM`, the node table and `Se` disagree on the DOF count.
pub fn generalized_mass_matrix(
    nodes: &[Vector3<f64>],
    mm: &DMatrix<f64>,
    se: &DMatrix<f64>,
) -> Result<GeneralizedMass> {
    let n_dof = mm.nrows();
    if mm.ncols() != n_dof || nodes.len() * DOF_PER_NODE != n_dof {
        return Err(BeamError::dimension(format!(
            "Mass matrix is {}x{} for {} nodes",
            mm.nrows(),
            mm.ncols(),
            nodes.len()
        )));
    }
    check_shapes(se, n_dof)?;

    let (st, sr) = rigid_body_shapes(nodes);
    let mm_st = mm * &st;
    let mm_sr = mm * &sr;

    Ok(GeneralizedMass {
        mtt: to_matrix3(&(st.transpose() * &mm_st)),
        j0: to_matrix3(&(sr.transpose() * &mm_sr)),
        mrt: to_matrix3(&(sr.transpose() * &mm_st)),
        mgt: se.transpose() * &mm_st,
        mgr: se.transpose() * &mm_sr,
        mgg: se.transpose() * mm * se,
        st,
        sr,
    })
}

/// Undeflected node positions on the translational DOFs
fn undeflected_positions(nodes: &[Vector3<f64>], dof_map: &DofMap) -> DVector<f64> {
    let mut zf0 = DVector::zeros(dof_map.num_dofs());
    for (x, dofs) in nodes.iter().zip(&dof_map.nodes_to_dof) {
        for k in 0..3 {
            zf0[dofs[k]] = x[k];
        }
    }
    zf0
}

/// Shape integrals of the elastic shapes `Se`
///
/// `node_masses` is the mass per unit length at each node; element mass cross
/// tensors vary linearly between nodes. `Sr` holds the rigid rotation shapes
/// (see [`rigid_body_shapes`]) and `Tr` the boundary-condition reduction matrix.
pub fn shape_integrals(
    nodes: &[Vector3<f64>],
    dof_map: &DofMap,
    dcm: &[Matrix3<f64>],
    node_masses: &[f64],
    se: &DMatrix<f64>,
    sr: &DMatrix<f64>,
    tr: &DMatrix<f64>,
) -> Result<ShapeIntegrals> {
    let n_elem = dof_map.num_elements();
    let n_dof = dof_map.num_dofs();
    if nodes.len() != dof_map.num_nodes()
        || node_masses.len() != dof_map.num_nodes()
        || dcm.len() != n_elem
    {
        return Err(BeamError::dimension(
            "Nodes, masses or DCMs do not match the DOF map",
        ));
    }
    check_shapes(se, n_dof)?;
    if sr.nrows() != n_dof || sr.ncols() != 3 || tr.nrows() != n_dof {
        return Err(BeamError::dimension(
            "Rigid rotation shapes or reduction matrix do not match the DOF map",
        ));
    }
    let n_shapes = se.ncols();

    // Element mass cross tensors
    let material = Material::default();
    let c3: Vec<MassCross> = dof_map
        .elem_to_nodes
        .iter()
        .map(|en| {
            let (n1, n2) = (en[0], en[1]);
            let le = (nodes[n2] - nodes[n1]).norm();
            let start = BeamSection {
                m: node_masses[n1],
                ..Default::default()
            };
            let end = BeamSection {
                m: node_masses[n2],
                ..Default::default()
            };
            Frame3dLin::new(le, material, start, end).mass_cross()
        })
        .collect();

    // Gyroscopic terms
    let mut kfr: [DMatrix<f64>; 3] = std::array::from_fn(|_| DMatrix::zeros(n_dof, n_dof));
    for (ia, kfr_a) in kfr.iter_mut().enumerate() {
        for iel in 0..n_elem {
            let gamma = &dcm[iel];
            for l in 0..3 {
                let (m, n) = ((l + 1) % 3, (l + 2) % 3);
                let local = c3[iel][n][m] - c3[iel][m][n];
                let global = rotate_to_global(&local, gamma) * gamma[(l, ia)];
                scatter_add(kfr_a, &global, &dof_map.elem_to_dof[iel])?;
            }
        }
    }
    let kr: [DMatrix<f64>; 3] = std::array::from_fn(|ia| se.transpose() * &kfr[ia] * se);

    let mut c4 = vec![Matrix3::zeros(); n_shapes];
    for (ib, kfr_b) in kfr.iter().enumerate() {
        let a = -(sr.transpose() * kfr_b * se);
        for (l, block) in c4.iter_mut().enumerate() {
            for ia in 0..3 {
                block[(ia, ib)] = a[(ia, l)];
            }
        }
    }

    // Centrifugal terms
    let mut kfom_ab: [[DMatrix<f64>; 3]; 3] =
        std::array::from_fn(|_| std::array::from_fn(|_| DMatrix::zeros(n_dof, n_dof)));
    for (ia, row) in kfom_ab.iter_mut().enumerate() {
        for (ib, target) in row.iter_mut().enumerate() {
            for iel in 0..n_elem {
                let gamma = &dcm[iel];
                for l in 0..3 {
                    for m in 0..3 {
                        let xi = if l == m {
                            let (m_, n_) = ((l + 1) % 3, (l + 2) % 3);
                            -(c3[iel][m_][m_] + c3[iel][n_][n_])
                        } else {
                            c3[iel][m][l]
                        };
                        let scale = gamma[(l, ia)] * gamma[(m, ib)];
                        if scale == 0.0 {
                            continue;
                        }
                        let global = rotate_to_global(&xi, gamma) * scale;
                        scatter_add(target, &global, &dof_map.elem_to_dof[iel])?;
                    }
                }
            }
        }
    }

    let zf0 = undeflected_positions(nodes, dof_map);
    let kfom: [DMatrix<f64>; 6] = std::array::from_fn(|i| {
        if i < 3 {
            kfom_ab[i][i].clone()
        } else {
            let a = i - 3;
            let b = (a + 1) % 3;
            &kfom_ab[a][b] + kfom_ab[a][b].transpose()
        }
    });

    let mut kom0 = DMatrix::zeros(n_shapes, 6);
    let mut kom0_reduced = DMatrix::zeros(tr.ncols(), 6);
    for (i, k) in kfom.iter().enumerate() {
        let load = k * &zf0;
        kom0.set_column(i, &(se.transpose() * &load));
        kom0_reduced.set_column(i, &(tr.transpose() * &load));
    }
    let kom: [DMatrix<f64>; 6] = std::array::from_fn(|i| se.transpose() * &kfom[i] * se);

    Ok(ShapeIntegrals {
        c3,
        kr,
        c4,
        kfom_ab,
        kom,
        kom0,
        kom0_reduced,
    })
}

/// Flexibility matrix in full space, `Kinv = Tr Kr⁻¹ Trᵀ`
pub fn flexibility_matrix(
    kr: &DMatrix<f64>,
    tr: &DMatrix<f64>,
    solver: &dyn LinearSolver,
) -> Result<DMatrix<f64>> {
    let n = kr.nrows();
    let kr_inv = solver.solve_linear(kr, &DMatrix::identity(n, n))?;
    Ok(tr * kr_inv * tr.transpose())
}

/// Reduced translational inertia coupling `Ct0_ = Trᵀ MM St`
pub fn ct0_reduced(mm: &DMatrix<f64>, st: &DMatrix<f64>, tr: &DMatrix<f64>) -> DMatrix<f64> {
    tr.transpose() * mm * st
}

/// Axis along which the beam extends the most
fn main_axis(nodes: &[Vector3<f64>]) -> usize {
    let extent = |k: usize| {
        let (lo, hi) = nodes.iter().fold((f64::INFINITY, 0.0_f64), |(lo, hi), x| {
            (lo.min(x[k].abs()), hi.max(x[k].abs()))
        });
        hi - lo
    };
    let mut best = 0;
    for k in 1..3 {
        if extent(k) > extent(best) {
            best = k;
        }
    }
    best
}

/// Geometric stiffness of the elastic shapes for the stiffening load cases
///
/// Each load `F` is turned into the static deflection `-Kinv F`, whose element
/// axial forces give the geometric stiffness projected on `Se`. `kom0_reduced`
/// and `ct0` are the reduced centrifugal loads of [`ShapeIntegrals`] and the
/// output of [`ct0_reduced`].
#[allow(clippy::too_many_arguments)]
pub fn geometrical_stiffening(
    nodes: &[Vector3<f64>],
    kinv: &DMatrix<f64>,
    tr: &DMatrix<f64>,
    se: &DMatrix<f64>,
    dof_map: &DofMap,
    dcm: &[Matrix3<f64>],
    e: f64,
    node_areas: &[f64],
    kom0_reduced: &DMatrix<f64>,
    ct0: &DMatrix<f64>,
) -> Result<GeometricStiffening> {
    let n_dof = dof_map.num_dofs();
    if kinv.nrows() != n_dof || kinv.ncols() != n_dof {
        return Err(BeamError::dimension(format!(
            "Flexibility matrix is {}x{}, model has {} DOFs",
            kinv.nrows(),
            kinv.ncols(),
            n_dof
        )));
    }
    check_shapes(se, n_dof)?;
    if kom0_reduced.nrows() != tr.ncols() || kom0_reduced.ncols() != 6 {
        return Err(BeamError::dimension("Centrifugal loads must be nReduced x 6"));
    }
    if ct0.nrows() != tr.ncols() || ct0.ncols() != 3 {
        return Err(BeamError::dimension("Inertial coupling must be nReduced x 3"));
    }

    let i_max = main_axis(nodes);
    let stiffening = |load: DVector<f64>| -> Result<DMatrix<f64>> {
        let deflection = -(kinv * load);
        let kg = cbeam_frame3dlin_kg(&deflection, nodes, dof_map, dcm, e, node_areas)?;
        Ok(se.transpose() * kg * se)
    };
    let reduced_load = |col: DVector<f64>| -> DVector<f64> { tr * col };

    let mut fend = DVector::zeros(n_dof);
    fend[dof_map.tip_dofs()[i_max]] = 1.0;

    let om = |i: usize| stiffening(reduced_load(kom0_reduced.column(i).into_owned()));
    Ok(GeometricStiffening {
        fend: stiffening(fend)?,
        t_ax: stiffening(reduced_load(ct0.column(i_max).into_owned()))?,
        omxx: om(0)?,
        omyy: om(1)?,
        omzz: om(2)?,
        omxy: om(3)?,
        omxz: om(4)?,
        omyz: om(5)?,
    })
}
