//! Global matrix assembly for beam models.
//!
//! ## Assembly Process
//!
//! 1. Build the DOF maps and one DCM per element
//! 2. Loop over all elements:
//!    - Compute local element matrices from the element provider
//!    - Rotate them to global axes: `RRᵀ K RR`, `RR = blockdiag(R, R, R, R)`
//!    - Scatter-add them at the element DOFs
//!
//! Global matrices are dense; [`to_csr`] exports them for sparse consumers.

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::dcm::element_dcm_from_beam_nodes;
use crate::discretize::Discretization;
use crate::dof_map::DofMap;
use crate::elements::frame3dlin::{block_rotation, geometric_stiffness, rotate_to_global};
use crate::elements::{BeamSection, DynamicFrame, ElementMatrices, FrameElement, Material};
use crate::error::{BeamError, Result};
use crate::types::{DOF_PER_ELEMENT, ElementType, Matrix12};

/// Owner of the global mass and stiffness matrices during assembly
#[derive(Debug, Clone)]
pub struct Assembler {
    /// Global mass matrix
    pub mass: DMatrix<f64>,
    /// Global stiffness matrix
    pub stiffness: DMatrix<f64>,
    /// Number of degrees of freedom
    pub num_dofs: usize,
}

impl Assembler {
    /// Create an empty system
    pub fn new(num_dofs: usize) -> Self {
        Self {
            mass: DMatrix::zeros(num_dofs, num_dofs),
            stiffness: DMatrix::zeros(num_dofs, num_dofs),
            num_dofs,
        }
    }

    /// Rotate an element's local matrices with `dcm` and add them at `dofs`
    pub fn add_element_contribution(
        &mut self,
        dofs: &[usize],
        matrices: &ElementMatrices,
        dcm: &Matrix3<f64>,
    ) -> Result<()> {
        let k_e = rotate_to_global(&matrices.stiffness, dcm);
        let m_e = rotate_to_global(&matrices.mass, dcm);
        scatter_add(&mut self.stiffness, &k_e, dofs)?;
        scatter_add(&mut self.mass, &m_e, dofs)?;
        Ok(())
    }

    /// Consume the assembler, returning `(MM, KK)`
    pub fn finish(self) -> (DMatrix<f64>, DMatrix<f64>) {
        (self.mass, self.stiffness)
    }
}

/// Add a 12x12 element matrix into a global matrix at the element DOFs
pub fn scatter_add(global: &mut DMatrix<f64>, k_e: &Matrix12, dofs: &[usize]) -> Result<()> {
    if dofs.len() != DOF_PER_ELEMENT {
        return Err(BeamError::dimension(format!(
            "Element has {} DOF indices, expected {}",
            dofs.len(),
            DOF_PER_ELEMENT
        )));
    }
    let n = global.nrows();
    if let Some(&bad) = dofs.iter().find(|&&d| d >= n) {
        return Err(BeamError::dimension(format!(
            "DOF {} out of range for a system of {} DOFs",
            bad, n
        )));
    }

    for (i_local, &i_global) in dofs.iter().enumerate() {
        for (j_local, &j_global) in dofs.iter().enumerate() {
            global[(i_global, j_global)] += k_e[(i_local, j_local)];
        }
    }
    Ok(())
}

/// Assembled, unconstrained beam model
#[derive(Debug, Clone)]
pub struct AssembledBeam {
    /// Global mass matrix (before boundary conditions)
    pub mm: DMatrix<f64>,
    /// Global stiffness matrix (before boundary conditions)
    pub kk: DMatrix<f64>,
    /// Node positions
    pub nodes: Vec<Vector3<f64>>,
    /// Element direction cosine matrices
    pub dcm: Vec<Matrix3<f64>>,
    pub dof_map: DofMap,
    pub element_type: ElementType,
    pub material: Material,
    /// Sections at the nodes (used by shape integrals and geometric stiffness)
    pub node_sections: Vec<BeamSection>,
}

impl AssembledBeam {
    pub fn num_dofs(&self) -> usize {
        self.mm.nrows()
    }

    /// Mass per unit length at each node
    pub fn node_masses(&self) -> Vec<f64> {
        self.node_sections.iter().map(|s| s.m).collect()
    }

    /// Cross-sectional area at each node
    pub fn node_areas(&self) -> Vec<f64> {
        self.node_sections.iter().map(|s| s.area).collect()
    }

    /// Mass matrix in CSR format
    pub fn mass_csr(&self) -> CsrMatrix<f64> {
        to_csr(&self.mm)
    }

    /// Stiffness matrix in CSR format
    pub fn stiffness_csr(&self) -> CsrMatrix<f64> {
        to_csr(&self.kk)
    }
}

/// Assemble the global mass and stiffness matrices of a discretized beam
///
/// # Errors
/// - `Unsupported` for a `Frame3d` beam with nonzero y or z node coordinates
/// - `Dimension` when the discretization is inconsistent
pub fn assemble_beam(
    disc: &Discretization,
    material: &Material,
    element_type: ElementType,
) -> Result<AssembledBeam> {
    let n_elem = disc.num_elements();
    if n_elem == 0 {
        return Err(BeamError::config("Beam has no elements"));
    }
    if element_type == ElementType::Frame3d && !disc.is_straight_along_x() {
        return Err(BeamError::unsupported(
            "Only straight beams along x are supported by frame3d",
        ));
    }

    let dcm = element_dcm_from_beam_nodes(&disc.nodes, disc.phi.as_deref());
    let dof_map = DofMap::frame(n_elem);

    let sections = disc.sections_for(element_type);

    let mut assembler = Assembler::new(dof_map.num_dofs());
    for iel in 0..n_elem {
        let [n1, n2] = [dof_map.elem_to_nodes[iel][0], dof_map.elem_to_nodes[iel][1]];
        let length = (disc.nodes[n2] - disc.nodes[n1]).norm();
        let element = DynamicFrame::from_sections(element_type, iel, length, *material, sections)?;
        let matrices = element.matrices();
        assembler.add_element_contribution(&dof_map.elem_to_dof[iel], &matrices, &dcm[iel])?;
    }

    let (mm, kk) = assembler.finish();
    Ok(AssembledBeam {
        mm,
        kk,
        nodes: disc.nodes.clone(),
        dcm,
        dof_map,
        element_type,
        material: *material,
        node_sections: disc.node_sections.clone(),
    })
}

/// Global geometric stiffness for a load (or displacement) vector on all DOFs
///
/// For each element the load is rotated to local axes, the axial force follows
/// from the local axial end values and the element's lateral geometric
/// stiffness is rotated back and assembled.
pub fn cbeam_frame3dlin_kg(
    load: &DVector<f64>,
    nodes: &[Vector3<f64>],
    dof_map: &DofMap,
    dcm: &[Matrix3<f64>],
    e: f64,
    node_areas: &[f64],
) -> Result<DMatrix<f64>> {
    let n_dof = load.len();
    if n_dof != dof_map.num_dofs() {
        return Err(BeamError::dimension(format!(
            "Load vector has {} entries, model has {} DOFs",
            n_dof,
            dof_map.num_dofs()
        )));
    }
    if node_areas.len() != dof_map.num_nodes() || dcm.len() != dof_map.num_elements() {
        return Err(BeamError::dimension(
            "Areas or DCMs do not match the DOF map",
        ));
    }

    let mut kg = DMatrix::zeros(n_dof, n_dof);
    for (iel, dofs) in dof_map.elem_to_dof.iter().enumerate() {
        let (n1, n2) = (dof_map.elem_to_nodes[iel][0], dof_map.elem_to_nodes[iel][1]);
        let rr = block_rotation(&dcm[iel]);
        let t_global = nalgebra::SVector::<f64, 12>::from_fn(|i, _| load[dofs[i]]);
        let t_local = rr * t_global;

        let length = (nodes[n2] - nodes[n1]).norm();
        let kg_local = geometric_stiffness(
            e,
            node_areas[n1],
            node_areas[n2],
            length,
            t_local[0],
            t_local[6],
        );
        scatter_add(&mut kg, &rotate_to_global(&kg_local, &dcm[iel]), dofs)?;
    }
    Ok(kg)
}

/// Convert a dense matrix to CSR, dropping exact zeros
pub fn to_csr(a: &DMatrix<f64>) -> CsrMatrix<f64> {
    let mut coo = CooMatrix::new(a.nrows(), a.ncols());
    for j in 0..a.ncols() {
        for i in 0..a.nrows() {
            let v = a[(i, j)];
            if v != 0.0 {
                coo.push(i, j, v);
            }
        }
    }
    CsrMatrix::from(&coo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discretize::{BeamGeometry, BeamProperties, Profile, discretize};

    fn uniform_beam(nel: usize) -> (Discretization, Material) {
        let props = BeamProperties {
            m: Some(Profile::Uniform(10.0)),
            eix: Some(Profile::Uniform(1e7)),
            eiy: Some(Profile::Uniform(1e7)),
            eiz: Some(Profile::Uniform(1e7)),
            ea: Some(Profile::Uniform(1e9)),
            ..Default::default()
        };
        let (disc, material) =
            discretize(&BeamGeometry::Length(10.0), &props, Some(nel)).unwrap();
        (disc, material)
    }

    #[test]
    fn creates_empty_system() {
        let a = Assembler::new(12);
        assert_eq!(a.num_dofs, 12);
        assert_eq!(a.mass.nrows(), 12);
        assert_eq!(a.stiffness.norm(), 0.0);
    }

    #[test]
    fn scatter_add_rejects_bad_indices() {
        let mut g = DMatrix::zeros(12, 12);
        let k = Matrix12::identity();
        assert!(scatter_add(&mut g, &k, &[0, 1, 2]).is_err());
        let dofs: Vec<usize> = (1..13).collect();
        assert!(scatter_add(&mut g, &k, &dofs).is_err());
        let dofs: Vec<usize> = (0..12).collect();
        scatter_add(&mut g, &k, &dofs).unwrap();
        assert_eq!(g[(11, 11)], 1.0);
    }

    #[test]
    fn assembled_matrices_are_symmetric() {
        let (disc, mat) = uniform_beam(6);
        let beam = assemble_beam(&disc, &mat, ElementType::Frame3d).unwrap();
        assert_eq!(beam.num_dofs(), 42);
        let sym_k = (&beam.kk - beam.kk.transpose()).norm() / beam.kk.norm();
        let sym_m = (&beam.mm - beam.mm.transpose()).norm() / beam.mm.norm();
        assert!(sym_k < 1e-12, "KK asymmetry {}", sym_k);
        assert!(sym_m < 1e-12, "MM asymmetry {}", sym_m);
    }

    #[test]
    fn total_translational_mass_is_preserved() {
        let (disc, mat) = uniform_beam(5);
        let beam = assemble_beam(&disc, &mat, ElementType::Frame3d).unwrap();
        let n = beam.num_dofs();
        let mut ux = DVector::zeros(n);
        for node in &beam.dof_map.nodes_to_dof {
            ux[node[0]] = 1.0;
        }
        let mass = (ux.transpose() * &beam.mm * &ux)[(0, 0)];
        assert!((mass - 100.0).abs() < 1e-9, "mass {}", mass);
    }

    #[test]
    fn frame3dlin_uniform_matches_frame3d() {
        let (disc, mat) = uniform_beam(4);
        let lin = assemble_beam(&disc, &mat, ElementType::Frame3dLin).unwrap();
        let (disc, mat) = uniform_beam(4);
        let cst = assemble_beam(&disc, &mat, ElementType::Frame3d).unwrap();
        assert!((&lin.kk - &cst.kk).norm() / cst.kk.norm() < 1e-12);
        assert!((&lin.mm - &cst.mm).norm() / cst.mm.norm() < 1e-12);
    }

    #[test]
    fn frame3d_rejects_off_axis_beam() {
        let props = BeamProperties {
            m: Some(Profile::Uniform(1.0)),
            eix: Some(Profile::Uniform(1.0)),
            eiy: Some(Profile::Uniform(1.0)),
            ea: Some(Profile::Uniform(1.0)),
            ..Default::default()
        };
        let geom = BeamGeometry::Nodes(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.5, 0.0]]);
        let (disc, mat) = discretize(&geom, &props, None).unwrap();
        let err = assemble_beam(&disc, &mat, ElementType::Frame3d).unwrap_err();
        assert!(matches!(err, BeamError::Unsupported(_)));

        // The linear formulation rotates its elements instead
        let (disc, mat) = discretize(&geom, &props, None).unwrap();
        let beam = assemble_beam(&disc, &mat, ElementType::Frame3dLin).unwrap();
        assert!((&beam.kk - beam.kk.transpose()).norm() / beam.kk.norm() < 1e-12);
    }

    #[test]
    fn geometric_stiffness_from_uniform_stretch() {
        let (disc, mat) = uniform_beam(3);
        let beam = assemble_beam(&disc, &mat, ElementType::Frame3dLin).unwrap();
        // Axial displacement growing linearly along x
        let mut u = DVector::zeros(beam.num_dofs());
        for (i, node) in beam.dof_map.nodes_to_dof.iter().enumerate() {
            u[node[0]] = 1e-6 * beam.nodes[i].x;
        }
        let kg = cbeam_frame3dlin_kg(
            &u,
            &beam.nodes,
            &beam.dof_map,
            &beam.dcm,
            mat.e,
            &beam.node_areas(),
        )
        .unwrap();
        assert!((&kg - kg.transpose()).norm() < 1e-9 * kg.norm());
        // Tension stiffens lateral translation
        assert!(kg[(7, 7)] > 0.0);
        assert_eq!(kg[(0, 0)], 0.0);
    }

    #[test]
    fn csr_export_keeps_nonzeros() {
        let (disc, mat) = uniform_beam(2);
        let beam = assemble_beam(&disc, &mat, ElementType::Frame3d).unwrap();
        let csr = beam.stiffness_csr();
        let nnz_dense = beam.kk.iter().filter(|v| **v != 0.0).count();
        assert_eq!(csr.nnz(), nnz_dense);
        assert_eq!(csr.nrows(), beam.num_dofs());
    }
}
