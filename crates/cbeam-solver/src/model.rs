//! Finite-element beam model with normalized vibration modes.
//!
//! # Workflow
//! 1. Discretize the geometry and interpolate the section properties
//! 2. Assemble the global mass and stiffness matrices `MM`, `KK`
//! 3. Insert end masses/stiffness and reduce with `Tr`: `Mr`, `Kr`
//! 4. Solve the generalized eigenproblem `Kr q = ω² Mr q`
//! 5. Expand the modes to all DOFs, identify and normalize them
//!
//! # Example
//! ```no_run
//! use cbeam_solver::{BeamConfig, BeamGeometry, BeamProperties, Profile, cbeam};
//!
//! let props = BeamProperties {
//!     m: Some(Profile::Uniform(10.0)),
//!     eix: Some(Profile::Uniform(1e7)),
//!     eiy: Some(Profile::Uniform(1e7)),
//!     ea: Some(Profile::Uniform(1e9)),
//!     ..Default::default()
//! };
//! let config = BeamConfig { nel: Some(10), ..Default::default() };
//! let model = cbeam(&BeamGeometry::Length(10.0), &props, &config).expect("beam model");
//!
//! for (label, f) in model.mode_labels.iter().zip(&model.freq) {
//!     println!("{:>12} {:10.4} Hz", label, f);
//! }
//! ```

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::assembly::assemble_beam;
use crate::backend::{EigenSolver, LinearSolver, NativeBackend};
use crate::boundary_conditions::{BoundaryCondition, EndCondition, apply_bc};
use crate::discretize::{BeamGeometry, BeamProperties, discretize};
use crate::dof_map::DofMap;
use crate::elements::{BeamSection, Material};
use crate::error::{BeamError, Result};
use crate::modal::{ModeLabel, identify_and_normalize_modes, insert_bc_in_modes};
use crate::shape_integrals::{
    GeneralizedMass, GeometricStiffening, ShapeIntegrals, ct0_reduced, flexibility_matrix,
    generalized_mass_matrix, geometrical_stiffening, rigid_body_shapes, shape_integrals,
};
use crate::types::{DEFAULT_IDENTIFIED_MODES, ElementType};

/// Beam model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    /// Element formulation
    pub element: ElementType,
    /// Number of elements (input stations are kept when absent)
    pub nel: Option<usize>,
    /// End constraints
    pub bc: BoundaryCondition,
    /// Mass and stiffness at the root node
    pub root: EndCondition,
    /// Mass and stiffness at the tip node
    pub tip: EndCondition,
    /// Number of modes to identify and normalize
    pub n_modes: usize,
    /// Print stage diagnostics to stderr
    pub verbose: bool,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            element: ElementType::Frame3d,
            nel: None,
            bc: BoundaryCondition::ClampedFree,
            root: EndCondition::default(),
            tip: EndCondition::default(),
            n_modes: DEFAULT_IDENTIFIED_MODES,
            verbose: false,
        }
    }
}

/// Assembled and reduced beam with its modes
#[derive(Debug, Clone)]
pub struct BeamModel {
    /// Mass matrix before reduction (end masses included)
    pub mm: DMatrix<f64>,
    /// Stiffness matrix before reduction (end stiffness included)
    pub kk: DMatrix<f64>,
    /// Reduced mass matrix
    pub mr: DMatrix<f64>,
    /// Reduced stiffness matrix
    pub kr: DMatrix<f64>,
    /// Reduction matrix (nDOF x nReduced)
    pub tr: DMatrix<f64>,
    /// Global DOFs kept by the boundary conditions
    pub kept_dofs: Vec<usize>,
    pub nodes: Vec<Vector3<f64>>,
    pub dcm: Vec<Matrix3<f64>>,
    pub dof_map: DofMap,
    pub element_type: ElementType,
    pub material: Material,
    pub node_sections: Vec<BeamSection>,
    /// Full-space mode shapes as columns, ascending frequency
    pub q: DMatrix<f64>,
    /// Eigenvalues `ω²`
    pub eigenvalues: Vec<f64>,
    /// Natural frequencies [Hz]
    pub freq: Vec<f64>,
    /// Labels of the identified modes (the first `n_modes`)
    pub mode_labels: Vec<ModeLabel>,
}

impl BeamModel {
    pub fn num_dofs(&self) -> usize {
        self.mm.nrows()
    }

    pub fn num_modes(&self) -> usize {
        self.q.ncols()
    }

    /// Full-space shape of mode `i`
    pub fn mode_shape(&self, i: usize) -> Option<DVector<f64>> {
        (i < self.num_modes()).then(|| self.q.column(i).into_owned())
    }

    /// Angular frequency [rad/s] of mode `i`
    pub fn angular_frequency(&self, i: usize) -> Option<f64> {
        self.eigenvalues.get(i).map(|&lambda| lambda.max(0.0).sqrt())
    }

    pub fn node_masses(&self) -> Vec<f64> {
        self.node_sections.iter().map(|s| s.m).collect()
    }

    pub fn node_areas(&self) -> Vec<f64> {
        self.node_sections.iter().map(|s| s.area).collect()
    }

    /// Selected mode shapes as the columns of `Se`
    pub fn elastic_shapes(&self, modes: &[usize]) -> Result<DMatrix<f64>> {
        if let Some(&bad) = modes.iter().find(|&&i| i >= self.num_modes()) {
            return Err(BeamError::config(format!(
                "Mode {} requested, model has {} modes",
                bad,
                self.num_modes()
            )));
        }
        Ok(self.q.select_columns(modes))
    }

    /// Generalized mass of the undeflected beam for the shapes `se`
    pub fn generalized_mass(&self, se: &DMatrix<f64>) -> Result<GeneralizedMass> {
        generalized_mass_matrix(&self.nodes, &self.mm, se)
    }

    /// Shape integrals of the shapes `se`
    pub fn shape_integrals(&self, se: &DMatrix<f64>) -> Result<ShapeIntegrals> {
        let (_, sr) = rigid_body_shapes(&self.nodes);
        shape_integrals(
            &self.nodes,
            &self.dof_map,
            &self.dcm,
            &self.node_masses(),
            se,
            &sr,
            &self.tr,
        )
    }

    /// Geometric stiffening of the shapes `se` for every stiffening load case
    pub fn geometrical_stiffening(
        &self,
        se: &DMatrix<f64>,
        solver: &dyn LinearSolver,
    ) -> Result<GeometricStiffening> {
        let (st, _) = rigid_body_shapes(&self.nodes);
        let integrals = self.shape_integrals(se)?;
        let kinv = flexibility_matrix(&self.kr, &self.tr, solver)?;
        let ct0 = ct0_reduced(&self.mm, &st, &self.tr);
        geometrical_stiffening(
            &self.nodes,
            &kinv,
            &self.tr,
            se,
            &self.dof_map,
            &self.dcm,
            self.material.e,
            &self.node_areas(),
            &integrals.kom0_reduced,
            &ct0,
        )
    }
}

/// Build the beam model and its normalized modes with the native eigensolver
///
/// # Errors
/// - `Config` for missing or inconsistent inputs
/// - `Unsupported` for an off-axis `Frame3d` beam
/// - `Backend` when the eigenproblem cannot be solved
pub fn cbeam(
    geometry: &BeamGeometry,
    props: &BeamProperties,
    config: &BeamConfig,
) -> Result<BeamModel> {
    cbeam_with_solver(geometry, props, config, &NativeBackend)
}

/// Build the beam model, solving the eigenproblem with `solver`
pub fn cbeam_with_solver(
    geometry: &BeamGeometry,
    props: &BeamProperties,
    config: &BeamConfig,
    solver: &dyn EigenSolver,
) -> Result<BeamModel> {
    let (disc, material) = discretize(geometry, props, config.nel)?;
    if config.verbose {
        eprintln!(
            "[cbeam] {} elements, {} nodes, length {:.4}",
            disc.num_elements(),
            disc.num_nodes(),
            disc.length()
        );
    }

    let beam = assemble_beam(&disc, &material, config.element)?;
    if config.verbose {
        eprintln!(
            "[cbeam] Assembled {} ({} DOFs)",
            config.element,
            beam.num_dofs()
        );
    }

    let mut mm = beam.mm;
    let mut kk = beam.kk;
    let reduced = apply_bc(
        &mut mm,
        &mut kk,
        &beam.dof_map,
        &config.bc,
        &config.root,
        &config.tip,
    )?;
    if config.verbose {
        eprintln!(
            "[cbeam] Boundary conditions {}: {} DOFs kept",
            config.bc,
            reduced.num_reduced()
        );
    }

    let eig = solver.solve_generalized(&reduced.kr, &reduced.mr)?;
    let mut q = insert_bc_in_modes(&eig.eigenvectors, &reduced.tr);
    let mode_labels = identify_and_normalize_modes(&mut q, Some(config.n_modes));
    if config.verbose {
        for (label, f) in mode_labels.iter().zip(&eig.frequencies).take(6) {
            eprintln!("[cbeam]   {:<14} {:12.5} Hz", label.to_string(), f);
        }
    }

    Ok(BeamModel {
        mm,
        kk,
        mr: reduced.mr,
        kr: reduced.kr,
        tr: reduced.tr,
        kept_dofs: reduced.kept_dofs,
        nodes: beam.nodes,
        dcm: beam.dcm,
        dof_map: beam.dof_map,
        element_type: beam.element_type,
        material: beam.material,
        node_sections: beam.node_sections,
        q,
        eigenvalues: eig.eigenvalues,
        freq: eig.frequencies,
        mode_labels,
    })
}
