//! Finite-element beam model and modal reduction.
//!
//! The crate turns continuous beam properties (mass per length, bending,
//! torsional and axial stiffness) into 6-DOF-per-node frame elements, assembles
//! and reduces the global system, and extracts identified, normalized modes.
//! Shape integrals and geometric stiffening terms of selected modes are available
//! for flexible multibody formulations.

pub mod assembly;
pub mod backend;
pub mod boundary_conditions;
pub mod dcm;
pub mod discretize;
pub mod dof_map;
pub mod elements;
pub mod error;
pub mod interp;
pub mod modal;
pub mod model;
pub mod rigid_body;
pub mod shape_integrals;
pub mod types;

pub use assembly::{AssembledBeam, Assembler, assemble_beam, cbeam_frame3dlin_kg};
pub use backend::{
    BackendError, EigenResult, EigenSolver, LinearSolver, NativeBackend, SolverBackend,
    default_backend,
};
pub use boundary_conditions::{
    BoundaryCondition, DofConstraint, EndCondition, EndMass, ReducedSystem, apply_bc,
};
pub use dcm::element_dcm_from_beam_nodes;
pub use discretize::{BeamGeometry, BeamProperties, Discretization, Profile, discretize};
pub use dof_map::{DofMap, element_dof_index, linear_dof_mapping};
pub use elements::{BeamSection, DynamicFrame, Frame3d, Frame3dLin, FrameElement, Material};
pub use error::{BeamError, Result};
pub use modal::{
    ModeLabel, identify_and_normalize_modes, insert_bc_in_modes, mode_norms, normalize_to_last,
    orthogonalize_mode_pair,
};
pub use model::{BeamConfig, BeamModel, cbeam, cbeam_with_solver};
pub use rigid_body::{Inertia, rigid_body_mass_matrix_at_p};
pub use shape_integrals::{
    GeneralizedMass, GeometricStiffening, ShapeIntegrals, generalized_mass_matrix,
    geometrical_stiffening, shape_integrals,
};
pub use types::{DofKind, ElementType};
