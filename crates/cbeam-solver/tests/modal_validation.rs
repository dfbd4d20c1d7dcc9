//! Analytical validation tests for beam modes
//!
//! Validates computed natural frequencies and mode identification against
//! closed-form Euler-Bernoulli solutions for uniform beams.
//!
//! Test cases:
//! 1. Cantilever beam - first and second bending pairs, both formulations
//! 2. Free-free beam - six rigid-body modes
//! 3. Reference scenario - positive definite reduced stiffness
//! 4. Normalization - identified modes are fixed points of the normalization

use cbeam_solver::{
    BeamConfig, BeamGeometry, BeamProperties, BoundaryCondition, ElementType, Profile, cbeam,
    identify_and_normalize_modes,
};
use nalgebra::linalg::Cholesky;

const LENGTH: f64 = 10.0;
const EI: f64 = 1e7;
const MASS: f64 = 10.0;

/// Uniform beam with realistic torsion and area so every mode family stays
/// well separated
fn uniform_props() -> BeamProperties {
    BeamProperties {
        m: Some(Profile::Uniform(MASS)),
        eix: Some(Profile::Uniform(EI)),
        eiy: Some(Profile::Uniform(EI)),
        eiz: Some(Profile::Uniform(EI)),
        ea: Some(Profile::Uniform(1e9)),
        area: Some(Profile::Uniform(0.01)),
        kt: Some(Profile::Uniform(1e-4)),
        ..Default::default()
    }
}

/// Bending frequency of a uniform beam for the eigenvalue `beta_l`
fn bending_frequency(beta_l: f64) -> f64 {
    beta_l.powi(2) / (2.0 * std::f64::consts::PI) * (EI / (MASS * LENGTH.powi(4))).sqrt()
}

fn relative_error(value: f64, reference: f64) -> f64 {
    (value - reference).abs() / reference
}

/// Test 1: Cantilever Beam
///
/// f₁ = (1.875² / 2π) √(EI / (m L⁴)) ≈ 5.6 Hz, f₂ uses 4.694.
/// EIy = EIz, so every bending frequency appears twice.
#[test]
fn test_cantilever_bending_frequencies() {
    let config = BeamConfig {
        nel: Some(20),
        ..Default::default()
    };
    let model = cbeam(&BeamGeometry::Length(LENGTH), &uniform_props(), &config).unwrap();

    let f1 = bending_frequency(1.875104);
    let f2 = bending_frequency(4.694091);
    println!("Cantilever f1: FEM {:.4} Hz, analytical {:.4} Hz", model.freq[0], f1);
    println!("Cantilever f2: FEM {:.4} Hz, analytical {:.4} Hz", model.freq[2], f2);

    assert!(relative_error(model.freq[0], f1) < 0.01, "f1 = {}", model.freq[0]);
    assert!(relative_error(model.freq[1], f1) < 0.01, "f1' = {}", model.freq[1]);
    assert!(relative_error(model.freq[2], f2) < 0.01, "f2 = {}", model.freq[2]);

    let first_pair: Vec<String> = model.mode_labels[..2].iter().map(|l| l.to_string()).collect();
    assert!(
        first_pair.contains(&"uy1".to_string()) || first_pair.contains(&"uz1".to_string()),
        "First modes labelled {:?}",
        first_pair
    );
    assert!(model.mode_labels.iter().all(|l| !l.is_rigid()));
}

#[test]
fn test_cantilever_frame3dlin() {
    let config = BeamConfig {
        element: ElementType::Frame3dLin,
        nel: Some(10),
        ..Default::default()
    };
    let model = cbeam(&BeamGeometry::Length(LENGTH), &uniform_props(), &config).unwrap();
    let f1 = bending_frequency(1.875104);
    assert!(relative_error(model.freq[0], f1) < 0.01, "f1 = {}", model.freq[0]);
}

/// Test 2: Free-Free Beam
///
/// Exactly six rigid-body modes with negligible frequency, all labelled rigid.
/// The first elastic pair follows from βL = 4.730.
#[test]
fn test_free_free_rigid_modes() {
    let config = BeamConfig {
        nel: Some(10),
        bc: BoundaryCondition::FreeFree,
        ..Default::default()
    };
    let model = cbeam(&BeamGeometry::Length(LENGTH), &uniform_props(), &config).unwrap();
    let f_elastic = bending_frequency(4.730041);

    let negligible = model.freq.iter().filter(|&&f| f < 1e-3 * f_elastic).count();
    assert_eq!(negligible, 6, "frequencies: {:?}", &model.freq[..8]);
    for (i, label) in model.mode_labels.iter().enumerate() {
        assert_eq!(label.is_rigid(), i < 6, "mode {} labelled {}", i, label);
        if i < 6 {
            assert!(label.to_string().ends_with("_rigid"));
        }
    }
    assert!(relative_error(model.freq[6], f_elastic) < 0.01, "f = {}", model.freq[6]);
}

/// Test 3: Reference scenario (L = 10 m, 10 elements, clamped-free)
#[test]
fn test_reference_scenario() {
    let props = BeamProperties {
        m: Some(Profile::Uniform(MASS)),
        eix: Some(Profile::Uniform(EI)),
        eiy: Some(Profile::Uniform(EI)),
        eiz: Some(Profile::Uniform(EI)),
        ea: Some(Profile::Uniform(1e9)),
        ..Default::default()
    };
    let config = BeamConfig {
        nel: Some(10),
        ..Default::default()
    };
    let model = cbeam(&BeamGeometry::Length(LENGTH), &props, &config).unwrap();

    assert!(Cholesky::new(model.kr.clone()).is_some(), "Kr must be positive definite");
    assert!(model.freq[0].is_finite() && model.freq[0] > 0.0);
    assert!(relative_error(model.freq[0], bending_frequency(1.875104)) < 0.01);
}

/// Test 4: Normalization is idempotent
#[test]
fn test_normalization_idempotent() {
    let config = BeamConfig {
        nel: Some(12),
        ..Default::default()
    };
    let model = cbeam(&BeamGeometry::Length(LENGTH), &uniform_props(), &config).unwrap();

    let mut q = model.q.clone();
    let labels = identify_and_normalize_modes(&mut q, Some(config.n_modes));
    assert_eq!(labels, model.mode_labels);
    let diff = (&q - &model.q).norm();
    assert!(diff < 1e-12, "Renormalization changed the modes by {}", diff);

    // Normalized bending modes end at +1 on their dominant component
    let tip = model.dof_map.tip_dofs();
    let dof = model.mode_labels[0].dominant().index();
    assert!((model.q[(tip[dof], 0)] - 1.0).abs() < 1e-12);
}
