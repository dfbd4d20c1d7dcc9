//! File round trips for beam decks and modal reports.

use cbeam_io::{
    BeamDeck, IoError, ModalReport, load_deck, load_report, save_deck, write_report,
};
use cbeam_solver::{
    BeamConfig, BeamGeometry, BeamProperties, BoundaryCondition, ElementType, EndCondition,
    EndMass, Inertia, Profile,
};
use tempfile::{NamedTempFile, tempdir};

fn deck() -> BeamDeck {
    let properties = BeamProperties {
        m: Some(Profile::Distributed(vec![12.0, 10.0, 8.0])),
        eix: Some(Profile::Uniform(1e7)),
        eiy: Some(Profile::Distributed(vec![3e7, 2e7, 1e7])),
        ea: Some(Profile::Uniform(1e9)),
        area: Some(Profile::Uniform(0.01)),
        kt: Some(Profile::Uniform(1e-4)),
        ..Default::default()
    };
    let config = BeamConfig {
        element: ElementType::Frame3dLin,
        nel: Some(8),
        bc: BoundaryCondition::ClampedFree,
        tip: EndCondition {
            mass: Some(EndMass::Point {
                mass: 5.0,
                inertia: Some(Inertia::Diagonal([0.1, 0.2, 0.2])),
                cog: Some([0.2, 0.0, 0.0]),
            }),
            stiffness: None,
        },
        n_modes: 6,
        ..Default::default()
    };
    let mut deck = BeamDeck::new(BeamGeometry::Span(vec![0.0, 4.0, 10.0]), properties, config);
    deck.name = Some("tapered".to_string());
    deck
}

#[test]
fn deck_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("decks").join("tapered.json");

    save_deck(&path, &deck()).unwrap();
    let loaded = load_deck(&path).unwrap();
    assert_eq!(loaded, deck());
}

#[test]
fn missing_deck_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = load_deck(dir.path().join("missing.json")).unwrap_err();
    match err {
        IoError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn invalid_deck_is_a_json_error() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "{invalid json").unwrap();
    assert!(matches!(load_deck(file.path()), Err(IoError::Json(_))));
}

#[test]
fn deck_to_report() {
    let dir = tempdir().unwrap();
    let model = deck().run().unwrap();
    let report = ModalReport::from_model(Some("tapered"), &model);
    assert_eq!(report.modes.len(), 6);
    assert_eq!(report.element, ElementType::Frame3dLin);
    assert!(report.modes.windows(2).all(|w| w[0].frequency_hz <= w[1].frequency_hz));

    let path = dir.path().join("report.json");
    write_report(&path, &report).unwrap();
    let loaded = load_report(&path).unwrap();
    assert_eq!(loaded.modes.len(), report.modes.len());
    assert_eq!(loaded.name.as_deref(), Some("tapered"));
    for (a, b) in loaded.modes.iter().zip(&report.modes) {
        assert_eq!(a.label, b.label);
        assert!((a.frequency_hz - b.frequency_hz).abs() <= 1e-12 * b.frequency_hz.abs());
    }
}

#[test]
fn tip_mass_changes_the_spectrum() {
    let with_mass = deck().run().unwrap();
    let mut bare = deck();
    bare.config.tip = EndCondition::default();
    let bare = bare.run().unwrap();
    assert!(with_mass.freq[0] < bare.freq[0]);
}
