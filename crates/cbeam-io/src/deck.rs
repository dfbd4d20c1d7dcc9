//! JSON beam decks.
//!
//! A deck holds everything needed to build a beam model: geometry, section
//! properties and the pipeline configuration (flattened at the top level).
//!
//! ```json
//! {
//!   "name": "blade",
//!   "geometry": { "length": 10.0 },
//!   "properties": { "m": 10.0, "eix": 1e7, "eiy": 1e7, "ea": 1e9 },
//!   "element": "frame3dlin",
//!   "nel": 10,
//!   "bc": "clamped_free"
//! }
//! ```

use std::fs;
use std::path::Path;

use cbeam_solver::{BeamConfig, BeamGeometry, BeamModel, BeamProperties, cbeam};
use serde::{Deserialize, Serialize};

use crate::error::{IoError, Result};

pub const DECK_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    DECK_SCHEMA_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamDeck {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub geometry: BeamGeometry,
    pub properties: BeamProperties,
    #[serde(flatten)]
    pub config: BeamConfig,
}

impl BeamDeck {
    pub fn new(geometry: BeamGeometry, properties: BeamProperties, config: BeamConfig) -> Self {
        Self {
            schema_version: DECK_SCHEMA_VERSION,
            name: None,
            geometry,
            properties,
            config,
        }
    }

    /// Reject decks the pipeline cannot run
    pub fn validate(&self) -> Result<()> {
        if self.schema_version != DECK_SCHEMA_VERSION {
            return Err(IoError::Deck(format!(
                "Unsupported schema version {} (expected {})",
                self.schema_version, DECK_SCHEMA_VERSION
            )));
        }
        if self.config.nel == Some(0) {
            return Err(IoError::Deck("nel must be at least 1".into()));
        }
        if self.config.n_modes == 0 {
            return Err(IoError::Deck("n_modes must be at least 1".into()));
        }
        self.properties.validate()?;
        Ok(())
    }

    /// Build the beam model described by the deck
    pub fn run(&self) -> Result<BeamModel> {
        self.validate()?;
        Ok(cbeam(&self.geometry, &self.properties, &self.config)?)
    }
}

pub fn parse_deck(text: &str) -> Result<BeamDeck> {
    let deck: BeamDeck = serde_json::from_str(text)?;
    deck.validate()?;
    Ok(deck)
}

pub fn load_deck(path: impl AsRef<Path>) -> Result<BeamDeck> {
    let bytes = fs::read(path)?;
    let deck: BeamDeck = serde_json::from_slice(&bytes)?;
    deck.validate()?;
    Ok(deck)
}

pub fn save_deck(path: impl AsRef<Path>, deck: &BeamDeck) -> Result<()> {
    let path = path.as_ref();
    crate::ensure_parent_dir(path)?;
    let bytes = serde_json::to_vec_pretty(deck)?;
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbeam_solver::{BoundaryCondition, ElementType, Profile};

    const DECK: &str = r#"{
        "name": "uniform",
        "geometry": { "length": 10.0 },
        "properties": { "m": 10.0, "eix": 1e7, "eiy": 1e7, "ea": 1e9 },
        "element": "frame3dlin",
        "nel": 6,
        "bc": "clamped-free"
    }"#;

    #[test]
    fn parses_flattened_config() {
        let deck = parse_deck(DECK).unwrap();
        assert_eq!(deck.schema_version, DECK_SCHEMA_VERSION);
        assert_eq!(deck.name.as_deref(), Some("uniform"));
        assert_eq!(deck.geometry, BeamGeometry::Length(10.0));
        assert_eq!(deck.properties.m, Some(Profile::Uniform(10.0)));
        assert_eq!(deck.config.element, ElementType::Frame3dLin);
        assert_eq!(deck.config.nel, Some(6));
        assert_eq!(deck.config.bc, BoundaryCondition::ClampedFree);
        assert_eq!(deck.config.n_modes, 20);
    }

    #[test]
    fn distributed_profiles_and_nodes() {
        let deck = parse_deck(
            r#"{
                "geometry": { "nodes": [[0, 0, 0], [5, 0, 0], [10, 0, 0]] },
                "properties": { "m": [12, 10, 8], "eix": 1e7, "eiy": [3e7, 2e7, 1e7], "ea": 1e9 },
                "bc": "free_free"
            }"#,
        )
        .unwrap();
        assert_eq!(
            deck.properties.m,
            Some(Profile::Distributed(vec![12.0, 10.0, 8.0]))
        );
        assert_eq!(deck.config.bc, BoundaryCondition::FreeFree);
        assert!(matches!(deck.geometry, BeamGeometry::Nodes(ref n) if n.len() == 3));
    }

    #[test]
    fn rejects_bad_decks() {
        let no_eiy = r#"{ "geometry": { "length": 1.0 }, "properties": { "m": 1.0, "eix": 1.0, "ea": 1.0 } }"#;
        assert!(matches!(parse_deck(no_eiy), Err(IoError::Solver(_))));

        let no_mass = r#"{ "geometry": { "length": 1.0 }, "properties": { "eix": 1.0, "eiy": 1.0, "ea": 1.0 } }"#;
        assert!(matches!(parse_deck(no_mass), Err(IoError::Solver(_))));

        let zero_nel = r#"{ "geometry": { "length": 1.0 }, "properties": { "m": 1.0, "eix": 1.0, "eiy": 1.0, "ea": 1.0 }, "nel": 0 }"#;
        assert!(matches!(parse_deck(zero_nel), Err(IoError::Deck(_))));

        assert!(matches!(parse_deck("{ not json"), Err(IoError::Json(_))));
    }

    #[test]
    fn unknown_element_is_rejected() {
        let text = DECK.replace("frame3dlin", "beam2d");
        assert!(matches!(parse_deck(&text), Err(IoError::Json(_))));
    }

    #[test]
    fn deck_runs_the_pipeline() {
        let model = parse_deck(DECK).unwrap().run().unwrap();
        assert_eq!(model.nodes.len(), 7);
        assert!(model.freq[0] > 0.0);
    }
}
