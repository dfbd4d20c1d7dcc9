//! JSON modal reports and the plain-text frequency table.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use cbeam_solver::{BeamModel, DofKind, ElementType};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// One identified mode with its normalized shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeRecord {
    pub index: usize,
    pub label: String,
    pub rigid: bool,
    pub frequency_hz: f64,
    pub eigenvalue: f64,
    /// `[ux, uy, uz, vx, vy, vz]` at each node
    pub shape: Vec<[f64; 6]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalReport {
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub element: ElementType,
    pub num_elements: usize,
    pub num_dofs: usize,
    pub num_reduced_dofs: usize,
    pub nodes: Vec<[f64; 3]>,
    pub modes: Vec<ModeRecord>,
}

impl ModalReport {
    /// Report of the identified modes of a model
    pub fn from_model(name: Option<&str>, model: &BeamModel) -> Self {
        let nodes = model.nodes.iter().map(|x| [x.x, x.y, x.z]).collect();
        let modes = model
            .mode_labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let shape = model
                    .dof_map
                    .nodes_to_dof
                    .iter()
                    .map(|dofs| std::array::from_fn(|k| model.q[(dofs[k], i)]))
                    .collect();
                ModeRecord {
                    index: i,
                    label: label.to_string(),
                    rigid: label.is_rigid(),
                    frequency_hz: model.freq[i],
                    eigenvalue: model.eigenvalues[i],
                    shape,
                }
            })
            .collect();

        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            name: name.map(str::to_string),
            element: model.element_type,
            num_elements: model.dof_map.num_elements(),
            num_dofs: model.num_dofs(),
            num_reduced_dofs: model.kept_dofs.len(),
            nodes,
            modes,
        }
    }

    /// Plain-text frequency table
    pub fn frequency_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:>5}  {:<14} {:>14}", "MODE", "LABEL", "FREQ [Hz]");
        for mode in &self.modes {
            let _ = writeln!(
                out,
                "{:>5}  {:<14} {:>14.6}",
                mode.index + 1,
                mode.label,
                mode.frequency_hz
            );
        }
        out
    }

    /// Tip value of a DOF type in mode `i`
    pub fn tip_value(&self, i: usize, dof: DofKind) -> Option<f64> {
        self.modes
            .get(i)
            .and_then(|m| m.shape.last())
            .map(|v| v[dof.index()])
    }
}

pub fn write_report(path: impl AsRef<Path>, report: &ModalReport) -> Result<()> {
    let path = path.as_ref();
    crate::ensure_parent_dir(path)?;
    let bytes = serde_json::to_vec_pretty(report)?;
    fs::write(path, bytes)?;
    Ok(())
}

pub fn load_report(path: impl AsRef<Path>) -> Result<ModalReport> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbeam_solver::{BeamConfig, BeamGeometry, BeamProperties, Profile, cbeam};

    fn model() -> BeamModel {
        let props = BeamProperties {
            m: Some(Profile::Uniform(10.0)),
            eix: Some(Profile::Uniform(1e7)),
            eiy: Some(Profile::Uniform(1e7)),
            ea: Some(Profile::Uniform(1e9)),
            ..Default::default()
        };
        let config = BeamConfig {
            nel: Some(5),
            n_modes: 4,
            ..Default::default()
        };
        cbeam(&BeamGeometry::Length(10.0), &props, &config).unwrap()
    }

    #[test]
    fn report_holds_identified_modes() {
        let model = model();
        let report = ModalReport::from_model(Some("uniform"), &model);
        assert_eq!(report.modes.len(), 4);
        assert_eq!(report.nodes.len(), 6);
        assert_eq!(report.num_dofs, 36);
        assert_eq!(report.num_reduced_dofs, 30);
        assert_eq!(report.modes[0].shape.len(), 6);
        assert_eq!(report.modes[0].shape[0], [0.0; 6]);
        assert!(!report.modes[0].rigid);

        let dominant = model.mode_labels[0].dominant();
        let tip = report.tip_value(0, dominant).unwrap();
        assert!((tip - 1.0).abs() < 1e-12);
    }

    #[test]
    fn frequency_table_lists_modes() {
        let report = ModalReport::from_model(None, &model());
        let table = report.frequency_table();
        assert_eq!(table.lines().count(), 5);
        assert!(table.lines().next().unwrap().contains("FREQ"));
        assert!(table.contains(&report.modes[3].label));
    }
}
