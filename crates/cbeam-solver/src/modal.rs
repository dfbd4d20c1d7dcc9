//! Mode expansion, identification and normalization.
//!
//! ## Identification
//!
//! For each mode the per-DOF-type magnitude `Σ|q|` over nodes selects the
//! dominant direction. A DOF type whose nodal values, relative to their peak and
//! rounded to three decimals (half to even), are all equal marks a rigid-body mode. Elastic modes
//! are numbered per dominant direction (`uz1`, `uz2`, `vx1`, ...).
//!
//! ## Normalization
//!
//! Modes are scaled so that the dominant component is `+1` at the last node, or
//! `±1` at its peak when the tip value is less than 1% of the peak.

use std::fmt;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::types::{DOF_PER_NODE, DofKind, RIGID_COMPONENT_TOL, TIP_NORMALIZATION_FACTOR};

/// Identified nature of a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeLabel {
    /// Deforming mode, `order`-th one dominated by `dof` (1-based)
    Elastic { dof: DofKind, order: usize },
    /// Rigid-body mode dominated by `dominant`, with `constant` uniform along the beam
    Rigid { dominant: DofKind, constant: DofKind },
}

impl ModeLabel {
    pub fn is_rigid(&self) -> bool {
        matches!(self, ModeLabel::Rigid { .. })
    }

    pub fn dominant(&self) -> DofKind {
        match self {
            ModeLabel::Elastic { dof, .. } => *dof,
            ModeLabel::Rigid { dominant, .. } => *dominant,
        }
    }
}

impl fmt::Display for ModeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeLabel::Elastic { dof, order } => write!(f, "{}{}", dof, order),
            ModeLabel::Rigid { dominant, constant } => {
                write!(f, "{}_{}_rigid", dominant, constant)
            }
        }
    }
}

/// Full-space modes from reduced ones: `Tr * Qr`
pub fn insert_bc_in_modes(qr: &DMatrix<f64>, tr: &DMatrix<f64>) -> DMatrix<f64> {
    tr * qr
}

/// Values of DOF `idof` at every node, starting at `i_dof_start`
pub fn dof_components(q: &[f64], i_dof_start: usize, idof: usize, n_dof: usize) -> Vec<f64> {
    q.iter()
        .skip(i_dof_start + idof)
        .step_by(n_dof.max(1))
        .copied()
        .collect()
}

/// Sum of absolute values of each DOF type over the nodes
pub fn mode_norms(q: &[f64], i_dof_start: usize, n_dof: usize) -> Vec<f64> {
    (0..n_dof)
        .map(|idof| {
            dof_components(q, i_dof_start, idof, n_dof)
                .iter()
                .map(|v| v.abs())
                .sum()
        })
        .collect()
}

/// Index of the largest value, first one on ties
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

fn column(q: &DMatrix<f64>, j: usize) -> Vec<f64> {
    q.column(j).iter().copied().collect()
}

/// `v / umax` in thousandths, rounded half to even
fn thousandths(v: f64, umax: f64) -> f64 {
    (v * 1000.0 / umax).round_ties_even()
}

/// First DOF type whose nodal values are constant and non-negligible
fn constant_component(q: &[f64]) -> Option<usize> {
    (0..DOF_PER_NODE).find(|&idof| {
        let u = dof_components(q, 0, idof, DOF_PER_NODE);
        let umax = max_abs(&u);
        if umax <= RIGID_COMPONENT_TOL {
            return false;
        }
        let first = thousandths(u[0], umax);
        u.iter().all(|&v| thousandths(v, umax) == first)
    })
}

/// Scale factor normalizing a mode on its dominant component, `None` if that
/// component vanishes
fn normalization_factor(u: &[f64]) -> Option<f64> {
    let last = *u.last()?;
    let umax = max_abs(u);
    let ulast = last.abs();
    let fact = if ulast * TIP_NORMALIZATION_FACTOR < umax {
        umax * sign(last)
    } else {
        ulast * sign(last)
    };
    (fact != 0.0).then_some(fact)
}

/// Identify and normalize the first `n_modes` modes (all when `None`)
///
/// Columns of `q` are full-space mode shapes (6 DOFs per node). Processed
/// columns are rescaled in place; the others are left untouched.
pub fn identify_and_normalize_modes(q: &mut DMatrix<f64>, n_modes: Option<usize>) -> Vec<ModeLabel> {
    let n = n_modes.unwrap_or(q.ncols()).min(q.ncols());
    let mut counters = [0usize; DOF_PER_NODE];
    let mut labels = Vec::with_capacity(n);

    for i in 0..n {
        let col = column(q, i);
        let mag = mode_norms(&col, 0, DOF_PER_NODE);
        let i_max = argmax(&mag);
        let dominant = DofKind::ALL[i_max];

        let label = match constant_component(&col) {
            Some(icst) => ModeLabel::Rigid {
                dominant,
                constant: DofKind::ALL[icst],
            },
            None => {
                counters[i_max] += 1;
                ModeLabel::Elastic {
                    dof: dominant,
                    order: counters[i_max],
                }
            }
        };
        labels.push(label);

        let u = dof_components(&col, 0, i_max, DOF_PER_NODE);
        if let Some(fact) = normalization_factor(&u) {
            let mut c = q.column_mut(i);
            c /= fact;
        }
    }
    labels
}

/// Normalize the selected modes by the last nodal value of their dominant
/// translational component
pub fn normalize_to_last(q: &mut DMatrix<f64>, modes: &[usize], i_dof_start: usize, n_dof: usize) {
    let n_trans = (n_dof / 2).max(1);
    for &imode in modes {
        if imode >= q.ncols() {
            continue;
        }
        let col = column(q, imode);
        let mag = mode_norms(&col, i_dof_start, n_dof);
        let i_max = argmax(&mag[..n_trans.min(mag.len())]);
        let v = dof_components(&col, i_dof_start, i_max, n_dof);
        match v.last() {
            Some(&last) if last != 0.0 => {
                let mut c = q.column_mut(imode);
                c /= last;
            }
            _ => {}
        }
    }
}

/// Recombine two modes sharing a frequency so that each is dominated by one of
/// the two main translational directions of the first
pub fn orthogonalize_mode_pair(
    q1: &DVector<f64>,
    q2: &DVector<f64>,
    i_dof_start: usize,
    n_dof: usize,
) -> (DVector<f64>, DVector<f64>) {
    let n_trans = (n_dof / 2).max(2);
    let c1: Vec<f64> = q1.iter().copied().collect();
    let c2: Vec<f64> = q2.iter().copied().collect();
    let mag = mode_norms(&c1, i_dof_start, n_dof);
    let mut idx: Vec<usize> = (0..n_trans.min(mag.len())).collect();
    idx.sort_by(|&a, &b| mag[b].total_cmp(&mag[a]));

    let sum = |c: &[f64], idof: usize| -> f64 {
        dof_components(c, i_dof_start, idof, n_dof).iter().sum()
    };
    let k11 = sum(&c1, idx[0]);
    let k12 = sum(&c1, idx[1]);
    let k21 = sum(&c2, idx[0]);
    let k22 = sum(&c2, idx[1]);

    (q1 * k11 + q2 * k21, q1 * k12 + q2 * k22)
}
