//! Element direction cosine matrices (DCM) from ordered beam nodes.
//!
//! Row `k` of an element DCM is the local axis `e_{k+1}` expressed in global
//! coordinates, so `DCM * v_global = v_local`.

use nalgebra::{Matrix3, Vector3};

use crate::types::DCM_TANGENT_CHANGE_TOL;

/// Skew-symmetric cross-product matrix: `skew(a) * b == a x b`.
pub fn skew(a: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(
        0.0, -a.z, a.y, //
        a.z, 0.0, -a.x, //
        -a.y, a.x, 0.0,
    )
}

/// Rotation of angle `phi` about the unit axis `e` (Rodrigues' formula).
pub fn rodrigues(e: &Vector3<f64>, phi: f64) -> Matrix3<f64> {
    let (s, c) = phi.sin_cos();
    Matrix3::identity() * c + skew(e) * s + (e * e.transpose()) * (1.0 - c)
}

/// A unit vector orthogonal to `e1`, built from the global axis least aligned
/// with it (first axis on ties).
pub fn orthogonal_unit(e1: &Vector3<f64>) -> Vector3<f64> {
    let mut axis = 0;
    for k in 1..3 {
        if e1[k].abs() < e1[axis].abs() {
            axis = k;
        }
    }
    let mut a = Vector3::zeros();
    a[axis] = 1.0;
    (a - e1 * e1.dot(&a)).normalize()
}

/// State carried from one element to the next while folding over the nodes.
#[derive(Debug, Clone, Copy)]
struct FrameState {
    e1: Vector3<f64>,
    e2: Vector3<f64>,
}

/// One DCM per element of the polyline `nodes`.
///
/// The secondary axis of the first element is an arbitrary normal to the tangent.
/// Later elements follow the change of tangent when it exceeds the tolerance and
/// otherwise keep the previous secondary axis. `phi` (per element) rotates the
/// section about the tangent; the angle is absolute, it does not accumulate.
///
/// Nodes are assumed distinct (checked upstream by the discretization).
pub fn element_dcm_from_beam_nodes(
    nodes: &[Vector3<f64>],
    phi: Option<&[f64]>,
) -> Vec<Matrix3<f64>> {
    let n_elem = nodes.len().saturating_sub(1);
    let mut dcms = Vec::with_capacity(n_elem);
    let mut state: Option<FrameState> = None;

    for i in 0..n_elem {
        let e1 = (nodes[i + 1] - nodes[i]).normalize();
        let prev = state.unwrap_or(FrameState {
            e1,
            e2: orthogonal_unit(&e1),
        });

        let de1 = e1 - prev.e1;
        let e2 = if de1.norm() < DCM_TANGENT_CHANGE_TOL {
            prev.e2
        } else {
            // Keep only the part normal to the new tangent
            let n = de1 - e1 * e1.dot(&de1);
            if n.norm() < DCM_TANGENT_CHANGE_TOL {
                prev.e2
            } else {
                n.normalize()
            }
        };

        let e2_section = match phi.and_then(|p| p.get(i)) {
            Some(&angle) if angle != 0.0 => rodrigues(&e1, angle) * e2,
            _ => e2,
        };
        let e3 = e1.cross(&e2_section);

        dcms.push(Matrix3::from_rows(&[
            e1.transpose(),
            e2_section.transpose(),
            e3.transpose(),
        ]));
        state = Some(FrameState { e1, e2 });
    }
    dcms
}
