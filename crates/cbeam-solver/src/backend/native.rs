//! Native backend using nalgebra.
//!
//! - Dense LU decomposition for linear systems
//! - Cholesky-transformed SymmetricEigen for generalized eigenvalue problems,
//!   one decoupled DOF group at a time

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};
use nalgebra::linalg::{Cholesky, SymmetricEigen};

use super::traits::*;

/// Native solver backend using nalgebra for all numerical operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

fn check_square(name: &str, a: &DMatrix<f64>) -> Result<(), BackendError> {
    if a.nrows() != a.ncols() {
        return Err(format!("{} matrix is not square ({}x{})", name, a.nrows(), a.ncols()).into());
    }
    if a.nrows() == 0 {
        return Err(format!("{} matrix is empty", name).into());
    }
    Ok(())
}

/// Average a matrix with its transpose to remove round-off asymmetry.
pub(crate) fn symmetrize(a: &DMatrix<f64>) -> DMatrix<f64> {
    (a + a.transpose()) * 0.5
}

impl LinearSolver for NativeBackend {
    fn solve_linear(
        &self,
        k: &DMatrix<f64>,
        b: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>, BackendError> {
        check_square("Stiffness", k)?;
        if b.nrows() != k.nrows() {
            return Err(format!(
                "Right-hand side has {} rows, expected {}",
                b.nrows(),
                k.nrows()
            )
            .into());
        }

        k.clone()
            .lu()
            .solve(b)
            .ok_or(BackendError("Singular matrix in LU decomposition".into()))
    }
}

/// Groups of DOFs coupled through a nonzero entry of `K` or `M`, each sorted,
/// ordered by their first DOF.
pub(crate) fn coupled_blocks(k: &DMatrix<f64>, m: &DMatrix<f64>) -> Vec<Vec<usize>> {
    let n = k.nrows();
    let mut parent: Vec<usize> = (0..n).collect();
    fn root(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }
    for j in 0..n {
        for i in (j + 1)..n {
            if k[(i, j)] != 0.0 || k[(j, i)] != 0.0 || m[(i, j)] != 0.0 || m[(j, i)] != 0.0 {
                let (ri, rj) = (root(&mut parent, i), root(&mut parent, j));
                if ri != rj {
                    parent[ri.max(rj)] = ri.min(rj);
                }
            }
        }
    }

    let mut blocks: Vec<Vec<usize>> = Vec::new();
    let mut block_of_root = vec![usize::MAX; n];
    for i in 0..n {
        let r = root(&mut parent, i);
        if block_of_root[r] == usize::MAX {
            block_of_root[r] = blocks.len();
            blocks.push(Vec::new());
        }
        blocks[block_of_root[r]].push(i);
    }
    blocks
}

/// Eigenpairs of one block: Cholesky `M = L Lᵀ`, then `L⁻¹ K L⁻ᵀ`.
fn solve_block(
    k: &DMatrix<f64>,
    m: &DMatrix<f64>,
) -> Result<(Vec<f64>, DMatrix<f64>), BackendError> {
    let chol_m = Cholesky::new(symmetrize(m))
        .ok_or(BackendError("Mass matrix not positive definite".into()))?;

    let l_inv = chol_m
        .l()
        .try_inverse()
        .ok_or(BackendError("Failed to invert Cholesky factor L".into()))?;

    // K* = L^-1 * K * L^-T
    let k_star = symmetrize(&(&l_inv * k * l_inv.transpose()));
    let eigen = SymmetricEigen::new(k_star);

    // Transform eigenvectors back: phi = L^-T * psi
    let phi = l_inv.transpose() * &eigen.eigenvectors;
    Ok((eigen.eigenvalues.iter().copied().collect(), phi))
}

impl EigenSolver for NativeBackend {
    /// Decoupled DOF groups are solved separately, so a very stiff group
    /// (e.g. torsion of a straight beam) does not pollute the accuracy of the
    /// others.
    fn solve_generalized(
        &self,
        k: &DMatrix<f64>,
        m: &DMatrix<f64>,
    ) -> Result<EigenResult, BackendError> {
        check_square("Stiffness", k)?;
        check_square("Mass", m)?;
        if k.nrows() != m.nrows() {
            return Err(format!(
                "Stiffness ({}) and mass ({}) sizes differ",
                k.nrows(),
                m.nrows()
            )
            .into());
        }
        let n = k.nrows();

        let mut pairs: Vec<(f64, DVector<f64>)> = Vec::with_capacity(n);
        for dofs in coupled_blocks(k, m) {
            let k_b = k.select_rows(&dofs).select_columns(&dofs);
            let m_b = m.select_rows(&dofs).select_columns(&dofs);
            let (lambdas, phi) = solve_block(&k_b, &m_b)?;
            for (j, lambda) in lambdas.into_iter().enumerate() {
                let mut v = DVector::zeros(n);
                for (r, &dof) in dofs.iter().enumerate() {
                    v[dof] = phi[(r, j)];
                }
                pairs.push((lambda, v));
            }
        }
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let eigenvalues: Vec<f64> = pairs.iter().map(|(lambda, _)| *lambda).collect();
        let mut eigenvectors = DMatrix::zeros(n, n);
        for (mode, (_, v)) in pairs.iter().enumerate() {
            eigenvectors.set_column(mode, v);
        }
        let frequencies = eigenvalues
            .iter()
            .map(|&lambda| lambda.max(0.0).sqrt() / (2.0 * PI))
            .collect();

        Ok(EigenResult {
            eigenvalues,
            eigenvectors,
            frequencies,
        })
    }
}

impl SolverBackend for NativeBackend {
    fn name(&self) -> &str {
        "native-nalgebra"
    }
}
