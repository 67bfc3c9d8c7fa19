//! Orbital update by per-shell diagonalisation against the virtual space.
//!
//! Each shell sees only its own orbitals and the virtuals of the previous
//! iteration, so shells can be diagonalised independently. The new occupied
//! orbitals are then made orthonormal together and the virtual space is
//! rebuilt as their complement.

use crate::error::Result;
use crate::linalg::{ao2mo, eigh, lowdin_orthonormalize, orthonormal_complement, OverlapMetric};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use std::f64::consts::FRAC_PI_8;
use tracing::debug;

const ROTATION_DENOMINATOR_TOL: f64 = 1e-12;

/// Result of diagonalising one shell's Fock operator in its restricted space.
#[derive(Debug, Clone)]
pub struct ShellUpdate {
    /// updated orbitals of the shell, in the AO basis
    pub orbitals: DMatrix<f64>,
    pub eigenvalues: DVector<f64>,
}

/// Σ_i f_shell(i) (Uᵀ h U)_ii over the occupied orbitals.
pub fn one_electron_energy(
    h: &DMatrix<f64>,
    u: &DMatrix<f64>,
    orbital_shell: &[usize],
    f: &DVector<f64>,
) -> f64 {
    let occ = u.columns(0, orbital_shell.len()).into_owned();
    let hmo = ao2mo(h, &occ);
    orbital_shell
        .iter()
        .enumerate()
        .map(|(i, &shell)| f[shell] * hmo[(i, i)])
        .sum()
}

pub fn diagonalize_shell(
    fock: &DMatrix<f64>,
    u: &DMatrix<f64>,
    orbs: &[usize],
    virt: &[usize],
) -> ShellUpdate {
    let space: Vec<usize> = orbs.iter().chain(virt).copied().collect();
    let us = u.select_columns(&space);
    let (e, c) = eigh(&ao2mo(fock, &us));
    let n = orbs.len();
    ShellUpdate {
        orbitals: us * c.columns(0, n),
        eigenvalues: e.rows(0, n).into_owned(),
    }
}

/// Diagonalise every shell against the virtuals of `u`, in shell order.
pub fn ocbse_step(
    focks: &[DMatrix<f64>],
    u: &DMatrix<f64>,
    orbs_per_shell: &[Vec<usize>],
    virt: &[usize],
) -> Vec<ShellUpdate> {
    focks
        .par_iter()
        .zip(orbs_per_shell.par_iter())
        .map(|(fock, orbs)| diagonalize_shell(fock, u, orbs, virt))
        .collect()
}

/// Place each shell's new orbitals, orthonormalise the occupied block under
/// the overlap metric and complete it with a fresh virtual block.
pub fn assemble_orbitals(
    updates: &[ShellUpdate],
    orbs_per_shell: &[Vec<usize>],
    metric: &OverlapMetric,
    norb: usize,
) -> Result<DMatrix<f64>> {
    let nbf = metric.s.nrows();
    let nocc: usize = orbs_per_shell.iter().map(Vec::len).sum();

    let mut occ = DMatrix::zeros(nbf, nocc);
    for (orbs, update) in orbs_per_shell.iter().zip(updates) {
        for (k, &i) in orbs.iter().enumerate() {
            occ.set_column(i, &update.orbitals.column(k));
        }
    }
    let occ = lowdin_orthonormalize(&occ, &metric.s)?;
    let virt = orthonormal_complement(&occ, metric, norb - nocc)?;

    let mut u = DMatrix::zeros(nbf, norb);
    u.columns_mut(0, nocc).copy_from(&occ);
    u.columns_mut(nocc, norb - nocc).copy_from(&virt);
    Ok(u)
}

/// Jacobi rotations between occupied orbitals of different shells.
///
/// For p in shell i and q in shell j (i < j) with G = Uᵀ(F_i − F_j)U the
/// rotation angle is −G_pq / (G_qq − G_pp), clamped to ±π/8. Pairs with a
/// non-positive denominator are left alone. Returns the rotated orbitals and
/// the largest angle applied.
pub fn rotate_occupied(
    u: &DMatrix<f64>,
    focks: &[DMatrix<f64>],
    orbs_per_shell: &[Vec<usize>],
) -> (DMatrix<f64>, f64) {
    let mut rotated = u.clone();
    let mut max_angle: f64 = 0.0;

    for i in 0..orbs_per_shell.len() {
        for j in i + 1..orbs_per_shell.len() {
            let g = ao2mo(&(&focks[i] - &focks[j]), u);
            for &p in &orbs_per_shell[i] {
                for &q in &orbs_per_shell[j] {
                    let denom = g[(q, q)] - g[(p, p)];
                    if denom <= ROTATION_DENOMINATOR_TOL {
                        continue;
                    }
                    let theta = (-g[(p, q)] / denom).clamp(-FRAC_PI_8, FRAC_PI_8);
                    let (sin, cos) = theta.sin_cos();
                    let cp = rotated.column(p).into_owned();
                    let cq = rotated.column(q).into_owned();
                    rotated.set_column(p, &(&cp * cos + &cq * sin));
                    rotated.set_column(q, &(&cq * cos - &cp * sin));
                    max_angle = max_angle.max(theta.abs());
                }
            }
        }
    }

    if max_angle > 0.0 {
        debug!("Occupied rotations applied, largest angle {:.3e} rad", max_angle);
    }
    (rotated, max_angle)
}
