//! Per-shell densities and Fock operators.

use crate::coupling::CouplingCoefficients;
use crate::linalg::dmat_gen;
use basis::TwoElectronIntegrals;
use nalgebra::DMatrix;
use rayon::prelude::*;

/// Coulomb and exchange contractions of the two-electron integrals with a density.
pub trait TwoElectronContractions: Sync {
    /// Number of basis functions the contractions act on.
    fn nbf(&self) -> usize;
    /// J_mn = Σ_ls (mn|ls) D_ls
    fn coulomb(&self, density: &DMatrix<f64>) -> DMatrix<f64>;
    /// K_mn = Σ_ls (ml|ns) D_ls
    fn exchange(&self, density: &DMatrix<f64>) -> DMatrix<f64>;
}

impl TwoElectronContractions for TwoElectronIntegrals {
    fn nbf(&self) -> usize {
        TwoElectronIntegrals::nbf(self)
    }

    fn coulomb(&self, density: &DMatrix<f64>) -> DMatrix<f64> {
        self.get_j(density)
    }

    fn exchange(&self, density: &DMatrix<f64>) -> DMatrix<f64> {
        self.get_k(density)
    }
}

pub fn build_densities(u: &DMatrix<f64>, orbs_per_shell: &[Vec<usize>]) -> Vec<DMatrix<f64>> {
    orbs_per_shell.iter().map(|orbs| dmat_gen(u, orbs)).collect()
}

/// F_i = f_i h + Σ_j (a_ij J_j + b_ij K_j) for every shell i.
pub fn build_fock_matrices<T: TwoElectronContractions + ?Sized>(
    h: &DMatrix<f64>,
    densities: &[DMatrix<f64>],
    coupling: &CouplingCoefficients,
    eri: &T,
) -> Vec<DMatrix<f64>> {
    let jk: Vec<(DMatrix<f64>, DMatrix<f64>)> = densities
        .par_iter()
        .map(|d| (eri.coulomb(d), eri.exchange(d)))
        .collect();

    (0..densities.len())
        .map(|i| {
            let mut fock = h * coupling.f[i];
            for (j, (coul, exch)) in jk.iter().enumerate() {
                fock += coul * coupling.a[(i, j)] + exch * coupling.b[(i, j)];
            }
            fock
        })
        .collect()
}
