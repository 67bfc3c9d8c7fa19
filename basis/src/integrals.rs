//! One- and two-electron integral services over a molecular basis.

use crate::basis::{AOBasis, Basis, BasisError};
use crate::cgto::ContractedGTO;
use crate::library::atom_basis;
use nalgebra::{DMatrix, Vector3};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::info;

/// Ordered list of contracted basis functions for a whole molecule.
#[derive(Debug, Clone)]
pub struct BasisSet {
    pub name: String,
    pub functions: Vec<Arc<ContractedGTO>>,
    /// maps each function to the index of its parent atom
    pub basis_atom_map: Vec<usize>,
}

impl BasisSet {
    /// Place the named basis on every atom, in atom order.
    pub fn build(name: &str, atoms: &[(&str, Vector3<f64>)]) -> Result<BasisSet, BasisError> {
        let mut functions = Vec::new();
        let mut basis_atom_map = Vec::new();
        for (atom_idx, (symbol, center)) in atoms.iter().enumerate() {
            let mut ao = atom_basis(name, symbol)?;
            ao.set_center(*center);
            let n = ao.basis_size();
            functions.extend(ao.get_basis());
            basis_atom_map.extend(std::iter::repeat(atom_idx).take(n));
        }
        Ok(BasisSet {
            name: name.to_string(),
            functions,
            basis_atom_map,
        })
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

fn lower_triangle(n: usize) -> Vec<(usize, usize)> {
    (0..n).flat_map(|i| (0..=i).map(move |j| (i, j))).collect()
}

fn symmetric_from_pairs(n: usize, pairs: &[(usize, usize)], values: &[f64]) -> DMatrix<f64> {
    let mut m = DMatrix::zeros(n, n);
    for (&(i, j), &v) in pairs.iter().zip(values) {
        m[(i, j)] = v;
        m[(j, i)] = v;
    }
    m
}

/// Overlap, kinetic and nuclear-attraction matrices.
#[derive(Debug, Clone)]
pub struct OneElectronIntegrals {
    pub overlap: DMatrix<f64>,
    pub kinetic: DMatrix<f64>,
    pub nuclear: DMatrix<f64>,
}

impl OneElectronIntegrals {
    /// `nuclei` holds (position, charge) for every nucleus.
    pub fn build(basis: &BasisSet, nuclei: &[(Vector3<f64>, u32)]) -> Self {
        let n = basis.len();
        let f = &basis.functions;
        let pairs = lower_triangle(n);

        let overlap: Vec<f64> = pairs
            .par_iter()
            .map(|&(i, j)| ContractedGTO::Sab(&f[i], &f[j]))
            .collect();
        let kinetic: Vec<f64> = pairs
            .par_iter()
            .map(|&(i, j)| ContractedGTO::Tab(&f[i], &f[j]))
            .collect();
        let nuclear: Vec<f64> = pairs
            .par_iter()
            .map(|&(i, j)| {
                nuclei
                    .iter()
                    .map(|&(r, z)| ContractedGTO::Vab(&f[i], &f[j], r, z))
                    .sum()
            })
            .collect();

        OneElectronIntegrals {
            overlap: symmetric_from_pairs(n, &pairs, &overlap),
            kinetic: symmetric_from_pairs(n, &pairs, &kinetic),
            nuclear: symmetric_from_pairs(n, &pairs, &nuclear),
        }
    }

    /// Core Hamiltonian h = T + V.
    pub fn core_hamiltonian(&self) -> DMatrix<f64> {
        &self.kinetic + &self.nuclear
    }
}

/// Full electron-repulsion tensor (ij|kl), stored densely.
#[derive(Debug, Clone)]
pub struct TwoElectronIntegrals {
    nbf: usize,
    eri: Vec<f64>,
}

impl TwoElectronIntegrals {
    pub fn build(basis: &BasisSet) -> Self {
        let n = basis.len();
        let f = &basis.functions;
        let pairs = lower_triangle(n);

        // unique quartets: i>=j, k>=l, ij>=kl
        let quartets: Vec<(usize, usize)> = (0..pairs.len())
            .flat_map(|ij| (0..=ij).map(move |kl| (ij, kl)))
            .collect();
        info!(
            "Computing {} unique two-electron integrals over {} basis functions",
            quartets.len(),
            n
        );

        let values: Vec<f64> = quartets
            .par_iter()
            .map(|&(ij, kl)| {
                let (i, j) = pairs[ij];
                let (k, l) = pairs[kl];
                ContractedGTO::JKabcd(&f[i], &f[j], &f[k], &f[l])
            })
            .collect();

        let mut eri = vec![0.0; n * n * n * n];
        let idx = |i: usize, j: usize, k: usize, l: usize| ((i * n + j) * n + k) * n + l;
        for (&(ij, kl), &v) in quartets.iter().zip(&values) {
            let (i, j) = pairs[ij];
            let (k, l) = pairs[kl];
            for (a, b, c, d) in [
                (i, j, k, l),
                (j, i, k, l),
                (i, j, l, k),
                (j, i, l, k),
                (k, l, i, j),
                (l, k, i, j),
                (k, l, j, i),
                (l, k, j, i),
            ] {
                eri[idx(a, b, c, d)] = v;
            }
        }

        TwoElectronIntegrals { nbf: n, eri }
    }

    /// Wrap an explicit dense tensor laid out as ((i*n + j)*n + k)*n + l.
    pub fn from_dense(nbf: usize, eri: Vec<f64>) -> Result<Self, BasisError> {
        if eri.len() != nbf.pow(4) {
            return Err(BasisError::DimensionMismatch {
                expected: nbf.pow(4),
                found: eri.len(),
            });
        }
        Ok(TwoElectronIntegrals { nbf, eri })
    }

    pub fn nbf(&self) -> usize {
        self.nbf
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize, l: usize) -> f64 {
        let n = self.nbf;
        self.eri[((i * n + j) * n + k) * n + l]
    }

    /// J_mn = Σ_ls (mn|ls) D_ls
    pub fn get_j(&self, density: &DMatrix<f64>) -> DMatrix<f64> {
        self.contract(density, |m, n, l, s| self.get(m, n, l, s))
    }

    /// K_mn = Σ_ls (ml|ns) D_ls
    pub fn get_k(&self, density: &DMatrix<f64>) -> DMatrix<f64> {
        self.contract(density, |m, n, l, s| self.get(m, l, n, s))
    }

    fn contract<F>(&self, density: &DMatrix<f64>, integral: F) -> DMatrix<f64>
    where
        F: Fn(usize, usize, usize, usize) -> f64 + Sync,
    {
        let n = self.nbf;
        let pairs = lower_triangle(n);
        let values: Vec<f64> = pairs
            .par_iter()
            .map(|&(m, nu)| {
                let mut acc = 0.0;
                for l in 0..n {
                    for s in 0..n {
                        acc += integral(m, nu, l, s) * density[(l, s)];
                    }
                }
                acc
            })
            .collect();
        symmetric_from_pairs(n, &pairs, &values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h2() -> BasisSet {
        BasisSet::build(
            "sto-3g",
            &[("H", Vector3::new(0.0, 0.0, 0.0)), ("H", Vector3::new(0.0, 0.0, 1.4))],
        )
        .unwrap()
    }

    fn nuclei() -> Vec<(Vector3<f64>, u32)> {
        vec![(Vector3::new(0.0, 0.0, 0.0), 1), (Vector3::new(0.0, 0.0, 1.4), 1)]
    }

    // Reference values for H2/STO-3G at R = 1.4 bohr (Szabo & Ostlund, ch. 3)
    #[test]
    fn test_h2_one_electron_integrals() {
        let basis = h2();
        let ints = OneElectronIntegrals::build(&basis, &nuclei());
        assert!((ints.overlap[(0, 0)] - 1.0).abs() < 1e-8);
        assert!((ints.overlap[(0, 1)] - 0.6593).abs() < 1e-4);
        assert!((ints.kinetic[(0, 0)] - 0.7600).abs() < 1e-4);
        assert!((ints.kinetic[(0, 1)] - 0.2365).abs() < 1e-4);

        let h = ints.core_hamiltonian();
        assert!((h[(0, 0)] + 1.1204).abs() < 1e-4);
        assert!((h[(0, 1)] + 0.9584).abs() < 1e-4);
    }

    #[test]
    fn test_h2_two_electron_integrals() {
        let eri = TwoElectronIntegrals::build(&h2());
        assert!((eri.get(0, 0, 0, 0) - 0.7746).abs() < 1e-4);
        assert!((eri.get(0, 0, 1, 1) - 0.5697).abs() < 1e-4);
        assert!((eri.get(1, 0, 0, 0) - 0.4441).abs() < 1e-4);
        assert!((eri.get(1, 0, 1, 0) - 0.2970).abs() < 1e-4);
        assert_eq!(eri.get(0, 1, 0, 0), eri.get(0, 0, 1, 0));
    }

    #[test]
    fn test_coulomb_and_exchange_are_symmetric() {
        let eri = TwoElectronIntegrals::build(&h2());
        let d = DMatrix::from_row_slice(2, 2, &[0.6, 0.2, 0.2, 0.3]);
        let j = eri.get_j(&d);
        let k = eri.get_k(&d);
        assert!((&j - j.transpose()).norm() < 1e-14);
        assert!((&k - k.transpose()).norm() < 1e-14);
        // for a single-basis-function density J and K coincide
        let d1 = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 0.0]);
        assert!((eri.get_j(&d1)[(0, 0)] - eri.get_k(&d1)[(0, 0)]).abs() < 1e-14);
    }
}
