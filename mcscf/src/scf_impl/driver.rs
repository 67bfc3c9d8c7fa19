//! The generalized SCF iteration shared by RHF, ROHF and GVB.

use super::fock::{build_densities, build_fock_matrices, TwoElectronContractions};
use super::ocbse::{assemble_orbitals, ocbse_step, one_electron_energy, rotate_occupied};
use super::SCF;
use crate::coupling::{fab, CouplingCoefficients};
use crate::error::Result;
use crate::linalg::{check_square, check_symmetric, geigh, OverlapMetric};
use crate::shells::{orbs_per_shell, ShellCounts, ShellLayout};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScfOptions {
    pub max_iter: usize,
    /// converged once |E_new - E_old| drops below this
    pub convergence_threshold: f64,
    /// enable Jacobi rotations between occupied shells
    pub occupied_rotations: bool,
}

impl Default for ScfOptions {
    fn default() -> Self {
        ScfOptions {
            max_iter: 25,
            convergence_threshold: 1e-8,
            occupied_rotations: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConvergenceStatus {
    Converged { iterations: usize },
    MaxIterations { iterations: usize, last_delta: f64 },
}

impl ConvergenceStatus {
    pub fn is_converged(&self) -> bool {
        matches!(self, ConvergenceStatus::Converged { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ScfOutcome {
    /// electronic plus nuclear repulsion energy
    pub energy: f64,
    pub electronic_energy: f64,
    pub nuclear_repulsion: f64,
    pub orbitals: DMatrix<f64>,
    /// eigenvalues of each shell's restricted Fock operator, for the shell's own orbitals
    pub orbital_energies: Vec<DVector<f64>>,
    pub layout: ShellLayout,
    pub coupling: CouplingCoefficients,
    pub status: ConvergenceStatus,
    /// electronic energy after every iteration
    pub history: Vec<f64>,
}

/// Generalized SCF solver over a fixed set of shells.
///
/// Owns the orbital coefficients and replaces them wholesale every
/// iteration; everything else is rebuilt from them.
pub struct McScf<'a, T: TwoElectronContractions + ?Sized> {
    h_core: DMatrix<f64>,
    metric: OverlapMetric,
    eri: &'a T,
    pub layout: ShellLayout,
    pub coupling: CouplingCoefficients,
    orbs_per_shell: Vec<Vec<usize>>,
    virt: Vec<usize>,
    pub options: ScfOptions,
    pub nuclear_repulsion: f64,
    pub coeffs: Option<DMatrix<f64>>,
    electronic_energy: f64,
    orbital_energies: Vec<DVector<f64>>,
    history: Vec<f64>,
}

impl<'a, T: TwoElectronContractions + ?Sized> McScf<'a, T> {
    pub fn new(
        h_core: DMatrix<f64>,
        overlap: DMatrix<f64>,
        eri: &'a T,
        counts: ShellCounts,
        gvb_coefficients: Option<&[f64]>,
        options: ScfOptions,
    ) -> Result<Self> {
        let norb = eri.nbf();
        check_square(&h_core, norb, "core Hamiltonian")?;
        check_square(&overlap, norb, "overlap matrix")?;
        check_symmetric(&h_core, "core Hamiltonian")?;
        check_symmetric(&overlap, "overlap matrix")?;
        counts.validate(norb)?;
        let metric = OverlapMetric::new(overlap)?;

        let coupling = fab(&counts, gvb_coefficients)?;
        let layout = ShellLayout::new(counts, &coupling.f)?;

        info!(
            "Shells: ncore = {}, nopen = {}, npair = {} ({} shells, {} virtual orbitals)",
            counts.ncore,
            counts.nopen,
            counts.npair,
            layout.nshells(),
            norb - counts.nocc()
        );
        debug!("Occupations f = {:?}", coupling.f.as_slice());

        Ok(McScf {
            h_core,
            metric,
            eri,
            orbs_per_shell: orbs_per_shell(&counts),
            virt: (counts.nocc()..norb).collect(),
            layout,
            coupling,
            options,
            nuclear_repulsion: 0.0,
            coeffs: None,
            electronic_energy: 0.0,
            orbital_energies: Vec::new(),
            history: Vec::new(),
        })
    }

    pub fn with_nuclear_repulsion(mut self, energy: f64) -> Self {
        self.nuclear_repulsion = energy;
        self
    }

    fn iterate(&self, u: &DMatrix<f64>) -> Result<(f64, DMatrix<f64>, Vec<DVector<f64>>)> {
        let densities = build_densities(u, &self.orbs_per_shell);
        let focks = build_fock_matrices(&self.h_core, &densities, &self.coupling, self.eri);

        let mut energy =
            one_electron_energy(&self.h_core, u, &self.layout.orbital_shell, &self.coupling.f);
        let updates = ocbse_step(&focks, u, &self.orbs_per_shell, &self.virt);
        energy += updates.iter().map(|up| up.eigenvalues.sum()).sum::<f64>();

        let mut unew =
            assemble_orbitals(&updates, &self.orbs_per_shell, &self.metric, u.ncols())?;
        if self.options.occupied_rotations && self.orbs_per_shell.len() > 1 {
            unew = rotate_occupied(&unew, &focks, &self.orbs_per_shell).0;
        }

        let orbital_energies = updates.into_iter().map(|up| up.eigenvalues).collect();
        Ok((energy, unew, orbital_energies))
    }

    fn outcome(&self, orbitals: DMatrix<f64>, status: ConvergenceStatus) -> ScfOutcome {
        ScfOutcome {
            energy: self.calculate_total_energy(),
            electronic_energy: self.electronic_energy,
            nuclear_repulsion: self.nuclear_repulsion,
            orbitals,
            orbital_energies: self.orbital_energies.clone(),
            layout: self.layout.clone(),
            coupling: self.coupling.clone(),
            status,
            history: self.history.clone(),
        }
    }
}

impl<'a, T: TwoElectronContractions + ?Sized> SCF for McScf<'a, T> {
    fn init_orbitals(&mut self) -> Result<DMatrix<f64>> {
        match self.coeffs.take() {
            Some(u) => Ok(u),
            None => Ok(geigh(&self.h_core, &self.metric.s)?.1),
        }
    }

    fn scf_cycle(&mut self) -> Result<ScfOutcome> {
        let mut u = self.init_orbitals()?;
        self.history.clear();

        let mut old_energy = 0.0;
        let mut last_delta = f64::INFINITY;
        let mut status = None;

        for cycle in 0..self.options.max_iter {
            let (energy, unew, orbital_energies) = self.iterate(&u)?;
            u = unew;
            self.electronic_energy = energy;
            self.orbital_energies = orbital_energies;
            self.history.push(energy);

            last_delta = energy - old_energy;
            info!(
                "Cycle {}: E = {:.12} au, dE = {:.12} au",
                cycle,
                energy + self.nuclear_repulsion,
                last_delta
            );

            if last_delta.abs() < self.options.convergence_threshold {
                info!("SCF converged in {} cycles.", cycle + 1);
                status = Some(ConvergenceStatus::Converged {
                    iterations: cycle + 1,
                });
                break;
            }
            old_energy = energy;
        }

        self.coeffs = Some(u.clone());
        let status = status.unwrap_or_else(|| {
            warn!(
                "Maximum iterations ({}) reached without convergence, last dE = {:.3e} au",
                self.options.max_iter, last_delta
            );
            ConvergenceStatus::MaxIterations {
                iterations: self.options.max_iter,
                last_delta,
            }
        });
        Ok(self.outcome(u, status))
    }

    fn calculate_total_energy(&self) -> f64 {
        self.electronic_energy + self.nuclear_repulsion
    }
}
