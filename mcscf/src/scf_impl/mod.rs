//! Generalized self-consistent field solvers
//!
//! RHF, ROHF and GVB share one energy expression parameterised by shell
//! occupations and coupling coefficients (see [`crate::coupling`]). This
//! module provides the per-shell Fock build, the orbital update that
//! diagonalises each shell against the virtual space, and the driver that
//! iterates the two to self-consistency.

mod driver;
mod fock;
mod methods;
mod ocbse;

pub use driver::{ConvergenceStatus, McScf, ScfOptions, ScfOutcome};
pub use fock::{build_densities, build_fock_matrices, TwoElectronContractions};
pub use methods::{gvb, rhf, rohf, MolecularIntegrals};
pub use ocbse::{
    assemble_orbitals, diagonalize_shell, ocbse_step, one_electron_energy, rotate_occupied,
    ShellUpdate,
};

use crate::error::Result;
use nalgebra::DMatrix;

/// The SCF trait defines the interface for self-consistent field calculations
pub trait SCF {
    /// Starting orbitals: those left by a previous run, else the core-Hamiltonian guess.
    fn init_orbitals(&mut self) -> Result<DMatrix<f64>>;
    /// Iterate to convergence or until the iteration cap.
    fn scf_cycle(&mut self) -> Result<ScfOutcome>;
    fn calculate_total_energy(&self) -> f64;
}
