//! RHF, ROHF and GVB entry points for a molecule in a named basis.

use super::driver::{McScf, ScfOptions, ScfOutcome};
use super::SCF;
use crate::error::{Result, ScfError};
use crate::molecule::Molecule;
use crate::shells::ShellCounts;
use basis::{BasisSet, OneElectronIntegrals, TwoElectronIntegrals};
use tracing::info;

/// Basis and integrals of one molecule.
pub struct MolecularIntegrals {
    pub basis: BasisSet,
    pub one: OneElectronIntegrals,
    pub two: TwoElectronIntegrals,
}

impl MolecularIntegrals {
    pub fn build(molecule: &Molecule, basis_name: &str) -> Result<Self> {
        let basis = BasisSet::build(basis_name, &molecule.basis_centers())?;
        Ok(MolecularIntegrals::from_basis(molecule, basis))
    }

    pub fn from_basis(molecule: &Molecule, basis: BasisSet) -> Self {
        info!(
            "Basis {}: {} functions on {} atoms",
            basis.name,
            basis.len(),
            molecule.atoms.len()
        );
        let one = OneElectronIntegrals::build(&basis, &molecule.nuclei());
        let two = TwoElectronIntegrals::build(&basis);
        MolecularIntegrals { basis, one, two }
    }

    pub fn nbf(&self) -> usize {
        self.basis.len()
    }
}

fn run(
    molecule: &Molecule,
    basis_name: &str,
    counts: ShellCounts,
    gvb_coefficients: Option<&[f64]>,
    options: ScfOptions,
) -> Result<ScfOutcome> {
    let basis = BasisSet::build(basis_name, &molecule.basis_centers())?;
    counts.validate(basis.len())?;

    let ints = MolecularIntegrals::from_basis(molecule, basis);
    let mut solver = McScf::new(
        ints.one.core_hamiltonian(),
        ints.one.overlap.clone(),
        &ints.two,
        counts,
        gvb_coefficients,
        options,
    )?
    .with_nuclear_repulsion(molecule.nuclear_repulsion());
    solver.scf_cycle()
}

/// Closed-shell restricted Hartree-Fock.
pub fn rhf(molecule: &Molecule, basis_name: &str, options: ScfOptions) -> Result<ScfOutcome> {
    let counts = ShellCounts::new(molecule.nclosed(), molecule.nopen(), 0);
    if !counts.is_closed_shell() {
        return Err(ScfError::OpenShellNotSupported {
            nopen: counts.nopen,
            npair: counts.npair,
        });
    }
    run(molecule, basis_name, counts, None, options)
}

/// High-spin restricted open-shell Hartree-Fock.
pub fn rohf(molecule: &Molecule, basis_name: &str, options: ScfOptions) -> Result<ScfOutcome> {
    let counts = ShellCounts::new(molecule.nclosed(), molecule.nopen(), 0);
    run(molecule, basis_name, counts, None, options)
}

/// GVB with `npair` of the closed-shell pairs correlated.
///
/// `coefficients` are the CI coefficients pair by pair; `None` starts every
/// pair from the single-configuration guess.
pub fn gvb(
    molecule: &Molecule,
    basis_name: &str,
    npair: usize,
    coefficients: Option<&[f64]>,
    options: ScfOptions,
) -> Result<ScfOutcome> {
    let counts = ShellCounts::from_electrons(molecule.nclosed(), molecule.nopen(), npair)?;
    run(molecule, basis_name, counts, coefficients, options)
}
