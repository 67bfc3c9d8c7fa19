//! Nuclear framework and electron bookkeeping.

use crate::error::{Result, ScfError};
use basis::BasisError;
use nalgebra::Vector3;
use periodic_table_on_an_enum::Element;

pub const ANGSTROM_TO_BOHR: f64 = 1.0 / 0.52917721092;

#[derive(Clone)]
pub struct Atom {
    pub element: Element,
    /// position in bohr
    pub position: Vector3<f64>,
}

impl Atom {
    pub fn new(element: Element, position: Vector3<f64>) -> Self {
        Atom { element, position }
    }

    pub fn from_symbol(symbol: &str, position: Vector3<f64>) -> Result<Self> {
        let element = Element::from_symbol(symbol)
            .ok_or_else(|| BasisError::UnknownElement(symbol.to_string()))?;
        Ok(Atom::new(element, position))
    }

    pub fn atomic_number(&self) -> u32 {
        self.element.get_atomic_number() as u32
    }

    pub fn symbol(&self) -> &'static str {
        self.element.get_symbol()
    }
}

#[derive(Clone)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub charge: i32,
    pub multiplicity: usize,
}

impl Molecule {
    /// Fails when the electron count cannot carry the requested spin.
    pub fn new(atoms: Vec<Atom>, charge: i32, multiplicity: usize) -> Result<Self> {
        let molecule = Molecule {
            atoms,
            charge,
            multiplicity,
        };
        let nel = molecule.nelectrons();
        let nopen = multiplicity as i64 - 1;
        if multiplicity == 0 || nel < nopen || (nel - nopen) % 2 != 0 {
            return Err(ScfError::InconsistentSpin {
                charge,
                multiplicity,
                nelectrons: nel,
            });
        }
        Ok(molecule)
    }

    pub fn nelectrons(&self) -> i64 {
        let nuclear: i64 = self.atoms.iter().map(|a| a.atomic_number() as i64).sum();
        nuclear - self.charge as i64
    }

    /// Number of unpaired (high-spin) electrons.
    pub fn nopen(&self) -> usize {
        self.multiplicity.saturating_sub(1)
    }

    /// Number of doubly occupied orbitals.
    pub fn nclosed(&self) -> usize {
        (self.nelectrons().max(0) as usize).saturating_sub(self.nopen()) / 2
    }

    pub fn nuclear_repulsion(&self) -> f64 {
        let mut energy = 0.0;
        for (i, a) in self.atoms.iter().enumerate() {
            for b in &self.atoms[i + 1..] {
                let r = (a.position - b.position).norm();
                if r > 1e-10 {
                    energy += (a.atomic_number() * b.atomic_number()) as f64 / r;
                }
            }
        }
        energy
    }

    /// (position, charge) of every nucleus.
    pub fn nuclei(&self) -> Vec<(Vector3<f64>, u32)> {
        self.atoms
            .iter()
            .map(|a| (a.position, a.atomic_number()))
            .collect()
    }

    /// (symbol, position) of every atom, for placing basis functions.
    pub fn basis_centers(&self) -> Vec<(&'static str, Vector3<f64>)> {
        self.atoms.iter().map(|a| (a.symbol(), a.position)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h2(charge: i32, multiplicity: usize) -> Result<Molecule> {
        Molecule::new(
            vec![
                Atom::from_symbol("H", Vector3::zeros())?,
                Atom::from_symbol("H", Vector3::new(0.0, 0.0, 1.4))?,
            ],
            charge,
            multiplicity,
        )
    }

    #[test]
    fn test_electron_counts() {
        let mol = h2(0, 1).unwrap();
        assert_eq!(mol.nelectrons(), 2);
        assert_eq!(mol.nclosed(), 1);
        assert_eq!(mol.nopen(), 0);

        let cation = h2(1, 2).unwrap();
        assert_eq!(cation.nelectrons(), 1);
        assert_eq!(cation.nclosed(), 0);
        assert_eq!(cation.nopen(), 1);

        let triplet = h2(0, 3).unwrap();
        assert_eq!(triplet.nclosed(), 0);
        assert_eq!(triplet.nopen(), 2);
    }

    #[test]
    fn test_inconsistent_spin_is_rejected() {
        assert!(matches!(h2(0, 2), Err(ScfError::InconsistentSpin { .. })));
        assert!(matches!(h2(1, 1), Err(ScfError::InconsistentSpin { .. })));
        assert!(matches!(h2(0, 5), Err(ScfError::InconsistentSpin { .. })));
        assert!(matches!(h2(0, 0), Err(ScfError::InconsistentSpin { .. })));
    }

    #[test]
    fn test_nuclear_repulsion() {
        let mol = h2(0, 1).unwrap();
        assert!((mol.nuclear_repulsion() - 1.0 / 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_symbol() {
        assert!(matches!(
            Atom::from_symbol("Xx", Vector3::zeros()),
            Err(ScfError::Basis(BasisError::UnknownElement(_)))
        ));
    }
}
