//! Partitioning of occupied orbitals into shells.
//!
//! All core (doubly occupied) orbitals share shell 0. Every open-shell
//! orbital and every GVB natural orbital then gets a shell of its own, in
//! increasing orbital order. When there are no core orbitals the core shell
//! disappears and every later shell index moves down by one; the
//! `ncore_shells` offset below is the only place that knows about it.
//!
//! GVB orbitals are ordered by occupation: the first natural orbital of
//! every pair comes before the second natural orbital of any pair.

use crate::error::{Result, ScfError};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellCounts {
    pub ncore: usize,
    pub nopen: usize,
    pub npair: usize,
}

impl ShellCounts {
    pub fn new(ncore: usize, nopen: usize, npair: usize) -> Self {
        ShellCounts { ncore, nopen, npair }
    }

    pub fn closed_shell(ncore: usize) -> Self {
        ShellCounts::new(ncore, 0, 0)
    }

    /// Counts for a molecule with `nclosed` doubly occupied orbitals, `nopen`
    /// unpaired electrons and `npair` of the closed-shell pairs split into GVB pairs.
    /// A failure reports `nclosed` as the core count.
    pub fn from_electrons(nclosed: usize, nopen: usize, npair: usize) -> Result<Self> {
        if npair > nclosed {
            return Err(ScfError::InvalidShellCounts {
                ncore: nclosed,
                nopen,
                npair,
                reason: format!("{} GVB pairs requested but only {} electron pairs", npair, nclosed),
            });
        }
        Ok(ShellCounts::new(nclosed - npair, nopen, npair))
    }

    /// 1 if a core shell exists, else 0.
    pub fn ncore_shells(&self) -> usize {
        usize::from(self.ncore > 0)
    }

    pub fn nocc(&self) -> usize {
        self.ncore + self.nopen + 2 * self.npair
    }

    pub fn nshells(&self) -> usize {
        self.ncore_shells() + self.nopen + 2 * self.npair
    }

    /// Index of the first open shell.
    pub fn first_open_shell(&self) -> usize {
        self.ncore_shells()
    }

    /// Index of the first GVB pair shell.
    pub fn first_pair_shell(&self) -> usize {
        self.ncore_shells() + self.nopen
    }

    /// Check that the occupied orbitals fit in a basis of `norb` functions.
    pub fn validate(&self, norb: usize) -> Result<()> {
        let invalid = |reason: String| ScfError::InvalidShellCounts {
            ncore: self.ncore,
            nopen: self.nopen,
            npair: self.npair,
            reason,
        };
        if self.nocc() == 0 {
            return Err(invalid("no occupied orbitals".to_string()));
        }
        if self.nocc() > norb {
            return Err(invalid(format!(
                "{} occupied orbitals exceed {} basis functions",
                self.nocc(),
                norb
            )));
        }
        Ok(())
    }

    pub fn is_closed_shell(&self) -> bool {
        self.nopen == 0 && self.npair == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellKind {
    Core,
    Open,
    /// First (strongly occupied) natural orbital of a GVB pair.
    PairFirst(usize),
    /// Second (weakly occupied) natural orbital of a GVB pair.
    PairSecond(usize),
}

/// A group of orbitals sharing one occupation number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shell {
    pub index: usize,
    pub kind: ShellKind,
    pub occupation: f64,
    pub orbitals: Vec<usize>,
}

/// Shell index of every occupied orbital.
///
/// ```
/// use mcscf::shells::{orbital_to_shell_mapping, ShellCounts};
/// assert_eq!(orbital_to_shell_mapping(&ShellCounts::new(2, 1, 0)), vec![0, 0, 1]);
/// ```
pub fn orbital_to_shell_mapping(counts: &ShellCounts) -> Vec<usize> {
    let offset = counts.ncore_shells();
    let mut shell = vec![0; counts.ncore];
    shell.extend((0..counts.nopen + 2 * counts.npair).map(|i| i + offset));
    shell
}

/// Orbital indices belonging to each shell, in shell order.
pub fn orbs_per_shell(counts: &ShellCounts) -> Vec<Vec<usize>> {
    let mut shells = Vec::with_capacity(counts.nshells());
    if counts.ncore > 0 {
        shells.push((0..counts.ncore).collect());
    }
    shells.extend((counts.ncore..counts.nocc()).map(|i| vec![i]));
    shells
}

/// The kind of every shell, in shell order.
pub fn shell_kinds(counts: &ShellCounts) -> Vec<ShellKind> {
    let mut kinds = Vec::with_capacity(counts.nshells());
    if counts.ncore > 0 {
        kinds.push(ShellKind::Core);
    }
    kinds.extend(std::iter::repeat(ShellKind::Open).take(counts.nopen));
    kinds.extend((0..counts.npair).map(ShellKind::PairFirst));
    kinds.extend((0..counts.npair).map(ShellKind::PairSecond));
    kinds
}

/// Complete shell description for one SCF variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellLayout {
    pub counts: ShellCounts,
    pub shells: Vec<Shell>,
    pub orbital_shell: Vec<usize>,
}

impl ShellLayout {
    pub fn new(counts: ShellCounts, occupations: &DVector<f64>) -> Result<Self> {
        if occupations.len() != counts.nshells() {
            return Err(ScfError::DimensionMismatch {
                what: "shell occupations",
                expected_rows: counts.nshells(),
                expected_cols: 1,
                rows: occupations.len(),
                cols: 1,
            });
        }

        let shells = orbs_per_shell(&counts)
            .into_iter()
            .zip(shell_kinds(&counts))
            .enumerate()
            .map(|(index, (orbitals, kind))| Shell {
                index,
                kind,
                occupation: occupations[index],
                orbitals,
            })
            .collect();

        Ok(ShellLayout {
            counts,
            shells,
            orbital_shell: orbital_to_shell_mapping(&counts),
        })
    }

    pub fn nshells(&self) -> usize {
        self.shells.len()
    }

    pub fn nocc(&self) -> usize {
        self.counts.nocc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbital_to_shell_mapping() {
        assert_eq!(orbital_to_shell_mapping(&ShellCounts::new(1, 0, 0)), vec![0]);
        assert_eq!(orbital_to_shell_mapping(&ShellCounts::new(2, 0, 0)), vec![0, 0]);
        assert_eq!(orbital_to_shell_mapping(&ShellCounts::new(2, 1, 0)), vec![0, 0, 1]);
    }

    #[test]
    fn test_no_core_shifts_shell_indices() {
        assert_eq!(orbital_to_shell_mapping(&ShellCounts::new(0, 2, 1)), vec![0, 1, 2, 3]);
        assert_eq!(
            orbs_per_shell(&ShellCounts::new(0, 1, 1)),
            vec![vec![0], vec![1], vec![2]]
        );
    }

    #[test]
    fn test_every_occupied_orbital_in_exactly_one_shell() {
        for ncore in 0..4 {
            for nopen in 0..3 {
                for npair in 0..3 {
                    let counts = ShellCounts::new(ncore, nopen, npair);
                    let shells = orbs_per_shell(&counts);
                    let expected = usize::from(ncore > 0) + nopen + 2 * npair;
                    assert_eq!(shells.len(), expected);
                    assert_eq!(counts.nshells(), expected);

                    let mut seen = vec![0usize; counts.nocc()];
                    for orbs in &shells {
                        for &i in orbs {
                            seen[i] += 1;
                        }
                    }
                    assert!(seen.iter().all(|&c| c == 1));

                    let mapping = orbital_to_shell_mapping(&counts);
                    for (sh, orbs) in shells.iter().enumerate() {
                        assert!(orbs.iter().all(|&i| mapping[i] == sh));
                    }
                }
            }
        }
    }

    #[test]
    fn test_shell_kinds_are_occupation_major() {
        let kinds = shell_kinds(&ShellCounts::new(3, 1, 2));
        assert_eq!(
            kinds,
            vec![
                ShellKind::Core,
                ShellKind::Open,
                ShellKind::PairFirst(0),
                ShellKind::PairFirst(1),
                ShellKind::PairSecond(0),
                ShellKind::PairSecond(1),
            ]
        );
    }

    #[test]
    fn test_from_electrons() {
        let counts = ShellCounts::from_electrons(5, 0, 1).unwrap();
        assert_eq!(counts, ShellCounts::new(4, 0, 1));

        let err = ShellCounts::from_electrons(1, 1, 2).unwrap_err();
        assert!(matches!(
            err,
            ScfError::InvalidShellCounts {
                ncore: 1,
                nopen: 1,
                npair: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_closed_shell_counts() {
        assert!(ShellCounts::closed_shell(3).is_closed_shell());
        assert!(!ShellCounts::new(3, 1, 0).is_closed_shell());
        assert!(!ShellCounts::new(2, 0, 1).is_closed_shell());
    }

    #[test]
    fn test_validate_against_basis_size() {
        assert!(ShellCounts::new(1, 0, 0).validate(2).is_ok());
        assert!(ShellCounts::new(0, 0, 0).validate(2).is_err());
        assert!(ShellCounts::new(1, 1, 1).validate(3).is_err());
    }

    #[test]
    fn test_layout_rejects_wrong_occupation_length() {
        let counts = ShellCounts::new(1, 1, 0);
        let err = ShellLayout::new(counts, &DVector::from_vec(vec![1.0])).unwrap_err();
        assert!(matches!(err, ScfError::DimensionMismatch { .. }));
    }
}
