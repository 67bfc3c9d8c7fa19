//! Occupations and Coulomb/exchange coupling coefficients of the
//! generalized energy expression
//!
//! ```text
//!   E = 2 Σ f_i h_ii + Σ (a_ij J_ij + b_ij K_ij)
//! ```
//!
//! Closed-shell orbitals have f = 1, high-spin open-shell orbitals f = 1/2
//! and GVB natural orbitals take their CI coefficient. The base rules
//! a_ij = 2 f_i f_j and b_ij = -f_i f_j are then corrected for open-shell
//! exchange, pair self-interaction and the two orbitals of one pair.

use crate::error::{Result, ScfError};
use crate::shells::ShellCounts;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouplingCoefficients {
    /// occupation of each shell
    pub f: DVector<f64>,
    /// Coulomb coupling between shells
    pub a: DMatrix<f64>,
    /// exchange coupling between shells
    pub b: DMatrix<f64>,
}

/// Single-configuration guess `[1, 0]` for every GVB pair, laid out pair-major.
pub fn guess_gvb_ci_coeffs(npair: usize) -> Vec<f64> {
    (0..npair).flat_map(|_| [1.0, 0.0]).collect()
}

/// Position in the pair-major coefficient list `[p1n1, p1n2, p2n1, p2n2, ...]`
/// of the coefficient belonging to pair shell `k`, where the pair shells are
/// laid out occupation-major `[p1n1, p2n1, ..., p1n2, p2n2, ...]`.
///
/// ```
/// use mcscf::coupling::pair_shell_to_coefficient;
/// let order: Vec<usize> = (0..4).map(|k| pair_shell_to_coefficient(k, 2)).collect();
/// assert_eq!(order, vec![0, 2, 1, 3]);
/// ```
pub fn pair_shell_to_coefficient(k: usize, npair: usize) -> usize {
    let pair = k % npair;
    let natural_orbital = k / npair;
    2 * pair + natural_orbital
}

/// Reorder pair-major CI coefficients into pair-shell order.
pub fn coefficients_in_shell_order(coeffs: &[f64], npair: usize) -> Vec<f64> {
    (0..2 * npair)
        .map(|k| coeffs[pair_shell_to_coefficient(k, npair)])
        .collect()
}

/// Build f, a and b for the given shell structure.
///
/// `coeffs` holds the GVB CI coefficients pair by pair; `None` uses
/// [`guess_gvb_ci_coeffs`]. Each coefficient becomes a shell occupation and
/// must lie in [0, 1].
pub fn fab(counts: &ShellCounts, coeffs: Option<&[f64]>) -> Result<CouplingCoefficients> {
    let npair = counts.npair;
    let guess;
    let coeffs = match coeffs {
        Some(c) => c,
        None => {
            guess = guess_gvb_ci_coeffs(npair);
            guess.as_slice()
        }
    };
    if coeffs.len() != 2 * npair {
        return Err(ScfError::CoefficientMismatch {
            npair,
            expected: 2 * npair,
            found: coeffs.len(),
        });
    }
    if let Some((index, &value)) = coeffs
        .iter()
        .enumerate()
        .find(|(_, c)| !(0.0..=1.0).contains(*c))
    {
        return Err(ScfError::CoefficientOutOfRange { index, value });
    }

    let nsh = counts.nshells();
    let open = counts.first_open_shell()..counts.first_pair_shell();
    let pair = counts.first_pair_shell()..nsh;

    let mut f = DVector::zeros(nsh);
    if counts.ncore > 0 {
        f[0] = 1.0;
    }
    for i in open.clone() {
        f[i] = 0.5;
    }
    for (i, c) in pair.clone().zip(coefficients_in_shell_order(coeffs, npair)) {
        f[i] = c;
    }

    let mut a = DMatrix::from_fn(nsh, nsh, |i, j| 2.0 * f[i] * f[j]);
    let mut b = DMatrix::from_fn(nsh, nsh, |i, j| -f[i] * f[j]);

    for i in open.clone() {
        for j in open.clone() {
            b[(i, j)] = -0.5;
        }
    }

    for i in pair.clone() {
        a[(i, i)] = f[i];
        b[(i, i)] = 0.0;
    }

    for p in 0..npair {
        let i = counts.first_pair_shell() + p;
        let j = i + npair;
        let cross = -coeffs[2 * p] * coeffs[2 * p + 1];
        a[(i, j)] = 0.0;
        a[(j, i)] = 0.0;
        b[(i, j)] = cross;
        b[(j, i)] = cross;
    }

    Ok(CouplingCoefficients { f, a, b })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_symmetric(m: &DMatrix<f64>) -> bool {
        m == &m.transpose()
    }

    #[test]
    fn test_closed_shell_weights() {
        let cc = fab(&ShellCounts::new(1, 0, 0), None).unwrap();
        assert_eq!(cc.f, DVector::from_vec(vec![1.0]));
        assert_eq!(cc.a, DMatrix::from_element(1, 1, 2.0));
        assert_eq!(cc.b, DMatrix::from_element(1, 1, -1.0));

        // any number of core orbitals still forms one shell
        let cc = fab(&ShellCounts::new(5, 0, 0), None).unwrap();
        assert_eq!(cc.f.len(), 1);
    }

    #[test]
    fn test_single_open_shell() {
        let cc = fab(&ShellCounts::new(0, 1, 0), None).unwrap();
        assert_eq!(cc.f, DVector::from_vec(vec![0.5]));
        assert_eq!(cc.a, DMatrix::from_element(1, 1, 0.5));
        assert_eq!(cc.b, DMatrix::from_element(1, 1, -0.5));
    }

    #[test]
    fn test_single_pair_default_guess() {
        let cc = fab(&ShellCounts::new(0, 0, 1), None).unwrap();
        assert_eq!(cc.f, DVector::from_vec(vec![1.0, 0.0]));
        assert_eq!(cc.a, DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 0.0]));
        assert!(cc.b.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_core_plus_open_shells() {
        let cc = fab(&ShellCounts::new(2, 2, 0), None).unwrap();
        assert_eq!(cc.f, DVector::from_vec(vec![1.0, 0.5, 0.5]));
        assert_eq!(cc.a[(0, 1)], 1.0);
        assert_eq!(cc.b[(0, 1)], -0.5);
        assert_eq!(cc.a[(1, 2)], 0.5);
        assert_eq!(cc.b[(1, 2)], -0.5);
        assert_eq!(cc.b[(1, 1)], -0.5);
    }

    #[test]
    fn test_coefficient_reindexing() {
        assert_eq!(
            coefficients_in_shell_order(&[0.9, 0.1, 0.8, 0.2], 2),
            vec![0.9, 0.8, 0.1, 0.2]
        );
        let cc = fab(&ShellCounts::new(1, 0, 2), Some(&[0.9, 0.1, 0.8, 0.2])).unwrap();
        assert_eq!(cc.f.as_slice(), &[1.0, 0.9, 0.8, 0.1, 0.2]);
    }

    #[test]
    fn test_pair_partner_terms_use_own_coefficients() {
        let c = [0.9, 0.3, 0.7, 0.5];
        let cc = fab(&ShellCounts::new(1, 1, 2), Some(&c)).unwrap();
        // shells: core, open, p1n1, p2n1, p1n2, p2n2
        assert_eq!(cc.a[(2, 4)], 0.0);
        assert_eq!(cc.b[(2, 4)], -c[0] * c[1]);
        assert_eq!(cc.a[(3, 5)], 0.0);
        assert_eq!(cc.b[(3, 5)], -c[2] * c[3]);
        assert_eq!(cc.a[(2, 2)], 0.9);
        assert_eq!(cc.b[(3, 3)], 0.0);
        // unrelated pair orbitals keep the base rule
        assert_eq!(cc.a[(2, 3)], 2.0 * 0.9 * 0.7);
        assert_eq!(cc.b[(2, 5)], -0.9 * 0.5);
    }

    #[test]
    fn test_fab_is_idempotent_and_symmetric() {
        let c = [0.95, 0.2, 0.85, 0.4];
        for counts in [
            ShellCounts::new(3, 0, 0),
            ShellCounts::new(0, 3, 0),
            ShellCounts::new(2, 2, 2),
            ShellCounts::new(0, 1, 2),
        ] {
            let coeffs = (counts.npair == 2).then_some(&c[..]);
            let first = fab(&counts, coeffs).unwrap();
            let second = fab(&counts, coeffs).unwrap();
            assert_eq!(first, second);
            assert!(is_symmetric(&first.a));
            assert!(is_symmetric(&first.b));
        }
    }

    #[test]
    fn test_wrong_coefficient_count() {
        let err = fab(&ShellCounts::new(1, 0, 1), Some(&[1.0])).unwrap_err();
        assert_eq!(
            err,
            ScfError::CoefficientMismatch {
                npair: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_coefficients_must_be_occupations() {
        let counts = ShellCounts::new(0, 0, 1);
        let err = fab(&counts, Some(&[0.95, -0.3])).unwrap_err();
        assert_eq!(
            err,
            ScfError::CoefficientOutOfRange {
                index: 1,
                value: -0.3
            }
        );

        let err = fab(&counts, Some(&[1.2, 0.0])).unwrap_err();
        assert!(matches!(err, ScfError::CoefficientOutOfRange { index: 0, .. }));

        let err = fab(&counts, Some(&[f64::NAN, 0.0])).unwrap_err();
        assert!(matches!(err, ScfError::CoefficientOutOfRange { index: 0, .. }));

        // both ends of the interval are valid occupations
        assert!(fab(&counts, Some(&[1.0, 0.0])).is_ok());
        assert!(fab(&counts, Some(&[0.0, 1.0])).is_ok());
    }
}
