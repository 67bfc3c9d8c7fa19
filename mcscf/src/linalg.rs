//! Dense linear-algebra helpers shared by the Fock build and the orbital update.

use crate::error::{Result, ScfError};
use nalgebra::{DMatrix, DVector};
use std::cmp::Ordering;

/// Eigenvalues below this are treated as zero when forming inverse roots.
const EIGEN_CUTOFF: f64 = 1e-10;

/// Σ_ij A_ij B_ij, i.e. tr(A Bᵀ).
pub fn trace2(a: &DMatrix<f64>, b: &DMatrix<f64>) -> f64 {
    a.component_mul(b).sum()
}

/// Bᵀ A B
pub fn simx(a: &DMatrix<f64>, b: &DMatrix<f64>) -> DMatrix<f64> {
    b.transpose() * a * b
}

/// Transform an AO-basis operator into the MO basis spanned by the columns of `u`.
pub fn ao2mo(h: &DMatrix<f64>, u: &DMatrix<f64>) -> DMatrix<f64> {
    simx(h, u)
}

/// Density matrix D = C Cᵀ from the selected orbital columns.
pub fn dmat_gen(u: &DMatrix<f64>, orbs: &[usize]) -> DMatrix<f64> {
    let c = u.select_columns(orbs);
    &c * c.transpose()
}

pub fn check_square(m: &DMatrix<f64>, n: usize, what: &'static str) -> Result<()> {
    if m.nrows() != n || m.ncols() != n {
        return Err(ScfError::DimensionMismatch {
            what,
            expected_rows: n,
            expected_cols: n,
            rows: m.nrows(),
            cols: m.ncols(),
        });
    }
    Ok(())
}

pub fn check_symmetric(m: &DMatrix<f64>, what: &'static str) -> Result<()> {
    check_square(m, m.nrows(), what)?;
    let scale = m.amax().max(1.0);
    if (m - m.transpose()).amax() > 1e-8 * scale {
        return Err(ScfError::NotSymmetric(what));
    }
    Ok(())
}

/// Flip each column so its largest-magnitude component is positive.
pub fn align_eigenvectors(mut eigvecs: DMatrix<f64>) -> DMatrix<f64> {
    for j in 0..eigvecs.ncols() {
        let max_val = eigvecs
            .column(j)
            .iter()
            .copied()
            .max_by(|a, b| a.abs().partial_cmp(&b.abs()).unwrap_or(Ordering::Less))
            .unwrap_or(0.0);
        if max_val < 0.0 {
            for x in eigvecs.column_mut(j).iter_mut() {
                *x = -*x;
            }
        }
    }
    eigvecs
}

/// Symmetric eigendecomposition with eigenvalues in ascending order.
pub fn eigh(h: &DMatrix<f64>) -> (DVector<f64>, DMatrix<f64>) {
    let eig = h.clone().symmetric_eigen();

    let mut indices: Vec<usize> = (0..eig.eigenvalues.len()).collect();
    indices.sort_by(|&a, &b| {
        eig.eigenvalues[a]
            .partial_cmp(&eig.eigenvalues[b])
            .unwrap_or(Ordering::Equal)
    });
    let sorted_eigenvalues = DVector::from_fn(indices.len(), |i, _| eig.eigenvalues[indices[i]]);
    let sorted_eigenvectors = eig.eigenvectors.select_columns(&indices);

    (sorted_eigenvalues, align_eigenvectors(sorted_eigenvectors))
}

/// Solve H c = E S c through the Cholesky factor S = L Lᵀ, with X = L⁻ᵀ.
pub fn geigh(h: &DMatrix<f64>, s: &DMatrix<f64>) -> Result<(DVector<f64>, DMatrix<f64>)> {
    check_symmetric(h, "Hamiltonian")?;
    check_symmetric(s, "overlap matrix")?;
    check_square(s, h.nrows(), "overlap matrix")?;

    let chol = s.clone().cholesky().ok_or(ScfError::SingularOverlap)?;
    let x = chol
        .l()
        .try_inverse()
        .ok_or(ScfError::SingularOverlap)?
        .transpose();

    let (e, c) = eigh(&simx(h, &x));
    Ok((e, align_eigenvectors(x * c)))
}

/// S^p for a symmetric positive definite S, via its eigendecomposition.
pub fn symmetric_power(s: &DMatrix<f64>, p: f64) -> Result<DMatrix<f64>> {
    let eig = s.clone().symmetric_eigen();
    if eig.eigenvalues.iter().any(|&v| v <= EIGEN_CUTOFF) {
        return Err(ScfError::SingularOverlap);
    }
    let d = DMatrix::from_diagonal(&eig.eigenvalues.map(|v| v.powf(p)));
    Ok(&eig.eigenvectors * d * eig.eigenvectors.transpose())
}

/// An overlap matrix together with S^{1/2} and S^{-1/2}.
#[derive(Debug, Clone)]
pub struct OverlapMetric {
    pub s: DMatrix<f64>,
    pub half: DMatrix<f64>,
    pub inv_half: DMatrix<f64>,
}

impl OverlapMetric {
    pub fn new(s: DMatrix<f64>) -> Result<Self> {
        let half = symmetric_power(&s, 0.5)?;
        let inv_half = symmetric_power(&s, -0.5)?;
        Ok(OverlapMetric { s, half, inv_half })
    }
}

/// Symmetric (Löwdin) orthonormalisation of the columns of `c` under the metric `s`:
/// C (Cᵀ S C)^{-1/2}.
pub fn lowdin_orthonormalize(c: &DMatrix<f64>, s: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if c.ncols() == 0 {
        return Ok(c.clone());
    }
    let m = simx(s, c);
    let m_inv_sqrt =
        symmetric_power(&m, -0.5).map_err(|_| ScfError::LinearDependence("occupied orbitals"))?;
    Ok(c * m_inv_sqrt)
}

/// S-orthonormal basis of the complement of span(`occ`), with `nvirt` columns.
///
/// Works in the Löwdin-orthogonal AO basis, where the complement is the
/// eigenspace of I − Y Yᵀ with eigenvalue one.
pub fn orthonormal_complement(
    occ: &DMatrix<f64>,
    metric: &OverlapMetric,
    nvirt: usize,
) -> Result<DMatrix<f64>> {
    let n = metric.s.nrows();
    if nvirt == 0 {
        return Ok(DMatrix::zeros(n, 0));
    }

    let y = &metric.half * occ;
    let projector = DMatrix::identity(n, n) - &y * y.transpose();
    let (values, vectors) = eigh(&projector);

    // eigenvalues are ascending, so the complement sits in the last columns
    if values[n - nvirt] < 0.5 {
        return Err(ScfError::LinearDependence("virtual orbitals"));
    }
    let indices: Vec<usize> = (n - nvirt..n).collect();
    Ok(align_eigenvectors(&metric.inv_half * vectors.select_columns(&indices)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlap() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 3, &[1.0, 0.4, 0.1, 0.4, 1.0, 0.3, 0.1, 0.3, 1.0])
    }

    fn hamiltonian() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 3, &[-1.5, -0.6, -0.2, -0.6, -1.1, -0.4, -0.2, -0.4, -0.7])
    }

    fn assert_orthonormal(c: &DMatrix<f64>, s: &DMatrix<f64>) {
        let m = simx(s, c);
        let id = DMatrix::<f64>::identity(c.ncols(), c.ncols());
        assert!((m - id).amax() < 1e-10);
    }

    #[test]
    fn test_trace2() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = DMatrix::from_row_slice(2, 2, &[0.5, 1.0, 1.0, 0.5]);
        assert_eq!(trace2(&a, &b), 0.5 + 2.0 + 3.0 + 2.0);
    }

    #[test]
    fn test_eigh_sorted_and_aligned() {
        let h = hamiltonian();
        let (e, c) = eigh(&h);
        assert!(e[0] <= e[1] && e[1] <= e[2]);
        for j in 0..3 {
            let residual = &h * c.column(j) - c.column(j) * e[j];
            assert!(residual.amax() < 1e-10);
            let big = c.column(j).iter().copied().fold(0.0_f64, |m, x| if x.abs() > m.abs() { x } else { m });
            assert!(big > 0.0);
        }
    }

    #[test]
    fn test_geigh_solves_generalized_problem() {
        let (h, s) = (hamiltonian(), overlap());
        let (e, c) = geigh(&h, &s).unwrap();
        assert_orthonormal(&c, &s);
        for j in 0..3 {
            let residual = &h * c.column(j) - (&s * c.column(j)) * e[j];
            assert!(residual.amax() < 1e-10);
        }
    }

    #[test]
    fn test_geigh_rejects_bad_input() {
        let h = hamiltonian();
        let singular = DMatrix::from_element(3, 3, 1.0);
        assert_eq!(geigh(&h, &singular).unwrap_err(), ScfError::SingularOverlap);

        let mut asym = hamiltonian();
        asym[(0, 1)] += 0.1;
        assert_eq!(geigh(&asym, &overlap()).unwrap_err(), ScfError::NotSymmetric("Hamiltonian"));

        let small = DMatrix::<f64>::identity(2, 2);
        assert!(matches!(
            geigh(&h, &small),
            Err(ScfError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_dmat_gen_selects_columns() {
        let u = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let d = dmat_gen(&u, &[1]);
        assert_eq!(d, DMatrix::from_row_slice(2, 2, &[4.0, 8.0, 8.0, 16.0]));
    }

    #[test]
    fn test_lowdin_and_complement_span_the_space() {
        let s = overlap();
        let occ = DMatrix::from_row_slice(3, 1, &[1.0, 0.2, 0.0]);
        let c = lowdin_orthonormalize(&occ, &s).unwrap();
        assert_orthonormal(&c, &s);

        let metric = OverlapMetric::new(s.clone()).unwrap();
        let virt = orthonormal_complement(&c, &metric, 2).unwrap();
        let mut full = DMatrix::zeros(3, 3);
        full.set_column(0, &c.column(0));
        full.set_column(1, &virt.column(0));
        full.set_column(2, &virt.column(1));
        assert_orthonormal(&full, &s);
    }

    #[test]
    fn test_lowdin_detects_dependent_columns() {
        let s = overlap();
        let occ = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(
            lowdin_orthonormalize(&occ, &s).unwrap_err(),
            ScfError::LinearDependence("occupied orbitals")
        );
    }

    #[test]
    fn test_overlap_metric_roots() {
        let s = overlap();
        let metric = OverlapMetric::new(s.clone()).unwrap();
        let id = DMatrix::<f64>::identity(3, 3);
        assert!((&metric.half * &metric.half - &s).amax() < 1e-12);
        assert!((&metric.half * &metric.inv_half - &id).amax() < 1e-12);
        assert!((simx(&s, &metric.inv_half) - id).amax() < 1e-12);

        let singular = DMatrix::from_element(3, 3, 1.0);
        assert_eq!(
            OverlapMetric::new(singular).unwrap_err(),
            ScfError::SingularOverlap
        );
    }
}
