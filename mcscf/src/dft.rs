//! Local exchange and correlation functionals evaluated on grids of densities.
//!
//! Every functional works element-wise on a `DVector` of density values and
//! returns the energy density together with its derivative with respect to
//! the (spin) density. Points whose density is below [`DENSITY_CUTOFF`] give
//! exactly zero.

use nalgebra::DVector;
use std::f64::consts::PI;

pub const DENSITY_CUTOFF: f64 = 1e-10;

/// Slater exchange scaling for the usual X-alpha value.
pub const XALPHA: f64 = 2.0 / 3.0;

/// Set every density below `cut` to exactly zero.
pub fn zero_low_density(mut rho: DVector<f64>, cut: f64) -> DVector<f64> {
    for r in rho.iter_mut() {
        if *r < cut {
            *r = 0.0;
        }
    }
    rho
}

fn xalpha_factor(alpha: f64) -> f64 {
    -2.25 * alpha * (0.75 / PI).cbrt()
}

/// X-alpha exchange. Returns (f_x, df_x/dρ).
pub fn xs(rho: &DVector<f64>, alpha: f64) -> (DVector<f64>, DVector<f64>) {
    let fac = xalpha_factor(alpha);
    let rho = zero_low_density(rho.clone(), DENSITY_CUTOFF);
    let rho3 = rho.map(f64::cbrt);
    let fx = rho.component_mul(&rho3) * fac;
    let dfx = rho3 * (4.0 / 3.0 * fac);
    (fx, dfx)
}

/// Parameters (A, x0, b, c) of the VWN interpolation formula.
#[derive(Debug, Clone, Copy)]
struct VwnParams {
    a: f64,
    x0: f64,
    b: f64,
    c: f64,
}

const VWN_PARAMAGNETIC: VwnParams = VwnParams {
    a: 0.0310907,
    x0: -0.10498,
    b: 3.72744,
    c: 12.9352,
};

const VWN_FERROMAGNETIC: VwnParams = VwnParams {
    a: 0.01554535,
    x0: -0.32500,
    b: 7.06042,
    c: 13.0045,
};

impl VwnParams {
    fn xx(&self, x: f64) -> f64 {
        x * x + self.b * x + self.c
    }

    fn q(&self) -> f64 {
        (4.0 * self.c - self.b * self.b).sqrt()
    }

    /// Correlation energy per particle as a function of x = sqrt(r_s).
    fn eps(&self, x: f64) -> f64 {
        let VwnParams { a, x0, b, .. } = *self;
        let q = self.q();
        let xx = self.xx(x);
        let xx0 = self.xx(x0);
        a * ((x * x / xx).ln() - b * (x0 / xx0) * ((x - x0).powi(2) / xx).ln()
            + (2.0 * b / q) * (1.0 - x0 * (2.0 * x0 + b) / xx0) * (q / (2.0 * x + b)).atan())
    }

    /// d eps / dx
    fn deps(&self, x: f64) -> f64 {
        let VwnParams { a, x0, b, .. } = *self;
        let q = self.q();
        let xx = self.xx(x);
        let denom = (2.0 * x + b).powi(2) + q * q;
        a * (2.0 / x - (2.0 * x + b) / xx - 4.0 * b / denom
            - (b * x0 / self.xx(x0))
                * (2.0 / (x - x0) - (2.0 * x + b) / xx - 4.0 * (2.0 * x0 + b) / denom))
    }
}

/// Spin interpolation g(ζ) between the paramagnetic and ferromagnetic limits.
fn vwn_g(z: f64) -> f64 {
    1.125 * ((1.0 + z).powf(4.0 / 3.0) + (1.0 - z).powf(4.0 / 3.0) - 2.0)
}

fn vwn_dg(z: f64) -> f64 {
    1.5 * ((1.0 + z).cbrt() - (1.0 - z).cbrt())
}

/// VWN correlation at one point. Returns (e_c, v_c^α, v_c^β).
pub fn cvwn_point(rhoa: f64, rhob: f64) -> (f64, f64, f64) {
    let rho = rhoa + rhob;
    if rho < DENSITY_CUTOFF {
        return (0.0, 0.0, 0.0);
    }
    let zeta = ((rhoa - rhob) / rho).clamp(-1.0, 1.0);
    let x = (0.75 / PI / rho).powf(1.0 / 6.0);

    let (p, f) = (VWN_PARAMAGNETIC, VWN_FERROMAGNETIC);
    let (epsp, epsf) = (p.eps(x), f.eps(x));
    let g = vwn_g(zeta);
    let eps = epsp + g * (epsf - epsp);

    let deps_dx = p.deps(x) + g * (f.deps(x) - p.deps(x));
    let deps_dg = (epsf - epsp) * vwn_dg(zeta);

    let vca = eps - (x / 6.0) * deps_dx + deps_dg * (1.0 - zeta);
    let vcb = eps - (x / 6.0) * deps_dx - deps_dg * (1.0 + zeta);
    (eps * rho, vca, vcb)
}

/// VWN correlation energy density and spin potentials on a grid.
pub fn cvwn(
    rhoa: &DVector<f64>,
    rhob: &DVector<f64>,
) -> (DVector<f64>, DVector<f64>, DVector<f64>) {
    let n = rhoa.len();
    let mut ec = DVector::zeros(n);
    let mut vca = DVector::zeros(n);
    let mut vcb = DVector::zeros(n);
    for i in 0..n {
        let (e, a, b) = cvwn_point(rhoa[i], rhob[i]);
        ec[i] = e;
        vca[i] = a;
        vcb[i] = b;
    }
    (ec, vca, vcb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_low_density() {
        let rho = DVector::from_vec(vec![1e-12, 0.5, -1e-3, 1e-10]);
        let cut = zero_low_density(rho, 1e-10);
        assert_eq!(cut.as_slice(), &[0.0, 0.5, 0.0, 1e-10]);
    }

    #[test]
    fn test_xalpha_exchange() {
        let rho = DVector::from_vec(vec![1.0, 8.0, 0.0]);
        let (fx, dfx) = xs(&rho, XALPHA);
        assert!((fx[0] - (-0.9305257363491002)).abs() < 1e-12);
        assert!((dfx[0] - (-1.2407009817988002)).abs() < 1e-12);
        // f_x scales as rho^(4/3)
        assert!((fx[1] - 16.0 * fx[0]).abs() < 1e-10);
        assert_eq!(fx[2], 0.0);
        assert_eq!(dfx[2], 0.0);
    }

    #[test]
    fn test_vwn_paramagnetic_at_unit_rs() {
        let rho = 3.0 / (4.0 * PI);
        let (ec, va, vb) = cvwn_point(rho / 2.0, rho / 2.0);
        assert!((ec / rho - (-0.06001868644254108)).abs() < 1e-10);
        assert!((va - (-0.06781621037986248)).abs() < 1e-10);
        assert_eq!(va, vb);
    }

    #[test]
    fn test_vwn_potential_is_density_derivative() {
        let (ra, rb, h) = (0.3, 0.1, 1e-6);
        let (_, va, vb) = cvwn_point(ra, rb);
        let dea = (cvwn_point(ra + h, rb).0 - cvwn_point(ra - h, rb).0) / (2.0 * h);
        let deb = (cvwn_point(ra, rb + h).0 - cvwn_point(ra, rb - h).0) / (2.0 * h);
        assert!((va - dea).abs() < 1e-7);
        assert!((vb - deb).abs() < 1e-7);
    }

    #[test]
    fn test_vwn_grid_handles_polarized_and_empty_points() {
        let rhoa = DVector::from_vec(vec![0.2, 0.0, 0.3]);
        let rhob = DVector::from_vec(vec![0.0, 0.0, 0.1]);
        let (ec, va, vb) = cvwn(&rhoa, &rhob);
        assert!((ec[0] - (-0.007944508241612008)).abs() < 1e-10);
        assert!((va[0] - (-0.045023544521083446)).abs() < 1e-10);
        assert!((vb[0] - (-0.16732069927438242)).abs() < 1e-10);
        assert_eq!((ec[1], va[1], vb[1]), (0.0, 0.0, 0.0));
        assert!((ec[2] - (-0.023831082073597017)).abs() < 1e-10);
    }
}
