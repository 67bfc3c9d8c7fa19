#![allow(non_snake_case)]
//! Normalised Cartesian Gaussian primitives.
//!
//! Integrals follow the McMurchie–Davidson scheme: products of Gaussians are
//! expanded in Hermite Gaussians (the `Eab` coefficients) and Coulomb-type
//! integrals reduce to Hermite integrals R_tuv over the Boys function.

extern crate nalgebra as na;

use crate::basis::Basis;
use crate::helper::{boys_function, fact2};
use itertools::iproduct;
use na::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One Cartesian factor x^l exp(-alpha x^2) of a primitive.
#[derive(Debug, Serialize, Deserialize, Copy, Clone)]
pub struct GTO1d {
    pub alpha: f64,
    pub l: i32,
    pub center: f64,
    pub norm: f64,
}

impl GTO1d {
    pub fn new(alpha: f64, l: i32, center: f64) -> Self {
        Self {
            alpha,
            l,
            center,
            norm: GTO1d::compute_norm(alpha, l),
        }
    }

    // N^2 = sqrt(2 alpha / pi) (4 alpha)^l / (2l - 1)!!
    fn compute_norm(alpha: f64, l: i32) -> f64 {
        let n_squared = (2.0 * alpha / PI).sqrt() * (4.0 * alpha).powi(l) / fact2(2 * l - 1);
        n_squared.sqrt()
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let x = x - self.center;
        self.norm * x.powi(self.l) * (-self.alpha * x * x).exp()
    }

    /// Hermite expansion coefficient E^{ij}_t for the product of two 1D
    /// Gaussians with exponents `a`, `b` separated by `Qx = A - B`.
    pub fn Eab(i: i32, j: i32, t: i32, Qx: f64, a: f64, b: f64) -> f64 {
        if t < 0 || i < 0 || j < 0 || t > i + j {
            return 0.0;
        }
        let p = a + b;
        let mu = a * b / p;

        match (i, j) {
            (0, 0) => (-mu * Qx * Qx).exp(),
            (_, 0) => {
                GTO1d::Eab(i - 1, 0, t - 1, Qx, a, b) / (2.0 * p)
                    - (mu * Qx / a) * GTO1d::Eab(i - 1, 0, t, Qx, a, b)
                    + (t + 1) as f64 * GTO1d::Eab(i - 1, 0, t + 1, Qx, a, b)
            }
            _ => {
                GTO1d::Eab(i, j - 1, t - 1, Qx, a, b) / (2.0 * p)
                    + (mu * Qx / b) * GTO1d::Eab(i, j - 1, t, Qx, a, b)
                    + (t + 1) as f64 * GTO1d::Eab(i, j - 1, t + 1, Qx, a, b)
            }
        }
    }

    pub(crate) fn Sab(a: &GTO1d, b: &GTO1d) -> f64 {
        let p = a.alpha + b.alpha;
        let Qx = a.center - b.center;
        a.norm * b.norm * GTO1d::Eab(a.l, b.l, 0, Qx, a.alpha, b.alpha) * (PI / p).sqrt()
    }

    // <a| -1/2 d^2/dx^2 |b>, differentiating the ket
    pub(crate) fn Tab(a: &GTO1d, b: &GTO1d) -> f64 {
        let p = a.alpha + b.alpha;
        let Qx = a.center - b.center;
        let e = |j: i32| GTO1d::Eab(a.l, j, 0, Qx, a.alpha, b.alpha);

        let lb = b.l as f64;
        let second_derivative = lb * (lb - 1.0) * e(b.l - 2)
            - 2.0 * b.alpha * (2.0 * lb + 1.0) * e(b.l)
            + 4.0 * b.alpha * b.alpha * e(b.l + 2);

        -0.5 * a.norm * b.norm * (PI / p).sqrt() * second_derivative
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone)]
pub struct GTO {
    pub alpha: f64,
    pub l_xyz: Vector3<i32>,
    pub center: Vector3<f64>,
    pub norm: f64,
    pub gto1d: [GTO1d; 3],
}

impl GTO {
    pub fn new(alpha: f64, l_xyz: Vector3<i32>, center: Vector3<f64>) -> Self {
        let gto1d = [
            GTO1d::new(alpha, l_xyz.x, center.x),
            GTO1d::new(alpha, l_xyz.y, center.y),
            GTO1d::new(alpha, l_xyz.z, center.z),
        ];
        let norm = gto1d[0].norm * gto1d[1].norm * gto1d[2].norm;
        Self {
            alpha,
            l_xyz,
            center,
            norm,
            gto1d,
        }
    }

    /// Move the primitive, keeping exponent and angular momentum.
    pub fn recentered(&self, center: Vector3<f64>) -> Self {
        GTO::new(self.alpha, self.l_xyz, center)
    }

    // Gaussian product centre and exponent of a pair
    fn product_center(a: &GTO, b: &GTO) -> (Vector3<f64>, f64) {
        let p = a.alpha + b.alpha;
        ((a.center * a.alpha + b.center * b.alpha) / p, p)
    }

    fn pair_coefficients(a: &GTO, b: &GTO, t: i32, u: i32, v: i32) -> f64 {
        let d = a.center - b.center;
        GTO1d::Eab(a.l_xyz.x, b.l_xyz.x, t, d.x, a.alpha, b.alpha)
            * GTO1d::Eab(a.l_xyz.y, b.l_xyz.y, u, d.y, a.alpha, b.alpha)
            * GTO1d::Eab(a.l_xyz.z, b.l_xyz.z, v, d.z, a.alpha, b.alpha)
    }

    /// Hermite Coulomb integral R^n_{tuv}(p, PC).
    ///
    /// Recursion from Helgaker, Jørgensen and Olsen, eq. 9.9.18–9.9.20.
    pub fn hermite_coulomb(t: i32, u: i32, v: i32, n: i32, p: f64, pc: &Vector3<f64>) -> f64 {
        if t < 0 || u < 0 || v < 0 {
            return 0.0;
        }
        if t > 0 {
            return (t - 1) as f64 * GTO::hermite_coulomb(t - 2, u, v, n + 1, p, pc)
                + pc.x * GTO::hermite_coulomb(t - 1, u, v, n + 1, p, pc);
        }
        if u > 0 {
            return (u - 1) as f64 * GTO::hermite_coulomb(t, u - 2, v, n + 1, p, pc)
                + pc.y * GTO::hermite_coulomb(t, u - 1, v, n + 1, p, pc);
        }
        if v > 0 {
            return (v - 1) as f64 * GTO::hermite_coulomb(t, u, v - 2, n + 1, p, pc)
                + pc.z * GTO::hermite_coulomb(t, u, v - 1, n + 1, p, pc);
        }
        (-2.0 * p).powi(n) * boys_function(n, p * pc.norm_squared())
    }
}

impl Basis for GTO {
    fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        self.gto1d[0].evaluate(r.x) * self.gto1d[1].evaluate(r.y) * self.gto1d[2].evaluate(r.z)
    }

    fn Sab(a: &GTO, b: &GTO) -> f64 {
        (0..3)
            .map(|k| GTO1d::Sab(&a.gto1d[k], &b.gto1d[k]))
            .product()
    }

    fn Tab(a: &GTO, b: &GTO) -> f64 {
        let s: Vec<f64> = (0..3).map(|k| GTO1d::Sab(&a.gto1d[k], &b.gto1d[k])).collect();
        let t: Vec<f64> = (0..3).map(|k| GTO1d::Tab(&a.gto1d[k], &b.gto1d[k])).collect();
        t[0] * s[1] * s[2] + s[0] * t[1] * s[2] + s[0] * s[1] * t[2]
    }

    fn Vab(a: &GTO, b: &GTO, R: Vector3<f64>, Z: u32) -> f64 {
        let (P, p) = GTO::product_center(a, b);
        let pc = P - R;
        let l = a.l_xyz + b.l_xyz;

        let val: f64 = iproduct!(0..=l.x, 0..=l.y, 0..=l.z)
            .map(|(t, u, v)| {
                GTO::pair_coefficients(a, b, t, u, v) * GTO::hermite_coulomb(t, u, v, 0, p, &pc)
            })
            .sum();

        -(Z as f64) * a.norm * b.norm * 2.0 * PI / p * val
    }

    fn JKabcd(a: &GTO, b: &GTO, c: &GTO, d: &GTO) -> f64 {
        let (P, p) = GTO::product_center(a, b);
        let (Q, q) = GTO::product_center(c, d);
        let alpha = p * q / (p + q);
        let pq = P - Q;
        let lab = a.l_xyz + b.l_xyz;
        let lcd = c.l_xyz + d.l_xyz;

        let mut val = 0.0;
        for (t, u, v) in iproduct!(0..=lab.x, 0..=lab.y, 0..=lab.z) {
            let e_ab = GTO::pair_coefficients(a, b, t, u, v);
            if e_ab == 0.0 {
                continue;
            }
            for (tau, nu, phi) in iproduct!(0..=lcd.x, 0..=lcd.y, 0..=lcd.z) {
                let sign = if (tau + nu + phi) % 2 == 0 { 1.0 } else { -1.0 };
                val += e_ab
                    * sign
                    * GTO::pair_coefficients(c, d, tau, nu, phi)
                    * GTO::hermite_coulomb(t + tau, u + nu, v + phi, 0, alpha, &pq);
            }
        }

        a.norm * b.norm * c.norm * d.norm * val * 2.0 * PI.powf(2.5)
            / (p * q * (p + q).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simpson(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
        let h = (b - a) / n as f64;
        let mut sum = f(a) + f(b);
        for i in 1..n {
            let w = if i % 2 == 0 { 2.0 } else { 4.0 };
            sum += w * f(a + i as f64 * h);
        }
        sum * h / 3.0
    }

    #[test]
    fn test_gto1d_normalization() {
        for l in 0..3 {
            let g = GTO1d::new(0.8, l, 0.3);
            let integral = simpson(|x| g.evaluate(x).powi(2), -12.0, 12.0, 20_000);
            assert!((integral - 1.0).abs() < 1e-8, "l={} norm^2 = {}", l, integral);
            assert!((GTO1d::Sab(&g, &g) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_gto1d_overlap_matches_quadrature() {
        let a = GTO1d::new(1.2, 1, 1.0);
        let b = GTO1d::new(0.8, 1, 3.0);
        let integral = simpson(|x| a.evaluate(x) * b.evaluate(x), -10.0, 14.0, 20_000);
        assert!((integral - GTO1d::Sab(&a, &b)).abs() < 1e-8);
    }

    #[test]
    fn test_s_kinetic_energy() {
        // <s|-1/2 ∇²|s> = 3 alpha / 2 for a normalised s Gaussian
        let g = GTO::new(0.7, Vector3::new(0, 0, 0), Vector3::zeros());
        assert!((GTO::Tab(&g, &g) - 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_s_nuclear_attraction_on_center() {
        // <s|-1/r|s> = -2 sqrt(2 alpha / pi)
        let alpha = 1.3;
        let g = GTO::new(alpha, Vector3::new(0, 0, 0), Vector3::zeros());
        let expected = -2.0 * (2.0 * alpha / PI).sqrt();
        assert!((GTO::Vab(&g, &g, Vector3::zeros(), 1) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_s_eri_same_center() {
        // (ss|ss) for four identical s functions = 2 sqrt(alpha / pi)
        let alpha = 0.9;
        let g = GTO::new(alpha, Vector3::new(0, 0, 0), Vector3::new(0.1, -0.2, 0.3));
        let expected = 2.0 * (alpha / PI).sqrt();
        assert!((GTO::JKabcd(&g, &g, &g, &g) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_p_eri_permutational_symmetry() {
        let a = GTO::new(1.1, Vector3::new(1, 0, 0), Vector3::new(0.0, 0.0, 0.0));
        let b = GTO::new(0.5, Vector3::new(0, 0, 0), Vector3::new(0.0, 0.4, 1.0));
        let c = GTO::new(0.7, Vector3::new(0, 1, 0), Vector3::new(0.3, 0.0, -0.5));
        let d = GTO::new(0.9, Vector3::new(0, 0, 1), Vector3::new(-0.2, 0.1, 0.2));

        let abcd = GTO::JKabcd(&a, &b, &c, &d);
        let bacd = GTO::JKabcd(&b, &a, &c, &d);
        let cdab = GTO::JKabcd(&c, &d, &a, &b);
        let badc = GTO::JKabcd(&b, &a, &d, &c);
        assert!((abcd - bacd).abs() < 1e-12);
        assert!((abcd - cdab).abs() < 1e-12);
        assert!((abcd - badc).abs() < 1e-12);
    }
}
