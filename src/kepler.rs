//! Two-body Keplerian propagation.
//!
//! Given six osculating elements at a reference epoch, computes the
//! heliocentric ecliptic Cartesian position at an arbitrary time. This is
//! deliberately unperturbed two-body motion: no planetary perturbations, no
//! light-time correction. The accuracy trade-off is acceptable for visibility
//! planning, where the downstream altitude sampling is itself coarse.

use nalgebra::Vector3;

use crate::constants::{JD, RADEG};

/// Iteration cap for the Newton-Raphson Kepler solve.
const KEPLER_MAX_ITER: usize = 30;

/// Early-exit residual threshold, radians.
const KEPLER_TOL: f64 = 1e-10;

/// Outcome of a Kepler-equation solve.
///
/// The solver has no failure path: after [`KEPLER_MAX_ITER`] iterations the
/// best available eccentric anomaly is returned regardless of residual.
/// `iterations` and `residual` let diagnostics and tests assert convergence
/// quality without changing the production call path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly E, radians.
    pub eccentric_anomaly: f64,
    /// Newton-Raphson iterations actually performed.
    pub iterations: usize,
    /// `|E - e*sin(E) - M|` at exit, radians.
    pub residual: f64,
}

/// Solve Kepler's equation `M = E - e*sin(E)` for the eccentric anomaly.
///
/// Arguments
/// -----------------
/// * `mean_anomaly`: M in radians.
/// * `eccentricity`: e, meaningful for bound orbits (`0 <= e < 1`); callers
///   reject parabolic/hyperbolic elements before getting here.
///
/// Return
/// ----------
/// * A [`KeplerSolution`] with E and convergence diagnostics.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
    let m = mean_anomaly;
    let mut e_anom = m;
    let mut iterations = 0;

    loop {
        let d = e_anom - eccentricity * e_anom.sin() - m;
        if d.abs() < KEPLER_TOL || iterations >= KEPLER_MAX_ITER {
            return KeplerSolution {
                eccentric_anomaly: e_anom,
                iterations,
                residual: d.abs(),
            };
        }
        e_anom -= d / (1.0 - eccentricity * e_anom.cos());
        iterations += 1;
    }
}

/// Heliocentric ecliptic position of a body at time `jd`.
///
/// Arguments
/// -----------------
/// * `epoch_jd`: reference epoch of the elements, Julian Date.
/// * `a`: semimajor axis, AU (`> 0`; enforced by the caller).
/// * `e`: eccentricity.
/// * `inc_deg`, `node_deg`, `peri_deg`: inclination, ascending-node longitude
///   and perihelion argument, degrees.
/// * `m0_deg`: mean anomaly at epoch, degrees.
/// * `n_deg_per_day`: mean motion, degrees/day.
/// * `jd`: target time, Julian Date.
///
/// Return
/// ----------
/// * Cartesian `(x, y, z)` in heliocentric ecliptic AU.
///
/// The orbital-plane position is rotated to the ecliptic by the standard
/// 3-1-3 Euler sequence (argument of perihelion, inclination, ascending node).
#[allow(clippy::too_many_arguments)]
pub fn position_at(
    epoch_jd: JD,
    a: f64,
    e: f64,
    inc_deg: f64,
    node_deg: f64,
    peri_deg: f64,
    m0_deg: f64,
    n_deg_per_day: f64,
    jd: JD,
) -> Vector3<f64> {
    let dt = jd - epoch_jd;
    let m_deg = (m0_deg + n_deg_per_day * dt).rem_euclid(360.0);
    let solution = solve_kepler(m_deg * RADEG, e);
    let e_anom = solution.eccentric_anomaly;

    // True anomaly via the half-angle arctangent form.
    let nu = 2.0
        * ((1.0 + e).sqrt() * (e_anom / 2.0).sin())
            .atan2((1.0 - e).sqrt() * (e_anom / 2.0).cos());
    let r = a * (1.0 - e * e_anom.cos());

    let x_orb = r * nu.cos();
    let y_orb = r * nu.sin();

    let (sin_peri, cos_peri) = (peri_deg * RADEG).sin_cos();
    let (sin_node, cos_node) = (node_deg * RADEG).sin_cos();
    let (sin_inc, cos_inc) = (inc_deg * RADEG).sin_cos();

    let x = (cos_node * cos_peri - sin_node * sin_peri * cos_inc) * x_orb
        + (-cos_node * sin_peri - sin_node * cos_peri * cos_inc) * y_orb;
    let y = (sin_node * cos_peri + cos_node * sin_peri * cos_inc) * x_orb
        + (-sin_node * sin_peri + cos_node * cos_peri * cos_inc) * y_orb;
    let z = sin_peri * sin_inc * x_orb + cos_peri * sin_inc * y_orb;

    Vector3::new(x, y, z)
}
