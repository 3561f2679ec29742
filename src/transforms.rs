//! Frame rotations and photometry.
//!
//! Heliocentric positions come out of the propagator in the ecliptic frame;
//! everything downstream (RA/Dec, hour angles, altitudes) works in the
//! equatorial frame. The single rotation between the two uses the fixed
//! J2000.0 mean obliquity, consistent with treating the osculating elements
//! as J2000 ecliptic elements.

use nalgebra::Vector3;

use crate::constants::{Degree, MAG_UNKNOWN, OBLIQUITY_J2000_DEG, RADEG};

/// Apparent magnitude of a body, tagged so the unknown-H case stays
/// distinguishable from a genuinely bright-or-faint value.
///
/// `Unknown` carries the `99.0` sentinel for display and for magnitude-window
/// comparisons (the sentinel deliberately fails any sane bright/faint window).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Magnitude {
    Value(f64),
    Unknown(f64),
}

impl Magnitude {
    pub fn value(&self) -> f64 {
        match self {
            Magnitude::Value(v) | Magnitude::Unknown(v) => *v,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Magnitude::Unknown(_))
    }
}

/// Rotate a vector from the ecliptic frame to the equatorial frame.
///
/// A single rotation about the x axis by the J2000.0 mean obliquity
/// (23.4392911 degrees). Works for any Cartesian vector in consistent units.
pub fn ecliptic_to_equatorial(v: &Vector3<f64>) -> Vector3<f64> {
    let (sin_eps, cos_eps) = (OBLIQUITY_J2000_DEG * RADEG).sin_cos();
    Vector3::new(
        v.x,
        cos_eps * v.y - sin_eps * v.z,
        sin_eps * v.y + cos_eps * v.z,
    )
}

/// Sun-body-observer phase angle, degrees.
///
/// Arguments
/// -----------------
/// * `heliocentric`: Sun-to-body vector, AU.
/// * `geocentric`: observer-to-body vector, AU (same frame as `heliocentric`).
///
/// Return
/// ----------
/// * The angle at the body between the directions to the Sun and to the
///   observer, in `[0, 180]` degrees. The cosine is clamped so rounding at
///   conjunction or opposition cannot produce a NaN.
pub fn phase_angle_deg(heliocentric: &Vector3<f64>, geocentric: &Vector3<f64>) -> Degree {
    let r = heliocentric.norm();
    let delta = geocentric.norm();
    let cos_phase = heliocentric.dot(geocentric) / (r * delta + 1e-20);
    cos_phase.clamp(-1.0, 1.0).acos() / RADEG
}

/// Apparent visual magnitude from the IAU H-G photometric system.
///
/// Arguments
/// -----------------
/// * `h`: absolute magnitude, or `None` when the catalog lacks one.
/// * `g`: slope parameter (catalog value or the 0.15 default).
/// * `r_au`: heliocentric distance, AU.
/// * `delta_au`: observer distance, AU.
/// * `phase_deg`: phase angle, degrees.
///
/// Return
/// ----------
/// * [`Magnitude::Value`] with the H-G magnitude, or [`Magnitude::Unknown`]
///   when H is absent or either distance is non-positive.
pub fn apparent_magnitude(
    h: Option<f64>,
    g: f64,
    r_au: f64,
    delta_au: f64,
    phase_deg: Degree,
) -> Magnitude {
    let h = match h {
        Some(h) => h,
        None => return Magnitude::Unknown(MAG_UNKNOWN),
    };
    if r_au <= 0.0 || delta_au <= 0.0 {
        return Magnitude::Unknown(MAG_UNKNOWN);
    }

    let tan_half = (phase_deg * RADEG / 2.0).tan();
    let phi1 = (-3.33 * tan_half.powf(0.63)).exp();
    let phi2 = (-1.87 * tan_half.powf(1.22)).exp();
    let phi = (1.0 - g) * phi1 + g * phi2;

    Magnitude::Value(h + 5.0 * (r_au * delta_au).log10() - 2.5 * phi.max(1e-20).log10())
}
