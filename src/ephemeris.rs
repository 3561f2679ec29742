//! Earth position and topocentric altitude from the `astro` crate.
//!
//! The `astro` routines work in geocentric terms, so the heliocentric Earth
//! position is recovered by negating the Sun's geocentric ecliptic vector.
//! All outputs here are in the equatorial frame to match the rest of the
//! visibility pipeline.

use astro::coords::alt_frm_eq;
use astro::sun;
use astro::time::mn_sidr;
use nalgebra::Vector3;

use crate::constants::{Degree, JDTOMJD, MJD, RADEG};
use crate::observer::Observer;
use crate::transforms::ecliptic_to_equatorial;

/// Sun's geocentric position in the equatorial frame, AU.
fn sun_geocentric_equatorial(mjd: MJD) -> Vector3<f64> {
    let jd = mjd + JDTOMJD;
    let (ecl, rad_vec) = sun::geocent_ecl_pos(jd);
    let (sin_lat, cos_lat) = ecl.lat.sin_cos();
    let (sin_long, cos_long) = ecl.long.sin_cos();
    let ecliptic = Vector3::new(
        rad_vec * cos_lat * cos_long,
        rad_vec * cos_lat * sin_long,
        rad_vec * sin_lat,
    );
    ecliptic_to_equatorial(&ecliptic)
}

/// Earth's heliocentric position in the equatorial frame, AU.
pub fn earth_position(mjd: MJD) -> Vector3<f64> {
    -sun_geocentric_equatorial(mjd)
}

/// Earth positions for a whole sampling grid.
///
/// The visibility pipeline evaluates every asteroid on the same night grid,
/// so the (comparatively expensive) solar theory is evaluated once per sample
/// here rather than once per asteroid.
pub fn earth_positions(mjds: &[MJD]) -> Vec<Vector3<f64>> {
    mjds.iter().map(|&mjd| earth_position(mjd)).collect()
}

/// Topocentric altitude of a direction given in geocentric equatorial
/// coordinates.
///
/// Arguments
/// -----------------
/// * `geocentric_eq`: observer-to-body vector in the equatorial frame; only
///   its direction matters.
/// * `mjd`: time of observation.
/// * `observer`: observing site.
///
/// Return
/// ----------
/// * Altitude above the horizon, degrees. Diurnal parallax and refraction are
///   ignored; at asteroid distances both are far below the grid resolution.
pub fn altitude_deg(geocentric_eq: &Vector3<f64>, mjd: MJD, observer: &Observer) -> Degree {
    let norm = geocentric_eq.norm();
    let ra = geocentric_eq.y.atan2(geocentric_eq.x);
    let dec = (geocentric_eq.z / (norm + 1e-20)).asin();

    // astro::coords::hr_angl_frm_observer_long subtracts the longitude with
    // the wrong sign; the correct east-positive relation is trivial.
    let gmst = mn_sidr(mjd + JDTOMJD);
    let hour_angle = gmst + observer.longitude * RADEG - ra;

    alt_frm_eq(hour_angle, dec, observer.latitude * RADEG) / RADEG
}

/// Altitude of the Sun's center, degrees. Drives the twilight scan.
pub fn sun_altitude_deg(mjd: MJD, observer: &Observer) -> Degree {
    let sun_eq = sun_geocentric_equatorial(mjd);
    altitude_deg(&sun_eq, mjd, observer)
}
