//! Per-night visibility evaluation.
//!
//! Takes the candidate rows from the store, propagates each one over the
//! night's sample grid and keeps the bodies that get bright enough and high
//! enough. The Earth ephemeris is evaluated once per sample time and shared
//! across all bodies.

use nalgebra::Vector3;
use tracing::debug;

use crate::constants::{Degree, JDTOMJD, MJD, NIGHT_SAMPLE_COUNT};
use crate::ephemeris::{altitude_deg, earth_positions};
use crate::epoch::unpack_epoch;
use crate::kepler::position_at;
use crate::night::night_window;
use crate::observer::Observer;
use crate::store::AsteroidRow;
use crate::transforms::{apparent_magnitude, ecliptic_to_equatorial, phase_angle_deg, Magnitude};

/// Selection thresholds for a visibility run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityParams {
    /// Bright limit (smallest accepted apparent magnitude).
    pub mag_min: f64,
    /// Faint limit.
    pub mag_max: f64,
    /// Minimum peak altitude, degrees.
    pub alt_min: Degree,
}

impl Default for VisibilityParams {
    fn default() -> Self {
        VisibilityParams {
            mag_min: 8.0,
            mag_max: 16.0,
            alt_min: 20.0,
        }
    }
}

/// A body that passed all cuts for the night.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleBody {
    pub number: Option<i64>,
    pub designation: String,
    /// Apparent magnitude at the peak-altitude sample, rounded to 0.01.
    pub magnitude: f64,
    /// Peak altitude over the night, degrees, rounded to 0.01.
    pub max_altitude: Degree,
    /// Sample time of the peak altitude.
    pub best_time: MJD,
}

/// Why a candidate was dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    /// Unbound or incomplete orbit (e outside [0, 1), a missing or
    /// non-positive).
    InvalidOrbit,
    /// Never reaches the minimum altitude during the night.
    TooLow,
    /// Apparent magnitude outside the requested window, or H unknown.
    OutsideMagnitudeWindow,
}

/// Evaluation result for one candidate row.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyOutcome {
    Accepted(VisibleBody),
    Rejected(RejectReason),
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Evaluate one body over the night's sample grid.
///
/// Arguments
/// -----------------
/// * `row`: stored catalog row.
/// * `observer`: observing site.
/// * `samples`: the night sample times, MJD.
/// * `earth`: Earth heliocentric equatorial positions at the same samples.
/// * `params`: selection thresholds.
pub fn evaluate_body(
    row: &AsteroidRow,
    observer: &Observer,
    samples: &[MJD],
    earth: &[Vector3<f64>],
    params: &VisibilityParams,
) -> BodyOutcome {
    let (eccentricity, semimajor_axis) = match (row.eccentricity, row.semimajor_axis) {
        (Some(e), Some(a)) if (0.0..1.0).contains(&e) && a > 0.0 => (e, a),
        _ => return BodyOutcome::Rejected(RejectReason::InvalidOrbit),
    };
    let epoch_jd = unpack_epoch(&row.epoch).jd();

    let mut best: Option<(usize, Degree, Vector3<f64>, Vector3<f64>)> = None;
    for (i, (&mjd, earth_pos)) in samples.iter().zip(earth).enumerate() {
        let helio_ecl = position_at(
            epoch_jd,
            semimajor_axis,
            eccentricity,
            row.inclination,
            row.ascending_node,
            row.perihelion_arg,
            row.mean_anomaly,
            row.mean_motion,
            mjd + JDTOMJD,
        );
        let helio_eq = ecliptic_to_equatorial(&helio_ecl);
        let geocentric = helio_eq - earth_pos;
        let altitude = altitude_deg(&geocentric, mjd, observer);

        if best.as_ref().is_none_or(|(_, alt, _, _)| altitude > *alt) {
            best = Some((i, altitude, helio_eq, geocentric));
        }
    }

    let (best_idx, max_altitude, helio_eq, geocentric) = match best {
        Some(best) => best,
        None => return BodyOutcome::Rejected(RejectReason::TooLow),
    };
    if max_altitude < params.alt_min {
        return BodyOutcome::Rejected(RejectReason::TooLow);
    }

    let phase = phase_angle_deg(&helio_eq, &geocentric);
    let magnitude = apparent_magnitude(
        row.absolute_magnitude,
        row.slope_parameter,
        helio_eq.norm(),
        geocentric.norm(),
        phase,
    );
    match magnitude {
        Magnitude::Value(m) if params.mag_min <= m && m <= params.mag_max => {
            BodyOutcome::Accepted(VisibleBody {
                number: row.number,
                designation: row.designation.clone(),
                magnitude: round2(m),
                max_altitude: round2(max_altitude),
                best_time: samples[best_idx],
            })
        }
        _ => BodyOutcome::Rejected(RejectReason::OutsideMagnitudeWindow),
    }
}

/// Run the full visibility pipeline for one night.
///
/// Arguments
/// -----------------
/// * `rows`: candidate bodies, already pre-filtered and ordered by the store.
/// * `observer`: observing site.
/// * `date_mjd`: 0h UTC of the calendar date; the night evaluated is the one
///   following it.
/// * `params`: selection thresholds.
///
/// Return
/// ----------
/// * The accepted bodies, in the same order the rows came in.
pub fn compute_visibility(
    rows: &[AsteroidRow],
    observer: &Observer,
    date_mjd: MJD,
    params: &VisibilityParams,
) -> Vec<VisibleBody> {
    let window = night_window(observer, date_mjd);
    let samples = window.samples(NIGHT_SAMPLE_COUNT);
    let earth = earth_positions(&samples);
    debug!(
        start = window.start,
        end = window.end,
        candidates = rows.len(),
        "evaluating night window"
    );

    let mut visible = Vec::new();
    let mut rejected_orbit = 0u64;
    let mut rejected_low = 0u64;
    let mut rejected_mag = 0u64;
    for row in rows {
        match evaluate_body(row, observer, &samples, &earth, params) {
            BodyOutcome::Accepted(body) => visible.push(body),
            BodyOutcome::Rejected(RejectReason::InvalidOrbit) => rejected_orbit += 1,
            BodyOutcome::Rejected(RejectReason::TooLow) => rejected_low += 1,
            BodyOutcome::Rejected(RejectReason::OutsideMagnitudeWindow) => rejected_mag += 1,
        }
    }
    debug!(
        accepted = visible.len(),
        rejected_orbit, rejected_low, rejected_mag, "visibility cuts applied"
    );
    visible
}
