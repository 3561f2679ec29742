//! Astronomical-night detection.
//!
//! The observable window for a given calendar date is the stretch of that
//! night during which the Sun stays below the astronomical-twilight limit of
//! -18 degrees. The window is found by brute-force sampling of the solar
//! altitude around local solar midnight; at 200 samples over 24 hours the
//! boundary resolution is about 7 minutes, well inside the accuracy of the
//! rest of the pipeline.

use tracing::debug;

use crate::constants::{MJD, NIGHT_GRID_SAMPLES, TWILIGHT_ALT_DEG};
use crate::ephemeris::sun_altitude_deg;
use crate::observer::Observer;

/// Half-width of the fallback window when no astronomical night exists, days.
const FALLBACK_HALF_WIDTH: f64 = 0.25;

/// One night's observable window, MJD endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightWindow {
    pub start: MJD,
    pub end: MJD,
}

impl NightWindow {
    /// Duration in days.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// `n` evenly spaced sample times covering the window, endpoints
    /// included. `n` must be at least 2.
    pub fn samples(&self, n: usize) -> Vec<MJD> {
        let step = self.duration() / (n - 1) as f64;
        (0..n).map(|i| self.start + i as f64 * step).collect()
    }
}

/// Find the astronomical night following the given calendar date.
///
/// Arguments
/// -----------------
/// * `observer`: observing site; the longitude shifts the search window so
///   the scan is centered on local solar midnight.
/// * `date_mjd`: 0h UTC of the calendar date the night belongs to.
///
/// Return
/// ----------
/// * The window from the first to the last scanned sample with the Sun below
///   -18 degrees. When the Sun never gets that low (polar summer), a fixed
///   window of local midnight plus/minus six hours is returned instead so
///   the caller always has something to sample.
pub fn night_window(observer: &Observer, date_mjd: MJD) -> NightWindow {
    // Local solar midnight after the given date, in UTC days.
    let center = date_mjd + 1.0 - observer.longitude / 360.0;

    let step = 1.0 / (NIGHT_GRID_SAMPLES - 1) as f64;
    let mut start = None;
    let mut end = None;
    for i in 0..NIGHT_GRID_SAMPLES {
        let mjd = center - 0.5 + i as f64 * step;
        if sun_altitude_deg(mjd, observer) < TWILIGHT_ALT_DEG {
            if start.is_none() {
                start = Some(mjd);
            }
            end = Some(mjd);
        }
    }

    match (start, end) {
        (Some(start), Some(end)) if end > start => NightWindow { start, end },
        _ => {
            debug!(
                lat = observer.latitude,
                date_mjd, "no astronomical night, using fixed window around local midnight"
            );
            NightWindow {
                start: center - FALLBACK_HALF_WIDTH,
                end: center + FALLBACK_HALF_WIDTH,
            }
        }
    }
}
